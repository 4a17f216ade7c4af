use crate::models::{
    AppData, DailyPoint, HistoryResponse, WeeklyAveragePoint, WeeklyPoint, WeeklyStatsResponse,
};
use chrono::{Datelike, Duration, Local, NaiveDate};
use std::collections::BTreeMap;

pub fn weekly_stats(data: &AppData) -> WeeklyStatsResponse {
    weekly_stats_at(Local::now().date_naive(), data)
}

/// Stats over the current Monday-based week, up to and including `today`.
pub fn weekly_stats_at(today: NaiveDate, data: &AppData) -> WeeklyStatsResponse {
    let totals = data.daily_totals();
    let start = week_start(today);

    let week: Vec<f64> = totals
        .range(start..=today)
        .map(|(_, total)| *total)
        .collect();

    let total: f64 = week.iter().sum();
    let best_day = week.iter().copied().fold(0.0, f64::max);
    let days_recorded = week.len().max(1) as f64;

    WeeklyStatsResponse {
        streak: current_streak(today, &totals),
        weekly_average: (total / days_recorded).round(),
        best_day,
    }
}

/// Consecutive days with intake, ending today, or yesterday when nothing has
/// been logged today yet.
pub fn current_streak(today: NaiveDate, totals: &BTreeMap<NaiveDate, f64>) -> u32 {
    let mut day = if totals.contains_key(&today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    while totals.contains_key(&day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

/// Longest run of consecutive days with intake.
pub fn best_streak(totals: &BTreeMap<NaiveDate, f64>) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in totals.keys() {
        run = match previous {
            Some(prev) if *date - prev == Duration::days(1) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(*date);
    }
    best
}

pub fn build_history(data: &AppData, goal_ml: u32) -> HistoryResponse {
    build_history_at(Local::now().date_naive(), data, goal_ml)
}

pub fn build_history_at(today: NaiveDate, data: &AppData, goal_ml: u32) -> HistoryResponse {
    const WEEK_COUNT: usize = 8;

    let goal = f64::from(goal_ml);
    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let total_ml = data.total_on(date);
        last_7_days.push(DailyPoint {
            date: date.to_string(),
            total_ml,
            goal_met: goal_ml > 0 && total_ml >= goal,
        });
    }

    let current_week_start = week_start(today);
    let mut weekly_totals = Vec::with_capacity(WEEK_COUNT);
    let mut weekly_averages = Vec::with_capacity(WEEK_COUNT);

    for offset in (0..WEEK_COUNT).rev() {
        let start = current_week_start - Duration::weeks(offset as i64);
        let end = start + Duration::days(6);

        let total_ml: f64 = (0..7)
            .map(|day_offset| data.total_on(start + Duration::days(day_offset)))
            .sum();

        let days_counted = if today < start {
            0
        } else if today > end {
            7
        } else {
            (today - start).num_days() as u8 + 1
        };

        let denom = if days_counted == 0 { 1.0 } else { f64::from(days_counted) };

        weekly_totals.push(WeeklyPoint {
            week: week_label(start),
            start_date: start.to_string(),
            end_date: end.to_string(),
            total_ml,
        });

        weekly_averages.push(WeeklyAveragePoint {
            week: week_label(start),
            days_counted,
            avg_ml: total_ml / denom,
        });
    }

    HistoryResponse {
        goal_ml,
        last_7_days,
        weekly_totals,
        weekly_averages,
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
