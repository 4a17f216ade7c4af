//! Progress report over the intake log.

use crate::goal::{ActivityLevel, UserProfile};
use crate::models::AppData;
use crate::stats::{best_streak, current_streak};
use chrono::{Datelike, Duration, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const QUOTES: [&str; 5] = [
    "Stay hydrated, stay healthy!",
    "Water is the driving force of all nature.",
    "Drink water, your body will thank you!",
    "Every cell in your body needs water to function.",
    "Make drinking water a daily habit!",
];

const MORNING_TIP: &str = "Start your day with a glass of water to boost metabolism.";
const WORKOUT_TIP: &str = "Remember to hydrate before, during, and after your workouts.";
const HOT_WEATHER_TIP: &str = "It's hot today! Consider increasing your water intake.";

/// 25 °C.
const HOT_TEMP_F: f64 = 77.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    #[default]
    Week,
    Month,
    All,
}

impl ReportPeriod {
    /// First day included in the report, or `None` for the whole log.
    fn first_day(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Week => Some(today - Duration::days(6)),
            Self::Month => Some(today - Duration::days(29)),
            Self::All => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub period: ReportPeriod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Neutral,
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakeTrend {
    pub trend: Trend,
    pub change_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakData {
    pub current_streak: u32,
    pub best_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub period: ReportPeriod,
    pub total_intake: f64,
    pub daily_average: f64,
    pub goal_achievement_rate: f64,
    pub consistency_score: f64,
    pub peak_hydration_hours: Vec<u32>,
    pub intake_trend: IntakeTrend,
    pub improvement_areas: Vec<String>,
    pub achievements: Vec<String>,
    pub tips: Vec<String>,
    pub streak_data: StreakData,
}

impl ProgressReport {
    fn empty(period: ReportPeriod) -> Self {
        Self {
            period,
            total_intake: 0.0,
            daily_average: 0.0,
            goal_achievement_rate: 0.0,
            consistency_score: 0.0,
            peak_hydration_hours: Vec::new(),
            intake_trend: trend(&BTreeMap::new()),
            improvement_areas: vec!["Start tracking your water intake".to_string()],
            achievements: Vec::new(),
            tips: Vec::new(),
            streak_data: StreakData {
                current_streak: 0,
                best_streak: 0,
            },
        }
    }
}

pub fn progress_report_at(
    today: NaiveDate,
    data: &AppData,
    goal_ml: u32,
    period: ReportPeriod,
) -> ProgressReport {
    let first_day = period.first_day(today);
    let in_period = |date: NaiveDate| first_day.is_none_or(|first| date >= first) && date <= today;

    let totals: BTreeMap<NaiveDate, f64> = data
        .daily_totals()
        .into_iter()
        .filter(|(date, _)| in_period(*date))
        .collect();
    if totals.is_empty() {
        return ProgressReport::empty(period);
    }

    let entries: Vec<(u32, f64)> = data
        .timed_entries()
        .into_iter()
        .filter(|(at, _)| in_period(at.date()))
        .map(|(at, amount)| (at.hour(), amount))
        .collect();

    let values: Vec<f64> = totals.values().copied().collect();
    let total_intake: f64 = values.iter().sum();
    let daily_average = total_intake / values.len() as f64;
    let peaks = peak_hours(&entries);
    let achievement_rate = goal_achievement_rate(&totals, goal_ml);
    let best = best_streak(&totals);

    let mut improvement_areas = Vec::new();
    if daily_average < f64::from(goal_ml) {
        improvement_areas.push("Increase daily water intake to meet your goal".to_string());
    }
    if !peaks.contains(&8) && !peaks.contains(&9) {
        improvement_areas.push("Consider adding morning hydration to your routine".to_string());
    }

    let mut achievements = Vec::new();
    if best >= 7 {
        achievements.push("7-day streak achieved!".to_string());
    }
    if achievement_rate >= 80.0 {
        achievements.push("Consistently meeting daily goals".to_string());
    }

    ProgressReport {
        period,
        total_intake,
        daily_average,
        goal_achievement_rate: achievement_rate,
        consistency_score: consistency_score(&values),
        intake_trend: trend(&totals),
        improvement_areas,
        achievements,
        tips: tips(&data.profile, &peaks),
        streak_data: StreakData {
            current_streak: current_streak(today, &data.daily_totals()),
            best_streak: best,
        },
        peak_hydration_hours: peaks,
    }
}

/// 100 for perfectly even days, falling with the coefficient of variation.
pub fn consistency_score(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (100.0 * (1.0 - variance.sqrt() / mean)).clamp(0.0, 100.0)
}

/// Up to three hours of day with the most volume; earlier hour wins a tie.
pub fn peak_hours(entries: &[(u32, f64)]) -> Vec<u32> {
    let mut by_hour = [0.0_f64; 24];
    for (hour, amount) in entries {
        if let Some(slot) = by_hour.get_mut(*hour as usize) {
            *slot += amount;
        }
    }

    let mut hours: Vec<u32> = (0..24).filter(|h| by_hour[*h as usize] > 0.0).collect();
    hours.sort_by(|a, b| by_hour[*b as usize].total_cmp(&by_hour[*a as usize]));
    hours.truncate(3);
    hours
}

pub fn trend(totals: &BTreeMap<NaiveDate, f64>) -> IntakeTrend {
    let neutral = IntakeTrend {
        trend: Trend::Neutral,
        change_rate: 0.0,
    };
    if totals.len() < 2 {
        return neutral;
    }
    let (Some(first), Some(last)) = (totals.values().next(), totals.values().next_back()) else {
        return neutral;
    };

    let change_rate = if *first > 0.0 { (last - first) / first } else { 0.0 };
    let trend = if change_rate > 0.1 {
        Trend::Increasing
    } else if change_rate < -0.1 {
        Trend::Decreasing
    } else {
        Trend::Stable
    };

    IntakeTrend { trend, change_rate }
}

/// Percentage of tracked days that reached the goal.
pub fn goal_achievement_rate(totals: &BTreeMap<NaiveDate, f64>, goal_ml: u32) -> f64 {
    if totals.is_empty() || goal_ml == 0 {
        return 0.0;
    }
    let goal = f64::from(goal_ml);
    let achieved = totals.values().filter(|total| **total >= goal).count();
    achieved as f64 / totals.len() as f64 * 100.0
}

fn tips(profile: &UserProfile, peaks: &[u32]) -> Vec<String> {
    let mut tips = Vec::new();
    if matches!(
        profile.activity_level,
        Some(ActivityLevel::Active | ActivityLevel::ExtraActive)
    ) {
        tips.push(WORKOUT_TIP.to_string());
    }
    if !peaks.contains(&8) {
        tips.push(MORNING_TIP.to_string());
    }
    tips
}

/// Tips that depend on the current weather reading, in °F.
pub fn weather_tips(temp_f: Option<f64>) -> Vec<String> {
    match temp_f {
        Some(temp) if temp > HOT_TEMP_F => vec![HOT_WEATHER_TIP.to_string()],
        _ => Vec::new(),
    }
}

pub fn daily_quote(date: NaiveDate) -> &'static str {
    QUOTES[date.ordinal0() as usize % QUOTES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn log(data: &mut AppData, date: NaiveDate, hour: u32, amount: f64) {
        let at: NaiveDateTime = date.and_hms_opt(hour, 0, 0).unwrap();
        data.record_intake(at, amount);
    }

    #[test]
    fn consistency_of_even_days_is_full() {
        assert_eq!(consistency_score(&[2000.0, 2000.0, 2000.0]), 100.0);
        assert_eq!(consistency_score(&[]), 0.0);
        // mean 1500, population std 500
        let score = consistency_score(&[1000.0, 2000.0]);
        assert!((score - 100.0 * (1.0 - 500.0 / 1500.0)).abs() < 1e-9);
        assert_eq!(consistency_score(&[10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn peak_hours_orders_by_volume() {
        let entries = [(8, 200.0), (13, 500.0), (8, 400.0), (20, 100.0), (6, 100.0)];
        assert_eq!(peak_hours(&entries), vec![8, 13, 6]);
        assert!(peak_hours(&[]).is_empty());
    }

    #[test]
    fn trend_classification() {
        let mut totals = BTreeMap::new();
        totals.insert(ymd(2026, 1, 1), 1000.0);
        assert_eq!(trend(&totals).trend, Trend::Neutral);

        totals.insert(ymd(2026, 1, 3), 1500.0);
        let rising = trend(&totals);
        assert_eq!(rising.trend, Trend::Increasing);
        assert!((rising.change_rate - 0.5).abs() < 1e-9);

        totals.insert(ymd(2026, 1, 4), 950.0);
        assert_eq!(trend(&totals).trend, Trend::Stable);

        totals.insert(ymd(2026, 1, 5), 500.0);
        assert_eq!(trend(&totals).trend, Trend::Decreasing);
    }

    #[test]
    fn achievement_rate_counts_goal_days() {
        let totals: BTreeMap<_, _> = [
            (ymd(2026, 1, 1), 2500.0),
            (ymd(2026, 1, 2), 1000.0),
            (ymd(2026, 1, 3), 2000.0),
            (ymd(2026, 1, 4), 1999.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(goal_achievement_rate(&totals, 2000), 50.0);
        assert_eq!(goal_achievement_rate(&totals, 0), 0.0);
        assert_eq!(goal_achievement_rate(&BTreeMap::new(), 2000), 0.0);
    }

    #[test]
    fn empty_report_suggests_tracking() {
        let report = progress_report_at(ymd(2026, 1, 10), &AppData::default(), 2000, ReportPeriod::Week);
        assert_eq!(report.improvement_areas, vec!["Start tracking your water intake"]);
        assert_eq!(report.streak_data.best_streak, 0);
        assert_eq!(report.intake_trend.trend, Trend::Neutral);
    }

    #[test]
    fn week_report_on_full_week() {
        let today = ymd(2026, 1, 10);
        let mut data = AppData::default();
        data.profile.activity_level = Some(ActivityLevel::Active);
        for offset in 0..7 {
            log(&mut data, today - Duration::days(offset), 8, 2200.0);
        }
        // Outside the weekly window.
        log(&mut data, today - Duration::days(20), 14, 100.0);

        let report = progress_report_at(today, &data, 2000, ReportPeriod::Week);
        assert_eq!(report.total_intake, 7.0 * 2200.0);
        assert_eq!(report.daily_average, 2200.0);
        assert_eq!(report.goal_achievement_rate, 100.0);
        assert_eq!(report.consistency_score, 100.0);
        assert_eq!(report.peak_hydration_hours, vec![8]);
        assert_eq!(report.streak_data.current_streak, 7);
        assert_eq!(report.streak_data.best_streak, 7);
        assert!(report.improvement_areas.is_empty());
        assert_eq!(
            report.achievements,
            vec!["7-day streak achieved!", "Consistently meeting daily goals"]
        );
        assert_eq!(report.tips, vec![WORKOUT_TIP]);

        let all = progress_report_at(today, &data, 2000, ReportPeriod::All);
        assert_eq!(all.total_intake, 7.0 * 2200.0 + 100.0);
        assert_eq!(all.peak_hydration_hours, vec![8, 14]);
    }

    #[test]
    fn report_flags_low_intake_without_mornings() {
        let today = ymd(2026, 1, 10);
        let mut data = AppData::default();
        log(&mut data, today, 15, 800.0);
        log(&mut data, today - Duration::days(2), 19, 900.0);

        let report = progress_report_at(today, &data, 2000, ReportPeriod::Month);
        assert_eq!(
            report.improvement_areas,
            vec![
                "Increase daily water intake to meet your goal",
                "Consider adding morning hydration to your routine"
            ]
        );
        assert!(report.achievements.is_empty());
        assert_eq!(report.tips, vec![MORNING_TIP]);
        assert_eq!(report.streak_data.current_streak, 1);
    }

    #[test]
    fn hot_weather_adds_tip() {
        assert_eq!(weather_tips(Some(86.0)), vec![HOT_WEATHER_TIP]);
        assert!(weather_tips(Some(77.0)).is_empty());
        assert!(weather_tips(None).is_empty());
    }

    #[test]
    fn quote_is_stable_per_day() {
        let day = ymd(2026, 5, 1);
        assert_eq!(daily_quote(day), daily_quote(day));
        assert_eq!(daily_quote(ymd(2026, 1, 1)), QUOTES[0]);
        assert_eq!(daily_quote(ymd(2026, 1, 2)), QUOTES[1]);
    }
}
