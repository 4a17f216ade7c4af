use crate::models::{AppData, DayLog, IntakeEntry};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeMap;
use tracing::warn;

impl AppData {
    /// Appends an entry to the day of `at` and returns that day's new total.
    pub fn record_intake(&mut self, at: NaiveDateTime, amount_ml: f64) -> f64 {
        let log = self.days.entry(date_key(at.date())).or_default();
        log.entries.push(IntakeEntry {
            amount_ml,
            time: at.time().format("%H:%M:%S").to_string(),
        });
        log.total_ml += amount_ml;
        log.total_ml
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayLog> {
        self.days.get(&date_key(date))
    }

    pub fn total_on(&self, date: NaiveDate) -> f64 {
        self.day(date).map_or(0.0, |log| log.total_ml)
    }

    /// Totals per day, for days with positive intake only.
    pub fn daily_totals(&self) -> BTreeMap<NaiveDate, f64> {
        self.days
            .iter()
            .filter(|(_, log)| log.total_ml > 0.0)
            .filter_map(|(key, log)| match parse_date_key(key) {
                Some(date) => Some((date, log.total_ml)),
                None => {
                    warn!(key = %key, "skipping day with malformed date key");
                    None
                }
            })
            .collect()
    }

    pub fn timed_entries(&self) -> Vec<(NaiveDateTime, f64)> {
        let mut entries = Vec::new();
        for (key, log) in &self.days {
            let Some(date) = parse_date_key(key) else {
                continue;
            };
            for entry in &log.entries {
                match NaiveTime::parse_from_str(&entry.time, "%H:%M:%S") {
                    Ok(time) => entries.push((date.and_time(time), entry.amount_ml)),
                    Err(err) => warn!(date = %key, time = %entry.time, "skipping entry: {err}"),
                }
            }
        }
        entries
    }

    /// Drops every day strictly before `cutoff`. Returns how many were removed.
    pub fn prune_before(&mut self, cutoff: NaiveDate) -> usize {
        let before = self.days.len();
        self.days
            .retain(|key, _| parse_date_key(key).is_none_or(|date| date >= cutoff));
        before - self.days.len()
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn record_accumulates_per_day() {
        let mut data = AppData::default();
        assert_eq!(data.record_intake(at("2026-03-02", "08:15:00"), 250.0), 250.0);
        assert_eq!(data.record_intake(at("2026-03-02", "12:40:10"), 500.0), 750.0);
        assert_eq!(data.record_intake(at("2026-03-03", "07:00:00"), 300.0), 300.0);

        let day = data.day(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()).unwrap();
        assert_eq!(day.entries.len(), 2);
        assert_eq!(day.entries[1].time, "12:40:10");
        assert_eq!(data.total_on(NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()), 0.0);
    }

    #[test]
    fn daily_totals_skip_empty_and_malformed_days() {
        let mut data = AppData::default();
        data.record_intake(at("2026-03-02", "08:00:00"), 400.0);
        data.days.insert("2026-03-03".into(), DayLog::default());
        data.days.insert("yesterday".into(), DayLog { total_ml: 100.0, entries: vec![] });

        let totals = data.daily_totals();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[&NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()], 400.0);
    }

    #[test]
    fn timed_entries_carry_hour() {
        let mut data = AppData::default();
        data.record_intake(at("2026-03-02", "08:00:00"), 400.0);
        data.record_intake(at("2026-03-02", "21:30:00"), 200.0);

        let entries = data.timed_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1], (at("2026-03-02", "21:30:00"), 200.0));
    }

    #[test]
    fn prune_keeps_cutoff_day() {
        let mut data = AppData::default();
        for day in ["2026-01-01", "2026-01-02", "2026-01-03"] {
            data.record_intake(at(day, "09:00:00"), 100.0);
        }
        let removed = data.prune_before(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        assert_eq!(removed, 1);
        assert!(data.days.contains_key("2026-01-02"));
        assert!(!data.days.contains_key("2026-01-01"));
    }
}
