use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::catalog::ScheduleRecord;

/// Lowercase and strip diacritics so "Autódromo" matches "autodromo".
pub fn normalize(text: &str) -> String {
    text.trim().nfd().filter(|c| !is_combining_mark(*c)).collect::<String>().to_lowercase()
}

/// Tracks containing `query`; every track when the query is blank.
pub fn filter_tracks<'a>(tracks: &'a [String], query: &str) -> Vec<&'a String> {
    let q = normalize(query);
    tracks.iter().filter(|t| q.is_empty() || normalize(t).contains(&q)).collect()
}

pub fn records_for_track<'a>(records: &'a [ScheduleRecord], track: &str) -> Vec<&'a ScheduleRecord> {
    let q = normalize(track);
    if q.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|r| !r.track_name.is_empty() && normalize(&r.track_name).contains(&q))
        .collect()
}

/// Records whose race week contains `date`.
pub fn active_on<'a>(records: &[&'a ScheduleRecord], date: NaiveDate) -> Vec<&'a ScheduleRecord> {
    records
        .iter()
        .copied()
        .filter(|r| {
            NaiveDate::parse_from_str(&r.week_start_date, "%Y-%m-%d")
                .map(|start| start <= date && date < start + Duration::days(7))
                .unwrap_or(false)
        })
        .collect()
}

pub fn count_by_category(records: &[ScheduleRecord]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for r in records {
        let key = if r.category.is_empty() { "-" } else { r.category.as_str() };
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}
