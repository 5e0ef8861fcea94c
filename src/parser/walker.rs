use tracing::trace;

use super::join::try_join;
use super::lines::{classify, clean_spaces, is_garbage, is_inert, is_meta, LineKind};
use crate::catalog::ScheduleRecord;

/// Running context carried from header lines into week records.
#[derive(Debug, Default)]
pub struct Context {
    category: String,
    class_code: String,
    group_label: String,
    series_name: String,
    car_list: String,
    schedule_text: String,
    collecting_cars: bool,
    car_buffer: Vec<String>,
}

impl Context {
    pub fn enter_category(&mut self, category: String) {
        trace!(%category, "category");
        self.category = category;
        self.class_code.clear();
        self.group_label.clear();
        self.reset_series();
    }

    pub fn enter_class_group(&mut self, class_code: String, group_label: String) {
        trace!(%class_code, %group_label, "class/group");
        self.class_code = class_code;
        self.group_label = group_label;
        self.reset_series();
    }

    /// Car list and schedule text survive until collection terminates.
    pub fn enter_series(&mut self, series_name: String) {
        trace!(%series_name, "series");
        self.series_name = series_name;
        self.collecting_cars = true;
        self.car_buffer.clear();
    }

    fn reset_series(&mut self) {
        self.series_name.clear();
        self.car_list.clear();
        self.schedule_text.clear();
        self.collecting_cars = false;
        self.car_buffer.clear();
    }

    pub fn is_collecting(&self) -> bool {
        self.collecting_cars
    }

    pub fn push_car_line(&mut self, line: &str) {
        self.car_buffer.push(line.to_string());
    }

    pub fn finish_cars(&mut self) {
        self.car_list = clean_spaces(&self.car_buffer.join(" "));
        self.collecting_cars = false;
        self.schedule_text.clear();
    }

    /// Keeps only the first schedule line of the active series.
    pub fn capture_schedule(&mut self, text: String) {
        if !self.series_name.is_empty() && self.schedule_text.is_empty() {
            self.schedule_text = text;
        }
    }

    pub fn record(&self, week_number: u64, week_start_date: String, track_name: String) -> ScheduleRecord {
        ScheduleRecord {
            week_start_date,
            week_number,
            category: self.category.clone(),
            class_code: self.class_code.clone(),
            group_label: self.group_label.clone(),
            series_name: self.series_name.clone(),
            track_name,
            car_list: self.car_list.clone(),
            schedule_text: self.schedule_text.clone(),
        }
    }
}

/// Find the track line after a week header starting at `start`.
/// Returns the track (possibly empty) and the cursor past consumed lines.
pub fn resolve_track(lines: &[String], start: usize) -> (String, usize) {
    let mut j = start;
    while j < lines.len() {
        let line = lines[j].trim();
        if classify(line).starts_unit() {
            break;
        }
        if is_inert(line) {
            j += 1;
            continue;
        }

        let (track, used) = try_join(&clean_spaces(line), lines.get(j + 1).map(String::as_str));
        j += if used { 2 } else { 1 };
        return (track, j);
    }
    (String::new(), j)
}

/// Fold the lines of every page into week records, in document order.
pub fn walk_pages(pages: &[Vec<String>]) -> Vec<ScheduleRecord> {
    let mut ctx = Context::default();
    let mut records = Vec::new();

    for lines in pages {
        let mut i = 0;
        while i < lines.len() {
            let line = lines[i].trim();
            let kind = classify(line);

            match kind {
                LineKind::Category(category) => {
                    ctx.enter_category(category);
                    i += 1;
                    continue;
                }
                LineKind::ClassGroup { class, group } => {
                    ctx.enter_class_group(class, group);
                    i += 1;
                    continue;
                }
                LineKind::Series(name) => {
                    ctx.enter_series(name);
                    i += 1;
                    continue;
                }
                _ => {}
            }

            if ctx.is_collecting() {
                if matches!(kind, LineKind::Week { .. }) || is_meta(line) {
                    ctx.finish_cars();
                    // fall through: the terminating line is evaluated again below
                } else {
                    if !is_garbage(line) {
                        ctx.push_car_line(line);
                    }
                    i += 1;
                    continue;
                }
            }

            match kind {
                LineKind::Schedule(text) => {
                    ctx.capture_schedule(text);
                    i += 1;
                }
                LineKind::Week { number, start } => {
                    let (track, next) = resolve_track(lines, i + 1);
                    records.push(ctx.record(number, start, track));
                    i = next;
                }
                _ => i += 1,
            }
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn walk(raw: &[&str]) -> Vec<ScheduleRecord> {
        walk_pages(&[lines(raw)])
    }

    #[test]
    fn street_stock_scenario() {
        let records = walk(&[
            "OVAL",
            "A Class Series (Street Stock)",
            "2025 Season - Street Stock Series",
            "Chevy SS",
            "Ford Fusion",
            "Races every 30 minutes at :15 and :45",
            "Week 1 (2025-01-06)",
            "Daytona International Speedway",
        ]);
        assert_eq!(
            records,
            vec![ScheduleRecord {
                week_start_date: "2025-01-06".into(),
                week_number: 1,
                category: "OVAL".into(),
                class_code: "A".into(),
                group_label: "Street Stock".into(),
                series_name: "2025 Season - Street Stock Series".into(),
                track_name: "Daytona International Speedway".into(),
                car_list: "Chevy SS Ford Fusion".into(),
                schedule_text: "Races every 30 minutes at :15 and :45".into(),
            }]
        );
    }

    #[test]
    fn consecutive_weeks_share_context() {
        let records = walk(&[
            "SPORTS CAR",
            "D Class Series (Sports Car)",
            "2025 Season Mazda MX-5 Cup .....",
            "Global Mazda MX-5 Cup",
            "Week 1 (2025-01-06)",
            "Okayama International Circuit",
            "78°F/26°C, Rain chance None",
            "Week 2 (2025-01-13)",
            "(Full Course)",
            "Summit Point Raceway",
        ]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].series_name, "2025 Season Mazda MX-5 Cup");
        assert_eq!(records[0].series_name, records[1].series_name);
        assert_eq!(records[0].car_list, "Global Mazda MX-5 Cup");
        assert_eq!(records[1].car_list, "Global Mazda MX-5 Cup");
        assert_eq!(records[0].track_name, "Okayama International Circuit");
        assert_eq!(records[1].track_name, "Summit Point Raceway");
        assert_eq!(records[1].week_number, 2);
        assert!(records[0].schedule_text.is_empty());
    }

    #[test]
    fn car_collection_skips_noise_and_stops_at_meta() {
        let records = walk(&[
            "OVAL",
            "2025 Season Legends",
            "Legends Ford '34 Coupe",
            "(Fixed)",
            "25 laps",
            "Min entries 8",
            "Dirt Legends",
            "Week 1 (2025-01-06)",
            "Lanier",
        ]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].car_list, "Legends Ford '34 Coupe");
        assert_eq!(records[0].track_name, "Lanier");
    }

    #[test]
    fn races_every_terminates_cars_then_becomes_schedule() {
        let records = walk(&[
            "OVAL",
            "2025 Season Trucks",
            "Silverado",
            "Races every 2 hours at :45",
            "Races every hour",
            "Week 1 (2025-01-06)",
            "Bristol",
        ]);
        assert_eq!(records[0].car_list, "Silverado");
        assert_eq!(records[0].schedule_text, "Races every 2 hours at :45");
    }

    #[test]
    fn schedule_ignored_without_series() {
        let records = walk(&["OVAL", "Races every hour", "Week 1 (2025-01-06)", "Bristol"]);
        assert_eq!(records[0].schedule_text, "");
        assert_eq!(records[0].series_name, "");
        assert_eq!(records[0].car_list, "");
    }

    #[test]
    fn series_without_cars_has_empty_list() {
        let records = walk(&["OVAL", "2025 Season Trucks", "Week 1 (2025-01-06)", "Bristol"]);
        assert_eq!(records[0].car_list, "");
        assert_eq!(records[0].track_name, "Bristol");
    }

    #[test]
    fn week_without_track_is_empty() {
        let records = walk(&[
            "OVAL",
            "2025 Season Trucks",
            "Week 1 (2025-01-06)",
            "Rolling start",
            "Week 2 (2025-01-13)",
        ]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].track_name, "");
        assert_eq!(records[1].track_name, "");
    }

    #[test]
    fn track_joins_wrapped_remainder() {
        let records = walk(&[
            "SPORTS CAR",
            "2025 Season GT Sprint",
            "Week 3 (2025-01-20)",
            "Circuit de Spa-",
            "Francorchamps",
            "Week 4 (2025-01-27)",
            "Charlotte Motor Speedway",
            "Roval",
        ]);
        assert_eq!(records[0].track_name, "Circuit de Spa- Francorchamps");
        assert_eq!(records[1].track_name, "Charlotte Motor Speedway Roval");
    }

    #[test]
    fn class_header_resets_series_context() {
        let records = walk(&[
            "OVAL",
            "C Class Series (Late Model)",
            "2025 Season Late Model",
            "Late Model Stock",
            "Races every hour",
            "B Class Series (Trucks)",
            "Week 1 (2025-01-06)",
            "Martinsville",
        ]);
        assert_eq!(records[0].category, "OVAL");
        assert_eq!(records[0].class_code, "B");
        assert_eq!(records[0].group_label, "Trucks");
        assert_eq!(records[0].series_name, "");
        assert_eq!(records[0].car_list, "");
        assert_eq!(records[0].schedule_text, "");
    }

    #[test]
    fn category_resets_everything_below_it() {
        let records = walk(&[
            "OVAL",
            "A Class Series (Cup)",
            "2025 Season Cup",
            "Next Gen",
            "Week 1 (2025-01-06)",
            "Daytona",
            "DIRT ROAD",
            "Week 1 (2025-01-06)",
            "Wild West",
        ]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].category, "DIRT ROAD");
        assert_eq!(records[1].class_code, "");
        assert_eq!(records[1].series_name, "");
        assert_eq!(records[1].car_list, "");
    }

    #[test]
    fn context_carries_across_pages() {
        let pages = vec![
            lines(&["FORMULA CAR", "B Class Series (Formula)", "2025 Season Formula Vee", "Formula Vee"]),
            lines(&["Week 1 (2025-01-06)", "Lime Rock Park"]),
        ];
        let records = walk_pages(&pages);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, "FORMULA CAR");
        assert_eq!(records[0].car_list, "Formula Vee");
        assert_eq!(records[0].track_name, "Lime Rock Park");
    }

    #[test]
    fn oversized_week_number_still_emits_record() {
        let records = walk(&[
            "OVAL",
            "2025 Season X",
            "Car A",
            "Week 123456789012345678901234567890 (2025-01-06)",
            "Daytona",
            "Week 2 (2025-01-13)",
            "Bristol",
        ]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].week_number, u64::MAX);
        assert_eq!(records[0].track_name, "Daytona");
        assert_eq!(records[0].car_list, "Car A");
        assert_eq!(records[1].car_list, "Car A");
        assert_eq!(records[1].track_name, "Bristol");
    }

    #[test]
    fn resolve_track_reports_cursor() {
        let l = lines(&["(Oval)", "Min entries 4", "Daytona", "Week 2 (2025-01-13)"]);
        assert_eq!(resolve_track(&l, 0), ("Daytona".to_string(), 3));
        assert_eq!(resolve_track(&l, 3), (String::new(), 3));
        assert_eq!(resolve_track(&l, 4), (String::new(), 4));
    }
}
