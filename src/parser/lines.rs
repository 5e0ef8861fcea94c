use std::sync::LazyLock;

use regex::Regex;

static SERIES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b20\d{2}\s+Season\b").unwrap());
static CLASS_GROUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([RDCBA])\s+Class\s+Series\s*\((.+)\)\s*$").unwrap());
static WEEK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*Week\s+(\d+)\s+\((\d{4}-\d{2}-\d{2})\)\s*$").unwrap());
static SCHEDULE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^Races\b").unwrap());
static META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Rookie|Pro/WC|Races every|Min entries|No incident|DQ at|Penalty|See race week|Split at|Drops:")
        .unwrap()
});
static CONDITIONS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Rain chance|Rolling start|Cautions|Qual scrutiny|Start zone|Lucky dog|Single-file|Double-file")
        .unwrap()
});
static LAPS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b\d+\s+laps\b").unwrap());
static TRAILING_DOTS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\.+\s*$").unwrap());
static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

pub const CATEGORIES: &[&str] = &["OVAL", "SPORTS CAR", "FORMULA CAR", "DIRT OVAL", "DIRT ROAD", "UNRANKED"];

/// Temperature range marker printed next to every track ("78°F/26°C").
const TEMPERATURE_MARK: &str = "°F/";

/// Semantic class of a single line. Variant order is classification priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Category(String),
    ClassGroup { class: String, group: String },
    Series(String),
    Week { number: u64, start: String },
    Schedule(String),
    Meta,
    Noise,
    Content(String),
}

impl LineKind {
    /// True for lines that open a new structural unit.
    pub fn starts_unit(&self) -> bool {
        matches!(
            self,
            LineKind::Category(_) | LineKind::ClassGroup { .. } | LineKind::Series(_) | LineKind::Week { .. }
        )
    }
}

pub fn classify(line: &str) -> LineKind {
    let line = line.trim();

    if is_category(line) {
        return LineKind::Category(line.to_string());
    }
    if let Some((class, group)) = parse_class_group(line) {
        return LineKind::ClassGroup { class, group };
    }
    if looks_series(line) {
        return LineKind::Series(series_name(line));
    }
    if let Some((number, start)) = parse_week_header(line) {
        return LineKind::Week { number, start };
    }
    // "Races every ..." is also a meta phrase, so schedule must win here
    if is_schedule(line) {
        return LineKind::Schedule(clean_spaces(line));
    }
    if is_meta(line) {
        return LineKind::Meta;
    }
    if is_garbage(line) {
        return LineKind::Noise;
    }
    LineKind::Content(line.to_string())
}

pub fn is_category(line: &str) -> bool {
    CATEGORIES.contains(&line.trim())
}

/// "A Class Series (Street Stock)" → ("A", "Street Stock")
pub fn parse_class_group(line: &str) -> Option<(String, String)> {
    let caps = CLASS_GROUP_RE.captures(line.trim())?;
    Some((caps[1].to_uppercase(), caps[2].trim().to_string()))
}

pub fn looks_series(line: &str) -> bool {
    SERIES_RE.is_match(line)
}

/// Series title with any trailing dot leader removed.
pub fn series_name(line: &str) -> String {
    TRAILING_DOTS_RE.replace(line, "").trim().to_string()
}

/// "Week 3 (2025-01-20)" → (3, "2025-01-20")
/// Week numbers too large for u64 saturate; the line is still a header.
pub fn parse_week_header(line: &str) -> Option<(u64, String)> {
    let caps = WEEK_RE.captures(line)?;
    let number = caps[1].parse().unwrap_or(u64::MAX);
    Some((number, caps[2].to_string()))
}

pub fn is_schedule(line: &str) -> bool {
    SCHEDULE_RE.is_match(line.trim())
}

pub fn is_meta(line: &str) -> bool {
    META_RE.is_match(line)
}

pub fn is_garbage(line: &str) -> bool {
    let s = line.trim();
    s.is_empty()
        || s.starts_with('(')
        || s.contains(TEMPERATURE_MARK)
        || CONDITIONS_RE.is_match(s)
        || LAPS_RE.is_match(s)
}

/// Meta and noise lines are invisible to car lists and track names.
pub fn is_inert(line: &str) -> bool {
    is_meta(line) || is_garbage(line)
}

/// Collapse whitespace runs to one space and trim.
pub fn clean_spaces(s: &str) -> String {
    SPACES_RE.replace_all(s, " ").trim().to_string()
}
