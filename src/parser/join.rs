use super::lines::{classify, clean_spaces, is_inert};

/// Fragments at most this long are treated as a wrapped remainder.
const SHORT_FRAGMENT: usize = 22;

/// Merge `line` with `next` when `next` looks like a layout wrap of it.
/// Returns the (possibly joined) line and whether `next` was consumed.
pub fn try_join(line: &str, next: Option<&str>) -> (String, bool) {
    let Some(next) = next.map(str::trim).filter(|n| !n.is_empty()) else {
        return (line.to_string(), false);
    };
    if next.starts_with('(') {
        return (line.to_string(), false);
    }

    if classify(next).starts_unit() || is_inert(next) {
        return (line.to_string(), false);
    }

    if line.ends_with('-') || next.chars().count() <= SHORT_FRAGMENT {
        return (clean_spaces(&format!("{} {}", line, next)), true);
    }
    (line.to_string(), false)
}
