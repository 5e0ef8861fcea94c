pub mod join;
pub mod lines;
pub mod walker;

use tracing::debug;

use crate::catalog::ScheduleRecord;

/// Two-step pipeline: page lines → classified lines → week records.
pub fn parse_document(pages: &[Vec<String>]) -> Vec<ScheduleRecord> {
    let records = walker::walk_pages(pages);
    debug!(pages = pages.len(), records = records.len(), "Parsed schedule");
    records
}

// ── Tests ──
