use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const CATALOG_VERSION: u32 = 2;

/// One scheduled race week.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub week_start_date: String,
    pub week_number: u64,
    pub category: String,
    pub class_code: String,
    pub group_label: String,
    pub series_name: String,
    pub track_name: String,
    pub car_list: String,
    pub schedule_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub version: u32,
    pub source_document_path: String,
    pub source_document_checksum: String,
    pub records: Vec<ScheduleRecord>,
    pub tracks: Vec<String>,
}

impl Catalog {
    pub fn build(source_path: &str, checksum: &str, records: Vec<ScheduleRecord>) -> Self {
        let tracks = unique_tracks(&records);
        Catalog {
            version: CATALOG_VERSION,
            source_document_path: source_path.to_string(),
            source_document_checksum: checksum.to_string(),
            records,
            tracks,
        }
    }

    /// True when this catalog was built from the same document bytes.
    pub fn is_current(&self, source_path: &str, checksum: &str) -> bool {
        self.version == CATALOG_VERSION
            && self.source_document_path == source_path
            && self.source_document_checksum == checksum
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let json = serde_json::to_string(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(records = self.records.len(), tracks = self.tracks.len(), "Catalog written to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let catalog = serde_json::from_str(&raw).with_context(|| format!("Invalid catalog {}", path.display()))?;
        Ok(catalog)
    }

    pub fn summary(&self, out_path: &Path) -> String {
        format!(
            "OK: {} records, {} tracks -> {}",
            self.records.len(),
            self.tracks.len(),
            out_path.display()
        )
    }
}

/// Sorted, deduplicated non-empty track names.
fn unique_tracks(records: &[ScheduleRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|r| !r.track_name.is_empty())
        .map(|r| r.track_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
