use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};

/// Page separator in plain-text exports.
const FORM_FEED: char = '\x0c';

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source document not found: {}", .0.display())]
    Unavailable(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to extract text from {}: {message}", .path.display())]
    Extraction { path: PathBuf, message: String },
}

/// Raw bytes of the schedule document.
pub struct SourceDocument {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn checksum(&self) -> String {
        sha256_hex(&self.bytes)
    }

    /// Per-page trimmed, non-empty lines from the PDF text layer.
    pub fn pdf_pages(&self) -> Result<Vec<Vec<String>>, SourceError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(&self.bytes).map_err(|e| {
            SourceError::Extraction {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;
        info!(pages = pages.len(), "Extracted PDF text from {}", self.path.display());
        Ok(pages.iter().map(String::as_str).map(page_lines).collect())
    }

    /// Pages of a UTF-8 text export, separated by form feeds.
    pub fn text_pages(&self) -> Result<Vec<Vec<String>>, SourceError> {
        let text = String::from_utf8_lossy(&self.bytes);
        let pages = split_text_pages(&text);
        info!(pages = pages.len(), "Loaded text export {}", self.path.display());
        Ok(pages)
    }
}

pub fn read_document(path: &Path) -> Result<SourceDocument, SourceError> {
    if !path.exists() {
        return Err(SourceError::Unavailable(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|source| SourceError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(bytes = bytes.len(), "Read {}", path.display());
    Ok(SourceDocument {
        path: path.to_path_buf(),
        bytes,
    })
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().iter().map(|b| format!("{:02x}", b)).collect()
}

/// Trimmed non-empty lines of one page, in reading order.
/// Any Unicode line boundary ends a line, not only `\n`.
pub fn page_lines(text: &str) -> Vec<String> {
    text.split(is_line_break)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

pub fn split_text_pages(text: &str) -> Vec<Vec<String>> {
    text.split(FORM_FEED).map(page_lines).collect()
}
