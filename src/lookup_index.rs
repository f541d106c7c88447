//! # Lookup Index Module
//!
//! Read path over the resolved-issue area. Files named
//! `<categoryPrefix>…_<date>.csv` are produced outside this program; each must
//! carry a `Phone Number` column. The date segment of the file name is the
//! resolution date shown to users.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::HelpdeskError;
use crate::phone::normalize_for_search;

/// Status reported for every record found in the resolved area
pub const RESOLVED_STATUS: &str = "Fixed";

/// Column holding the customer phone number
pub const PHONE_COLUMN: &str = "Phone Number";

/// A resolved record matching a lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupMatch {
    /// Resolution date taken from the file name
    pub date: String,
    pub status: String,
}

/// Why a single resolved file was skipped
#[derive(Debug, Error)]
enum FileSkip {
    #[error("missing '{}' column", PHONE_COLUMN)]
    MissingPhoneColumn,
    #[error("line {line} has more fields than the header")]
    ExtraFields { line: u64 },
    #[error("malformed CSV: {0}")]
    Malformed(#[from] csv::Error),
}

/// Index over the resolved-issue directory
#[derive(Debug, Clone)]
pub struct ReportLookupIndex {
    root: PathBuf,
}

impl ReportLookupIndex {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Find every resolved row whose phone matches `raw_phone`
    ///
    /// Files are scanned in file-name order so identical input yields
    /// identical output. A missing directory or no matching file gives an
    /// empty list. A file that cannot be parsed is skipped and the scan
    /// carries on with the rest.
    pub fn find(
        &self,
        raw_phone: &str,
        category_prefix: &str,
    ) -> Result<Vec<LookupMatch>, HelpdeskError> {
        self.find_any(raw_phone, &[category_prefix])
    }

    /// Like [`ReportLookupIndex::find`], over files starting with any of
    /// `category_prefixes`. A file matching several prefixes is scanned once.
    pub fn find_any(
        &self,
        raw_phone: &str,
        category_prefixes: &[&str],
    ) -> Result<Vec<LookupMatch>, HelpdeskError> {
        let target = normalize_for_search(raw_phone);
        if target.is_empty() {
            return Ok(Vec::new());
        }

        let files = self.category_files(category_prefixes)?;
        if files.is_empty() {
            debug!(
                root = %self.root.display(),
                ?category_prefixes,
                "No resolved files for category"
            );
            return Ok(Vec::new());
        }

        let mut results = Vec::new();
        for path in files {
            match scan_file(&path, &target) {
                Ok(hits) => {
                    if hits > 0 {
                        let date = resolution_date(&path);
                        results.extend((0..hits).map(|_| LookupMatch {
                            date: date.clone(),
                            status: RESOLVED_STATUS.to_string(),
                        }));
                    }
                }
                Err(skip) => {
                    warn!(path = %path.display(), reason = %skip, "Skipping unreadable resolved file");
                }
            }
        }

        debug!(?category_prefixes, matches = results.len(), "Lookup completed");
        Ok(results)
    }

    /// Resolved files for a category, sorted by file name
    fn category_files(&self, category_prefixes: &[&str]) -> Result<Vec<PathBuf>, HelpdeskError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = BTreeSet::new();
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if category_prefixes.iter().any(|prefix| name.starts_with(prefix))
                && name.ends_with(".csv")
                && entry.file_type()?.is_file()
            {
                files.insert(entry.path());
            }
        }
        Ok(files.into_iter().collect())
    }
}

/// Count rows of `path` whose phone search key equals `target`
///
/// Rows shorter than the header are read with the missing trailing fields
/// left empty; rows longer than the header make the file unreadable.
fn scan_file(path: &Path, target: &str) -> Result<usize, FileSkip> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers = reader.headers()?.clone();
    let phone_index = headers
        .iter()
        .position(|column| column.trim_start_matches('\u{feff}').trim() == PHONE_COLUMN)
        .ok_or(FileSkip::MissingPhoneColumn)?;

    let mut hits = 0;
    for row in reader.records() {
        let row = row?;
        if row.len() > headers.len() {
            let line = row.position().map(|pos| pos.line()).unwrap_or_default();
            return Err(FileSkip::ExtraFields { line });
        }
        let stored = row.get(phone_index).unwrap_or("");
        if normalize_for_search(stored) == target {
            hits += 1;
        }
    }
    Ok(hits)
}

/// Portion of the file name after the last underscore, without `.csv`
pub fn resolution_date(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let last = name.rsplit('_').next().unwrap_or(name.as_str());
    last.strip_suffix(".csv").unwrap_or(last).to_string()
}
