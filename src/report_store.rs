//! # Report Store Module
//!
//! Append-only, category-tagged daily CSV logs of customer issue reports.
//!
//! Every report lands in `<reports_dir>/<CategoryLabel>_<YYYY-MM-DD>.csv`.
//! A file starts with the `Time,Customer Name,Phone Number` header and only
//! ever grows by whole rows.

use chrono::{Local, NaiveDateTime};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, error, info};

use crate::errors::HelpdeskError;

/// Header row of every report file
pub const REPORT_HEADER: [&str; 3] = ["Time", "Customer Name", "Phone Number"];

/// Fixed classification of reported issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportCategory {
    AlreadyExistedPhone,
    BlockedUsers,
    AutoReturnToLogin,
    GeneralIssues,
}

/// Keyword table deciding the category of an issue type.
///
/// Checked top to bottom with case-sensitive substring matching; the first
/// hit wins. Order matters: a label mentioning "Phone" is always a
/// phone-exists report even if it also mentions another keyword.
pub const CATEGORY_RULES: &[(&str, ReportCategory)] = &[
    ("Phone", ReportCategory::AlreadyExistedPhone),
    ("Blocked", ReportCategory::BlockedUsers),
    (
        "Automatically Returning to Login Screen",
        ReportCategory::AutoReturnToLogin,
    ),
];

impl ReportCategory {
    /// All categories, in classification order
    pub const ALL: [ReportCategory; 4] = [
        ReportCategory::AlreadyExistedPhone,
        ReportCategory::BlockedUsers,
        ReportCategory::AutoReturnToLogin,
        ReportCategory::GeneralIssues,
    ];

    /// Classify a free-form issue type via [`CATEGORY_RULES`]
    pub fn classify(issue_type: &str) -> Self {
        CATEGORY_RULES
            .iter()
            .find(|(keyword, _)| issue_type.contains(keyword))
            .map(|(_, category)| *category)
            .unwrap_or(ReportCategory::GeneralIssues)
    }

    /// File name label, also used as the prefix of resolved-issue files
    pub fn label(self) -> &'static str {
        match self {
            ReportCategory::AlreadyExistedPhone => "Already_Existed_Phone",
            ReportCategory::BlockedUsers => "Blocked_Users",
            ReportCategory::AutoReturnToLogin => "Automatically_Returning_to_Login_Screen",
            ReportCategory::GeneralIssues => "General_Issues",
        }
    }

    /// File name prefixes searched in the resolved-issue area
    ///
    /// Operators have historically filed resolved issues under a few
    /// different names; the report label comes first.
    pub fn resolved_prefixes(self) -> &'static [&'static str] {
        match self {
            ReportCategory::AlreadyExistedPhone => {
                &["Already_Existed_Phone", "Phone Number Already Exists"]
            }
            ReportCategory::BlockedUsers => &["Blocked_Users"],
            ReportCategory::AutoReturnToLogin => {
                &["Automatically_Returning_to_Login_Screen", "Automatic Return"]
            }
            ReportCategory::GeneralIssues => &["General_Issues"],
        }
    }

    /// Reverse of [`ReportCategory::label`]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.label() == label)
    }
}

/// A single stored report row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRecord {
    /// Local time of the append, `HH:MM:SS`
    pub time: String,
    /// Customer name exactly as typed
    pub name: String,
    /// Phone number in storage form
    pub phone: String,
}

/// Result of a successful append
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReport {
    pub category: ReportCategory,
    pub path: PathBuf,
    pub record: ReportRecord,
}

/// File-backed report log
///
/// Each append opens the day's file in append mode, writes the header (for a
/// new file) and the row with a single write, and closes it again. Appends
/// from concurrent sessions are serialized by an internal lock so the header
/// is written exactly once and rows never interleave.
#[derive(Debug)]
pub struct ReportLogStore {
    root: PathBuf,
    append_lock: Mutex<()>,
}

impl ReportLogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            append_lock: Mutex::new(()),
        }
    }

    /// Path of the file for `category` on `date` (`YYYY-MM-DD`)
    pub fn file_path(&self, category: ReportCategory, date: &str) -> PathBuf {
        self.root.join(format!("{}_{}.csv", category.label(), date))
    }

    /// Append a report using the current local time
    pub fn append(
        &self,
        name: &str,
        phone: &str,
        issue_type: &str,
    ) -> Result<StoredReport, HelpdeskError> {
        self.append_at(name, phone, issue_type, Local::now().naive_local())
    }

    /// Append a report stamped with `now`
    ///
    /// `now` selects both the daily file and the `Time` column.
    pub fn append_at(
        &self,
        name: &str,
        phone: &str,
        issue_type: &str,
        now: NaiveDateTime,
    ) -> Result<StoredReport, HelpdeskError> {
        let category = ReportCategory::classify(issue_type);
        let date = now.format("%Y-%m-%d").to_string();
        let record = ReportRecord {
            time: now.format("%H:%M:%S").to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
        };
        let path = self.file_path(category, &date);

        let _guard = self
            .append_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Err(e) = self.write_row(&path, &record) {
            error!(path = %path.display(), error = %e, "Failed to append report");
            return Err(e);
        }

        info!(
            category = category.label(),
            path = %path.display(),
            "Report appended"
        );

        Ok(StoredReport {
            category,
            path,
            record,
        })
    }

    fn write_row(&self, path: &Path, record: &ReportRecord) -> Result<(), HelpdeskError> {
        fs::create_dir_all(&self.root)?;

        let is_new = !path.exists();

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        if is_new {
            writer.write_record(REPORT_HEADER)?;
        }
        writer.write_record([&record.time, &record.name, &record.phone])?;
        let buffer = writer
            .into_inner()
            .map_err(|e| HelpdeskError::Storage(e.into_error()))?;

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(&buffer)?;
        file.flush()?;

        debug!(path = %path.display(), new_file = is_new, "Report row written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at(date: (i32, u32, u32), time: (u32, u32, u32)) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .unwrap()
            .and_hms_opt(time.0, time.1, time.2)
            .unwrap()
    }

    #[test]
    fn test_category_classification_order() {
        assert_eq!(
            ReportCategory::classify("Phone Already Exists"),
            ReportCategory::AlreadyExistedPhone
        );
        assert_eq!(
            ReportCategory::classify("User Blocked"),
            ReportCategory::BlockedUsers
        );
        assert_eq!(
            ReportCategory::classify("Automatically Returning to Login Screen"),
            ReportCategory::AutoReturnToLogin
        );
        assert_eq!(
            ReportCategory::classify("Something else"),
            ReportCategory::GeneralIssues
        );
        // First match wins
        assert_eq!(
            ReportCategory::classify("Blocked Phone"),
            ReportCategory::AlreadyExistedPhone
        );
        // Case-sensitive
        assert_eq!(
            ReportCategory::classify("phone blocked"),
            ReportCategory::GeneralIssues
        );
    }

    #[test]
    fn test_labels_round_trip() {
        for category in ReportCategory::ALL {
            assert_eq!(ReportCategory::from_label(category.label()), Some(category));
        }
        assert_eq!(ReportCategory::from_label("Unknown"), None);
    }

    #[test]
    fn test_resolved_prefixes_start_with_label() {
        for category in ReportCategory::ALL {
            assert_eq!(category.resolved_prefixes()[0], category.label());
        }
        assert!(ReportCategory::AutoReturnToLogin
            .resolved_prefixes()
            .contains(&"Automatic Return"));
        assert!(ReportCategory::AlreadyExistedPhone
            .resolved_prefixes()
            .contains(&"Phone Number Already Exists"));
    }

    #[test]
    fn test_append_creates_directory_and_header() {
        let dir = TempDir::new().unwrap();
        let store = ReportLogStore::new(dir.path().join("reports"));

        let stored = store
            .append_at(
                "Abebe Kebede",
                "+251912345678",
                "Phone Already Exists",
                at((2025, 1, 10), (9, 5, 7)),
            )
            .unwrap();

        assert_eq!(stored.category, ReportCategory::AlreadyExistedPhone);
        assert_eq!(
            stored.path,
            dir.path().join("reports/Already_Existed_Phone_2025-01-10.csv")
        );
        assert_eq!(stored.record.time, "09:05:07");

        let content = fs::read_to_string(&stored.path).unwrap();
        assert_eq!(
            content,
            "Time,Customer Name,Phone Number\n09:05:07,Abebe Kebede,+251912345678\n"
        );
    }

    #[test]
    fn test_header_written_once() {
        let dir = TempDir::new().unwrap();
        let store = ReportLogStore::new(dir.path());
        let day = (2025, 3, 1);

        store
            .append_at("First", "+251911111111", "User Blocked", at(day, (8, 0, 0)))
            .unwrap();
        let stored = store
            .append_at("Second", "+251922222222", "User Blocked", at(day, (8, 30, 0)))
            .unwrap();

        let content = fs::read_to_string(&stored.path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Time,Customer Name,Phone Number",
                "08:00:00,First,+251911111111",
                "08:30:00,Second,+251922222222",
            ]
        );
    }

    #[test]
    fn test_one_file_per_day_and_category() {
        let dir = TempDir::new().unwrap();
        let store = ReportLogStore::new(dir.path());

        let a = store
            .append_at("A", "+251911111111", "User Blocked", at((2025, 3, 1), (8, 0, 0)))
            .unwrap();
        let b = store
            .append_at("B", "+251911111111", "User Blocked", at((2025, 3, 2), (8, 0, 0)))
            .unwrap();
        let c = store
            .append_at("C", "+251911111111", "Other", at((2025, 3, 2), (8, 0, 0)))
            .unwrap();

        assert_ne!(a.path, b.path);
        assert_ne!(b.path, c.path);
        assert!(c.path.ends_with("General_Issues_2025-03-02.csv"));
    }

    #[test]
    fn test_names_with_commas_are_quoted() {
        let dir = TempDir::new().unwrap();
        let store = ReportLogStore::new(dir.path());

        let stored = store
            .append_at(
                "Kebede, Abebe",
                "+251912345678",
                "User Blocked",
                at((2025, 1, 10), (10, 0, 0)),
            )
            .unwrap();

        let mut reader = csv::Reader::from_path(&stored.path).unwrap();
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[1], "Kebede, Abebe");
    }

    #[test]
    fn test_append_fails_when_root_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("reports");
        fs::write(&blocker, "not a directory").unwrap();
        let store = ReportLogStore::new(&blocker);

        let result = store.append("Name", "+251912345678", "User Blocked");
        assert!(matches!(result, Err(ref e) if e.is_storage_failure()));
    }
}
