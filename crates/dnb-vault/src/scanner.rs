//! Discovery of the latest daily file before a given date.
//!
//! The scan walks the whole notebook tree instead of trusting the
//! `YYYY/MM` layout, so misplaced day files are still found. Entries that
//! cannot be read are skipped and reported; only a broken root aborts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use walkdir::WalkDir;

use dnb_core::day;
use dnb_core::error::DnbError;

/// A daily file found on disk, with the date encoded in its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedFile {
    pub path: PathBuf,
    pub date: NaiveDate,
}

/// A walk entry that could not be read and was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: Option<PathBuf>,
    pub reason: String,
}

/// Result of [`find_latest_before`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Latest daily file strictly before the reference date, if any.
    pub latest: Option<DatedFile>,
    /// Entries skipped because they could not be read.
    pub skipped: Vec<SkippedEntry>,
}

/// Find the daily file with the latest date strictly before `reference`.
///
/// When several files carry the same winning date, the lexicographically
/// greatest path is chosen.
///
/// # Errors
///
/// Returns [`DnbError::Scan`] if `root` does not exist, is not a directory,
/// or cannot be listed. Errors below the root are collected in
/// [`ScanResult::skipped`] instead.
pub fn find_latest_before(root: &Path, reference: NaiveDate) -> Result<ScanResult, DnbError> {
    check_root(root)?;

    let mut result = ScanResult::default();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(DnbError::Scan {
                    path: root.to_path_buf(),
                    source: err.into(),
                });
            }
            Err(err) => {
                let skipped = SkippedEntry {
                    path: err.path().map(Path::to_path_buf),
                    reason: err.to_string(),
                };
                tracing::debug!(
                    path = ?skipped.path,
                    reason = %skipped.reason,
                    "skipping unreadable entry"
                );
                result.skipped.push(skipped);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let Some(date) = entry.file_name().to_str().and_then(day::parse_file_name) else {
            continue;
        };
        if date >= reference {
            continue;
        }

        let is_better = match &result.latest {
            None => true,
            Some(best) => (date, entry.path()) > (best.date, best.path.as_path()),
        };
        if is_better {
            result.latest = Some(DatedFile {
                path: entry.into_path(),
                date,
            });
        }
    }

    Ok(result)
}

fn check_root(root: &Path) -> Result<(), DnbError> {
    let scan_error = |source: io::Error| DnbError::Scan {
        path: root.to_path_buf(),
        source,
    };

    let meta = fs::metadata(root).map_err(scan_error)?;
    if !meta.is_dir() {
        return Err(scan_error(io::Error::other("not a directory")));
    }
    fs::read_dir(root).map_err(scan_error)?;
    Ok(())
}
