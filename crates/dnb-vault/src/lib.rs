//! # dnb-vault
//!
//! File system operations for a dnb notebook.
//!
//! A notebook root holds one plain-text file per day under
//! `<root>/<YYYY>/<MM>/<YYYYMMDD>.txt`. [`resolve_and_rollover`] is the
//! single entry point used by the CLI: it finds (or creates) today's file,
//! seeding a new one from the latest earlier day.
//!
//! Nothing here locks the notebook; callers serialize access per root.

pub mod paths;
pub mod rollover;
pub mod scanner;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use dnb_core::error::DnbError;

pub use paths::{daily_path, todays_path};
pub use rollover::{RolloverEngine, RolloverOptions, RolloverOutcome, RolloverReport};
pub use scanner::{find_latest_before, DatedFile, ScanResult, SkippedEntry};

/// Today's file and how it came to be.
#[derive(Debug)]
pub struct DailyEntry {
    /// Absolute path of today's file.
    pub path: PathBuf,
    pub report: RolloverReport,
}

/// Resolve today's file under `root`, creating it via rollover if missing.
///
/// An existing file for `today` is returned untouched.
///
/// # Errors
///
/// Returns [`DnbError::DirectoryCreate`] if the root cannot be made absolute
/// or the day directory cannot be made,
/// [`DnbError::Scan`] if the root cannot be scanned, and [`DnbError::Create`]
/// if today's file cannot be created. Copy and header problems are reported in
/// [`RolloverReport::errors`] instead.
pub fn resolve_and_rollover(
    root: &Path,
    today: NaiveDate,
    options: RolloverOptions,
) -> Result<DailyEntry, DnbError> {
    let root = std::path::absolute(root).map_err(|source| DnbError::DirectoryCreate {
        path: root.to_path_buf(),
        source,
    })?;
    let path = todays_path(&root, today)?;
    let report = RolloverEngine::new(options).rollover(&root, &path, today)?;
    Ok(DailyEntry { path, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn first_entry_in_empty_notebook_is_blank() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("work");

        let entry =
            resolve_and_rollover(&root, date(2024, 3, 5), RolloverOptions::default()).unwrap();

        assert_eq!(entry.path, root.join("2024/03/20240305.txt"));
        assert!(entry.path.is_absolute());
        assert_eq!(entry.report.outcome, RolloverOutcome::Fresh);
        assert_eq!(fs::read(&entry.path).unwrap(), b"");
    }

    #[test]
    fn resolving_twice_returns_same_untouched_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let prev = daily_path(root, date(2024, 2, 29));
        fs::create_dir_all(prev.parent().unwrap()).unwrap();
        fs::write(&prev, "carry\n").unwrap();

        let first =
            resolve_and_rollover(root, date(2024, 3, 5), RolloverOptions::default()).unwrap();
        assert!(matches!(
            first.report.outcome,
            RolloverOutcome::RolledOver { .. }
        ));
        fs::write(&first.path, "edited today\n").unwrap();

        let second =
            resolve_and_rollover(root, date(2024, 3, 5), RolloverOptions::default()).unwrap();
        assert_eq!(first.path, second.path);
        assert_eq!(second.report.outcome, RolloverOutcome::Existing);
        assert_eq!(fs::read_to_string(&second.path).unwrap(), "edited today\n");
    }

    #[test]
    fn rollover_crosses_month_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let prev = daily_path(root, date(2024, 2, 29));
        fs::create_dir_all(prev.parent().unwrap()).unwrap();
        fs::write(&prev, "- [ ] ship it\n").unwrap();

        let entry =
            resolve_and_rollover(root, date(2024, 3, 1), RolloverOptions::default()).unwrap();

        assert_eq!(
            fs::read_to_string(&entry.path).unwrap(),
            "Friday, March 1, 2024 \n- [ ] ship it\n"
        );
        assert!(entry.report.skipped.is_empty());
    }

    #[test]
    fn blocked_day_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("2024"), "").unwrap();

        let err = resolve_and_rollover(dir.path(), date(2024, 3, 5), RolloverOptions::default())
            .unwrap_err();
        assert!(matches!(err, DnbError::DirectoryCreate { .. }));
    }

    #[test]
    fn empty_root_is_rejected_before_scanning() {
        let err = resolve_and_rollover(Path::new(""), date(2024, 3, 5), RolloverOptions::default())
            .unwrap_err();
        match err {
            DnbError::DirectoryCreate { path, .. } => assert_eq!(path, PathBuf::new()),
            other => panic!("Expected DirectoryCreate, got {other:?}"),
        }
    }
}
