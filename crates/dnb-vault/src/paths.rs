//! Where each day's file lives inside a notebook root.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use dnb_core::day;
use dnb_core::error::DnbError;

/// Path of the daily file for `date`: `<root>/<YYYY>/<MM>/<YYYYMMDD>.txt`.
#[must_use]
pub fn daily_path(root: &Path, date: NaiveDate) -> PathBuf {
    let (year, month) = day::dir_segments(date);
    root.join(year).join(month).join(day::file_name(date))
}

/// Path of today's file, creating its year/month directories if needed.
///
/// The file itself is not created.
///
/// # Errors
///
/// Returns [`DnbError::DirectoryCreate`] if the directories cannot be created.
pub fn todays_path(root: &Path, today: NaiveDate) -> Result<PathBuf, DnbError> {
    let path = daily_path(root, today);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| DnbError::DirectoryCreate {
            path: dir.to_path_buf(),
            source,
        })?;
        tracing::debug!(dir = %dir.display(), "ensured day directory");
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_path_nests_year_and_month() {
        let path = daily_path(Path::new("/nb/work"), date(2024, 3, 5));
        assert_eq!(path, PathBuf::from("/nb/work/2024/03/20240305.txt"));
    }

    #[test]
    fn todays_path_creates_directories_but_not_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("work");

        let path = todays_path(&root, date(2024, 3, 5)).unwrap();
        assert_eq!(path, root.join("2024").join("03").join("20240305.txt"));
        assert!(root.join("2024").join("03").is_dir());
        assert!(!path.exists());
    }

    #[test]
    fn todays_path_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let first = todays_path(dir.path(), date(2024, 3, 5)).unwrap();
        let second = todays_path(dir.path(), date(2024, 3, 5)).unwrap();
        assert_eq!(first, second);

        let years: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(years.len(), 1);
        let months: Vec<_> = fs::read_dir(dir.path().join("2024")).unwrap().collect();
        assert_eq!(months.len(), 1);
    }

    #[test]
    fn todays_path_fails_when_a_file_blocks_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("2024"), "not a directory").unwrap();

        let err = todays_path(dir.path(), date(2024, 3, 5)).unwrap_err();
        match err {
            DnbError::DirectoryCreate { path, .. } => {
                assert_eq!(path, dir.path().join("2024").join("03"));
            }
            other => panic!("Expected DirectoryCreate, got {other:?}"),
        }
    }
}
