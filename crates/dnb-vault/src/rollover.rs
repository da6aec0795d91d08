//! Seeding a new day's file from the latest earlier day.
//!
//! A rollover copies the predecessor's bytes into today's file and then
//! prepends a date header. The header is written to a temporary file in the
//! same directory which is renamed over today's file, so readers see either
//! the plain copy or the finished file, never a half-written one.
//!
//! Copy and header failures do not fail the rollover: today's file is
//! always left in a usable state and the error is reported in
//! [`RolloverReport::errors`].

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::NamedTempFile;

use dnb_core::day;
use dnb_core::error::DnbError;

use crate::scanner::{find_latest_before, SkippedEntry};

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloverOptions {
    /// Seed new files from the predecessor. When off, new files start empty.
    pub enabled: bool,
}

impl Default for RolloverOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// What happened to today's file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolloverOutcome {
    /// The file already existed and was left untouched.
    Existing,
    /// A new empty file was created (no predecessor, or rollover disabled).
    Fresh,
    /// The predecessor's content was copied forward.
    RolledOver { from: PathBuf },
    /// Copying from the predecessor failed; an empty file was created instead.
    CopyFailed { from: PathBuf },
}

/// Outcome of one rollover attempt, including non-fatal errors.
#[derive(Debug)]
pub struct RolloverReport {
    pub outcome: RolloverOutcome,
    /// Whether the date header was prepended.
    pub header_written: bool,
    /// Non-fatal [`DnbError::Copy`] and [`DnbError::HeaderWrite`] errors.
    pub errors: Vec<DnbError>,
    /// Entries the history scan could not read.
    pub skipped: Vec<SkippedEntry>,
}

impl RolloverReport {
    fn new(outcome: RolloverOutcome) -> Self {
        Self {
            outcome,
            header_written: false,
            errors: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// True when no non-fatal error occurred.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Copies a predecessor's bytes into today's file.
type CopyStep = fn(&Path, &Path) -> io::Result<()>;
/// Prepends a header line to a file.
type HeaderStep = fn(&Path, &str) -> io::Result<()>;

/// Creates today's file, rolling over the latest earlier day if enabled.
#[derive(Debug, Clone)]
pub struct RolloverEngine {
    options: RolloverOptions,
    copy: CopyStep,
    write_header: HeaderStep,
}

impl Default for RolloverEngine {
    fn default() -> Self {
        Self::new(RolloverOptions::default())
    }
}

impl RolloverEngine {
    #[must_use]
    pub fn new(options: RolloverOptions) -> Self {
        Self {
            options,
            copy: copy_contents,
            write_header: prepend_header,
        }
    }

    /// Create `todays_path` unless it already exists.
    ///
    /// With rollover enabled, the latest daily file under `root` dated before
    /// `today` is copied forward and given a date header. Without a
    /// predecessor the file is created empty and carries no header.
    ///
    /// # Errors
    ///
    /// Returns [`DnbError::Scan`] if `root` cannot be scanned and
    /// [`DnbError::Create`] if today's file cannot be created at all.
    pub fn rollover(
        &self,
        root: &Path,
        todays_path: &Path,
        today: NaiveDate,
    ) -> Result<RolloverReport, DnbError> {
        if fs::symlink_metadata(todays_path).is_ok() {
            return Ok(RolloverReport::new(RolloverOutcome::Existing));
        }

        if !self.options.enabled {
            create_empty(todays_path)?;
            return Ok(RolloverReport::new(RolloverOutcome::Fresh));
        }

        let scan = find_latest_before(root, today)?;
        let mut report = match scan.latest {
            Some(predecessor) => self.seed_from(&predecessor.path, todays_path, today)?,
            None => {
                create_empty(todays_path)?;
                RolloverReport::new(RolloverOutcome::Fresh)
            }
        };
        report.skipped = scan.skipped;
        Ok(report)
    }

    /// Copy `predecessor` into `todays_path` and prepend the header for `today`.
    fn seed_from(
        &self,
        predecessor: &Path,
        todays_path: &Path,
        today: NaiveDate,
    ) -> Result<RolloverReport, DnbError> {
        tracing::info!(
            from = %predecessor.display(),
            to = %todays_path.display(),
            "rolling over"
        );

        if let Err(source) = (self.copy)(predecessor, todays_path) {
            let err = DnbError::Copy {
                from: predecessor.to_path_buf(),
                to: todays_path.to_path_buf(),
                source,
            };
            tracing::warn!(error = %err, "rollover copy failed, starting an empty file");
            create_empty(todays_path)?;

            let mut report = RolloverReport::new(RolloverOutcome::CopyFailed {
                from: predecessor.to_path_buf(),
            });
            report.errors.push(err);
            return Ok(report);
        }

        let mut report = RolloverReport::new(RolloverOutcome::RolledOver {
            from: predecessor.to_path_buf(),
        });
        match (self.write_header)(todays_path, &day::header_line(today)) {
            Ok(()) => report.header_written = true,
            Err(source) => {
                let err = DnbError::HeaderWrite {
                    path: todays_path.to_path_buf(),
                    source,
                };
                tracing::warn!(error = %err, "keeping rolled-over content without header");
                report.errors.push(err);
            }
        }
        Ok(report)
    }
}

fn copy_contents(from: &Path, to: &Path) -> io::Result<()> {
    let mut src = File::open(from)?;
    let mut dst = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(to)?;
    io::copy(&mut src, &mut dst)?;
    dst.sync_all()
}

/// Rewrite `path` as `header` followed by its current content, via a
/// temporary sibling file and an atomic rename.
fn prepend_header(path: &Path, header: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(header.as_bytes())?;

    let mut current = File::open(path)?;
    io::copy(&mut current, &mut tmp)?;
    tmp.as_file().sync_all()?;
    fs::set_permissions(tmp.path(), current.metadata()?.permissions())?;

    tmp.persist(path)?;
    Ok(())
}

/// Create (or truncate) `path` as an empty file.
fn create_empty(path: &Path) -> Result<(), DnbError> {
    File::create(path).map_err(|source| DnbError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
