//! The batch driver.
//!
//! Walks the input directory one level deep and pushes every file through
//! open → transform → encode → write, one file at a time:
//!
//! ```text
//! samples/                          output/
//! ├── a.jpg   (2000x1000, EXIF 6)   ├── a.jpg   (512x1024, no EXIF)
//! ├── b.png   (640x480)             ├── b.png   (640x480)
//! ├── c.gif                         │           (GIFs are excluded)
//! └── notes.txt                     │           (not an image: skipped)
//! ```
//!
//! ## Error Model
//!
//! Only a missing input or output directory stops the batch, and it does so
//! before any file is touched. Everything that goes wrong with a single file
//! is recorded in the [`BatchReport`] and the walk moves on:
//!
//! - files that cannot be opened as images are **skipped** (silently, with a
//!   [`SkipReason`] in the report)
//! - GIFs are **excluded** after being logged
//! - transform, encode and write errors are **failed** and logged
//!
//! ## Progress Events
//!
//! Progress is reported as [`ProcessEvent`]s over an optional
//! `std::sync::mpsc` channel, so the caller decides how (and whether) to
//! display them. See [`crate::output::format_process_event`].

use crate::config::BatchConfig;
use crate::imaging::orientation::read_orientation;
use crate::imaging::{
    Bounds, Dimensions, ImageBackend, OpenError, Photo, RustBackend, SkipReason, format_label,
    transform,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Input directory not found: {0}")]
    InputDirMissing(PathBuf),
    #[error("Output directory not found: {0}")]
    OutputDirMissing(PathBuf),
}

/// One logged snapshot of a file: where it is and what it looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: PathBuf,
    pub size: u64,
    pub format: String,
    pub dimensions: Dimensions,
    /// Whether an EXIF block is present. `None` for lines that don't report it.
    pub exif: Option<bool>,
}

/// Progress events emitted during a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// A source file was opened as an image.
    Detected(FileInfo),
    /// A non-GIF source is about to be transformed.
    Prepared(FileInfo),
    /// The output was encoded in memory; `size` is the encoded byte count.
    Encoded(FileInfo),
    /// The output file is on disk; `size` is re-read from the filesystem.
    Written(FileInfo),
    /// A file could not be opened as an image. Not displayed.
    Skipped { path: PathBuf, reason: SkipReason },
    /// Transform, encode or write failed for one file.
    Failed { path: PathBuf, error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessedFile {
    pub source: PathBuf,
    pub output: PathBuf,
    pub format: String,
    pub source_size: u64,
    pub output_size: u64,
    pub source_dimensions: Dimensions,
    pub output_dimensions: Dimensions,
    /// EXIF orientation code that was applied (1 when none).
    pub orientation: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a batch, serializable as the `--report` JSON.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub processed: Vec<ProcessedFile>,
    /// GIF sources, logged but not transformed.
    pub excluded: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
    pub failed: Vec<FailedFile>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

impl std::fmt::Display for BatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Processed {}, excluded {}, skipped {}, failed {}",
            self.processed.len(),
            self.excluded.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}

/// Process every file in `config.input_dir` with the default backend.
pub fn process(
    config: &BatchConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, ProcessError> {
    process_with_backend(&RustBackend::new(), config, events)
}

/// Process images using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    config: &BatchConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, ProcessError> {
    require_dir(&config.input_dir, ProcessError::InputDirMissing)?;
    require_dir(&config.output_dir, ProcessError::OutputDirMissing)?;

    let bounds = config.bounds();
    let emit = |event: ProcessEvent| send(&events, event);
    let mut report = BatchReport::default();

    for entry in input_files(&config.input_dir) {
        let Some(source) = detect(backend, entry, &mut report, &emit) else {
            continue;
        };
        let Source { path, size, photo } = source;

        if photo.is_gif() {
            report.excluded.push(path);
            continue;
        }

        emit(ProcessEvent::Prepared(FileInfo {
            exif: Some(photo.has_exif()),
            ..file_info(&path, size, &photo)
        }));

        let output = match path.file_name() {
            Some(name) => config.output_dir.join(name),
            None => continue,
        };
        match convert(backend, &path, size, photo, &output, &bounds, &emit) {
            Ok(processed) => report.processed.push(processed),
            Err(error) => {
                emit(ProcessEvent::Failed {
                    path: output,
                    error: error.clone(),
                });
                report.failed.push(FailedFile { path, error });
            }
        }
    }

    Ok(report)
}

/// Open and log every input file without transforming or writing anything.
///
/// The output directory is not required to exist.
pub fn check(
    config: &BatchConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, ProcessError> {
    check_with_backend(&RustBackend::new(), config, events)
}

pub fn check_with_backend(
    backend: &impl ImageBackend,
    config: &BatchConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, ProcessError> {
    require_dir(&config.input_dir, ProcessError::InputDirMissing)?;

    let emit = |event: ProcessEvent| send(&events, event);
    let mut report = BatchReport::default();

    for entry in input_files(&config.input_dir) {
        if let Some(source) = detect(backend, entry, &mut report, &emit) {
            if source.photo.is_gif() {
                report.excluded.push(source.path);
            }
        }
    }

    Ok(report)
}

/// Write the report as pretty-printed JSON.
pub fn write_report(report: &BatchReport, path: &Path) -> Result<(), ProcessError> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

// ============================================================================
// Per-file steps
// ============================================================================

struct Source {
    path: PathBuf,
    size: u64,
    photo: Photo,
}

/// Open one walk entry. Emits `Detected` on success; records a skip otherwise.
fn detect(
    backend: &impl ImageBackend,
    entry: Result<PathBuf, SkippedFile>,
    report: &mut BatchReport,
    emit: &impl Fn(ProcessEvent),
) -> Option<Source> {
    let path = match entry {
        Ok(path) => path,
        Err(skipped) => {
            skip(report, emit, skipped);
            return None;
        }
    };

    match open_source(backend, &path) {
        Ok((size, photo)) => {
            emit(ProcessEvent::Detected(file_info(&path, size, &photo)));
            Some(Source { path, size, photo })
        }
        Err(err) => {
            let reason = err.reason();
            skip(report, emit, SkippedFile { path, reason });
            None
        }
    }
}

fn open_source(backend: &impl ImageBackend, path: &Path) -> Result<(u64, Photo), OpenError> {
    let size = fs::metadata(path)?.len();
    let photo = backend.open(path)?;
    Ok((size, photo))
}

fn skip(report: &mut BatchReport, emit: &impl Fn(ProcessEvent), skipped: SkippedFile) {
    emit(ProcessEvent::Skipped {
        path: skipped.path.clone(),
        reason: skipped.reason,
    });
    report.skipped.push(skipped);
}

/// Transform, encode and write one opened photo. Errors are rendered to strings
/// because they only ever end up in the log and the report.
fn convert(
    backend: &impl ImageBackend,
    source: &Path,
    source_size: u64,
    photo: Photo,
    output: &Path,
    bounds: &Bounds,
    emit: &impl Fn(ProcessEvent),
) -> Result<ProcessedFile, String> {
    let source_dimensions = photo.dimensions();
    let orientation = read_orientation(photo.metadata.exif.as_deref());

    let result = transform(photo, bounds).map_err(|e| e.to_string())?;
    let bytes = backend.encode(&result).map_err(|e| e.to_string())?;
    emit(ProcessEvent::Encoded(FileInfo {
        exif: Some(result.has_exif()),
        ..file_info(output, bytes.len() as u64, &result)
    }));

    fs::write(output, &bytes).map_err(|e| format!("write failed: {e}"))?;
    let output_size = fs::metadata(output)
        .map_err(|e| format!("write failed: {e}"))?
        .len();
    emit(ProcessEvent::Written(FileInfo {
        exif: Some(result.has_exif()),
        ..file_info(output, output_size, &result)
    }));

    Ok(ProcessedFile {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        format: format_label(result.format),
        source_size,
        output_size,
        source_dimensions,
        output_dimensions: result.dimensions(),
        orientation,
    })
}

// ============================================================================
// Helpers
// ============================================================================

fn require_dir(
    dir: &Path,
    missing: impl FnOnce(PathBuf) -> ProcessError,
) -> Result<(), ProcessError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(missing(dir.to_path_buf()))
    }
}

/// Files directly inside `dir`, in the order the filesystem returns them.
///
/// Subdirectories are ignored. Entries that cannot be read become `Io` skips.
fn input_files(dir: &Path) -> impl Iterator<Item = Result<PathBuf, SkippedFile>> + '_ {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) if entry.path().is_file() => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(err) => Some(Err(SkippedFile {
                path: err.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf),
                reason: SkipReason::Io,
            })),
        })
}

fn file_info(path: &Path, size: u64, photo: &Photo) -> FileInfo {
    FileInfo {
        path: path.to_path_buf(),
        size,
        format: format_label(photo.format),
        dimensions: photo.dimensions(),
        exif: None,
    }
}

fn send(events: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is watching
        let _ = tx.send(event);
    }
}
