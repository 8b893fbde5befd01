//! CLI output formatting for batch progress.
//!
//! # Output Format
//!
//! One line per event, fields in a fixed order so the log can be grepped and
//! diffed between runs:
//!
//! ```text
//! samples/a.jpg size=48213 format=JPEG width/height=(2000, 1000)
//! samples/a.jpg size=48213 format=JPEG width/height=(2000, 1000) exif=true
//! output/a.jpg size=20817 format=JPEG width/height=(512, 1024) exif=false
//! output/a.jpg size=20817 format=JPEG width/height=(512, 1024) exif=false
//! output/b.png error=Processing failed: PNG encode failed: ...
//!
//! Processed 1, excluded 0, skipped 3, failed 1
//! ```
//!
//! The first line of each file is logged right after it is opened. GIFs stop
//! there. The next three follow the transform, encode and write steps.
//! Files that are not images produce no lines at all.
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure and do no I/O.

use crate::process::{BatchReport, FileInfo, ProcessEvent};

fn file_info_line(info: &FileInfo) -> String {
    let mut line = format!(
        "{} size={} format={} width/height=({}, {})",
        info.path.display(),
        info.size,
        info.format,
        info.dimensions.width,
        info.dimensions.height
    );
    if let Some(exif) = info.exif {
        line.push_str(&format!(" exif={exif}"));
    }
    line
}

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Detected(info)
        | ProcessEvent::Prepared(info)
        | ProcessEvent::Encoded(info)
        | ProcessEvent::Written(info) => vec![file_info_line(info)],
        ProcessEvent::Failed { path, error } => {
            vec![format!("{} error={}", path.display(), error)]
        }
        ProcessEvent::Skipped { .. } => Vec::new(),
    }
}

pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

/// Format the end-of-batch summary.
pub fn format_summary(report: &BatchReport) -> Vec<String> {
    vec![String::new(), report.to_string()]
}

pub fn print_summary(report: &BatchReport) {
    for line in format_summary(report) {
        println!("{}", line);
    }
}
