//! Batch coordination: input discovery and output placement.

use crate::output::OutputFormat;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Determine the output directory for a file.
pub fn output_dir_for(input: &Path, explicit_output_dir: Option<&Path>) -> PathBuf {
    explicit_output_dir.map_or_else(
        || {
            input
                .parent()
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        },
        Path::to_path_buf,
    )
}

/// Get the result file path for a given format.
pub fn output_path_for(input: &Path, output_dir: &Path, format: OutputFormat) -> PathBuf {
    // to_string_lossy keeps non-UTF-8 filenames working, with replacement
    // characters where needed.
    let stem = input.file_stem().map_or_else(
        || std::borrow::Cow::Borrowed("output"),
        |s| s.to_string_lossy(),
    );

    output_dir.join(format!("{stem}{}", format.extension()))
}

/// Whether a file needs processing, or its output already exists.
pub fn should_process(input: &Path, output_dir: &Path, format: OutputFormat, force: bool) -> bool {
    force || !output_path_for(input, output_dir, format).exists()
}

/// Collect audio files from a mix of file and directory paths.
///
/// Directories are walked recursively. Non-existent paths are logged
/// and skipped rather than failing the whole batch.
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_audio_file(path) {
                files.push(path.clone());
            }
        } else if path.is_dir() {
            collect_audio_files_recursive(path, &mut files)?;
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    Ok(files)
}

fn collect_audio_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            collect_audio_files_recursive(&path, files)?;
        } else if is_audio_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

/// Check if a file has a supported audio extension.
fn is_audio_file(path: &Path) -> bool {
    use std::ffi::OsStr;

    path.extension().is_some_and(|ext| {
        ext.eq_ignore_ascii_case(OsStr::new("wav"))
            || ext.eq_ignore_ascii_case(OsStr::new("flac"))
            || ext.eq_ignore_ascii_case(OsStr::new("mp3"))
            || ext.eq_ignore_ascii_case(OsStr::new("m4a"))
            || ext.eq_ignore_ascii_case(OsStr::new("aac"))
    })
}
