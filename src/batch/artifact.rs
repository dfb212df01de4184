//! Input enumeration and output artifact paths.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::Result;
use crate::render::{render_error_record, Transcript};

/// Extension of transcript artifacts.
pub const TRANSCRIPT_EXTENSION: &str = "txt";
/// Suffix of error artifacts.
pub const ERROR_SUFFIX: &str = "error.txt";

/// List the `*.pdf` files directly inside `dir`, sorted by path.
///
/// The extension match ignores case; subdirectories are not searched.
pub fn collect_documents<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() && is_pdf_path(&path) {
            documents.push(path);
        }
    }
    documents.sort();
    Ok(documents)
}

fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

fn stem(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// Path of the transcript written for `source`.
pub fn transcript_path(output_dir: &Path, source: &Path) -> PathBuf {
    output_dir.join(format!("{}.{}", stem(source), TRANSCRIPT_EXTENSION))
}

/// Path of the error record written for `source`.
pub fn error_path(output_dir: &Path, source: &Path) -> PathBuf {
    output_dir.join(format!("{}.{}", stem(source), ERROR_SUFFIX))
}

/// Remove any stale error record for the same source, then write a transcript.
///
/// The transcript is only written once the stale record is gone, so a source
/// never ends up with both artifacts.
pub fn write_transcript(
    output_dir: &Path,
    source: &Path,
    transcript: &Transcript,
) -> Result<PathBuf> {
    match fs::remove_file(error_path(output_dir, source)) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let path = transcript_path(output_dir, source);
    fs::write(&path, transcript.render())?;
    Ok(path)
}

/// Write an error record. An existing transcript for the source is left alone.
pub fn write_error(
    output_dir: &Path,
    source: &Path,
    error: &(dyn std::error::Error + 'static),
) -> Result<PathBuf> {
    let path = error_path(output_dir, source);
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());
    fs::write(&path, render_error_record(&name, error, Utc::now()))?;
    Ok(path)
}
