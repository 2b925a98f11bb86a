use crate::constants::{ARCHIVE_FOLDER, ARCHIVE_NAME};
use crate::error::{CompressionError, Result};
use crate::processing::CompressedArtifact;
use crate::progress::{BatchProgress, ProgressAction};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::sync::Arc;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A finished archive ready to be saved.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub name: String,
    pub bytes: Vec<u8>,
    /// Entry paths in the order they were written.
    pub entries: Vec<String>,
}

/// Entry staged for the archive: path inside the zip plus the bytes.
#[derive(Debug, Clone)]
pub struct PendingEntry {
    pub path: String,
    pub bytes: Arc<[u8]>,
}

/// Returns `name`, or `name` with `_2`, `_3`, ... before the extension if it
/// is already in `used`. Records the result.
pub fn unique_name(name: &str, used: &mut HashSet<String>) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{}", ext)),
        None => (name, String::new()),
    };
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}{}", stem, n, ext);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Stages every artifact under the archive folder. Cheap; reports after each
/// entry.
pub fn stage_entries(
    artifacts: &[CompressedArtifact],
    mut on_added: impl FnMut(BatchProgress),
) -> Vec<PendingEntry> {
    let mut used = HashSet::new();
    let mut progress = BatchProgress::new(artifacts.len(), ProgressAction::PreparingZip);
    let mut entries = Vec::with_capacity(artifacts.len());

    for artifact in artifacts {
        let name = unique_name(&artifact.name, &mut used);
        entries.push(PendingEntry {
            path: format!("{}/{}", ARCHIVE_FOLDER, name),
            bytes: Arc::clone(&artifact.bytes),
        });
        progress.completed += 1;
        on_added(progress);
    }

    entries
}

fn archive_error(e: impl std::fmt::Display) -> CompressionError {
    CompressionError::Archive(e.to_string())
}

/// Writes the zip. JPEG payloads are stored, not deflated.
pub fn write_zip(entries: &[PendingEntry]) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    writer
        .add_directory(format!("{}/", ARCHIVE_FOLDER), options)
        .map_err(archive_error)?;
    for entry in entries {
        writer
            .start_file(entry.path.as_str(), options)
            .map_err(archive_error)?;
        writer.write_all(&entry.bytes).map_err(archive_error)?;
    }

    let cursor = writer.finish().map_err(archive_error)?;
    Ok(cursor.into_inner())
}

/// Packages `artifacts` into one bundle. Returns `Ok(None)` without doing any
/// work when there is nothing to package.
pub async fn build_archive(
    artifacts: &[CompressedArtifact],
    on_added: impl FnMut(BatchProgress),
) -> Result<Option<Bundle>> {
    if artifacts.is_empty() {
        return Ok(None);
    }

    let entries = stage_entries(artifacts, on_added);
    let paths: Vec<String> = entries.iter().map(|e| e.path.clone()).collect();

    let bytes = tokio::task::spawn_blocking(move || write_zip(&entries))
        .await
        .map_err(|e| CompressionError::Archive(e.to_string()))??;
    tracing::debug!(entries = paths.len(), size = bytes.len(), "archive finalised");

    Ok(Some(Bundle {
        name: ARCHIVE_NAME.to_string(),
        bytes,
        entries: paths,
    }))
}
