use crate::constants::IMAGE_MIME_PREFIX;
use crate::error::{CompressionError, Result};
use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;
use walkdir::WalkDir;

/// Where a candidate's bytes come from.
#[derive(Debug, Clone)]
pub enum FileContent {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

/// A user-presented file handle. Immutable once built.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    name: String,
    size: u64,
    last_modified: u64,
    mime_type: String,
    content: FileContent,
}

impl CandidateFile {
    pub fn new(
        name: impl Into<String>,
        size: u64,
        last_modified: u64,
        mime_type: impl Into<String>,
        content: FileContent,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            last_modified,
            mime_type: mime_type.into(),
            content,
        }
    }

    /// Builds a candidate from a file on disk. The MIME type is guessed from
    /// the extension and `last_modified` is in milliseconds since the epoch.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata =
            fs::metadata(path).map_err(|_| CompressionError::FileNotFound(path.to_path_buf()))?;
        let last_modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(
            name,
            metadata.len(),
            last_modified,
            guess_mime_type(path),
            FileContent::Path(path.to_path_buf()),
        ))
    }

    pub fn from_bytes(
        name: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
        mime_type: impl Into<String>,
        last_modified: u64,
    ) -> Self {
        let bytes = bytes.into();
        Self::new(
            name,
            bytes.len() as u64,
            last_modified,
            mime_type,
            FileContent::Memory(bytes),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn last_modified(&self) -> u64 {
        self.last_modified
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn content(&self) -> &FileContent {
        &self.content
    }

    /// Two candidates with the same identity are the same file.
    pub fn identity(&self) -> (&str, u64, u64) {
        (&self.name, self.size, self.last_modified)
    }

    pub fn is_same_file(&self, other: &CandidateFile) -> bool {
        self.identity() == other.identity()
    }

    pub async fn read_bytes(&self) -> std::io::Result<Arc<[u8]>> {
        match &self.content {
            FileContent::Memory(bytes) => Ok(Arc::clone(bytes)),
            FileContent::Path(path) => Ok(Arc::from(tokio::fs::read(path).await?)),
        }
    }
}

pub fn guess_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

pub fn is_image_path(path: &Path) -> bool {
    guess_mime_type(path).starts_with(IMAGE_MIME_PREFIX)
}

/// Expands CLI inputs into file paths. Explicit files are kept as given so the
/// validator can report on them; directory and glob matches are narrowed to
/// paths that look like images.
pub fn collect_candidate_paths(inputs: &[String], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        let input_path = Path::new(input);

        if input_path.is_file() {
            paths.push(input_path.to_path_buf());
        } else if input_path.is_dir() {
            let walker = if recursive {
                WalkDir::new(input_path)
            } else {
                WalkDir::new(input_path).max_depth(1)
            };

            for entry in walker
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
            {
                let entry = entry?;
                let path = entry.path();
                if path.is_file() && is_image_path(path) {
                    paths.push(path.to_path_buf());
                }
            }
        } else if let Ok(pattern) = glob(input) {
            for entry in pattern.flatten() {
                if entry.is_file() && is_image_path(&entry) {
                    paths.push(entry);
                }
            }
        } else {
            return Err(CompressionError::NoImageFilesFound(input.to_string()));
        }
    }

    Ok(paths)
}
