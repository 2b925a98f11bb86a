use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("File reading failed for {name}: {reason}")]
    Read { name: String, reason: String },

    #[error("Image loading failed for {name}: {reason}")]
    Decode { name: String, reason: String },

    #[error("Compression failed for {name}: {reason}")]
    Encode { name: String, reason: String },

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("A batch is already running for this session")]
    BatchInProgress,

    #[error("No file at position {0}")]
    IndexOutOfRange(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error("No image files found in input path: {0}")]
    NoImageFilesFound(String),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),
}

impl CompressionError {
    /// Per-file failures that leave the rest of a batch untouched.
    pub fn is_file_scoped(&self) -> bool {
        matches!(
            self,
            CompressionError::Read { .. }
                | CompressionError::Decode { .. }
                | CompressionError::Encode { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CompressionError>;
