use std::time::Duration;

pub const DEFAULT_QUALITY: u8 = 80;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// Largest number of files the accepted batch may hold.
pub const MAX_BATCH_FILES: usize = 20;
/// Largest accepted candidate, in bytes (5 MiB).
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;
/// Longer side of a compressed image never exceeds this many pixels.
pub const MAX_DIMENSION: u32 = 2000;

pub const STAGGER_INTERVAL: Duration = Duration::from_millis(100);
pub const PROGRESS_HIDE_DELAY: Duration = Duration::from_millis(500);
pub const MESSAGE_TTL: Duration = Duration::from_millis(5000);

pub const IMAGE_MIME_PREFIX: &str = "image/";
pub const COMPRESSED_PREFIX: &str = "compressed_";
pub const COMPRESSED_EXTENSION: &str = "jpg";
pub const ARCHIVE_FOLDER: &str = "compressed_images";
pub const ARCHIVE_NAME: &str = "compressed_images.zip";
pub const REFERENCE_SCHEME: &str = "blob:batch-squeeze/";

pub const PROGRESS_TEMPLATE: &str = "{bar:40.cyan/blue} {msg}";

// User-visible message texts
pub const NO_VALID_IMAGES_MESSAGE: &str =
    "No valid images selected. Please select JPEG, PNG, or WEBP files under 5MB.";
pub const BATCH_SUCCESS_MESSAGE: &str = "All images compressed successfully!";
pub const ARCHIVE_ERROR_MESSAGE: &str = "Error creating ZIP file";
