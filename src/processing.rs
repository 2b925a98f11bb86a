use crate::candidate::CandidateFile;
use crate::constants::{
    COMPRESSED_EXTENSION, COMPRESSED_PREFIX, DEFAULT_QUALITY, MAX_DIMENSION, MAX_QUALITY,
    MIN_QUALITY,
};
use crate::error::{CompressionError, Result};
use crate::planner::{plan_with_bound, CompressionPlan};
use crate::references::{ArtifactRef, ReferenceStore};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionOptions {
    pub quality: u8,
    pub max_dimension: u32,
}

impl CompressionOptions {
    pub fn new(quality: Option<u8>) -> Result<Self> {
        let quality = quality.unwrap_or(DEFAULT_QUALITY);
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(CompressionError::InvalidQuality(quality));
        }

        Ok(Self {
            quality,
            max_dimension: MAX_DIMENSION,
        })
    }

    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension.max(1);
        self
    }
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            max_dimension: MAX_DIMENSION,
        }
    }
}

/// Output of one successful compression. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct CompressedArtifact {
    /// Position of the source file in the batch it was compressed from.
    pub index: usize,
    pub original_name: String,
    pub name: String,
    pub reference: ArtifactRef,
    pub bytes: Arc<[u8]>,
    pub byte_size: u64,
    pub original_byte_size: u64,
    pub width: u32,
    pub height: u32,
    pub original_width: u32,
    pub original_height: u32,
}

impl CompressedArtifact {
    /// Filename offered for a single-file save.
    pub fn download_name(&self) -> String {
        format!("{}{}", COMPRESSED_PREFIX, self.original_name)
    }
}

/// `photo.png` -> `compressed_photo.jpg`. Only the final extension is dropped.
pub fn compressed_name(original: &str) -> String {
    let base = original
        .rsplit_once('.')
        .map(|(base, _)| base)
        .unwrap_or(original);
    format!("{}{}.{}", COMPRESSED_PREFIX, base, COMPRESSED_EXTENSION)
}

pub fn decode_image(name: &str, bytes: &[u8]) -> Result<DynamicImage> {
    let decode_error = |reason: String| CompressionError::Decode {
        name: name.to_string(),
        reason,
    };

    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| decode_error(e.to_string()))?
        .decode()
        .map_err(|e| decode_error(e.to_string()))
}

pub fn resize_to_plan(img: DynamicImage, plan: &CompressionPlan) -> DynamicImage {
    let (width, height) = plan.pixel_size();
    if (width, height) == img.dimensions() {
        return img;
    }
    tracing::debug!(from = ?img.dimensions(), to = ?(width, height), "resizing");
    img.resize_exact(width, height, image::imageops::FilterType::Lanczos3)
}

/// Encodes as baseline JPEG. Alpha is dropped.
pub fn encode_jpeg(name: &str, img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = img.to_rgb8();
    let mut out = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
        encoder
            .encode_image(&rgb)
            .map_err(|e| CompressionError::Encode {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
    }

    if out.is_empty() {
        return Err(CompressionError::Encode {
            name: name.to_string(),
            reason: "encoder produced no output".to_string(),
        });
    }
    Ok(out)
}

/// Decoded, planned and re-encoded bytes, before any reference is allocated.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub original_width: u32,
    pub original_height: u32,
}

/// Synchronous decode -> plan -> resize -> encode.
pub fn compress_bytes(name: &str, bytes: &[u8], options: &CompressionOptions) -> Result<EncodedImage> {
    let img = decode_image(name, bytes)?;
    render_and_encode(name, img, options)
}

fn render_and_encode(name: &str, img: DynamicImage, options: &CompressionOptions) -> Result<EncodedImage> {
    let (original_width, original_height) = img.dimensions();
    let plan = plan_with_bound(original_width, original_height, options.max_dimension);
    let img = resize_to_plan(img, &plan);
    let (width, height) = img.dimensions();
    let bytes = encode_jpeg(name, &img, options.quality)?;

    Ok(EncodedImage {
        bytes,
        width,
        height,
        original_width,
        original_height,
    })
}

fn worker_failed(name: &str, err: tokio::task::JoinError) -> CompressionError {
    CompressionError::Encode {
        name: name.to_string(),
        reason: format!("worker failed: {}", err),
    }
}

/// Compresses one candidate: read, decode, plan, render, encode. Codec work
/// runs on the blocking pool so sibling files keep making progress. The
/// artifact's reference is registered in `store` only on success.
#[tracing::instrument(skip_all, fields(name = file.name(), index = index))]
pub async fn compress(
    file: &CandidateFile,
    index: usize,
    options: &CompressionOptions,
    store: &ReferenceStore,
) -> Result<CompressedArtifact> {
    let name = file.name().to_string();

    let bytes = file.read_bytes().await.map_err(|e| CompressionError::Read {
        name: name.clone(),
        reason: e.to_string(),
    })?;
    tracing::debug!(bytes = bytes.len(), "read");

    let decode_name = name.clone();
    let img = tokio::task::spawn_blocking(move || decode_image(&decode_name, &bytes))
        .await
        .map_err(|e| CompressionError::Decode {
            name: name.clone(),
            reason: format!("worker failed: {}", e),
        })??;
    tracing::debug!(dimensions = ?img.dimensions(), "decoded");

    let encode_name = name.clone();
    let options = *options;
    let encoded = tokio::task::spawn_blocking(move || render_and_encode(&encode_name, img, &options))
        .await
        .map_err(|e| worker_failed(&name, e))??;

    let bytes: Arc<[u8]> = Arc::from(encoded.bytes);
    let reference = store.create(Arc::clone(&bytes));
    tracing::debug!(size = bytes.len(), %reference, "encoded");

    Ok(CompressedArtifact {
        index,
        original_name: name.clone(),
        name: compressed_name(&name),
        reference,
        byte_size: bytes.len() as u64,
        bytes,
        original_byte_size: file.size(),
        width: encoded.width,
        height: encoded.height,
        original_width: encoded.original_width,
        original_height: encoded.original_height,
    })
}
