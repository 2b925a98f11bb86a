use crate::candidate::CandidateFile;
use crate::constants::{IMAGE_MIME_PREFIX, MAX_FILE_SIZE};
use crate::error::{CompressionError, Result};
use crate::planner::{plan, CompressionPlan};
use crate::processing::{compressed_name, decode_image};
use crate::utils::format_file_size;
use image::GenericImageView;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub width: u32,
    pub height: u32,
    pub plan: CompressionPlan,
}

impl ImageInfo {
    pub fn accepted_by_validator(&self) -> bool {
        self.mime_type.starts_with(IMAGE_MIME_PREFIX) && self.size <= MAX_FILE_SIZE
    }
}

pub fn get_image_info(input_path: &Path) -> Result<ImageInfo> {
    if !input_path.exists() {
        return Err(CompressionError::FileNotFound(input_path.to_path_buf()));
    }

    let candidate = CandidateFile::from_path(input_path)?;
    let bytes = fs::read(input_path)?;
    let img = decode_image(candidate.name(), &bytes)?;
    let (width, height) = img.dimensions();

    Ok(ImageInfo {
        name: candidate.name().to_string(),
        mime_type: candidate.mime_type().to_string(),
        size: candidate.size(),
        width,
        height,
        plan: plan(width, height),
    })
}

pub fn print_image_info(info: &ImageInfo) {
    let (target_width, target_height) = info.plan.pixel_size();

    println!("📋 {}", info.name);
    println!("  🎭 Type: {}", info.mime_type);
    println!("  📦 Size: {} ({} bytes)", format_file_size(info.size), info.size);
    println!("  📏 Dimensions: {}x{} pixels", info.width, info.height);
    if info.plan.is_downscale_of(info.width, info.height) {
        println!("  🔄 Will be resized to {}x{}", target_width, target_height);
    } else {
        println!("  ✅ Within size bound, no resize");
    }
    println!("  💾 Output name: {}", compressed_name(&info.name));
    if !info.accepted_by_validator() {
        println!("  ⚠️  Would be rejected (non-image or over 5MB)");
    }
}
