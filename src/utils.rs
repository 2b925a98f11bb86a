//! Utility functions shared by the CLI and the session front ends.
use crate::archive::{unique_name, Bundle};
use crate::error::{CompressionError, Result};
use crate::processing::CompressedArtifact;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Human-readable size: `512 bytes`, `1.5 KB`, `2.0 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Size reduction as a percentage; negative when the output grew.
pub fn calculate_compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - compressed_size as f64) / original_size as f64) * 100.0
}

/// One-line original vs. compressed comparison for an artifact.
pub fn describe_artifact(artifact: &CompressedArtifact) -> String {
    format!(
        "{}: {} {}x{} -> {} {}x{} ({:.1}%)",
        artifact.original_name,
        format_file_size(artifact.original_byte_size),
        artifact.original_width,
        artifact.original_height,
        format_file_size(artifact.byte_size),
        artifact.width,
        artifact.height,
        calculate_compression_ratio(artifact.original_byte_size, artifact.byte_size)
    )
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|_| CompressionError::DirectoryCreationFailed(dir.to_path_buf()))
}

/// Writes every artifact into `dir` under its derived name. Names that
/// collide within the set get the same numeric suffix as archive entries.
pub fn save_artifacts(dir: &Path, artifacts: &[CompressedArtifact]) -> Result<Vec<PathBuf>> {
    ensure_dir(dir)?;
    let mut used = HashSet::new();

    artifacts
        .iter()
        .map(|artifact| {
            let path = dir.join(unique_name(&artifact.name, &mut used));
            fs::write(&path, &artifact.bytes)?;
            Ok(path)
        })
        .collect()
}

pub fn save_bundle(dir: &Path, bundle: &Bundle) -> Result<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(&bundle.name);
    fs::write(&path, &bundle.bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::references::ReferenceStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn artifact() -> CompressedArtifact {
        let bytes: Arc<[u8]> = Arc::from(vec![7u8; 300]);
        CompressedArtifact {
            index: 0,
            original_name: "photo.png".to_string(),
            name: "compressed_photo.jpg".to_string(),
            reference: ReferenceStore::new().create(Arc::clone(&bytes)),
            bytes,
            byte_size: 300,
            original_byte_size: 1200,
            width: 2000,
            height: 1000,
            original_width: 4000,
            original_height: 2000,
        }
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 bytes");
        assert_eq!(format_file_size(1023), "1023 bytes");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_calculate_compression_ratio() {
        assert_eq!(calculate_compression_ratio(1000, 800), 20.0);
        assert_eq!(calculate_compression_ratio(1000, 1200), -20.0);
        assert_eq!(calculate_compression_ratio(0, 500), 0.0);
    }

    #[test]
    fn test_describe_artifact() {
        assert_eq!(
            describe_artifact(&artifact()),
            "photo.png: 1.2 KB 4000x2000 -> 300 bytes 2000x1000 (75.0%)"
        );
    }

    #[test]
    fn test_save_artifacts_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("nested/out");

        let paths = save_artifacts(&out, &[artifact()]).unwrap();

        assert_eq!(paths, vec![out.join("compressed_photo.jpg")]);
        assert_eq!(fs::read(&paths[0]).unwrap(), vec![7u8; 300]);
    }

    #[test]
    fn test_save_artifacts_keeps_colliding_names_apart() {
        let temp_dir = TempDir::new().unwrap();
        let mut webp = artifact();
        webp.original_name = "photo.webp".to_string();
        webp.bytes = Arc::from(vec![9u8; 10]);

        let paths = save_artifacts(temp_dir.path(), &[artifact(), webp]).unwrap();

        assert_eq!(
            paths,
            vec![
                temp_dir.path().join("compressed_photo.jpg"),
                temp_dir.path().join("compressed_photo_2.jpg"),
            ]
        );
        assert_eq!(fs::read(&paths[0]).unwrap(), vec![7u8; 300]);
        assert_eq!(fs::read(&paths[1]).unwrap(), vec![9u8; 10]);
    }
}
