use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut out, format).unwrap();
    out.into_inner()
}

/// Writes real PNG/JPEG images plus a text file into `dir`.
pub fn create_test_image_files(dir: &Path) -> Vec<PathBuf> {
    let png = dir.join("photo.png");
    let jpg = dir.join("holiday.jpg");
    let txt = dir.join("notes.txt");

    std::fs::write(&png, image_bytes(64, 48, ImageFormat::Png)).unwrap();
    std::fs::write(&jpg, image_bytes(48, 64, ImageFormat::Jpeg)).unwrap();
    File::create(&txt)
        .unwrap()
        .write_all(b"not an image")
        .unwrap();

    vec![png, jpg, txt]
}

pub fn create_fake_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    File::create(&path)
        .unwrap()
        .write_all(b"fake image data")
        .unwrap();
    path
}

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}
