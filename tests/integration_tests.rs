mod common;

use assert_cmd::Command;
use assert_fs::prelude::*;
use common::{create_fake_image, create_temp_directory, create_test_image_files, image_bytes};
use image::ImageFormat;
use predicates::prelude::*;
use std::io::Cursor;

fn cli() -> Command {
    Command::cargo_bin("batch-squeeze").unwrap()
}

#[test]
fn test_cli_help() {
    cli().arg("--help").assert().success();
}

#[test]
fn test_compress_help() {
    cli()
        .args(["compress", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--zip-only"));
}

#[test]
fn test_info_help() {
    cli().args(["info", "--help"]).assert().success();
}

#[test]
fn test_compress_missing_args() {
    cli().args(["compress"]).assert().failure();
}

#[test]
fn test_info_missing_args() {
    cli().args(["info"]).assert().failure();
}

#[test]
fn test_info_nonexistent_file() {
    cli().args(["info", "nonexistent.jpg"]).assert().failure();
}

#[test]
fn test_info_fake_image() {
    let temp_dir = create_temp_directory();
    let fake = create_fake_image(temp_dir.path(), "fake.jpg");

    cli().arg("info").arg(&fake).assert().failure();
}

#[test]
fn test_info_reports_resize_plan() {
    let temp = assert_fs::TempDir::new().unwrap();
    let wide = temp.child("wide.png");
    wide.write_binary(&image_bytes(4000, 20, ImageFormat::Png))
        .unwrap();

    cli()
        .arg("info")
        .arg(wide.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("4000x20"))
        .stdout(predicate::str::contains("2000x10"))
        .stdout(predicate::str::contains("compressed_wide.jpg"));
}

#[test]
fn test_compress_with_invalid_quality() {
    let temp_dir = create_temp_directory();
    create_test_image_files(temp_dir.path());

    cli()
        .arg("compress")
        .arg(temp_dir.path())
        .args(["-q", "0", "-Q"])
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .assert()
        .failure();
}

#[test]
fn test_compress_directory_writes_jpegs() {
    let temp_dir = create_temp_directory();
    create_test_image_files(temp_dir.path());
    let out = temp_dir.path().join("out");

    cli()
        .arg("compress")
        .arg(temp_dir.path())
        .args(["--stagger-ms", "0", "-Q"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let photo = std::fs::read(out.join("compressed_photo.jpg")).unwrap();
    let holiday = std::fs::read(out.join("compressed_holiday.jpg")).unwrap();
    assert_eq!(image::guess_format(&photo).unwrap(), ImageFormat::Jpeg);
    assert_eq!(image::guess_format(&holiday).unwrap(), ImageFormat::Jpeg);
    assert!(!out.join("compressed_notes.jpg").exists());
    assert!(!out.join("compressed_images.zip").exists());
}

#[test]
fn test_compress_zip_only_writes_archive() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("a.png")
        .write_binary(&image_bytes(32, 32, ImageFormat::Png))
        .unwrap();
    temp.child("b.png")
        .write_binary(&image_bytes(16, 24, ImageFormat::Png))
        .unwrap();
    let out = temp.child("out");

    cli()
        .arg("compress")
        .arg(temp.path())
        .args(["--zip-only", "--stagger-ms", "0", "-Q"])
        .arg("-o")
        .arg(out.path())
        .assert()
        .success();

    out.child("compressed_a.jpg").assert(predicate::path::missing());
    out.child("compressed_images.zip")
        .assert(predicate::path::exists());

    let bytes = std::fs::read(out.child("compressed_images.zip").path()).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    assert!(names.contains(&"compressed_images/compressed_a.jpg".to_string()));
    assert!(names.contains(&"compressed_images/compressed_b.jpg".to_string()));
    assert!(archive.by_name("compressed_images/compressed_a.jpg").is_ok());
}

#[test]
fn test_compress_zip_and_files() {
    let temp_dir = create_temp_directory();
    create_test_image_files(temp_dir.path());
    let out = temp_dir.path().join("out");

    cli()
        .arg("compress")
        .arg(temp_dir.path())
        .args(["--zip", "--stagger-ms", "0"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Batch Summary"));

    assert!(out.join("compressed_photo.jpg").exists());
    assert!(out.join("compressed_images.zip").exists());
}

#[test]
fn test_compress_keeps_colliding_outputs_apart() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("photo.png")
        .write_binary(&image_bytes(40, 30, ImageFormat::Png))
        .unwrap();
    temp.child("photo.jpg")
        .write_binary(&image_bytes(30, 40, ImageFormat::Jpeg))
        .unwrap();
    let out = temp.child("out");

    cli()
        .arg("compress")
        .arg(temp.child("photo.png").path())
        .arg(temp.child("photo.jpg").path())
        .args(["--stagger-ms", "0", "-Q"])
        .arg("-o")
        .arg(out.path())
        .assert()
        .success();

    let mut written: Vec<String> = std::fs::read_dir(out.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(written, vec!["compressed_photo.jpg", "compressed_photo_2.jpg"]);

    let load = |name: &str| {
        let bytes = std::fs::read(out.child(name).path()).unwrap();
        image::load_from_memory(&bytes).unwrap()
    };
    let first = load("compressed_photo.jpg");
    let second = load("compressed_photo_2.jpg");
    assert_eq!((first.width(), first.height()), (40, 30));
    assert_eq!((second.width(), second.height()), (30, 40));
}

#[test]
fn test_zip_conflicts_with_zip_only() {
    let temp_dir = create_temp_directory();
    create_test_image_files(temp_dir.path());

    cli()
        .arg("compress")
        .arg(temp_dir.path())
        .args(["--zip", "--zip-only"])
        .assert()
        .failure();
}

#[test]
fn test_compress_empty_directory() {
    let temp_dir = create_temp_directory();

    cli()
        .arg("compress")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No image files found"));
}

#[test]
fn test_compress_only_non_image_fails() {
    let temp_dir = create_temp_directory();
    let files = create_test_image_files(temp_dir.path());

    cli()
        .arg("compress")
        .arg(&files[2])
        .args(["-o"])
        .arg(temp_dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No valid images"));
}

#[test]
fn test_compress_fake_image_fails() {
    let temp_dir = create_temp_directory();
    let fake = create_fake_image(temp_dir.path(), "fake.png");

    cli()
        .arg("compress")
        .arg(&fake)
        .args(["--stagger-ms", "0"])
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No images could be compressed"));
}
