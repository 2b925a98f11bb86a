use batch_squeeze::{
    format_file_size, CandidateFile, RecordingSink, SessionConfig, SessionEvent, Session,
};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::new_rgb8(width, height)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[tokio::main]
async fn main() {
    let sink = RecordingSink::new();
    let config = SessionConfig::default()
        .with_stagger(Duration::from_millis(20))
        .with_hide_delay(Duration::from_millis(50));
    let session = Session::new(config, Arc::new(sink.clone()));

    let report = session.add_files(vec![
        CandidateFile::from_bytes("small.png", png(320, 200), "image/png", 1),
        CandidateFile::from_bytes("wide.png", png(2600, 400), "image/png", 2),
        CandidateFile::from_bytes("notes.txt", b"hello".to_vec(), "text/plain", 3),
        CandidateFile::from_bytes("broken.png", b"not a png".to_vec(), "image/png", 4),
    ]);
    println!("accepted {} rejected {}", report.accepted.len(), report.rejections.len());

    let summary = session.run_batch(70).await.unwrap();
    println!(
        "compressed {}/{} ({} -> {})",
        summary.succeeded,
        summary.total,
        format_file_size(summary.original_bytes),
        format_file_size(summary.compressed_bytes)
    );
    for artifact in session.artifacts() {
        println!(
            "  [{}] {} {}x{} -> {}x{} {}",
            artifact.index,
            artifact.name,
            artifact.original_width,
            artifact.original_height,
            artifact.width,
            artifact.height,
            artifact.reference
        );
    }

    if let Some(bundle) = session.download_all().await.unwrap() {
        println!("{} {:?}", bundle.name, bundle.entries);
    }

    for event in sink.events() {
        match event {
            SessionEvent::Progress(p) => println!("progress {}", p),
            other => println!("{:?}", other),
        }
    }
}
