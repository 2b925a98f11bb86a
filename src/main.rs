use anyhow::{bail, Context, Result};
use batch_squeeze::cli::{Args, Commands};
use batch_squeeze::constants::DEFAULT_QUALITY;
use batch_squeeze::{
    collect_candidate_paths, describe_artifact, format_file_size, get_image_info, logger,
    print_image_info, save_artifacts, save_bundle, CandidateFile, IndicatifSink, Session,
    SessionConfig,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose);

    match args.command {
        Commands::Compress {
            inputs,
            output,
            quality,
            recursive,
            zip,
            zip_only,
            stagger_ms,
        } => {
            let mut config = SessionConfig::default();
            if let Some(ms) = stagger_ms {
                config = config.with_stagger(Duration::from_millis(ms));
            }
            let quality = quality.unwrap_or(DEFAULT_QUALITY);
            run_compress(&inputs, &output, quality, recursive, zip || zip_only, !zip_only, config)
                .await?;
        }
        Commands::Info { input } => {
            let info = get_image_info(&input)
                .with_context(|| format!("Failed to inspect {}", input.display()))?;
            print_image_info(&info);
        }
    }

    Ok(())
}

fn load_candidates(paths: &[PathBuf]) -> Vec<CandidateFile> {
    paths
        .iter()
        .filter_map(|path| match CandidateFile::from_path(path) {
            Ok(candidate) => Some(candidate),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
                None
            }
        })
        .collect()
}

async fn run_compress(
    inputs: &[String],
    output: &Path,
    quality: u8,
    recursive: bool,
    write_zip: bool,
    write_files: bool,
    config: SessionConfig,
) -> Result<()> {
    let quiet = logger::is_quiet();
    let start = Instant::now();

    let paths = collect_candidate_paths(inputs, recursive).context("Failed to collect input files")?;
    if paths.is_empty() {
        if !quiet {
            println!("⚠️  No image files found in the input path");
        }
        return Ok(());
    }

    let session = Session::new(config, Arc::new(IndicatifSink::new(quiet)));
    let report = session.add_files(load_candidates(&paths));
    if report.accepted.is_empty() {
        bail!("No valid images to compress");
    }
    if !quiet {
        println!(
            "🚀 Compressing {} file(s) at quality {}",
            session.batch_len(),
            quality
        );
    }

    let summary = session.run_batch(quality).await?;

    if write_files {
        let artifacts = session.artifacts();
        let paths = save_artifacts(output, &artifacts).context("Failed to write compressed files")?;
        if !quiet {
            for (artifact, path) in artifacts.iter().zip(&paths) {
                println!("  💾 {} -> {}", describe_artifact(artifact), path.display());
            }
        }
    }

    if write_zip {
        // Archive failures are already on the message board; the per-file
        // results above stay valid.
        if let Ok(Some(bundle)) = session.download_all().await {
            let path = save_bundle(output, &bundle).context("Failed to write archive")?;
            if !quiet {
                println!("  📦 {} ({})", path.display(), format_file_size(bundle.bytes.len() as u64));
            }
        }
    }

    if !quiet {
        println!("\n📊 Batch Summary:");
        println!("  📁 Files: {}/{} compressed", summary.succeeded, summary.total);
        println!(
            "  📊 Total size: {} -> {}",
            format_file_size(summary.original_bytes),
            format_file_size(summary.compressed_bytes)
        );
        println!("  ⏱️  Time: {:.2?}", start.elapsed());
        if !summary.failures.is_empty() {
            println!("  ⚠️  Failed files: {}", summary.failures.len());
        }
    }

    if summary.succeeded == 0 {
        bail!("No images could be compressed");
    }
    Ok(())
}
