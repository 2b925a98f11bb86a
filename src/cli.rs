use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "batch-squeeze",
    about = "Compress a batch of images to JPEG and bundle the results",
    long_about = "batch-squeeze validates a selection of up to 20 images (5MB each at most), \
                  compresses every file to JPEG at one quality setting, downscales anything \
                  larger than 2000px on its longer side, and writes the results individually \
                  or as a single compressed_images.zip.",
    version,
    after_help = "EXAMPLES:\n  \
    batch-squeeze compress photo.png scan.webp -o ./out -q 75\n  \
    batch-squeeze compress ./images -r -o ./out --zip\n  \
    batch-squeeze compress \"./shots/*.png\" -o ./out --zip-only\n  \
    batch-squeeze info photo.png"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short = 'Q', long, global = true, help = "Only print errors")]
    pub quiet: bool,

    #[arg(short = 'v', long, global = true, help = "Print debug diagnostics")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Compress a selection of images",
        long_about = "Validate the given files, directories or glob patterns, compress every \
                      accepted image and write the results to the output directory."
    )]
    Compress {
        #[arg(
            required = true,
            help = "Image files, directories or glob patterns",
            long_help = "Explicit files are always offered to the validator. Directories and \
                         globs contribute only files whose extension looks like an image."
        )]
        inputs: Vec<String>,

        #[arg(short = 'o', long, default_value = ".", help = "Output directory")]
        output: PathBuf,

        #[arg(
            short = 'q',
            long,
            help = "JPEG quality (1-100, default: 80)",
            long_help = "Quality used for every file in the batch, from 1 (smallest) to 100 (best)."
        )]
        quality: Option<u8>,

        #[arg(short = 'r', long, help = "Descend into subdirectories")]
        recursive: bool,

        #[arg(short = 'z', long, help = "Also write compressed_images.zip")]
        zip: bool,

        #[arg(long, conflicts_with = "zip", help = "Write only compressed_images.zip")]
        zip_only: bool,

        #[arg(
            long,
            help = "Delay between file starts in milliseconds (default: 100)",
            long_help = "Each file starts this many milliseconds after the previous one."
        )]
        stagger_ms: Option<u64>,
    },

    #[command(
        about = "Show dimensions, size and resize plan for one image",
        long_about = "Decode one image and report what compress would do with it."
    )]
    Info {
        #[arg(help = "Image file path to analyze")]
        input: PathBuf,
    },
}
