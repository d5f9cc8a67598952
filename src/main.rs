use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use trisplit::batch::{self, BatchConfig};
use trisplit::{OutputConfig, OutputFormat, SplitConfig};

/// Split horizontal images into three carousel panels.
///
/// With no arguments, reads `candidates/` and writes `split_banners/`.
#[derive(Parser, Debug)]
#[command(name = "trisplit", version, about)]
struct Args {
    /// Directory containing the source images
    #[arg(long, default_value = "candidates")]
    input: PathBuf,

    /// Root directory for the generated panels
    #[arg(long, default_value = "split_banners")]
    output: PathBuf,

    /// Output encoding
    #[arg(long, value_enum, default_value_t = OutputFormat::Jpeg)]
    format: OutputFormat,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = 95)]
    quality: u8,

    /// Width of the grid panels
    #[arg(long, default_value_t = 1080)]
    target_width: u32,

    /// Height of the grid panels
    #[arg(long, default_value_t = 1440)]
    target_height: u32,

    /// Process images in parallel
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Write a preview.png with the crop boxes drawn for every policy (needs the `drawing` feature)
    #[arg(long, default_value_t = false)]
    preview: bool,
}

impl From<Args> for BatchConfig {
    fn from(args: Args) -> Self {
        BatchConfig {
            input_dir: args.input,
            output_root: args.output,
            split: SplitConfig::new(args.target_width, args.target_height),
            output: OutputConfig::new(args.format, args.quality),
            enable_parallel: args.parallel,
            preview: args.preview,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = BatchConfig::from(Args::parse());
    batch::run(&config).context("Failed to split images")?;

    Ok(())
}
