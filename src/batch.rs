//! Batch driver: discover inputs, split each one under every policy, write outputs.
//!
//! Images are independent. The default run is sequential and prints one
//! progress line per image in sorted order; the parallel run processes images
//! on the rayon pool and reports them in the same order once all are done.
//! Any failing image aborts the whole batch.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::input::{discover_images, load_image};
use crate::output::{ensure_dir, image_output_dir, write_output_set};
use crate::{OutputConfig, Partitioner, Policy, SplitConfig, SplitError};

const DEFAULT_INPUT_DIR: &str = "candidates";
const DEFAULT_OUTPUT_ROOT: &str = "split_banners";

/// Settings for one batch run.
///
/// # Example
/// ```
/// use std::path::Path;
/// use trisplit::batch::BatchConfig;
///
/// let config = BatchConfig::default();
/// assert_eq!(config.input_dir, Path::new("candidates"));
/// assert_eq!(config.output_root, Path::new("split_banners"));
/// assert!(!config.enable_parallel);
/// ```
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_root: PathBuf,
    pub split: SplitConfig,
    pub output: OutputConfig,
    /// Process images on the rayon pool (default: false)
    pub enable_parallel: bool,
    /// Also write a `preview.png` with crop boxes drawn per policy (default: false)
    pub preview: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            split: SplitConfig::default(),
            output: OutputConfig::default(),
            enable_parallel: false,
            preview: false,
        }
    }
}

/// How a batch run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The input directory does not exist.
    MissingInput,
    /// The input directory holds no supported images.
    NoImages,
    /// Every discovered image was processed.
    Completed { processed: usize },
}

/// Result of splitting one source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReport {
    pub source: PathBuf,
    /// `{output_root}/{stem}`
    pub output_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Runs a batch, printing progress to stdout.
///
/// A missing or empty input directory is reported and returned as an
/// outcome, not an error.
pub fn run(config: &BatchConfig) -> Result<BatchOutcome, SplitError> {
    ensure_dir(&config.output_root)?;

    if !config.input_dir.exists() {
        println!(
            "Error: '{}' folder not found!",
            config.input_dir.display()
        );
        return Ok(BatchOutcome::MissingInput);
    }

    let images = discover_images(&config.input_dir)?;
    if images.is_empty() {
        println!("No images found in '{}' folder.", config.input_dir.display());
        return Ok(BatchOutcome::NoImages);
    }

    println!("Found {} image(s). Starting processing...\n", images.len());
    info!(count = images.len(), parallel = config.enable_parallel, "Starting batch");
    if config.preview && !cfg!(feature = "drawing") {
        warn!("Previews requested but the `drawing` feature is disabled; none will be written");
    }

    let partitioner = Partitioner::new(config.split.clone());
    if config.enable_parallel {
        let reports = images
            .par_iter()
            .map(|path| process_image(path, &partitioner, config))
            .collect::<Result<Vec<_>, _>>()?;
        for report in &reports {
            print_start(&report.source);
            print_done(report);
        }
    } else {
        for path in &images {
            print_start(path);
            let report = process_image(path, &partitioner, config)?;
            print_done(&report);
        }
    }

    println!("All images processed! Check the '{}' folder.", config.output_root.display());
    for policy in Policy::ALL {
        println!("   • {:<12} → {}", policy.name(), policy_summary(policy, &config.split));
    }

    Ok(BatchOutcome::Completed {
        processed: images.len(),
    })
}

/// Decodes one image and writes every policy's output set.
pub fn process_image(
    path: &Path,
    partitioner: &Partitioner,
    config: &BatchConfig,
) -> Result<ImageReport, SplitError> {
    let image = load_image(path)?;
    let output_dir = image_output_dir(&config.output_root, path);
    let mut files = Vec::new();

    for policy in Policy::ALL {
        let plan = partitioner.plan(&image, policy)?;
        let set = partitioner.render(&image, &plan);
        let policy_dir = output_dir.join(policy.name());
        files.extend(write_output_set(&set, &policy_dir, &config.output)?);

        #[cfg(feature = "drawing")]
        write_preview(&image, &plan, &policy_dir, config, &mut files)?;
    }

    debug!(source = %path.display(), files = files.len(), "Processed image");
    Ok(ImageReport {
        source: path.to_path_buf(),
        output_dir,
        files,
    })
}

#[cfg(feature = "drawing")]
fn write_preview(
    image: &image::DynamicImage,
    plan: &crate::Plan,
    policy_dir: &Path,
    config: &BatchConfig,
    files: &mut Vec<PathBuf>,
) -> Result<(), SplitError> {
    if !config.preview {
        return Ok(());
    }
    let preview = policy_dir.join("preview.png");
    crate::debug::save_image_with_plan(
        image,
        plan,
        &preview,
        &crate::drawing::LayoutDrawingConfig::default(),
    )?;
    files.push(preview);
    Ok(())
}

fn print_start(path: &Path) {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    println!("→ {name}");
}

fn print_done(report: &ImageReport) {
    let name = report
        .output_dir
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    println!("   Done → {name}/\n");
}

fn policy_summary(policy: Policy, split: &SplitConfig) -> String {
    match policy {
        Policy::FreeSplit => "raw cuts".to_string(),
        Policy::Grid3x4 => format!("{}×{}", split.target_width, split.target_height),
        Policy::Square => "squares".to_string(),
    }
}
