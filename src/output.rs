//! Encoding of rendered panels into the output tree.
//!
//! Layout: `{output_root}/{input_stem}/{policy}/{original,1,2,3}.{ext}`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tracing::{debug, trace};

use crate::partition::OutputSet;
use crate::SplitError;

const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Encoding used for every written file, regardless of source format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Jpeg,
    /// Lossless output.
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// Output encoding settings.
///
/// # Example
/// ```
/// use trisplit::{OutputConfig, OutputFormat};
///
/// let config = OutputConfig::default();
/// assert_eq!(config.format, OutputFormat::Jpeg);
/// assert_eq!(config.jpeg_quality, 95);
/// ```
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// JPEG quality, 1-100 (default: 95)
    pub jpeg_quality: u8,
}

impl OutputConfig {
    pub fn new(format: OutputFormat, jpeg_quality: u8) -> Self {
        Self {
            format,
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    /// File name for an output named `stem`, e.g. `original.jpg`.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.format.extension())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig::new(OutputFormat::Jpeg, DEFAULT_JPEG_QUALITY)
    }
}

/// Directory receiving the outputs of one source image: `{output_root}/{stem}`.
pub fn image_output_dir(output_root: &Path, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_root.join(stem)
}

/// Creates `dir` and any missing parents.
pub fn ensure_dir(dir: &Path) -> Result<(), SplitError> {
    fs::create_dir_all(dir).map_err(|source| SplitError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

/// Writes `original` and panels `1`..`3` of `set` into `dir`.
///
/// Returns the written paths in that order.
pub fn write_output_set(
    set: &OutputSet<'_>,
    dir: &Path,
    config: &OutputConfig,
) -> Result<Vec<PathBuf>, SplitError> {
    ensure_dir(dir)?;
    let mut written = Vec::with_capacity(set.panels.len() + 1);

    let path = dir.join(config.file_name("original"));
    write_image(set.original, &path, config)?;
    written.push(path);

    for (index, panel) in set.panels.iter().enumerate() {
        let path = dir.join(config.file_name(&(index + 1).to_string()));
        write_image(panel, &path, config)?;
        written.push(path);
    }

    debug!(policy = set.policy.name(), dir = %dir.display(), "Wrote output set");
    Ok(written)
}

/// Encodes a single image to `path`.
///
/// JPEG carries no alpha, so JPEG output is composited onto white first.
pub fn write_image(
    image: &DynamicImage,
    path: &Path,
    config: &OutputConfig,
) -> Result<(), SplitError> {
    trace!(path = %path.display(), format = ?config.format, "Encoding image");
    match config.format {
        OutputFormat::Jpeg => write_jpeg(image, path, config.jpeg_quality),
        OutputFormat::Png => image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| encode_error(path, source)),
    }
}

fn write_jpeg(image: &DynamicImage, path: &Path, quality: u8) -> Result<(), SplitError> {
    let io_error = |source| SplitError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    flatten_onto_white(image)
        .write_with_encoder(encoder)
        .map_err(|source| encode_error(path, source))?;
    writer.flush().map_err(io_error)
}

/// Blends any alpha channel over an opaque white background.
fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

fn encode_error(path: &Path, source: image::ImageError) -> SplitError {
    SplitError::Encode {
        path: path.to_path_buf(),
        source,
    }
}
