//! Discovery and decoding of source images.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::SplitError;

/// File extensions accepted as input, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 8] =
    ["jpg", "jpeg", "png", "webp", "bmp", "tiff", "gif", "heic"];

/// Returns `true` if `path` has one of the [`SUPPORTED_EXTENSIONS`].
///
/// # Example
/// ```
/// use std::path::Path;
/// use trisplit::input::has_supported_extension;
///
/// assert!(has_supported_extension(Path::new("banner.JPG")));
/// assert!(!has_supported_extension(Path::new("notes.txt")));
/// assert!(!has_supported_extension(Path::new("jpg")));
/// ```
pub fn has_supported_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    SUPPORTED_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
}

/// Lists the supported image files directly inside `dir`.
///
/// Subdirectories are not descended into. The result is sorted by
/// case-insensitive file name.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>, SplitError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|source| SplitError::Traversal {
            path: dir.to_path_buf(),
            message: source.to_string(),
        })?;

        if entry.file_type().is_file() && has_supported_extension(entry.path()) {
            trace!(path = %entry.path().display(), "Found input image");
            files.push(entry.into_path());
        }
    }

    files.sort_by_cached_key(|path| sort_key(path));
    debug!(count = files.len(), dir = %dir.display(), "Discovered input images");
    Ok(files)
}

fn sort_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Decodes the image at `path`.
///
/// The format is sniffed from the file contents; the extension is only a
/// fallback when the signature is not recognized.
pub fn load_image(path: &Path) -> Result<DynamicImage, SplitError> {
    let io_error = |source| SplitError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = ImageReader::open(path)
        .map_err(io_error)?
        .with_guessed_format()
        .map_err(io_error)?;
    trace!(path = %path.display(), format = ?reader.format(), "Decoding image");
    reader.decode().map_err(|source| SplitError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
