//! Background image validation and last-image persistence.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{data_dir, IMAGE_PATH_FILE};
use crate::error::{ImageError, Result};

pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Check that `path` names an existing image of a supported type within
/// `max_bytes`.
pub fn validate_image(path: &Path, max_bytes: u64) -> Result<PathBuf, ImageError> {
    let supported = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(e)))
        .unwrap_or(false);
    if !supported {
        return Err(ImageError::UnsupportedType {
            path: path.to_path_buf(),
        });
    }

    let metadata = fs::metadata(path).map_err(|_| ImageError::NotFound(path.to_path_buf()))?;
    if !metadata.is_file() {
        return Err(ImageError::NotFound(path.to_path_buf()));
    }
    if metadata.len() > max_bytes {
        return Err(ImageError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit_mb: max_bytes / 1024 / 1024,
        });
    }
    Ok(path.to_path_buf())
}

/// Remembers the last accepted background image as a JSON string file.
#[derive(Debug, Clone)]
pub struct ImageStore {
    path: PathBuf,
}

impl ImageStore {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(IMAGE_PATH_FILE),
        }
    }

    pub fn open() -> Result<Self> {
        Ok(Self::in_dir(data_dir()?))
    }

    /// Validate `candidate` and, if accepted, persist it as the last image.
    pub fn accept(&self, candidate: impl AsRef<Path>, max_bytes: u64) -> Result<PathBuf> {
        let accepted = validate_image(candidate.as_ref(), max_bytes)?;
        self.save(&accepted)?;
        info!(path = %accepted.display(), "background image accepted");
        Ok(accepted)
    }

    /// The last saved image path, if the file still exists.
    pub fn load(&self) -> Option<PathBuf> {
        let content = fs::read_to_string(&self.path).ok()?;
        let saved: String = match serde_json::from_str(&content) {
            Ok(saved) => saved,
            Err(e) => {
                warn!(error = %e, "error loading saved image path");
                return None;
            }
        };
        let saved = PathBuf::from(saved);
        (!saved.as_os_str().is_empty() && saved.exists()).then_some(saved)
    }

    pub fn save(&self, image: &Path) -> Result<()> {
        let json = serde_json::to_string(&image.to_string_lossy())?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        fs::write(&self.path, "\"\"")?;
        Ok(())
    }
}
