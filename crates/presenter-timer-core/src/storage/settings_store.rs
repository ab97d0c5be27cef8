//! JSON settings persistence with a single-generation backup.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{data_dir, SETTINGS_BACKUP_FILE, SETTINGS_FILE};
use crate::error::{Result, SettingsError};
use crate::settings::AppSettings;

/// Reads and writes `settings.json`, copying the previous file to
/// `settings.bak` before every save.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    backup_path: PathBuf,
}

impl SettingsStore {
    /// Store rooted in `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            path: dir.join(SETTINGS_FILE),
            backup_path: dir.join(SETTINGS_BACKUP_FILE),
        }
    }

    /// Store in the default data directory.
    pub fn open() -> Result<Self> {
        Ok(Self::in_dir(data_dir()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Load from disk, or defaults when the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<AppSettings> {
        Ok(read_settings(&self.path)?.unwrap_or_default())
    }

    /// Load from disk, returning defaults on any error.
    /// This is a convenience method that never fails.
    pub fn load_or_default(&self) -> AppSettings {
        self.load().unwrap_or_else(|e| {
            warn!(error = %e, "error loading settings; using defaults");
            AppSettings::default()
        })
    }

    /// Persist to disk after backing up the current file.
    ///
    /// # Errors
    /// Returns an error if the backup copy or the write fails. A failed
    /// backup aborts the save so the previous generation is never lost.
    pub fn save(&self, settings: &AppSettings) -> Result<()> {
        self.backup()?;
        write_settings(&self.path, settings)?;
        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    /// Copy the current settings file over the backup, if it exists.
    pub fn backup(&self) -> Result<()> {
        if self.path.exists() {
            fs::copy(&self.path, &self.backup_path).map_err(|e| SettingsError::BackupFailed {
                path: self.backup_path.clone(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Load the backup generation, if any.
    pub fn load_backup(&self) -> Result<Option<AppSettings>> {
        read_settings(&self.backup_path)
    }

    /// Write the current settings to an arbitrary file.
    pub fn export_to(&self, target: impl AsRef<Path>) -> Result<()> {
        let settings = self.load()?;
        write_settings(target.as_ref(), &settings)
    }

    /// Replace the current settings with the contents of `source`.
    pub fn import_from(&self, source: impl AsRef<Path>) -> Result<AppSettings> {
        let source = source.as_ref();
        let settings = read_settings(source)?.ok_or_else(|| SettingsError::LoadFailed {
            path: source.to_path_buf(),
            message: "file not found".into(),
        })?;
        self.save(&settings)?;
        Ok(settings)
    }

    /// Save and return the defaults.
    pub fn reset(&self) -> Result<AppSettings> {
        let settings = AppSettings::default();
        self.save(&settings)?;
        Ok(settings)
    }
}

fn read_settings(path: &Path) -> Result<Option<AppSettings>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(SettingsError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into())
        }
    };
    let settings = serde_json::from_str(&content).map_err(|e| SettingsError::LoadFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(Some(settings))
}

fn write_settings(path: &Path, settings: &AppSettings) -> Result<()> {
    let content = serde_json::to_string_pretty(settings)?;
    fs::write(path, content).map_err(|e| SettingsError::SaveFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(())
}
