//! File-backed collaborators: settings, message list, background image path,
//! and the shell's TOML configuration.
//!
//! None of these are touched by the countdown core; the shell loads a
//! snapshot, hands it to the [`Presenter`](crate::Presenter), and saves it
//! back when the user changes something.

mod config;
pub mod image;
pub mod messages;
pub mod settings_store;

pub use config::ShellConfig;
pub use image::ImageStore;
pub use messages::{MessageStore, DEFAULT_MESSAGES};
pub use settings_store::SettingsStore;

use std::path::PathBuf;

pub const SETTINGS_FILE: &str = "settings.json";
pub const SETTINGS_BACKUP_FILE: &str = "settings.bak";
pub const MESSAGES_FILE: &str = "messages.json";
pub const IMAGE_PATH_FILE: &str = "image_path.json";
pub const CONFIG_FILE: &str = "config.toml";
pub const ERROR_LOG_FILE: &str = "errors.log";

/// Returns `~/.config/presenter-timer[-dev]/` based on PRESENTER_TIMER_ENV.
///
/// Set PRESENTER_TIMER_ENV=dev to use development data directory, or
/// PRESENTER_TIMER_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("PRESENTER_TIMER_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("PRESENTER_TIMER_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("presenter-timer-dev")
            } else {
                base_dir.join("presenter-timer")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
