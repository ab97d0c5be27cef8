use std::path::PathBuf;

use clap::Subcommand;
use presenter_timer_core::{NamedPalette, SettingsStore};

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Get a settings value
    Get {
        /// Settings key (e.g. "timer_color", "red_alert_threshold")
        key: String,
    },
    /// Set a settings value and save
    Set {
        /// Settings key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings as JSON
    List,
    /// Reset settings to defaults
    Reset,
    /// Write the current settings to a file
    Export {
        path: PathBuf,
    },
    /// Replace the current settings with a file's contents
    Import {
        path: PathBuf,
    },
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SettingsStore::open()?;
    match action {
        SettingsAction::Get { key } => {
            let settings = store.load()?;
            let Some(value) = settings.get(&key) else {
                return Err(format!("unknown settings key: {key}").into());
            };
            println!("{value}");
        }
        SettingsAction::Set { key, value } => {
            let value = palette_value(&key, value)?;
            let mut settings = store.load()?;
            settings.set(&key, &value)?;
            store.save(&settings)?;
            if settings.thresholds_inverted() {
                eprintln!("warning: red threshold is above yellow threshold");
            }
            println!("ok");
        }
        SettingsAction::List => {
            let settings = store.load()?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsAction::Reset => {
            store.reset()?;
            println!("settings reset to defaults");
        }
        SettingsAction::Export { path } => {
            store.export_to(&path)?;
            println!("settings exported to {}", path.display());
        }
        SettingsAction::Import { path } => {
            let settings = store.import_from(&path)?;
            if settings.thresholds_inverted() {
                eprintln!("warning: red threshold is above yellow threshold");
            }
            println!("settings imported from {}", path.display());
        }
    }
    Ok(())
}

/// Colour keys only take palette names, stored in the palette's spelling.
fn palette_value(key: &str, value: String) -> Result<String, String> {
    if !key.ends_with("_color") {
        return Ok(value);
    }
    match NamedPalette::canonical(&value) {
        Some(color) => Ok(color.to_string()),
        None => Err(format!(
            "unknown colour {value:?} for {key}; expected one of: {}",
            NamedPalette::names().collect::<Vec<_>>().join(", ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colour_keys_are_checked_against_the_palette() {
        assert_eq!(palette_value("timer_color", "green".into()).unwrap(), "Green");
        assert_eq!(
            palette_value("background_color", "DARKBLUE".into()).unwrap(),
            "DarkBlue"
        );
        let err = palette_value("message_color", "Chartreuse".into()).unwrap_err();
        assert!(err.contains("expected one of: White"), "got {err}");
        assert_eq!(
            palette_value("red_alert_threshold", "15".into()).unwrap(),
            "15"
        );
    }
}
