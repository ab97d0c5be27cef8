use std::path::PathBuf;

use clap::Subcommand;
use presenter_timer_core::{ImageStore, SettingsStore};

#[derive(Subcommand, Debug)]
pub enum ImageAction {
    /// Validate an image and make it the background
    Set { path: PathBuf },
    /// Print the current background image
    Show,
    /// List recently used images, oldest first
    Recent,
    /// Forget the recent image list
    ClearRecent,
    /// Stop using a background image
    Clear,
}

pub fn run(action: ImageAction) -> Result<(), Box<dyn std::error::Error>> {
    let settings_store = SettingsStore::open()?;
    let image_store = ImageStore::open()?;
    match action {
        ImageAction::Set { path } => {
            let mut settings = settings_store.load()?;
            let accepted = image_store.accept(&path, settings.max_image_size_bytes)?;
            settings.remember_image(accepted.to_string_lossy());
            settings_store.save(&settings)?;
            println!("{}", accepted.display());
        }
        ImageAction::Show => match image_store.load() {
            Some(path) => println!("{}", path.display()),
            None => println!("no background image"),
        },
        ImageAction::Recent => {
            let settings = settings_store.load()?;
            for path in settings.recent_images.iter() {
                println!("{path}");
            }
        }
        ImageAction::ClearRecent => {
            let mut settings = settings_store.load()?;
            settings.recent_images.clear();
            settings_store.save(&settings)?;
            println!("recent images cleared");
        }
        ImageAction::Clear => {
            let mut settings = settings_store.load()?;
            settings.image_path.clear();
            settings_store.save(&settings)?;
            image_store.clear()?;
            println!("background image cleared");
        }
    }
    Ok(())
}
