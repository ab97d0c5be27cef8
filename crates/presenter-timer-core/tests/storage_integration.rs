//! Integration tests for the file-backed collaborators.

use std::fs;

use presenter_timer_core::storage::{
    DEFAULT_MESSAGES, MESSAGES_FILE, SETTINGS_BACKUP_FILE, SETTINGS_FILE,
};
use presenter_timer_core::{
    AppSettings, ColorName, ImageError, ImageStore, MessageStore, SettingsStore,
};
use presenter_timer_core::storage::image::validate_image;
use proptest::prelude::*;
use tempfile::TempDir;

fn arb_settings() -> impl Strategy<Value = AppSettings> {
    (
        0f32..=100.0,
        20f32..=100.0,
        0u32..3600,
        0u32..3600,
        prop::collection::vec("[a-z]{1,6}\\.png", 0..15),
        any::<bool>(),
        prop::sample::select(vec!["White", "Yellow", "DarkBlue", "Gray"]),
    )
        .prop_map(|(timer, message, yellow, red, images, animations, color)| {
            let mut settings = AppSettings::default();
            settings.timer_font_size = timer;
            settings.message_font_size = message;
            settings.yellow_alert_threshold = yellow;
            settings.red_alert_threshold = red;
            settings.enable_animations = animations;
            settings.timer_color = ColorName::new(color);
            for image in images {
                settings.remember_image(format!("/slides/{image}"));
            }
            settings
        })
}

proptest! {
    #[test]
    fn settings_roundtrip_field_for_field(settings in arb_settings()) {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::in_dir(dir.path());
        store.save(&settings).unwrap();
        let loaded = store.load().unwrap();
        prop_assert!(loaded.recent_images.len() <= 10);
        prop_assert_eq!(loaded, settings);
    }
}

#[test]
fn empty_recent_list_roundtrips() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::in_dir(dir.path());
    let settings = AppSettings::default();
    assert!(settings.recent_images.is_empty());
    store.save(&settings).unwrap();
    assert_eq!(store.load().unwrap(), settings);
}

#[test]
fn duplicate_recent_images_collapse_on_load() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(SETTINGS_FILE),
        r#"{ "recent_images": ["/a.png", "/b.png", "/a.png"], "red_alert_threshold": -5 }"#,
    )
    .unwrap();
    let loaded = SettingsStore::in_dir(dir.path()).load().unwrap();
    assert_eq!(loaded.recent_images.len(), 2);
    assert_eq!(loaded.red_alert_threshold, 0);
    assert_eq!(loaded.yellow_alert_threshold, 300);
}

#[test]
fn save_keeps_exactly_one_backup_generation() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::in_dir(dir.path());

    let mut settings = AppSettings::default();
    for threshold in [10, 20, 30] {
        settings.red_alert_threshold = threshold;
        store.save(&settings).unwrap();
    }

    assert_eq!(store.load().unwrap().red_alert_threshold, 30);
    assert_eq!(store.load_backup().unwrap().unwrap().red_alert_threshold, 20);
}

#[test]
fn message_store_recovers_from_garbage() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(MESSAGES_FILE), "not json at all").unwrap();
    let store = MessageStore::in_dir(dir.path());
    assert_eq!(store.messages(), &DEFAULT_MESSAGES);

    // The defaults were written back.
    let on_disk = fs::read_to_string(dir.path().join(MESSAGES_FILE)).unwrap();
    let parsed: Vec<String> = serde_json::from_str(&on_disk).unwrap();
    assert_eq!(parsed, DEFAULT_MESSAGES);
}

#[test]
fn image_validation_enforces_type_and_size() {
    let dir = TempDir::new().unwrap();
    let ok = dir.path().join("slide.jpeg");
    fs::write(&ok, vec![0u8; 2048]).unwrap();
    let big = dir.path().join("huge.png");
    fs::write(&big, vec![0u8; 4096]).unwrap();
    let text = dir.path().join("notes.txt");
    fs::write(&text, "hello").unwrap();

    assert!(validate_image(&ok, 2048).is_ok());
    assert!(matches!(
        validate_image(&big, 2048),
        Err(ImageError::TooLarge { size: 4096, .. })
    ));
    assert!(matches!(
        validate_image(&text, 2048),
        Err(ImageError::UnsupportedType { .. })
    ));

    let store = ImageStore::in_dir(dir.path());
    assert!(store.accept(&big, 2048).is_err());
    assert!(store.load().is_none());
    assert_eq!(store.accept(&ok, 2048).unwrap(), ok);
    assert_eq!(store.load(), Some(ok));
}

#[test]
fn failed_message_saves_keep_the_list_in_memory() {
    let dir = TempDir::new().unwrap();
    let mut store = MessageStore::in_dir(dir.path());
    let before = store.messages().to_vec();

    // A directory in place of the file makes every write fail.
    let path = dir.path().join(MESSAGES_FILE);
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();

    assert!(store.add("Five minutes").is_err());
    assert_eq!(store.messages(), before.as_slice());
    assert!(store.edit(0, "Changed").is_err());
    assert_eq!(store.messages(), before.as_slice());
    assert!(store.delete(1).is_err());
    assert_eq!(store.messages(), before.as_slice());
}

#[test]
fn failed_settings_save_leaves_file_and_backup_alone() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::in_dir(dir.path());
    let mut first = AppSettings::default();
    first.red_alert_threshold = 10;
    let mut second = AppSettings::default();
    second.red_alert_threshold = 20;
    let mut third = AppSettings::default();
    third.red_alert_threshold = 30;

    store.save(&first).unwrap();
    store.save(&second).unwrap();

    // Backup target unusable: the save aborts before touching the file.
    let backup = dir.path().join(SETTINGS_BACKUP_FILE);
    let backup_content = fs::read_to_string(&backup).unwrap();
    fs::remove_file(&backup).unwrap();
    fs::create_dir(&backup).unwrap();
    assert!(store.save(&third).is_err());
    assert_eq!(store.load().unwrap().red_alert_threshold, 20);

    // Restore the backup, then break the settings file itself.
    fs::remove_dir(&backup).unwrap();
    fs::write(&backup, &backup_content).unwrap();
    let path = dir.path().join(SETTINGS_FILE);
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();
    assert!(store.save(&third).is_err());
    assert_eq!(fs::read_to_string(&backup).unwrap(), backup_content);
    assert_eq!(store.load_backup().unwrap().unwrap().red_alert_threshold, 10);
}
