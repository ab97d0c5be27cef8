//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_presenter-timer"))
        .args(args)
        .env("PRESENTER_TIMER_DATA_DIR", data_dir)
        .env_remove("PRESENTER_TIMER_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (code, stdout, stderr) = run_cli(data_dir, args);
    assert_eq!(code, 0, "command {args:?} failed: {stderr}");
    stdout
}

#[test]
fn test_classify_boundaries() {
    let dir = TempDir::new().unwrap();
    let tier = |remaining: &str| {
        run_ok(
            dir.path(),
            &["classify", remaining, "--yellow", "300", "--red", "60"],
        )
        .trim()
        .to_string()
    };
    assert_eq!(tier("0"), "expired");
    assert_eq!(tier("60"), "critical");
    assert_eq!(tier("61"), "warning");
    assert_eq!(tier("301"), "normal");
}

#[test]
fn test_classify_json() {
    let dir = TempDir::new().unwrap();
    let out = run_ok(dir.path(), &["classify", "120", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["tier"], "warning");
    assert_eq!(parsed["color"], "Yellow");
    assert_eq!(parsed["flashing"], false);
}

#[test]
fn test_size_commands() {
    let dir = TempDir::new().unwrap();
    let timer = run_ok(
        dir.path(),
        &[
            "size", "timer", "--width", "1000", "--pref", "50", "--ratio", "0.5", "--text",
            "00:10:00",
        ],
    );
    assert_eq!(timer.trim(), "100.00");

    let message = run_ok(
        dir.path(),
        &["size", "message", "--width", "1000", "--value", "40"],
    );
    assert!(message.starts_with("37.50"), "got {message}");

    let (code, _, stderr) = run_cli(
        dir.path(),
        &["size", "message", "--width", "0", "--value", "40"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_settings_set_get_and_backup() {
    let dir = TempDir::new().unwrap();
    assert_eq!(
        run_ok(dir.path(), &["settings", "get", "red_alert_threshold"]).trim(),
        "60"
    );

    run_ok(dir.path(), &["settings", "set", "red_alert_threshold", "15"]);
    run_ok(dir.path(), &["settings", "set", "timer_color", "Green"]);
    assert_eq!(
        run_ok(dir.path(), &["settings", "get", "red_alert_threshold"]).trim(),
        "15"
    );
    assert_eq!(
        run_ok(dir.path(), &["settings", "get", "timer_color"]).trim(),
        "Green"
    );
    assert!(dir.path().join("settings.bak").exists());

    let list = run_ok(dir.path(), &["settings", "list"]);
    let parsed: serde_json::Value = serde_json::from_str(&list).unwrap();
    assert_eq!(parsed["red_alert_threshold"], 15);

    let (code, _, _) = run_cli(dir.path(), &["settings", "set", "no_such_key", "1"]);
    assert_ne!(code, 0);

    let (code, _, stderr) = run_cli(dir.path(), &["settings", "get", "no_such_key"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error: unknown settings key: no_such_key"), "got {stderr}");
}

#[test]
fn test_settings_colors_use_the_palette() {
    let dir = TempDir::new().unwrap();
    run_ok(dir.path(), &["settings", "set", "message_color", "darkgreen"]);
    assert_eq!(
        run_ok(dir.path(), &["settings", "get", "message_color"]).trim(),
        "DarkGreen"
    );

    let (code, _, stderr) = run_cli(dir.path(), &["settings", "set", "timer_color", "Chartreuse"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown colour"), "got {stderr}");
    assert_eq!(
        run_ok(dir.path(), &["settings", "get", "timer_color"]).trim(),
        "White"
    );
}

#[test]
fn test_settings_export_import() {
    let dir = TempDir::new().unwrap();
    let exported = dir.path().join("exported.json");
    let exported = exported.to_str().unwrap();

    run_ok(dir.path(), &["settings", "set", "yellow_alert_threshold", "120"]);
    run_ok(dir.path(), &["settings", "export", exported]);
    run_ok(dir.path(), &["settings", "reset"]);
    assert_eq!(
        run_ok(dir.path(), &["settings", "get", "yellow_alert_threshold"]).trim(),
        "300"
    );
    run_ok(dir.path(), &["settings", "import", exported]);
    assert_eq!(
        run_ok(dir.path(), &["settings", "get", "yellow_alert_threshold"]).trim(),
        "120"
    );
}

#[test]
fn test_messages_lifecycle() {
    let dir = TempDir::new().unwrap();
    let list = run_ok(dir.path(), &["messages", "list", "--json"]);
    let messages: Vec<String> = serde_json::from_str(&list).unwrap();
    assert_eq!(messages, vec!["Please Wrap Up", "Time is up"]);

    run_ok(dir.path(), &["messages", "add", "Two minutes"]);
    run_ok(dir.path(), &["messages", "delete", "0"]);
    let list = run_ok(dir.path(), &["messages", "list"]);
    assert_eq!(list, "0: Time is up\n1: Two minutes\n");

    let (code, _, _) = run_cli(dir.path(), &["messages", "add", "   "]);
    assert_ne!(code, 0);
}

#[test]
fn test_image_set_and_recent() {
    let dir = TempDir::new().unwrap();
    let image = dir.path().join("slide.png");
    std::fs::write(&image, [0u8; 64]).unwrap();
    let text = dir.path().join("notes.txt");
    std::fs::write(&text, "notes").unwrap();

    let (code, _, stderr) = run_cli(dir.path(), &["image", "set", text.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    run_ok(dir.path(), &["image", "set", image.to_str().unwrap()]);
    assert_eq!(
        run_ok(dir.path(), &["image", "show"]).trim(),
        image.to_str().unwrap()
    );
    assert_eq!(
        run_ok(dir.path(), &["image", "recent"]).trim(),
        image.to_str().unwrap()
    );

    run_ok(dir.path(), &["image", "clear-recent"]);
    assert_eq!(run_ok(dir.path(), &["image", "recent"]), "");
}

#[test]
fn test_config_get_set() {
    let dir = TempDir::new().unwrap();
    assert_eq!(
        run_ok(dir.path(), &["config", "get", "cadence.tick_ms"]).trim(),
        "1000"
    );
    run_ok(dir.path(), &["config", "set", "display.width", "1280.0"]);
    assert_eq!(
        run_ok(dir.path(), &["config", "get", "display.width"]).trim(),
        "1280.0"
    );
    let (code, _, _) = run_cli(dir.path(), &["config", "get", "cadence.nope"]);
    assert_eq!(code, 1);

    let list = run_ok(dir.path(), &["config", "list"]);
    assert!(list.contains("display.width = 1280.0"), "got {list}");
    assert_eq!(
        run_ok(dir.path(), &["config", "path"]).trim(),
        dir.path().join("config.toml").to_str().unwrap()
    );
}

#[test]
fn test_run_counts_down_to_zero() {
    let dir = TempDir::new().unwrap();
    let out = run_ok(
        dir.path(),
        &[
            "run",
            "--seconds",
            "2",
            "--width",
            "800",
            "--height",
            "600",
            "--preview",
            "200x150",
            "--ratio",
            "0.5",
            "--message",
            "Please Wrap Up",
        ],
    );
    assert!(out.contains("[display] 00:00:02 Red(#FF0000)"), "got {out}");
    assert!(out.contains("[preview 0] 00:00:01"));
    assert!(out.contains("[display] 00:00:00"));
    assert!(out.contains("\"Please Wrap Up\""));
}

#[test]
fn test_run_json_frames() {
    let dir = TempDir::new().unwrap();
    let out = run_ok(
        dir.path(),
        &["run", "--seconds", "1", "--ratio", "0.5", "--json", "--preview", "320x180"],
    );
    let frames: Vec<serde_json::Value> = out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert!(frames.len() >= 4);
    assert_eq!(frames[0]["target"], "primary");
    assert_eq!(frames[0]["timer"]["text"], "00:00:01");
    assert_eq!(frames.last().unwrap()["timer"]["text"], "00:00:00");
}

#[test]
fn test_run_duration_argument() {
    let dir = TempDir::new().unwrap();
    let out = run_ok(dir.path(), &["run", "--duration", "0:01", "--ratio", "0.5"]);
    assert!(out.contains("[display] 00:00:01"), "got {out}");
    assert!(out.contains("[display] 00:00:00"), "got {out}");

    let (code, _, stderr) = run_cli(dir.path(), &["run", "--duration", "24:00:00"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("hours"), "got {stderr}");

    let (code, _, _) = run_cli(dir.path(), &["run", "--duration", "5", "--minutes", "1"]);
    assert_ne!(code, 0);
}
