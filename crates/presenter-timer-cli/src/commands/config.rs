use clap::Subcommand;
use presenter_timer_core::ShellConfig;
use serde_json::Value;

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print one shell setting
    Get {
        /// Dotted key (e.g. "cadence.tick_ms", "display.width")
        key: String,
    },
    /// Change one shell setting
    Set {
        key: String,
        value: String,
    },
    /// Print every key as `key = value`
    List {
        /// Print the whole config as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Print where config.toml lives
    Path,
    /// Restore cadence, display and measurement defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = ShellConfig::load()?;
            let Some(value) = config.get(&key) else {
                return Err(format!("unknown config key: {key}").into());
            };
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = ShellConfig::load()?;
            config.set(&key, &value)?;
            config.save()?;
            tracing::info!(%key, %value, "shell config updated");
            println!("ok");
        }
        ConfigAction::List { json } => {
            let config = serde_json::to_value(ShellConfig::load()?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                let mut lines = Vec::new();
                flatten("", &config, &mut lines);
                for line in lines {
                    println!("{line}");
                }
            }
        }
        ConfigAction::Path => println!("{}", ShellConfig::path()?.display()),
        ConfigAction::Reset => {
            ShellConfig::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        other => out.push(format!("{prefix} = {other}")),
    }
}
