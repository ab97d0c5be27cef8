use clap::Args;
use presenter_timer_core::alert::thresholds_inverted;
use presenter_timer_core::{classify, tier_color, SettingsStore};

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Remaining seconds
    pub remaining: u64,
    /// Yellow threshold in seconds (defaults to the saved setting)
    #[arg(long)]
    pub yellow: Option<u32>,
    /// Red threshold in seconds (defaults to the saved setting)
    #[arg(long)]
    pub red: Option<u32>,
    /// Print tier and colour as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ClassifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = SettingsStore::open()?.load_or_default();
    let yellow = args.yellow.unwrap_or(settings.yellow_alert_threshold);
    let red = args.red.unwrap_or(settings.red_alert_threshold);
    if thresholds_inverted(yellow, red) {
        eprintln!("warning: red threshold ({red}s) is above yellow threshold ({yellow}s)");
    }

    let tier = classify(args.remaining, yellow, red);
    let color = tier_color(tier, &settings.timer_color);

    if args.json {
        let out = serde_json::json!({
            "remaining_secs": args.remaining,
            "tier": tier,
            "color": color,
            "flashing": color.is_none(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", serde_json::to_value(tier)?.as_str().unwrap_or_default());
    }
    Ok(())
}
