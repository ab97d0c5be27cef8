use clap::Subcommand;
use presenter_timer_core::sizing::{
    message_font_size, message_width_percentage, timer_font_size, AdvanceRatioMeasurer,
    SizingSkip, TextMeasurer,
};
use presenter_timer_core::{Hms, ShellConfig};

#[derive(Subcommand, Debug)]
pub enum SizeAction {
    /// Timer font size for a display width
    Timer {
        /// Display width in pixels
        #[arg(long)]
        width: f32,
        /// Size slider, 0-100
        #[arg(long, default_value_t = 95.0)]
        pref: f32,
        /// Text to fit (defaults to 00:00:00)
        #[arg(long)]
        text: Option<String>,
        /// Font family passed to the measurer
        #[arg(long, default_value = "Arial")]
        font: String,
        /// Measure with a fixed advance ratio instead of a font
        #[arg(long)]
        ratio: Option<f32>,
    },
    /// Message font size for a display width
    Message {
        /// Display width in pixels
        #[arg(long)]
        width: f32,
        /// Size slider, 20-100
        #[arg(long, default_value_t = 40.0)]
        value: f32,
        /// Display height in pixels; caps the size when given
        #[arg(long)]
        height: Option<f32>,
    },
}

pub fn run(action: SizeAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SizeAction::Timer {
            width,
            pref,
            text,
            font,
            ratio,
        } => {
            let measurer: Box<dyn TextMeasurer> = match ratio {
                Some(ratio) => Box::new(AdvanceRatioMeasurer::new(ratio)),
                None => super::measurer(&ShellConfig::load()?),
            };
            let text = text.unwrap_or_else(|| Hms::default().to_string());
            let size = timer_font_size(width, pref, &text, &font, measurer.as_ref())
                .map_err(skip_message)?;
            println!("{size:.2}");
        }
        SizeAction::Message {
            width,
            value,
            height,
        } => {
            let size = message_font_size(width, height, value).map_err(skip_message)?;
            println!("{size:.2} ({:.1}% of width)", message_width_percentage(value));
        }
    }
    Ok(())
}

fn skip_message(skip: SizingSkip) -> String {
    match skip {
        SizingSkip::NotLaidOut => "width must be a positive number".to_string(),
        SizingSkip::MeasurementFault => "text measurement failed".to_string(),
    }
}
