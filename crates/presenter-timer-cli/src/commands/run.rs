use std::time::{Duration, Instant};

use clap::Args;
use presenter_timer_core::sizing::{AdvanceRatioMeasurer, TextMeasurer};
use presenter_timer_core::{
    Backdrop, ColorName, ColorResolver, Command, Event, Field, Frame, Hms, ImageStore,
    NamedPalette, Presenter, PreviewRole, RenderSurface, SettingsStore, ShellConfig, SizingTarget,
    SurfaceSize,
};
use tracing::info;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Countdown as `ss`, `mm:ss` or `hh:mm:ss`
    #[arg(long, conflicts_with_all = ["hours", "minutes", "seconds"])]
    pub duration: Option<String>,
    #[arg(long, default_value_t = 0)]
    pub hours: i64,
    #[arg(long, default_value_t = 0)]
    pub minutes: i64,
    #[arg(long, default_value_t = 0)]
    pub seconds: i64,
    /// Display width in pixels (defaults to the shell config)
    #[arg(long)]
    pub width: Option<f32>,
    /// Display height in pixels (defaults to the shell config)
    #[arg(long)]
    pub height: Option<f32>,
    /// Preview pane as WIDTHxHEIGHT; repeat for more panes
    #[arg(long = "preview", value_parser = parse_size)]
    pub previews: Vec<SurfaceSize>,
    /// Message shown under the timer
    #[arg(long)]
    pub message: Option<String>,
    /// Seconds to keep flashing after expiry
    #[arg(long, default_value_t = 0)]
    pub linger: u64,
    /// Measure text with a fixed advance ratio instead of a font
    #[arg(long)]
    pub ratio: Option<f32>,
    /// Print frames as JSON lines
    #[arg(long)]
    pub json: bool,
}

pub fn parse_size(raw: &str) -> Result<SurfaceSize, String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {raw:?}"))?;
    let width: f32 = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let height: f32 = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    Ok(SurfaceSize::new(width, height))
}

impl RunArgs {
    /// The requested countdown, held to the picker ranges (at most 23:59:59).
    fn countdown(&self) -> Result<Hms, presenter_timer_core::CoreError> {
        match &self.duration {
            Some(raw) => Hms::from_secs(raw.parse::<Hms>()?.total_secs()).within_picker_range(),
            None => Hms::validated(self.hours, self.minutes, self.seconds),
        }
    }
}

/// Prints frames to stdout.
struct TerminalSurface {
    json: bool,
    palette: NamedPalette,
}

impl TerminalSurface {
    /// `Name(#RRGGBB)`, or just the name when the palette does not know it.
    fn swatch(&self, color: &ColorName) -> String {
        match self.palette.resolve(color) {
            Some(rgba) => format!("{color}({})", rgba.to_hex()),
            None => color.to_string(),
        }
    }
}

impl RenderSurface for TerminalSurface {
    fn render(&mut self, frame: &Frame) {
        if self.json {
            if let Ok(line) = serde_json::to_string(frame) {
                println!("{line}");
            }
            return;
        }
        let target = match frame.target {
            SizingTarget::Primary => "display".to_string(),
            SizingTarget::Preview(i) => format!("preview {i}"),
        };
        let size = |s: Option<f32>| s.map_or_else(|| "-".to_string(), |s| format!("{s:.1}px"));
        let backdrop = match &frame.backdrop {
            Backdrop::Color(c) => self.swatch(c),
            Backdrop::Image(p) => p.display().to_string(),
        };
        println!(
            "[{target}] {} {} {} | {:?} {} | {backdrop}",
            frame.timer.text,
            self.swatch(&frame.timer.color),
            size(frame.timer.font_size),
            frame.message.text,
            size(frame.message.font_size),
        );
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let countdown = args.countdown()?;
    let settings = SettingsStore::open()?.load_or_default();
    let config = ShellConfig::load()?;
    let measurer: Box<dyn TextMeasurer> = match args.ratio {
        Some(ratio) => Box::new(AdvanceRatioMeasurer::new(ratio)),
        None => super::measurer(&config),
    };

    let mut presenter = Presenter::new(settings.clone(), measurer, config.cadence.cadence());
    presenter.subscribe(Some(Field::Status), |event| {
        if let Event::Status { message, .. } = event {
            eprintln!("status: {message}");
        }
    });
    // Re-applying the loaded snapshot reports inverted thresholds.
    presenter.apply_settings(settings);

    let start = Instant::now();
    let primary = SurfaceSize::new(
        args.width.unwrap_or(config.display.width),
        args.height.unwrap_or(config.display.height),
    );
    presenter.dispatch(Command::ResizePrimary(primary), start)?;
    let previews: Vec<SurfaceSize> = if args.previews.is_empty() {
        config.display.preview_sizes().collect()
    } else {
        args.previews
    };
    for size in previews {
        presenter.add_preview(PreviewRole::Live, Some(size));
    }

    if let Some(image) = ImageStore::open()?.load() {
        presenter.dispatch(Command::ShowImage(image), start)?;
    }
    if let Some(message) = args.message {
        presenter.dispatch(Command::SendMessage(message), start)?;
    }
    presenter.dispatch(
        Command::SetDuration {
            hours: i64::try_from(countdown.hours)?,
            minutes: i64::try_from(countdown.minutes)?,
            seconds: i64::try_from(countdown.seconds)?,
        },
        start,
    )?;

    let mut surface = TerminalSurface {
        json: args.json,
        palette: NamedPalette,
    };
    presenter.render(&mut surface);

    if presenter.engine().remaining_secs() == 0 {
        return Ok(());
    }
    presenter.dispatch(Command::Start, start)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(drive(&mut presenter, &mut surface, Duration::from_secs(args.linger)));
    Ok(())
}

/// Sleep until the next timer source is due, poll, redraw. Returns once the
/// countdown has expired and the linger period is over.
async fn drive(presenter: &mut Presenter, surface: &mut TerminalSurface, linger: Duration) {
    let mut stop_at: Option<Instant> = None;
    while let Some(deadline) = presenter.next_deadline() {
        if stop_at.is_some_and(|until| deadline > until) {
            break;
        }
        tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;

        let now = Instant::now();
        let events = presenter.poll(now);
        let redraw = events.iter().any(|e| {
            matches!(
                e,
                Event::TimeChanged { .. } | Event::FlashToggled { .. } | Event::FlashStopped { .. }
            )
        });
        if redraw {
            presenter.render(surface);
        }

        if events.iter().any(|e| matches!(e, Event::TimerExpired { .. })) {
            info!("countdown finished");
            if linger.is_zero() {
                break;
            }
            stop_at = Some(now + linger);
        }
    }
}
