//! The coordinator between the countdown, the alert tiers and text sizing.
//!
//! [`Presenter`] owns every piece of mutable state. Shell input arrives as a
//! [`Command`] through [`Presenter::dispatch`]; time arrives through
//! [`Presenter::poll`]. Both return the events they produced and publish
//! them on the internal [`EventBus`].
//!
//! Within one tick the order is fixed: the countdown moves, the new time is
//! classified, the timer colour (or flash) follows the tier, and only then
//! is the live text re-measured.
//!
//! ```
//! use std::time::{Duration, Instant};
//! use presenter_timer_core::presenter::{Command, Presenter};
//! use presenter_timer_core::AppSettings;
//!
//! let mut presenter = Presenter::headless(AppSettings::default());
//! let t0 = Instant::now();
//! presenter.dispatch(Command::SetDuration { hours: 0, minutes: 0, seconds: 2 }, t0).unwrap();
//! presenter.dispatch(Command::Start, t0).unwrap();
//! presenter.poll(t0 + Duration::from_secs(2));
//! assert_eq!(presenter.engine().remaining_secs(), 0);
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::alert::{classify, tier_color, AlertTier, FlashState};
use crate::color::ColorName;
use crate::countdown::CountdownEngine;
use crate::error::{CoreError, Result};
use crate::events::{Event, EventBus, Field, SubscriptionId};
use crate::scheduler::{Cadence, Debouncer, PeriodicTimer};
use crate::settings::AppSettings;
use crate::sizing::{
    AdaptiveSizer, AdvanceRatioMeasurer, SizingSkip, SizingTarget, SurfaceLayout, SurfaceSize,
    TextMeasurer,
};
use crate::surface::{Backdrop, Frame, RenderSurface, TextStyle};

/// Shell input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetDuration {
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
    Start,
    /// Pause a running countdown or resume a paused one.
    Pause,
    /// Start, pause or resume depending on the current state.
    Toggle,
    Reset,
    SendMessage(String),
    /// Show a message on draft previews only.
    PreviewMessage(String),
    ClearMessage,
    SetTimerColor(ColorName),
    SetMessageColor(ColorName),
    SetBackgroundColor(ColorName),
    /// Timer size slider, 0-100. Applied after the debounce period.
    SetTimerSize(f32),
    /// Message size slider, 20-100. Applied after the debounce period.
    SetMessageSize(f32),
    SetTimerFont(String),
    SetMessageFont(String),
    SetThresholds {
        yellow: u32,
        red: u32,
    },
    /// Show an already validated image behind the text.
    ShowImage(PathBuf),
    /// Show an image on draft previews only.
    PreviewImage(PathBuf),
    /// Promote the previewed image to the display.
    TakeImageLive,
    HideImage,
    ResizePrimary(SurfaceSize),
    ResizePreview {
        index: usize,
        size: SurfaceSize,
    },
    OpenDisplay,
    CloseDisplay,
}

/// What a preview pane mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewRole {
    /// Mirrors the audience display.
    #[default]
    Live,
    /// Shows previewed messages and images before they go live.
    Draft,
}

pub struct Presenter {
    engine: CountdownEngine,
    tier: AlertTier,
    /// Set when the countdown ran out; cleared by reset or a new duration.
    expired: bool,
    flash: FlashState,
    settings: AppSettings,
    /// Colour the timer text is drawn in right now.
    timer_color: ColorName,
    message: String,
    draft_message: Option<String>,
    backdrop: Backdrop,
    draft_image: Option<PathBuf>,
    display_visible: bool,
    layout: SurfaceLayout,
    preview_roles: Vec<PreviewRole>,
    sizer: AdaptiveSizer,
    measurer: Box<dyn TextMeasurer>,
    tick_timer: PeriodicTimer,
    flash_timer: PeriodicTimer,
    resize_debounce: Debouncer,
    bus: EventBus,
}

impl Presenter {
    pub fn new(settings: AppSettings, measurer: Box<dyn TextMeasurer>, cadence: Cadence) -> Self {
        let engine = CountdownEngine::new();
        let tier = classify(
            engine.remaining_secs(),
            settings.yellow_alert_threshold,
            settings.red_alert_threshold,
        );
        let timer_color =
            tier_color(tier, &settings.timer_color).unwrap_or_else(|| settings.timer_color.clone());
        let backdrop = Backdrop::Color(settings.background_color.clone());
        Self {
            engine,
            tier,
            expired: false,
            flash: FlashState::with_interval(cadence.flash),
            timer_color,
            message: String::new(),
            draft_message: None,
            backdrop,
            draft_image: None,
            display_visible: true,
            layout: SurfaceLayout::new(),
            preview_roles: Vec::new(),
            sizer: AdaptiveSizer::new(),
            measurer,
            tick_timer: PeriodicTimer::new(cadence.tick),
            flash_timer: PeriodicTimer::new(cadence.flash),
            resize_debounce: Debouncer::new(cadence.debounce),
            bus: EventBus::new(),
            settings,
        }
    }

    /// Default cadence with the average-advance measurer.
    pub fn headless(settings: AppSettings) -> Self {
        Self::new(
            settings,
            Box::new(AdvanceRatioMeasurer::default()),
            Cadence::default(),
        )
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    pub fn tier(&self) -> AlertTier {
        self.tier
    }

    pub fn flash(&self) -> &FlashState {
        &self.flash
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn timer_color(&self) -> &ColorName {
        &self.timer_color
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    pub fn is_display_visible(&self) -> bool {
        self.display_visible
    }

    pub fn layout(&self) -> &SurfaceLayout {
        &self.layout
    }

    pub fn sizer(&self) -> &AdaptiveSizer {
        &self.sizer
    }

    pub fn is_flash_running(&self) -> bool {
        self.flash_timer.is_running()
    }

    pub fn snapshot(&self) -> Event {
        self.engine.snapshot(self.tier, self.flash.is_active())
    }

    /// Earliest instant at which [`poll`](Self::poll) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.tick_timer.next_deadline(),
            self.flash_timer.next_deadline(),
            self.resize_debounce.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe<F>(&mut self, filter: Option<Field>, callback: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        self.bus.subscribe(filter, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    // ── Surfaces ─────────────────────────────────────────────────────

    /// Register a preview pane. Its size may be unknown until laid out.
    pub fn add_preview(&mut self, role: PreviewRole, size: Option<SurfaceSize>) -> usize {
        let index = self.layout.add_preview(size);
        self.preview_roles.push(role);
        let mut events = Vec::new();
        self.resize_all(&mut events);
        self.publish(&events);
        index
    }

    /// Frame for one target, or `None` for a hidden display or unknown preview.
    pub fn frame(&self, target: SizingTarget) -> Option<Frame> {
        let draft = match target {
            SizingTarget::Primary if !self.display_visible => return None,
            SizingTarget::Primary => false,
            SizingTarget::Preview(i) => *self.preview_roles.get(i)? == PreviewRole::Draft,
        };

        let message_text = match (&self.draft_message, draft) {
            (Some(text), true) => text.clone(),
            _ => self.message.clone(),
        };
        let backdrop = match (&self.draft_image, draft) {
            (Some(path), true) => Backdrop::Image(path.clone()),
            _ => self.backdrop.clone(),
        };

        Some(Frame {
            target,
            timer: TextStyle {
                text: self.engine.display(),
                font_family: self.settings.timer_font.clone(),
                font_size: self.sizer.timer().font_size(target),
                color: self.timer_color.clone(),
            },
            message: TextStyle {
                text: message_text,
                font_family: self.settings.message_font.clone(),
                font_size: self.sizer.message().font_size(target),
                color: self.settings.message_color.clone(),
            },
            backdrop,
            fade_in: self.settings.enable_animations,
        })
    }

    pub fn frames(&self) -> Vec<Frame> {
        self.layout
            .targets()
            .filter_map(|target| self.frame(target))
            .collect()
    }

    /// Hand every visible frame to `surface`.
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        for frame in self.frames() {
            surface.render(&frame);
        }
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Apply one shell command.
    ///
    /// # Errors
    /// Returns `InvalidInput` for negative durations, blank messages, an
    /// unknown preview index or a take-live with nothing previewed. State is
    /// unchanged when an error is returned.
    pub fn dispatch(&mut self, command: Command, now: Instant) -> Result<Vec<Event>> {
        debug!(?command, "dispatch");
        let mut events = Vec::new();
        match command {
            Command::SetDuration {
                hours,
                minutes,
                seconds,
            } => {
                events.push(self.engine.set_duration(hours, minutes, seconds)?);
                if !self.engine.is_running() {
                    self.tick_timer.stop();
                }
                self.expired = false;
                self.stop_flash(&mut events);
                self.after_time_change(&mut events);
            }
            Command::Start => {
                let change = self.engine.start();
                self.apply_run_change(change, now, &mut events);
            }
            Command::Pause => {
                let change = self.engine.pause();
                self.apply_run_change(change, now, &mut events);
            }
            Command::Toggle => {
                let change = self.engine.toggle();
                self.apply_run_change(change, now, &mut events);
            }
            Command::Reset => {
                self.tick_timer.stop();
                events.extend(self.engine.reset());
                self.expired = false;
                self.stop_flash(&mut events);
                self.after_time_change(&mut events);
                info!(remaining_secs = self.engine.remaining_secs(), "timer reset");
                events.push(Event::status("Timer reset"));
            }
            Command::SendMessage(text) => {
                let text = non_blank(text, "Message not sent: empty text")?;
                self.message = text.clone();
                events.push(Event::MessageChanged { text, at: Utc::now() });
                events.push(Event::status("Message displayed"));
            }
            Command::PreviewMessage(text) => {
                let text = non_blank(text, "Message not previewed: empty text")?;
                self.draft_message = Some(text);
                events.push(Event::status("Message previewed"));
            }
            Command::ClearMessage => {
                self.message.clear();
                self.draft_message = None;
                events.push(Event::MessageChanged {
                    text: String::new(),
                    at: Utc::now(),
                });
                events.push(Event::status("Message cleared"));
            }
            Command::SetTimerColor(color) => {
                self.settings.timer_color = color;
                // The flash owns the colour until it stops.
                if !self.flash.is_active() && self.apply_tier_color() {
                    events.push(self.timer_style_event());
                }
            }
            Command::SetMessageColor(color) => {
                self.settings.message_color = color;
                events.push(self.message_style_event());
            }
            Command::SetBackgroundColor(color) => {
                self.settings.background_color = color.clone();
                self.settings.previous_background_color = color.clone();
                if matches!(self.backdrop, Backdrop::Color(_)) {
                    self.backdrop = Backdrop::Color(color);
                    events.push(self.background_event());
                }
            }
            Command::SetTimerSize(value) => {
                self.settings.timer_font_size = value.clamp(0.0, 100.0);
                self.resize_debounce.poke(now);
            }
            Command::SetMessageSize(value) => {
                self.settings.message_font_size = value.clamp(20.0, 100.0);
                self.resize_debounce.poke(now);
            }
            Command::SetTimerFont(family) => {
                self.settings.timer_font = family;
                if self.resize_timer(&mut events) {
                    events.push(self.timer_style_event());
                }
            }
            Command::SetMessageFont(family) => {
                self.settings.message_font = family;
                events.push(self.message_style_event());
            }
            Command::SetThresholds { yellow, red } => {
                self.settings.yellow_alert_threshold = yellow;
                self.settings.red_alert_threshold = red;
                self.warn_if_inverted(&mut events);
                self.after_time_change(&mut events);
            }
            Command::ShowImage(path) => {
                let status = format!("Image loaded: {}", file_name(&path));
                self.show_image(path, status, &mut events);
            }
            Command::PreviewImage(path) => {
                events.push(Event::status(format!("Image previewed: {}", file_name(&path))));
                self.draft_image = Some(path);
            }
            Command::TakeImageLive => {
                let path = self
                    .draft_image
                    .take()
                    .ok_or_else(|| CoreError::invalid_input("image", "no image previewed"))?;
                self.show_image(path, "Image taken live".to_string(), &mut events);
            }
            Command::HideImage => {
                self.settings.image_path.clear();
                self.backdrop = Backdrop::Color(self.settings.previous_background_color.clone());
                events.push(self.background_event());
                events.push(Event::status("Background image hidden"));
            }
            Command::ResizePrimary(size) => {
                self.layout.set_primary(size);
                self.resize_all(&mut events);
            }
            Command::ResizePreview { index, size } => {
                if !self.layout.set_preview(index, size) {
                    return Err(CoreError::invalid_input(
                        "preview",
                        format!("no preview pane at index {index}"),
                    ));
                }
                self.resize_all(&mut events);
            }
            Command::OpenDisplay => {
                if !self.display_visible {
                    self.display_visible = true;
                    events.push(Event::DisplayVisibilityChanged {
                        visible: true,
                        at: Utc::now(),
                    });
                    if self.expired {
                        self.start_flash(now, &mut events);
                    }
                }
                events.push(Event::status("Display window opened"));
            }
            Command::CloseDisplay => {
                if self.display_visible {
                    self.display_visible = false;
                    self.stop_flash(&mut events);
                    events.push(Event::DisplayVisibilityChanged {
                        visible: false,
                        at: Utc::now(),
                    });
                }
                events.push(Event::status("Display window closed"));
            }
        }
        self.publish(&events);
        Ok(events)
    }

    /// Replace the settings snapshot, e.g. after an import.
    pub fn apply_settings(&mut self, settings: AppSettings) -> Vec<Event> {
        let mut events = Vec::new();
        self.settings = settings;
        if matches!(self.backdrop, Backdrop::Color(_)) {
            self.backdrop = Backdrop::Color(self.settings.background_color.clone());
            events.push(self.background_event());
        }
        self.warn_if_inverted(&mut events);
        self.after_time_change(&mut events);
        if self.resize_message(&mut events) {
            events.push(self.message_style_event());
        }
        self.publish(&events);
        events
    }

    // ── Time ─────────────────────────────────────────────────────────

    /// Fire every timer source due at `now`: tick, then flash, then the
    /// resize debounce. Never fails; faults become `Status` events.
    pub fn poll(&mut self, now: Instant) -> Vec<Event> {
        let mut events = Vec::new();

        for _ in 0..self.tick_timer.poll(now) {
            self.on_tick(now, &mut events);
        }

        for _ in 0..self.flash_timer.poll(now) {
            if let Some(color) = self.flash.tick() {
                self.timer_color = color.clone();
                events.push(Event::FlashToggled {
                    phase: self.flash.phase(),
                    color,
                    at: Utc::now(),
                });
            }
        }

        if self.resize_debounce.poll(now) {
            self.resize_all(&mut events);
        }

        self.publish(&events);
        events
    }

    fn on_tick(&mut self, now: Instant, events: &mut Vec<Event>) {
        let ticked = self.engine.tick();
        if ticked.is_empty() {
            return;
        }
        let expired_now = ticked
            .iter()
            .any(|e| matches!(e, Event::TimerExpired { .. }));
        events.extend(ticked);
        self.after_time_change(events);
        if expired_now {
            self.tick_timer.stop();
            self.expired = true;
            info!("countdown expired");
            self.start_flash(now, events);
        }
    }

    // ── Pipeline ─────────────────────────────────────────────────────

    /// Classify, recolour, then re-measure the live text.
    fn after_time_change(&mut self, events: &mut Vec<Event>) {
        let tier = classify(
            self.engine.remaining_secs(),
            self.settings.yellow_alert_threshold,
            self.settings.red_alert_threshold,
        );
        if tier != self.tier {
            debug!(from = ?self.tier, to = ?tier, "alert tier changed");
            events.push(Event::TierChanged {
                from: self.tier,
                to: tier,
                at: Utc::now(),
            });
            self.tier = tier;
        }

        let before = self.timer_color.clone();
        if tier != AlertTier::Expired {
            self.stop_flash(events);
            self.apply_tier_color();
        }
        let recoloured = self.timer_color != before;
        let resized = self.resize_timer(events);
        if recoloured || resized {
            events.push(self.timer_style_event());
        }
    }

    /// Returns true when the drawn colour changed.
    fn apply_tier_color(&mut self) -> bool {
        let color = tier_color(self.tier, &self.settings.timer_color)
            .unwrap_or_else(|| self.settings.timer_color.clone());
        if color == self.timer_color {
            return false;
        }
        self.timer_color = color;
        true
    }

    fn apply_run_change(&mut self, change: Option<Event>, now: Instant, events: &mut Vec<Event>) {
        let Some(change) = change else {
            return;
        };
        let status = match &change {
            Event::TimerStarted { .. } => {
                self.tick_timer.start(now);
                "Timer started"
            }
            Event::TimerResumed { .. } => {
                self.tick_timer.start(now);
                "Timer resumed"
            }
            Event::TimerPaused { .. } => {
                self.tick_timer.stop();
                "Timer paused"
            }
            _ => return,
        };
        info!(remaining_secs = self.engine.remaining_secs(), status, "countdown");
        events.push(change);
        events.push(Event::status(status));
    }

    /// Captures whatever colour is drawn at expiry. Under the default
    /// thresholds that is the Critical red, so both phases are red.
    fn start_flash(&mut self, now: Instant, events: &mut Vec<Event>) {
        if !self.display_visible {
            return;
        }
        if self.flash.start(self.timer_color.clone()) {
            self.flash_timer.start(now);
            events.push(Event::FlashStarted {
                original: self.timer_color.clone(),
                at: Utc::now(),
            });
        }
    }

    fn stop_flash(&mut self, events: &mut Vec<Event>) {
        self.flash_timer.stop();
        if let Some(restored) = self.flash.stop() {
            self.timer_color = restored.clone();
            events.push(Event::FlashStopped {
                restored,
                at: Utc::now(),
            });
        }
    }

    fn show_image(&mut self, path: PathBuf, status: String, events: &mut Vec<Event>) {
        self.settings.remember_image(path.to_string_lossy());
        self.backdrop = Backdrop::Image(path);
        events.push(self.background_event());
        events.push(Event::status(status));
    }

    fn warn_if_inverted(&self, events: &mut Vec<Event>) {
        if self.settings.thresholds_inverted() {
            warn!(
                yellow = self.settings.yellow_alert_threshold,
                red = self.settings.red_alert_threshold,
                "red alert threshold is above the yellow threshold"
            );
            events.push(Event::status("Red threshold is above yellow threshold"));
        }
    }

    // ── Sizing ───────────────────────────────────────────────────────

    /// Returns true when the primary size changed.
    fn resize_timer(&mut self, events: &mut Vec<Event>) -> bool {
        let before = self.sizer.timer().primary;
        let text = self.engine.display();
        let result = self.sizer.resize_timer(
            &self.layout,
            self.settings.timer_font_size,
            &text,
            &self.settings.timer_font,
            self.measurer.as_ref(),
        );
        sized(result, before, "Error updating timer font", events)
    }

    fn resize_message(&mut self, events: &mut Vec<Event>) -> bool {
        let before = self.sizer.message().primary;
        let result = self
            .sizer
            .resize_message(&self.layout, self.settings.message_font_size);
        sized(result, before, "Error updating message font", events)
    }

    fn resize_all(&mut self, events: &mut Vec<Event>) {
        // Previews may have changed even when the primary size did not.
        self.resize_timer(events);
        self.resize_message(events);
        if self.sizer.timer().primary.is_some() {
            events.push(self.timer_style_event());
        }
        if self.sizer.message().primary.is_some() {
            events.push(self.message_style_event());
        }
    }

    // ── Events ───────────────────────────────────────────────────────

    fn timer_style_event(&self) -> Event {
        Event::TimerStyleChanged {
            primary_font_size: self.sizer.timer().primary,
            color: self.timer_color.clone(),
            at: Utc::now(),
        }
    }

    fn message_style_event(&self) -> Event {
        Event::MessageStyleChanged {
            primary_font_size: self.sizer.message().primary,
            color: self.settings.message_color.clone(),
            at: Utc::now(),
        }
    }

    fn background_event(&self) -> Event {
        let (color, image_path) = match &self.backdrop {
            Backdrop::Color(color) => (color.clone(), None),
            Backdrop::Image(path) => (
                self.settings.background_color.clone(),
                Some(path.to_string_lossy().into_owned()),
            ),
        };
        Event::BackgroundChanged {
            color,
            image_path,
            at: Utc::now(),
        }
    }

    fn publish(&mut self, events: &[Event]) {
        for event in events {
            self.bus.publish(event);
        }
    }
}

impl std::fmt::Debug for Presenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presenter")
            .field("engine", &self.engine)
            .field("tier", &self.tier)
            .field("flash", &self.flash)
            .field("timer_color", &self.timer_color)
            .field("message", &self.message)
            .field("backdrop", &self.backdrop)
            .field("display_visible", &self.display_visible)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

fn sized(
    result: std::result::Result<f32, SizingSkip>,
    before: Option<f32>,
    fault_status: &str,
    events: &mut Vec<Event>,
) -> bool {
    match result {
        Ok(size) => before != Some(size),
        Err(SizingSkip::NotLaidOut) => false,
        Err(SizingSkip::MeasurementFault) => {
            events.push(Event::status(fault_status));
            false
        }
    }
}

fn non_blank(text: String, status: &str) -> Result<String> {
    if text.trim().is_empty() {
        return Err(CoreError::invalid_input("message", status));
    }
    Ok(text)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
