//! # Presenter Timer Core Library
//!
//! This library provides the core logic for a two-screen presentation
//! countdown: a control panel drives an audience-facing display and any
//! number of preview panes. It follows a CLI-first layout where every
//! operation is reachable from the standalone `presenter-timer` binary, and
//! any windowed shell is a thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: a tick-driven state machine; the caller delivers
//!   one `tick()` per elapsed second
//! - **Alert Tiers**: remaining time classified against the yellow and red
//!   thresholds, with a colour flash once the countdown expires
//! - **Adaptive Sizing**: timer and message font sizes fitted to the display
//!   width and carried proportionally to every preview
//! - **Storage**: JSON settings with a one-generation backup, the message
//!   list, the last background image and the TOML shell configuration
//!
//! ## Key Components
//!
//! - [`Presenter`]: command dispatch and the per-tick pipeline
//! - [`CountdownEngine`]: countdown state machine
//! - [`AppSettings`]: persisted user settings
//! - [`EventBus`]: per-field publish/subscribe of state changes

pub mod alert;
pub mod color;
pub mod countdown;
pub mod error;
pub mod events;
pub mod presenter;
pub mod scheduler;
pub mod settings;
pub mod sizing;
pub mod storage;
pub mod surface;

pub use alert::{classify, tier_color, AlertTier, FlashState};
pub use color::{ColorName, ColorResolver, NamedPalette, Rgba};
pub use countdown::{CountdownEngine, CountdownState, Hms};
pub use error::{CoreError, ImageError, MessageError, SettingsError};
pub use events::{Event, EventBus, Field, SubscriptionId};
pub use presenter::{Command, Presenter, PreviewRole};
pub use scheduler::{Cadence, Debouncer, PeriodicTimer};
pub use settings::{AppSettings, RecentImages};
pub use sizing::{
    AdaptiveSizer, AdvanceRatioMeasurer, FontMeasurer, SizingTarget, SurfaceLayout, SurfaceSize,
    TextMeasurer,
};
pub use storage::{ImageStore, MessageStore, SettingsStore, ShellConfig};
pub use surface::{Backdrop, Frame, RenderSurface, TextStyle};
