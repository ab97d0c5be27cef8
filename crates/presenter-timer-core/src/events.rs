use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alert::AlertTier;
use crate::color::ColorName;

/// Every state change in the system produces an Event.
/// The shell subscribes per [`Field`] through the [`EventBus`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Emitted on every tick and every explicit duration mutation.
    TimeChanged {
        remaining_secs: u64,
        display: String,
        at: DateTime<Utc>,
    },
    TimerStarted {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Fired once when the countdown reaches zero.
    TimerExpired {
        at: DateTime<Utc>,
    },
    TierChanged {
        from: AlertTier,
        to: AlertTier,
        at: DateTime<Utc>,
    },
    FlashStarted {
        original: ColorName,
        at: DateTime<Utc>,
    },
    FlashToggled {
        phase: bool,
        color: ColorName,
        at: DateTime<Utc>,
    },
    FlashStopped {
        restored: ColorName,
        at: DateTime<Utc>,
    },
    /// Timer font size or colour changed on at least one target.
    TimerStyleChanged {
        primary_font_size: Option<f32>,
        color: ColorName,
        at: DateTime<Utc>,
    },
    MessageStyleChanged {
        primary_font_size: Option<f32>,
        color: ColorName,
        at: DateTime<Utc>,
    },
    MessageChanged {
        text: String,
        at: DateTime<Utc>,
    },
    BackgroundChanged {
        color: ColorName,
        image_path: Option<String>,
        at: DateTime<Utc>,
    },
    DisplayVisibilityChanged {
        visible: bool,
        at: DateTime<Utc>,
    },
    /// Human-readable status line for the control panel.
    Status {
        message: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        remaining_secs: u64,
        display: String,
        running: bool,
        paused: bool,
        tier: AlertTier,
        flashing: bool,
        at: DateTime<Utc>,
    },
}

/// The observable field an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Time,
    Countdown,
    Tier,
    Flash,
    TimerStyle,
    MessageStyle,
    Message,
    Background,
    Display,
    Status,
}

impl Event {
    pub fn field(&self) -> Field {
        match self {
            Event::TimeChanged { .. } => Field::Time,
            Event::TimerStarted { .. }
            | Event::TimerPaused { .. }
            | Event::TimerResumed { .. }
            | Event::TimerReset { .. }
            | Event::TimerExpired { .. }
            | Event::StateSnapshot { .. } => Field::Countdown,
            Event::TierChanged { .. } => Field::Tier,
            Event::FlashStarted { .. } | Event::FlashToggled { .. } | Event::FlashStopped { .. } => {
                Field::Flash
            }
            Event::TimerStyleChanged { .. } => Field::TimerStyle,
            Event::MessageStyleChanged { .. } => Field::MessageStyle,
            Event::MessageChanged { .. } => Field::Message,
            Event::BackgroundChanged { .. } => Field::Background,
            Event::DisplayVisibilityChanged { .. } => Field::Display,
            Event::Status { .. } => Field::Status,
        }
    }

    pub fn status(message: impl Into<String>) -> Self {
        Event::Status {
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&Event)>;

struct Subscriber {
    id: SubscriptionId,
    filter: Option<Field>,
    callback: Callback,
}

/// Synchronous publish/subscribe hub.
///
/// Subscribers run on the caller's thread in subscription order. A `None`
/// filter receives every event.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, filter: Option<Field>, callback: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            filter,
            callback: Box::new(callback),
        });
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, event: &Event) {
        let field = event.field();
        for subscriber in &mut self.subscribers {
            if subscriber.filter.map_or(true, |f| f == field) {
                (subscriber.callback)(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
