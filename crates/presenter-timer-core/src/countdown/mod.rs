mod engine;
mod hms;

pub use engine::{CountdownEngine, CountdownState};
pub use hms::Hms;
