pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod settings;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::YazimConfig;
pub use error::{Result, YazimError};
pub use events::DomainEvent;
pub use settings::Settings;
pub use types::*;
