//! World-level support: clock, process-wide tunables, configuration errors

mod clock;
mod errors;
mod rates;

pub use clock::{TimeDelta, Timestamp, millis, seconds};
pub use errors::ConfigError;
pub use rates::ServerRates;
