// HyperX Cloud III S battery query - shared library
// Report codec, charging freshness tracking, and the query cycle

pub mod charging;
pub mod config;
pub mod error;
pub mod protocol;
pub mod query;

pub use charging::{ChargingState, ChargingStatus};
pub use config::{AppConfig, ConfigOverrides};
pub use error::{ConfigError, EncodingError, QueryError};
pub use protocol::{decode, encode_battery_query, BatteryReport, ChargingEvent, Report};
pub use query::{run_cycle, watch, QueryOptions, QueryOutcome};
