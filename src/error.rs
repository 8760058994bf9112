//! Error types for report encoding and query cycles

use cloud3s_transport::TransportError;
use thiserror::Error;

/// Outbound report could not be built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Report too long: {len} > {capacity}")]
    ReportTooLong { len: usize, capacity: usize },
}

/// Hard failure of one query cycle
///
/// A missing reply is not an error; see `QueryOutcome::success`.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Transport error: {0}")]
    Channel(#[from] TransportError),
}

impl QueryError {
    /// Whether the device handle is gone and retrying is pointless
    pub fn is_fatal(&self) -> bool {
        match self {
            QueryError::Encoding(_) => true,
            QueryError::Channel(e) => e.is_fatal(),
        }
    }
}

/// Configuration file could not be read or written
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
