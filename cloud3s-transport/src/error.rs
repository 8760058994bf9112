//! Transport error types

use thiserror::Error;

/// Errors that can occur while talking to the dongle
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Device disconnected")]
    Disconnected,

    #[error("Short write: {written} of {expected} bytes")]
    WriteIncomplete { written: usize, expected: usize },

    // HID-specific errors
    #[error("HID error: {0}")]
    HidError(String),

    #[error("HID permission denied: {0}")]
    HidPermissionDenied(String),

    // Generic
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TransportError {
    /// Whether the handle is unusable and the caller should stop retrying
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TransportError::Disconnected
                | TransportError::DeviceNotFound(_)
                | TransportError::HidPermissionDenied(_)
        )
    }
}

impl From<hidapi::HidError> for TransportError {
    fn from(e: hidapi::HidError) -> Self {
        classify_hid_message(e.to_string())
    }
}

/// Map a hidapi error string onto a variant.
///
/// hidapi only hands back platform strings, so this is a best-effort match.
fn classify_hid_message(msg: String) -> TransportError {
    let lower = msg.to_ascii_lowercase();
    if lower.contains("permission denied") || msg.contains("EPERM") || msg.contains("EACCES") {
        TransportError::HidPermissionDenied(msg)
    } else if lower.contains("no such device")
        || lower.contains("device not connected")
        || lower.contains("disconnected")
        || msg.contains("ENODEV")
    {
        TransportError::Disconnected
    } else {
        TransportError::HidError(msg)
    }
}
