//! Report channel abstraction for HyperX Cloud III S wireless dongles
//!
//! The dongle exposes a vendor HID interface that carries battery queries
//! (output reports) and asynchronous replies/notifications (input reports).
//! This crate only moves raw reports; decoding lives in `hyperx_battery`.

pub mod device_registry;
pub mod error;
pub mod types;

mod discovery;
mod hid_dongle;

pub use device_registry::{is_vendor_usage_page, PRODUCT_ID, VENDOR_ID};
pub use discovery::{pick_best, HidDiscovery, ReportLengths};
pub use error::TransportError;
pub use hid_dongle::HidDongleChannel;
pub use types::HidInterfaceInfo;

/// A bidirectional channel of whole HID reports
///
/// Byte 0 of every report is the report ID, in both directions.
pub trait ReportChannel {
    /// Write one output report (fire-and-forget, no acknowledgment)
    fn write_report(&mut self, report: &[u8]) -> Result<(), TransportError>;

    /// Read one input report without blocking
    ///
    /// # Arguments
    /// * `max_len` - Largest report to accept
    ///
    /// # Returns
    /// `None` when no report is currently available
    fn read_report(&mut self, max_len: usize) -> Result<Option<Vec<u8>>, TransportError>;

    /// Descriptor of the opened interface
    fn interface(&self) -> &HidInterfaceInfo;
}

impl<C: ReportChannel + ?Sized> ReportChannel for &mut C {
    fn write_report(&mut self, report: &[u8]) -> Result<(), TransportError> {
        (**self).write_report(report)
    }

    fn read_report(&mut self, max_len: usize) -> Result<Option<Vec<u8>>, TransportError> {
        (**self).read_report(max_len)
    }

    fn interface(&self) -> &HidInterfaceInfo {
        (**self).interface()
    }
}

impl<C: ReportChannel + ?Sized> ReportChannel for Box<C> {
    fn write_report(&mut self, report: &[u8]) -> Result<(), TransportError> {
        (**self).write_report(report)
    }

    fn read_report(&mut self, max_len: usize) -> Result<Option<Vec<u8>>, TransportError> {
        (**self).read_report(max_len)
    }

    fn interface(&self) -> &HidInterfaceInfo {
        (**self).interface()
    }
}
