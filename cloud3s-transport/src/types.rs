//! Common types for the transport layer

use std::fmt;

/// Immutable description of one HID interface of the dongle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HidInterfaceInfo {
    /// Platform device path (passed back to `open_path`)
    pub path: String,
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// USB interface number (-1 when the backend does not know)
    pub interface_number: i32,
    /// HID usage page of the top-level collection
    pub usage_page: u16,
    /// HID usage of the top-level collection
    pub usage: u16,
    /// Product name if available
    pub product_name: Option<String>,
    /// Serial number if available
    pub serial: Option<String>,
    /// Largest input report, when known
    pub max_input_report_len: Option<usize>,
    /// Largest output report, when known
    pub max_output_report_len: Option<usize>,
}

impl HidInterfaceInfo {
    /// Input report size to read with, falling back to `default`
    pub fn input_len_or(&self, default: usize) -> usize {
        self.max_input_report_len
            .filter(|&len| len > 0)
            .unwrap_or(default)
    }

    /// Output report size to pad to, falling back to `default`
    pub fn output_len_or(&self, default: usize) -> usize {
        self.max_output_report_len
            .filter(|&len| len > 0)
            .unwrap_or(default)
    }
}

impl fmt::Display for HidInterfaceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VID={:04X} PID={:04X} if={} page={:04X} usage={:04X}",
            self.vid, self.pid, self.interface_number, self.usage_page, self.usage
        )?;
        if let Some(name) = &self.product_name {
            write!(f, " \"{name}\"")?;
        }
        if let Some(serial) = &self.serial {
            write!(f, " serial={serial}")?;
        }
        write!(f, " path={}", self.path)
    }
}
