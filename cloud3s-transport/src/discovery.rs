//! Device discovery for the Cloud III S dongle

use std::ffi::CString;

use hidapi::{DeviceInfo, HidApi};
use tracing::{debug, info};

use crate::device_registry;
use crate::error::TransportError;
use crate::hid_dongle::HidDongleChannel;
use crate::types::HidInterfaceInfo;

/// Report length overrides applied to the opened interface
///
/// hidapi does not expose the descriptor's report sizes, so these come from
/// configuration. `None` leaves the interface value untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportLengths {
    pub input: Option<usize>,
    pub output: Option<usize>,
}

/// HID enumeration wrapper
pub struct HidDiscovery {
    api: HidApi,
}

impl HidDiscovery {
    /// Initialise hidapi and take a device snapshot
    pub fn new() -> Result<Self, TransportError> {
        let api = HidApi::new()?;
        Ok(Self { api })
    }

    /// List interfaces matching a VID/PID pair
    pub fn list(&self, vid: u16, pid: u16) -> Vec<HidInterfaceInfo> {
        self.api
            .device_list()
            .filter(|d| d.vendor_id() == vid && d.product_id() == pid)
            .map(interface_info)
            .collect()
    }

    /// Open the dongle's report interface
    ///
    /// An explicit `path` is opened as-is, even if enumeration does not list
    /// it. Otherwise the best candidate from [`pick_best`] is used.
    pub fn open(
        &self,
        vid: u16,
        pid: u16,
        path: Option<&str>,
        lengths: ReportLengths,
    ) -> Result<HidDongleChannel, TransportError> {
        let candidates = self.list(vid, pid);
        debug!(
            "Found {} interface(s) for {:04X}:{:04X}",
            candidates.len(),
            vid,
            pid
        );

        let mut info = match path {
            Some(path) => candidates
                .iter()
                .find(|c| c.path == path)
                .cloned()
                .unwrap_or_else(|| bare_interface(vid, pid, path)),
            None => {
                if candidates.is_empty() {
                    return Err(TransportError::DeviceNotFound(format!(
                        "No matching HID devices found for {vid:04X}:{pid:04X}"
                    )));
                }
                pick_best(&candidates).cloned().ok_or_else(|| {
                    TransportError::DeviceNotFound("Could not pick a device path; pass --path".into())
                })?
            }
        };

        if lengths.input.is_some() {
            info.max_input_report_len = lengths.input;
        }
        if lengths.output.is_some() {
            info.max_output_report_len = lengths.output;
        }

        let c_path = CString::new(info.path.as_bytes())
            .map_err(|_| TransportError::Internal(format!("Invalid device path: {}", info.path)))?;
        let device = self.api.open_path(&c_path)?;
        info!("Opened {}", info);

        HidDongleChannel::new(device, info)
    }
}

/// Choose the interface to talk to
///
/// Prefers the largest known output report, then a vendor-defined usage
/// page, then enumeration order.
pub fn pick_best(candidates: &[HidInterfaceInfo]) -> Option<&HidInterfaceInfo> {
    candidates
        .iter()
        .enumerate()
        .max_by_key(|(idx, c)| {
            (
                c.max_output_report_len.unwrap_or(0),
                device_registry::is_vendor_usage_page(c.usage_page),
                std::cmp::Reverse(*idx),
            )
        })
        .map(|(_, c)| c)
}

fn interface_info(d: &DeviceInfo) -> HidInterfaceInfo {
    HidInterfaceInfo {
        path: d.path().to_string_lossy().into_owned(),
        vid: d.vendor_id(),
        pid: d.product_id(),
        interface_number: d.interface_number(),
        usage_page: d.usage_page(),
        usage: d.usage(),
        product_name: d.product_string().map(str::to_owned),
        serial: d.serial_number().map(str::to_owned),
        max_input_report_len: None,
        max_output_report_len: None,
    }
}

fn bare_interface(vid: u16, pid: u16, path: &str) -> HidInterfaceInfo {
    HidInterfaceInfo {
        path: path.to_owned(),
        vid,
        pid,
        interface_number: -1,
        usage_page: 0,
        usage: 0,
        product_name: None,
        serial: None,
        max_input_report_len: None,
        max_output_report_len: None,
    }
}
