//! HID report channel over the dongle's vendor interface
//!
//! Raw I/O only. Reads are non-blocking; pacing and deadlines belong to
//! the caller.

use hidapi::HidDevice;
use tracing::{debug, trace};

use crate::error::TransportError;
use crate::types::HidInterfaceInfo;
use crate::ReportChannel;

/// Opened dongle interface
///
/// The handle is closed when this value is dropped.
pub struct HidDongleChannel {
    device: HidDevice,
    info: HidInterfaceInfo,
}

impl HidDongleChannel {
    /// Wrap an opened device and switch it to non-blocking reads
    pub fn new(device: HidDevice, info: HidInterfaceInfo) -> Result<Self, TransportError> {
        device.set_blocking_mode(false)?;
        Ok(Self { device, info })
    }
}

impl ReportChannel for HidDongleChannel {
    fn write_report(&mut self, report: &[u8]) -> Result<(), TransportError> {
        trace!(
            "Writing {} bytes: {:02X?}",
            report.len(),
            &report[..report.len().min(16)]
        );
        let written = self.device.write(report)?;
        if written < report.len() {
            return Err(TransportError::WriteIncomplete {
                written,
                expected: report.len(),
            });
        }
        Ok(())
    }

    fn read_report(&mut self, max_len: usize) -> Result<Option<Vec<u8>>, TransportError> {
        let mut buf = vec![0u8; max_len.max(1)];
        let len = self.device.read_timeout(&mut buf, 0)?;
        if len == 0 {
            return Ok(None);
        }
        buf.truncate(len);
        trace!("Read {} bytes: {:02X?}", len, &buf[..len.min(16)]);
        Ok(Some(buf))
    }

    fn interface(&self) -> &HidInterfaceInfo {
        &self.info
    }
}

impl Drop for HidDongleChannel {
    fn drop(&mut self) {
        debug!("HidDongleChannel dropped, releasing {}", self.info.path);
    }
}
