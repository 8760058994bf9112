//! Vendor report codec for the Cloud III S dongle
//!
//! Reverse engineered from USB captures. Two report families share the
//! vendor interface:
//!
//! ```text
//! Host -> Device (Output, ID 0x0C): 0C 02 03 01 00 06 00 ...zero pad
//! Device -> Host (Input,  ID 0x0C): 0C 02 03 01 00 06 <PCT> <FLAGS1> <FLAGS2> ...
//! Device -> Host (Input,  ID 0x0D): 0D 02 03 00 0A <STATE> ...
//! ```
//!
//! The 0x0D charging report is edge-triggered: it is only sent on plug and
//! unplug, never periodically.

use serde::Serialize;

use crate::error::EncodingError;

/// HID report IDs
pub mod report_id {
    /// Battery query and battery reply
    pub const BATTERY: u8 = 0x0C;
    /// Charging state notification
    pub const CHARGING: u8 = 0x0D;
}

/// Command bytes (byte 5 of a 0x0C report)
pub mod cmd {
    pub const BATTERY: u8 = 0x06;

    /// Get human-readable name for command byte
    pub fn name(cmd: u8) -> &'static str {
        match cmd {
            BATTERY => "BATTERY",
            _ => "UNKNOWN",
        }
    }
}

/// Tag byte of the charging notification (byte 4)
pub const CHARGING_TAG: u8 = 0x0A;

/// Header shared by every charging notification, after the report ID
const CHARGING_HEADER: [u8; 3] = [0x02, 0x03, 0x00];

/// Output report size used when the interface does not report one
pub const DEFAULT_REPORT_SIZE: usize = 64;

/// Logical battery query payload (report ID + fixed header + command)
pub const BATTERY_QUERY: [u8; 7] = [
    report_id::BATTERY,
    0x02,
    0x03,
    0x01,
    0x00,
    cmd::BATTERY,
    0x00,
];

/// Minimum length of a charging notification
pub const CHARGING_REPORT_MIN_LEN: usize = 6;

/// Minimum length of a battery reply
pub const BATTERY_REPLY_MIN_LEN: usize = 9;

/// Decoded battery reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatteryReport {
    /// Battery percent as reported; not range checked
    pub percent: u8,
    /// Opaque status byte, meaning unknown
    pub flags1: u8,
    /// Opaque status byte, meaning unknown
    pub flags2: u8,
}

/// Decoded charging notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChargingEvent {
    pub is_charging: bool,
}

/// Classification of one inbound report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Battery(BatteryReport),
    Charging(ChargingEvent),
    /// Matches neither known shape
    Unrecognized,
}

impl Report {
    /// Short name for log lines
    pub fn name(&self) -> &'static str {
        match self {
            Report::Battery(_) => "battery",
            Report::Charging(_) => "charging",
            Report::Unrecognized => "unrecognized",
        }
    }
}

/// Build the battery query, zero padded to `output_capacity`
///
/// A capacity of 0 means "unknown" and pads to [`DEFAULT_REPORT_SIZE`].
pub fn encode_battery_query(output_capacity: usize) -> Result<Vec<u8>, EncodingError> {
    let capacity = if output_capacity == 0 {
        DEFAULT_REPORT_SIZE
    } else {
        output_capacity
    };
    if BATTERY_QUERY.len() > capacity {
        return Err(EncodingError::ReportTooLong {
            len: BATTERY_QUERY.len(),
            capacity,
        });
    }

    let mut buf = vec![0u8; capacity];
    buf[..BATTERY_QUERY.len()].copy_from_slice(&BATTERY_QUERY);
    Ok(buf)
}

/// Classify an inbound report
///
/// The charging shape is tested before the battery shape; keep that order.
pub fn decode(buf: &[u8]) -> Report {
    if let Some(event) = parse_charging_event(buf) {
        return Report::Charging(event);
    }
    if let Some(report) = parse_battery_reply(buf) {
        return Report::Battery(report);
    }
    Report::Unrecognized
}

/// Parse `0D 02 03 00 0A <STATE>`; only STATE 00/01 are recognized
pub fn parse_charging_event(buf: &[u8]) -> Option<ChargingEvent> {
    if buf.len() < CHARGING_REPORT_MIN_LEN {
        return None;
    }
    if buf[0] != report_id::CHARGING || buf[1..4] != CHARGING_HEADER || buf[4] != CHARGING_TAG {
        return None;
    }
    let is_charging = match buf[5] {
        0 => false,
        1 => true,
        _ => return None,
    };
    Some(ChargingEvent { is_charging })
}

/// Parse `0C .. .. .. .. 06 <PCT> <FLAGS1> <FLAGS2>`
pub fn parse_battery_reply(buf: &[u8]) -> Option<BatteryReport> {
    if buf.len() < BATTERY_REPLY_MIN_LEN {
        return None;
    }
    if buf[0] != report_id::BATTERY || buf[5] != cmd::BATTERY {
        return None;
    }
    Some(BatteryReport {
        percent: buf[6],
        flags1: buf[7],
        flags2: buf[8],
    })
}

/// Uppercase dash-separated hex, e.g. `0C-02-03`
pub fn hex_dump(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join("-")
}
