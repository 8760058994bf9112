//! Device registry - USB identifiers for the supported dongle

/// HP / HyperX vendor ID
pub const VENDOR_ID: u16 = 0x03F0;

/// HyperX Cloud III S Wireless dongle
pub const PRODUCT_ID: u16 = 0x06BE;

/// First vendor-defined HID usage page
pub const VENDOR_USAGE_PAGE_MIN: u16 = 0xFF00;

/// Check if a usage page is vendor-defined (0xFF00-0xFFFF)
///
/// The battery protocol runs on the vendor collection, not on the
/// consumer-control or audio interfaces the dongle also exposes.
#[inline]
pub fn is_vendor_usage_page(usage_page: u16) -> bool {
    usage_page >= VENDOR_USAGE_PAGE_MIN
}
