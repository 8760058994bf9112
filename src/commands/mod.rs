//! Command handlers for the CLI application.
//!
//! - `battery`: battery and charging query, single shot or watch
//! - `utility`: interface listing and config display

pub mod battery;
pub mod utility;

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use cloud3s_transport::{HidDiscovery, HidDongleChannel};
use hyperx_battery::AppConfig;

/// Process exit statuses
pub mod exit {
    /// No battery reply before the deadline
    pub const NO_REPLY: u8 = 2;
}

/// Result type for command handlers
pub type CommandResult = anyhow::Result<ExitCode>;

/// Open the dongle's vendor interface described by `config`
pub fn open_channel(config: &AppConfig) -> anyhow::Result<HidDongleChannel> {
    let discovery = HidDiscovery::new()?;
    discovery
        .open(
            config.vid,
            config.pid,
            config.path.as_deref(),
            config.report_lengths(),
        )
        .with_context(|| format!("Failed to open {:04X}:{:04X}", config.vid, config.pid))
}

/// Setup Ctrl+C handler and return running flag
pub fn setup_interrupt_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .ok();

    running
}
