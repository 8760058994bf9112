//! Utility commands

use std::path::Path;
use std::process::ExitCode;

use cloud3s_transport::{pick_best, HidDiscovery};
use hidapi::HidApi;
use hyperx_battery::AppConfig;

use super::CommandResult;

/// List the dongle's interfaces, marking the one a query would open
pub fn list(config: &AppConfig, all: bool) -> CommandResult {
    if all {
        return list_all();
    }

    let discovery = HidDiscovery::new()?;
    let interfaces = discovery.list(config.vid, config.pid);
    if interfaces.is_empty() {
        eprintln!(
            "No HID interfaces found for {:04X}:{:04X}",
            config.vid, config.pid
        );
        return Ok(ExitCode::FAILURE);
    }

    let best = match config.path.as_deref() {
        Some(path) => interfaces.iter().find(|i| i.path == path),
        None => pick_best(&interfaces),
    };
    println!("Interfaces for {:04X}:{:04X}:", config.vid, config.pid);
    for interface in &interfaces {
        let marker = if best.is_some_and(|b| b.path == interface.path) {
            '*'
        } else {
            ' '
        };
        println!("{marker} {interface}");
    }
    Ok(ExitCode::SUCCESS)
}

fn list_all() -> CommandResult {
    let hidapi = HidApi::new()?;
    println!("All HID devices:");
    for device_info in hidapi.device_list() {
        println!(
            "  VID={:04X} PID={:04X} usage={:04X} page={:04X} if={} {}",
            device_info.vendor_id(),
            device_info.product_id(),
            device_info.usage(),
            device_info.usage_page(),
            device_info.interface_number(),
            device_info.product_string().unwrap_or("?"),
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the merged configuration, optionally saving it to `path`
pub fn config(config: &AppConfig, path: &Path, save: bool) -> CommandResult {
    print!("{}", toml::to_string_pretty(config)?);
    if save {
        config.save(path)?;
        eprintln!("Saved to {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}
