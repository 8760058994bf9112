//! Battery query command

use std::ops::ControlFlow;
use std::process::ExitCode;
use std::time::Duration;

use cloud3s_transport::ReportChannel;
use hyperx_battery::protocol::DEFAULT_REPORT_SIZE;
use hyperx_battery::{run_cycle, watch, AppConfig, ChargingState, ChargingStatus, QueryOutcome};
use serde::Serialize;
use tracing::{info, warn};

use super::{exit, open_channel, setup_interrupt_handler, CommandResult};
use crate::cli::BatteryArgs;

/// How each query result is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Quiet,
    Json,
}

impl OutputFormat {
    fn from_args(args: &BatteryArgs) -> Self {
        if args.json {
            Self::Json
        } else if args.quiet {
            Self::Quiet
        } else {
            Self::Text
        }
    }
}

#[derive(Serialize)]
struct JsonStatus {
    success: bool,
    battery_percent: Option<u8>,
    charging: ChargingStatus,
    flags1: Option<u8>,
    flags2: Option<u8>,
    unrecognized: usize,
}

/// A rendered result, split by stream
#[derive(Debug, PartialEq, Eq)]
enum Line {
    Stdout(String),
    Stderr(String),
}

fn render(
    outcome: &QueryOutcome,
    format: OutputFormat,
    timeout: Duration,
) -> serde_json::Result<Line> {
    let line = match (format, outcome.battery) {
        (OutputFormat::Json, battery) => Line::Stdout(serde_json::to_string(&JsonStatus {
            success: outcome.success(),
            battery_percent: battery.map(|b| b.percent),
            charging: outcome.charging_status,
            flags1: battery.map(|b| b.flags1),
            flags2: battery.map(|b| b.flags2),
            unrecognized: outcome.unrecognized,
        })?),
        (OutputFormat::Quiet, Some(b)) => Line::Stdout(b.percent.to_string()),
        (OutputFormat::Text, Some(b)) => Line::Stdout(format!(
            "Battery: {}%  (charging: {}, flags: {:02X} {:02X})",
            b.percent, outcome.charging_status, b.flags1, b.flags2
        )),
        (_, None) => Line::Stderr(format!(
            "No battery reply within {}ms",
            timeout.as_millis()
        )),
    };
    Ok(line)
}

fn print_outcome(outcome: &QueryOutcome, format: OutputFormat, timeout: Duration) {
    match render(outcome, format, timeout) {
        Ok(Line::Stdout(line)) => println!("{line}"),
        Ok(Line::Stderr(line)) => eprintln!("{line}"),
        Err(e) => warn!("Failed to encode status: {e}"),
    }
}

/// Query the headset once, or repeatedly with `--watch`
pub fn battery(config: &AppConfig, args: &BatteryArgs) -> CommandResult {
    let mut channel = open_channel(config)?;
    let interface = channel.interface();
    let options = config.query_options(
        interface.input_len_or(DEFAULT_REPORT_SIZE),
        interface.output_len_or(DEFAULT_REPORT_SIZE),
    );
    let format = OutputFormat::from_args(args);

    if !args.watch {
        let mut state = ChargingState::new();
        let outcome = run_cycle(&mut channel, &mut state, &options)?;
        print_outcome(&outcome, format, options.timeout);
        return Ok(if outcome.success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(exit::NO_REPLY)
        });
    }

    let running = setup_interrupt_handler();
    info!("Watching every {}ms, Ctrl+C to stop", config.interval().as_millis());
    watch(&mut channel, &options, config.interval(), &running, |outcome| {
        print_outcome(outcome, format, options.timeout);
        if !outcome.success() && args.verbose {
            eprintln!("(retrying...)");
        }
        ControlFlow::Continue(())
    })?;
    info!("Stopped");

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyperx_battery::BatteryReport;

    const TIMEOUT: Duration = Duration::from_millis(1000);

    fn outcome(battery: Option<BatteryReport>, status: ChargingStatus) -> QueryOutcome {
        QueryOutcome {
            battery,
            charging: ChargingState::new(),
            charging_status: status,
            unrecognized: 0,
            elapsed: Duration::from_millis(12),
        }
    }

    fn report() -> BatteryReport {
        BatteryReport {
            percent: 87,
            flags1: 0x00,
            flags2: 0x1F,
        }
    }

    #[test]
    fn test_text_line() {
        let line = render(
            &outcome(Some(report()), ChargingStatus::Yes),
            OutputFormat::Text,
            TIMEOUT,
        )
        .unwrap();
        assert_eq!(
            line,
            Line::Stdout("Battery: 87%  (charging: yes, flags: 00 1F)".into())
        );
    }

    #[test]
    fn test_text_unknown_charging() {
        let line = render(
            &outcome(Some(report()), ChargingStatus::Unknown),
            OutputFormat::Text,
            TIMEOUT,
        )
        .unwrap();
        assert_eq!(
            line,
            Line::Stdout("Battery: 87%  (charging: unknown, flags: 00 1F)".into())
        );
    }

    #[test]
    fn test_quiet_prints_percent_only() {
        let line = render(
            &outcome(Some(report()), ChargingStatus::No),
            OutputFormat::Quiet,
            TIMEOUT,
        )
        .unwrap();
        assert_eq!(line, Line::Stdout("87".into()));
    }

    #[test]
    fn test_timeout_goes_to_stderr() {
        for format in [OutputFormat::Text, OutputFormat::Quiet] {
            let line = render(&outcome(None, ChargingStatus::Unknown), format, TIMEOUT).unwrap();
            assert_eq!(line, Line::Stderr("No battery reply within 1000ms".into()));
        }
    }

    #[test]
    fn test_json_success() {
        let Line::Stdout(json) = render(
            &outcome(Some(report()), ChargingStatus::No),
            OutputFormat::Json,
            TIMEOUT,
        )
        .unwrap() else {
            panic!("JSON goes to stdout");
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["battery_percent"], 87);
        assert_eq!(value["charging"], "no");
        assert_eq!(value["flags2"], 0x1F);
    }

    #[test]
    fn test_json_timeout() {
        let Line::Stdout(json) = render(
            &outcome(None, ChargingStatus::Unknown),
            OutputFormat::Json,
            TIMEOUT,
        )
        .unwrap() else {
            panic!("JSON goes to stdout");
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["success"], false);
        assert!(value["battery_percent"].is_null());
        assert_eq!(value["charging"], "unknown");
    }
}
