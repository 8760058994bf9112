//! Battery query cycle and watch loop
//!
//! One cycle sends the battery query and polls the channel until the reply
//! arrives or the deadline passes. Charging notifications seen on the way
//! update the caller's [`ChargingState`]; the watch loop carries that state
//! from cycle to cycle because the device only reports transitions.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use cloud3s_transport::ReportChannel;
use tracing::{debug, warn};

use crate::charging::{ChargingState, ChargingStatus, DEFAULT_STALE_THRESHOLD};
use crate::error::QueryError;
use crate::protocol::{self, cmd, report_id, BatteryReport, Report, DEFAULT_REPORT_SIZE};

/// Timing constants
pub mod timing {
    /// Time allowed for the battery reply
    pub const REPLY_TIMEOUT_MS: u64 = 1000;
    /// Sleep after an empty read
    pub const IDLE_SLEEP_MS: u64 = 10;
    /// Default pause between watch cycles
    pub const WATCH_INTERVAL_MS: u64 = 2000;
    /// Shortest pause between watch cycles
    pub const MIN_WATCH_INTERVAL_MS: u64 = 100;
    /// Granularity of the interruptible watch sleep
    pub const SHUTDOWN_POLL_MS: u64 = 50;
}

/// Parameters of one query cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Deadline for the battery reply, measured from the write
    pub timeout: Duration,
    /// Pause after an empty read
    pub idle_sleep: Duration,
    /// Charging events older than this display as unknown
    pub stale_threshold: Duration,
    /// Input report size to read with
    pub input_len: usize,
    /// Output report size to pad the query to
    pub output_len: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(timing::REPLY_TIMEOUT_MS),
            idle_sleep: Duration::from_millis(timing::IDLE_SLEEP_MS),
            stale_threshold: DEFAULT_STALE_THRESHOLD,
            input_len: DEFAULT_REPORT_SIZE,
            output_len: DEFAULT_REPORT_SIZE,
        }
    }
}

/// Result of one query cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    /// Battery reply, `None` if the deadline passed first
    pub battery: Option<BatteryReport>,
    /// Charging state after this cycle
    pub charging: ChargingState,
    /// Charging state as displayed when the cycle ended
    pub charging_status: ChargingStatus,
    /// Reports that matched neither known shape
    pub unrecognized: usize,
    /// Time from write to reply (or to the deadline)
    pub elapsed: Duration,
}

impl QueryOutcome {
    pub fn success(&self) -> bool {
        self.battery.is_some()
    }
}

/// Run one request/response cycle
///
/// `state` is updated in place for every charging event read, so events
/// seen before a channel error are kept.
///
/// # Errors
/// Encoding failures and channel errors. Missing the deadline is not an error.
pub fn run_cycle<C>(
    channel: &mut C,
    state: &mut ChargingState,
    options: &QueryOptions,
) -> Result<QueryOutcome, QueryError>
where
    C: ReportChannel + ?Sized,
{
    let request = protocol::encode_battery_query(options.output_len)?;
    channel.write_report(&request)?;

    let start = Instant::now();
    let deadline = start + options.timeout;
    let mut battery = None;
    let mut unrecognized = 0;

    loop {
        let now = Instant::now();
        if now >= deadline {
            break;
        }

        let buf = match channel.read_report(options.input_len)? {
            Some(buf) if !buf.is_empty() => buf,
            _ => {
                std::thread::sleep(options.idle_sleep.min(deadline - now));
                continue;
            }
        };

        let report = protocol::decode(&buf);
        debug!("{}", describe(report, &buf));
        match report {
            Report::Charging(event) => state.update(event, Instant::now()),
            Report::Battery(report) => {
                battery = Some(report);
                break;
            }
            Report::Unrecognized => unrecognized += 1,
        }
    }

    let elapsed = start.elapsed();
    match &battery {
        Some(report) => debug!(
            "Battery reply {}% in {:.1}ms",
            report.percent,
            elapsed.as_secs_f64() * 1000.0
        ),
        None => debug!(
            "No battery reply within {}ms ({} unrecognized)",
            options.timeout.as_millis(),
            unrecognized
        ),
    }

    Ok(QueryOutcome {
        battery,
        charging: *state,
        charging_status: state.display(Instant::now(), options.stale_threshold),
        unrecognized,
        elapsed,
    })
}

/// Run cycles until `on_cycle` breaks or `running` is cleared
///
/// Recoverable channel errors are logged and retried after `interval`;
/// fatal ones end the loop. Returns the charging state at exit.
pub fn watch<C, F>(
    channel: &mut C,
    options: &QueryOptions,
    interval: Duration,
    running: &AtomicBool,
    mut on_cycle: F,
) -> Result<ChargingState, QueryError>
where
    C: ReportChannel + ?Sized,
    F: FnMut(&QueryOutcome) -> ControlFlow<()>,
{
    let interval = interval.max(Duration::from_millis(timing::MIN_WATCH_INTERVAL_MS));
    let mut state = ChargingState::new();

    while running.load(Ordering::SeqCst) {
        match run_cycle(channel, &mut state, options) {
            Ok(outcome) => {
                if on_cycle(&outcome).is_break() {
                    break;
                }
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("Query cycle failed: {e} (retrying in {}ms)", interval.as_millis());
            }
        }
        sleep_while_running(interval, running);
    }

    Ok(state)
}

/// One log line for a routed report
fn describe(report: Report, buf: &[u8]) -> String {
    match report {
        Report::Charging(event) => format!(
            "{} report: {}",
            report.name(),
            if event.is_charging { "YES" } else { "NO" }
        ),
        Report::Battery(battery) => format!("{} report: {}%", report.name(), battery.percent),
        Report::Unrecognized => match (buf.first(), buf.get(5)) {
            (Some(&report_id::BATTERY), Some(&command)) => format!(
                "{} report (cmd {}): {}",
                report.name(),
                cmd::name(command),
                protocol::hex_dump(buf)
            ),
            _ => format!("{} report: {}", report.name(), protocol::hex_dump(buf)),
        },
    }
}

/// Sleep for `duration`, returning early once `running` is cleared
fn sleep_while_running(duration: Duration, running: &AtomicBool) {
    let deadline = Instant::now() + duration;
    let step = Duration::from_millis(timing::SHUTDOWN_POLL_MS);
    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        std::thread::sleep(step.min(deadline - now));
    }
}
