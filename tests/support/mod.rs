//! In-memory report channel driven by a script of read results

#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use cloud3s_transport::{HidInterfaceInfo, ReportChannel, TransportError};
use hyperx_battery::QueryOptions;

/// One scripted `read_report` result
pub enum Step {
    Report(Vec<u8>),
    Empty,
    Error(TransportError),
}

/// Replays `Step`s in order, then reports nothing available
pub struct ScriptedChannel {
    steps: VecDeque<Step>,
    pub writes: Vec<Vec<u8>>,
    pub reads: usize,
    info: HidInterfaceInfo,
}

impl ScriptedChannel {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            writes: Vec::new(),
            reads: 0,
            info: HidInterfaceInfo {
                path: "scripted".into(),
                vid: 0x03F0,
                pid: 0x06BE,
                interface_number: 3,
                usage_page: 0xFF13,
                usage: 0x0001,
                product_name: Some("HyperX Cloud III S Wireless".into()),
                serial: None,
                max_input_report_len: None,
                max_output_report_len: None,
            },
        }
    }

    /// Append steps for a later cycle
    pub fn push(&mut self, steps: impl IntoIterator<Item = Step>) {
        self.steps.extend(steps);
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl ReportChannel for ScriptedChannel {
    fn write_report(&mut self, report: &[u8]) -> Result<(), TransportError> {
        self.writes.push(report.to_vec());
        Ok(())
    }

    fn read_report(&mut self, max_len: usize) -> Result<Option<Vec<u8>>, TransportError> {
        self.reads += 1;
        match self.steps.pop_front() {
            Some(Step::Report(mut buf)) => {
                buf.truncate(max_len);
                Ok(Some(buf))
            }
            Some(Step::Empty) | None => Ok(None),
            Some(Step::Error(e)) => Err(e),
        }
    }

    fn interface(&self) -> &HidInterfaceInfo {
        &self.info
    }
}

/// Battery reply as sent by the dongle, zero-padded to 64 bytes
pub fn battery_reply(percent: u8, flags1: u8, flags2: u8) -> Vec<u8> {
    padded(&[0x0C, 0x02, 0x03, 0x01, 0x00, 0x06, percent, flags1, flags2])
}

/// Charging-state notification, zero-padded to 64 bytes
pub fn charging_report(state: u8) -> Vec<u8> {
    padded(&[0x0D, 0x02, 0x03, 0x00, 0x0A, state])
}

fn padded(bytes: &[u8]) -> Vec<u8> {
    let mut buf = bytes.to_vec();
    buf.resize(64, 0);
    buf
}

/// Short deadlines so timeout paths finish quickly
pub fn fast_options() -> QueryOptions {
    QueryOptions {
        timeout: Duration::from_millis(50),
        idle_sleep: Duration::from_millis(1),
        stale_threshold: Duration::from_secs(10),
        ..QueryOptions::default()
    }
}
