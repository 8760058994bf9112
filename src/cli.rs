// CLI definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use hyperx_battery::ConfigOverrides;

#[derive(Parser)]
#[command(name = "hyperx-battery")]
#[command(author, version, about = "HyperX Cloud III S Wireless battery query")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Config file path (default: ~/.config/hyperx-battery/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// USB vendor ID (hex 0x03F0 or decimal)
    #[arg(long, global = true, value_parser = parse_u16)]
    pub vid: Option<u16>,

    /// USB product ID (hex 0x06BE or decimal)
    #[arg(long, global = true, value_parser = parse_u16)]
    pub pid: Option<u16>,

    /// HID device path to open instead of auto-picking an interface
    #[arg(long, global = true)]
    pub path: Option<String>,

    #[command(flatten)]
    pub battery: BatteryArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Query battery level and charging state (default)
    #[command(visible_aliases = ["bat", "b"])]
    Battery(BatteryArgs),

    /// List HID interfaces of the dongle
    #[command(visible_aliases = ["ls"])]
    List {
        /// List every HID device, not just the dongle
        #[arg(short, long)]
        all: bool,
    },

    /// Show the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args, Clone, Default)]
pub struct BatteryArgs {
    /// Battery reply deadline in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Poll repeatedly
    #[arg(short, long)]
    pub watch: bool,

    /// Pause between polls in milliseconds (used with --watch)
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Charging is shown as unknown if no charging-state report was seen
    /// within this window. The dongle only sends one on plug/unplug.
    #[arg(long, value_name = "MS")]
    pub charging_stale_ms: Option<u64>,

    /// Input report size (default 64)
    #[arg(long, value_name = "BYTES")]
    pub input_len: Option<usize>,

    /// Output report size the query is padded to (default 64)
    #[arg(long, value_name = "BYTES")]
    pub output_len: Option<usize>,

    /// Log every report received (same as --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Print only the battery percentage (for scripts)
    #[arg(short, long, conflicts_with = "json")]
    pub quiet: bool,

    /// Print one JSON object per query
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// The command to run, `battery` when none was given
    pub fn resolved_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Battery(self.battery.clone()))
    }

    /// Log filter for `--log-level`, raised to `debug` by `--verbose`
    ///
    /// A level already more verbose than `debug` is kept, as is any filter
    /// directive that is not a bare level.
    pub fn log_filter(&self, verbose: bool) -> String {
        match self.log_level.parse::<Level>() {
            Ok(level) if verbose && level < Level::DEBUG => "debug".to_owned(),
            _ => self.log_level.clone(),
        }
    }

    /// Config values given on the command line
    pub fn overrides(&self, command: &Commands) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            vid: self.vid,
            pid: self.pid,
            path: self.path.clone(),
            ..ConfigOverrides::default()
        };
        if let Commands::Battery(args) = command {
            overrides.timeout_ms = args.timeout_ms;
            overrides.interval_ms = args.interval_ms;
            overrides.charging_stale_ms = args.charging_stale_ms;
            overrides.input_len = args.input_len;
            overrides.output_len = args.output_len;
        }
        overrides
    }
}

/// Parse `0x`-prefixed hex or plain decimal
fn parse_u16(s: &str) -> Result<u16, String> {
    let s = s.trim();
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16)
    } else {
        s.parse::<u16>()
    };
    parsed.map_err(|e| format!("invalid 16-bit id '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u16() {
        assert_eq!(parse_u16("0x03F0"), Ok(0x03F0));
        assert_eq!(parse_u16("0X06be"), Ok(0x06BE));
        assert_eq!(parse_u16("1008"), Ok(1008));
        assert!(parse_u16("0x10000").is_err());
        assert!(parse_u16("dongle").is_err());
    }

    #[test]
    fn test_default_command_is_battery() {
        let cli = Cli::parse_from(["hyperx-battery", "--watch", "--interval-ms", "500"]);
        let Commands::Battery(args) = cli.resolved_command() else {
            panic!("Expected battery command");
        };
        assert!(args.watch);
        assert_eq!(args.interval_ms, Some(500));
    }

    #[test]
    fn test_battery_subcommand_overrides() {
        let cli = Cli::parse_from([
            "hyperx-battery",
            "--pid",
            "0x1234",
            "battery",
            "--timeout-ms",
            "250",
            "--charging-stale-ms",
            "4000",
        ]);
        let command = cli.resolved_command();
        let overrides = cli.overrides(&command);
        assert_eq!(overrides.pid, Some(0x1234));
        assert_eq!(overrides.vid, None);
        assert_eq!(overrides.timeout_ms, Some(250));
        assert_eq!(overrides.charging_stale_ms, Some(4000));
    }

    #[test]
    fn test_verbose_raises_quiet_levels_to_debug() {
        let cli = Cli::parse_from(["hyperx-battery", "--verbose"]);
        assert_eq!(cli.log_filter(true), "debug");
        assert_eq!(cli.log_filter(false), "warn");
    }

    #[test]
    fn test_verbose_keeps_trace() {
        let cli = Cli::parse_from(["hyperx-battery", "--log-level", "trace", "--verbose"]);
        assert_eq!(cli.log_filter(true), "trace");
    }

    #[test]
    fn test_verbose_keeps_filter_directives() {
        let cli = Cli::parse_from(["hyperx-battery", "--log-level", "hyperx_battery=info"]);
        assert_eq!(cli.log_filter(true), "hyperx_battery=info");
    }

    #[test]
    fn test_list_subcommand() {
        let cli = Cli::parse_from(["hyperx-battery", "list", "--all"]);
        assert!(matches!(cli.resolved_command(), Commands::List { all: true }));
    }

    #[test]
    fn test_quiet_conflicts_with_json() {
        assert!(Cli::try_parse_from(["hyperx-battery", "--quiet", "--json"]).is_err());
    }
}
