use core::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use sleet::{DEFAULT_REGION_ID, WaitStrategy, WorkerIdentity};

use crate::output::{InputFormat, OutputFormat};

/// Runtime configuration for the `sleet` binary.
///
/// Worker settings are parsed from CLI arguments or environment variables
/// (a `.env` file in the working directory is loaded first).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sleet",
    version,
    about = "Generate and inspect 64-bit sleet IDs"
)]
pub struct CliArgs {
    /// Node id stamped into generated IDs (0..=511). Required by `generate`.
    ///
    /// Every process sharing a region must use a distinct node id.
    ///
    /// Environment variable: `SLEET_NODE_ID`
    #[arg(long, env = "SLEET_NODE_ID", global = true)]
    pub node_id: Option<u16>,

    /// Region id stamped into generated IDs (0..=31).
    ///
    /// Environment variable: `SLEET_REGION_ID`
    #[arg(long, env = "SLEET_REGION_ID", global = true, default_value_t = DEFAULT_REGION_ID)]
    pub region_id: u8,

    /// How to wait when a millisecond's 1024 sequence values are used up.
    ///
    /// Environment variable: `SLEET_WAIT`
    #[arg(long, env = "SLEET_WAIT", global = true, value_enum, default_value_t = WaitArg::Spin)]
    pub wait: WaitArg,

    /// Pause between clock reads for `--wait sleep`, in microseconds.
    ///
    /// Environment variable: `SLEET_SLEEP_US`
    #[arg(long, env = "SLEET_SLEEP_US", global = true, default_value_t = 100)]
    pub sleep_us: u64,

    /// Log output format. Logs are written to stderr.
    ///
    /// Environment variable: `SLEET_LOG_FORMAT`
    #[arg(long, env = "SLEET_LOG_FORMAT", global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate fresh IDs and print one per line.
    Generate {
        /// Number of IDs to generate. Requested from the worker in batches of
        /// at most 100.
        #[arg(short, long, default_value_t = 1)]
        count: usize,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Decimal)]
        format: OutputFormat,
    },
    /// Decode IDs and print their fields.
    Inspect {
        #[arg(short, long, value_enum, default_value_t = InputFormat::Decimal)]
        input: InputFormat,

        /// Print the bit layout table instead of a single line per ID.
        #[arg(long, default_value_t = false)]
        layout: bool,

        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitArg {
    Spin,
    Yield,
    Sleep,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

/// Validated configuration derived from [`CliArgs`].
#[derive(Debug, Clone)]
pub struct Config {
    pub log_format: LogFormat,
    pub mode: Mode,
}

#[derive(Debug, Clone)]
pub enum Mode {
    Generate {
        identity: WorkerIdentity,
        wait: WaitStrategy,
        count: usize,
        format: OutputFormat,
    },
    Inspect {
        input: InputFormat,
        layout: bool,
        ids: Vec<String>,
    },
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let mode = match args.command {
            Command::Generate { count, format } => {
                let Some(node_id) = args.node_id else {
                    bail!("SLEET_NODE_ID (--node-id) is required to generate IDs");
                };
                if count == 0 {
                    bail!("--count must be greater than 0");
                }
                let identity = WorkerIdentity::new(node_id, args.region_id)
                    .context("invalid worker identity")?;
                let wait = match args.wait {
                    WaitArg::Spin => WaitStrategy::Spin,
                    WaitArg::Yield => WaitStrategy::Yield,
                    WaitArg::Sleep => {
                        if args.sleep_us == 0 {
                            bail!("SLEET_SLEEP_US must be greater than 0 with --wait sleep");
                        }
                        WaitStrategy::Sleep(Duration::from_micros(args.sleep_us))
                    }
                };
                Mode::Generate {
                    identity,
                    wait,
                    count,
                    format,
                }
            }
            Command::Inspect { input, layout, ids } => Mode::Inspect { input, layout, ids },
        };

        Ok(Self {
            log_format: args.log_format,
            mode,
        })
    }
}
