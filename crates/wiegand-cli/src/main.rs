//! Wiegand card reader CLI.
//!
//! Decode bit strings offline, or push them through the mock reader and
//! the real decoder into the card log.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use wiegand_core::constants::{DEFAULT_BIT_TIMEOUT_MS, DEFAULT_ONE_PIN, DEFAULT_ZERO_PIN};
use wiegand_storage::Credential;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "wiegand")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Wiegand card reader decoder", long_about = None)]
struct Cli {
    /// Log filter, e.g. `debug` or `wiegand_decoder=trace` (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print results as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the fields of a codeword given as a binary string
    Decode {
        /// Codeword bits, MSB first (e.g. 00010101000000101001110011)
        bits: String,
    },

    /// Present codewords through the mock reader and decode them
    Simulate(SimulateArgs),
}

#[derive(clap::Args, Debug, Clone)]
struct SimulateArgs {
    /// Codewords to present, MSB first
    #[arg(required = true)]
    bits: Vec<String>,

    /// GPIO wired to DATA0 (green)
    #[arg(long, default_value_t = DEFAULT_ZERO_PIN)]
    zero_pin: u8,

    /// GPIO wired to DATA1 (white)
    #[arg(long, default_value_t = DEFAULT_ONE_PIN)]
    one_pin: u8,

    /// Inactivity window that ends a frame, in milliseconds
    #[arg(long, default_value_t = DEFAULT_BIT_TIMEOUT_MS)]
    bit_timeout_ms: u64,

    /// Delay between reader pulses, in microseconds
    #[arg(long, default_value_t = 1000)]
    pulse_interval_us: u64,

    /// Card log CSV file
    #[arg(long, default_value = "cards.csv")]
    log: PathBuf,

    /// Allowed credential as FC:CARD (repeatable)
    #[arg(long = "allow", value_name = "FC:CARD", default_value = "42:31337")]
    allow: Vec<Credential>,
}

fn init_logging(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match cli.command {
        Commands::Decode { bits } => commands::cmd_decode(&bits, cli.json),
        Commands::Simulate(args) => commands::cmd_simulate(args, cli.json).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_decode() {
        let cli = Cli::try_parse_from(["wiegand", "decode", "0101"]).unwrap();
        assert!(!cli.json);
        assert!(matches!(cli.command, Commands::Decode { bits } if bits == "0101"));
    }

    #[test]
    fn test_parse_simulate_defaults() {
        let cli = Cli::try_parse_from(["wiegand", "simulate", "01", "10"]).unwrap();
        let Commands::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.bits, vec!["01", "10"]);
        assert_eq!(args.zero_pin, 17);
        assert_eq!(args.one_pin, 18);
        assert_eq!(args.bit_timeout_ms, 5);
        assert_eq!(args.log, PathBuf::from("cards.csv"));
        assert_eq!(args.allow, vec![Credential::new(42, 31337)]);
    }

    #[test]
    fn test_parse_simulate_allow_list() {
        let cli = Cli::try_parse_from([
            "wiegand",
            "--json",
            "simulate",
            "--allow",
            "1:2",
            "--allow",
            "3:4",
            "--zero-pin",
            "5",
            "0",
        ])
        .unwrap();
        assert!(cli.json);
        let Commands::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.allow, vec![Credential::new(1, 2), Credential::new(3, 4)]);
        assert_eq!(args.zero_pin, 5);
    }

    #[test]
    fn test_parse_rejects_bad_credential() {
        let result = Cli::try_parse_from(["wiegand", "simulate", "--allow", "42", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_simulate_requires_bits() {
        assert!(Cli::try_parse_from(["wiegand", "simulate"]).is_err());
    }
}
