//! # sf-envelope
//!
//! Command-line tool for SecureFabric envelopes.
//!
//! ```text
//! sf-envelope keygen --out sender.key
//! sf-envelope build  --key sender.key --topic demo.messages --message hi > env.json
//! sf-envelope verify --input env.json
//! sf-envelope demo   --count 5 --encrypt
//! ```

mod commands;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sf_telemetry::{init_telemetry, TelemetryConfig};
use std::io;

use commands::{BuildArgs, DemoArgs, KeygenArgs, VerifyArgs};

/// SecureFabric envelope tool
#[derive(Parser, Debug)]
#[command(name = "sf-envelope", version)]
#[command(about = "Build, verify and exercise SecureFabric envelopes")]
struct Cli {
    /// Log filter (e.g. `info`, `sf_envelope=debug`)
    #[arg(long, env = "SF_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    /// Emit JSON logs
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate an Ed25519 signing key
    Keygen(KeygenArgs),
    /// Build one envelope and print it as JSON
    Build(BuildArgs),
    /// Verify envelopes from a JSON file
    Verify(VerifyArgs),
    /// Publish and receive over an in-process loopback node
    Demo(DemoArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let defaults = TelemetryConfig::from_env();
    let json_logs = cli.json_logs || defaults.json_logs;
    let config = defaults
        .with_log_level(cli.log_level)
        .with_json_logs(json_logs);
    let _telemetry = init_telemetry(config).context("initialising telemetry")?;

    let mut stdout = io::stdout();
    match cli.command {
        Command::Keygen(args) => commands::keygen(&args, &mut stdout),
        Command::Build(args) => commands::build(&args, &mut stdout),
        Command::Verify(args) => {
            let summary = commands::verify(&args, &mut stdout)?;
            if summary.rejected > 0 {
                bail!(
                    "{} of {} envelopes rejected",
                    summary.rejected,
                    summary.accepted + summary.rejected
                );
            }
            Ok(())
        }
        Command::Demo(args) => commands::demo(&args, &mut stdout).await,
    }
}
