use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;

use args::Args;
use s3region::{ReqwestTransport, ResolverConfig};

/// Logs go to stderr so stdout carries only the region. `RUST_LOG` wins over
/// `--verbose`.
fn init_tracing(verbose: bool) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::try_new(if verbose { "s3region=debug" } else { "warn" })
            .context("invalid log filter")?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    Ok(())
}

async fn run(args: Args) -> Result<String> {
    init_tracing(args.verbose)?;

    // The transport owns the timeout so it also covers connection setup.
    let transport = ReqwestTransport::with_timeout(args.timeout)
        .context("failed to build HTTP client")?;
    let config = ResolverConfig::new(Arc::new(transport));

    let region = s3region::get_bucket_region(&args.identifier, &config).await?;
    Ok(region)
}

/// Writes the region to `out`, or `Error: <message>` with its causes to `err`,
/// and returns the process exit status.
fn report(result: Result<String>, out: &mut impl Write, err: &mut impl Write) -> u8 {
    match result {
        Ok(region) => {
            let _ = writeln!(out, "{region}");
            0
        }
        Err(e) => {
            let _ = writeln!(err, "Error: {e:#}");
            1
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    let result = run(args).await;
    let status = report(result, &mut std::io::stdout(), &mut std::io::stderr());
    ExitCode::from(status)
}
