use std::process::ExitCode;

use bm300::{BleTransport, Config, Format};
use clap::{Args, Parser};
use tracing_subscriber::EnvFilter;

/// Read Ancel BM300 Pro battery monitors over Bluetooth Low Energy
#[derive(Parser)]
#[command(name = "bm300", version, about, long_about = None)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Ascii)]
    format: Format,

    #[command(flatten)]
    target: Target,

    /// Seconds to listen for advertisements when scanning
    #[arg(long, env = "BM300_SCAN_TIMEOUT", default_value_t = Config::DEFAULT_SCAN_TIMEOUT_S)]
    scan_timeout: u64,

    /// Seconds to spend finding and connecting to the device
    #[arg(long, env = "BM300_CONNECT_TIMEOUT", default_value_t = Config::DEFAULT_CONNECT_TIMEOUT_S)]
    connect_timeout: u64,

    /// Seconds to wait for a reading after polling the device
    #[arg(long, env = "BM300_READ_TIMEOUT", default_value_t = Config::DEFAULT_READ_TIMEOUT_S)]
    read_timeout: u64,

    /// Log protocol traffic to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Target {
    /// Address of Ancel BM300 Pro to poll data from
    #[arg(long, value_name = "address")]
    address: Option<String>,

    /// Scan for available Ancel BM300 Pro devices
    #[arg(long)]
    scan: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(out) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            // Errors go to stdout, where the result would have been.
            println!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<String> {
    let config = Config::from_secs(cli.scan_timeout, cli.connect_timeout, cli.read_timeout);
    let transport = BleTransport::new().await?;

    let out = match cli.target {
        Target { address: Some(address), .. } => {
            let reading = bm300::read_device(&transport, &address, &config).await?;
            bm300::render_reading(&reading, cli.format)?
        }
        Target { scan: true, .. } => {
            let devices = bm300::scan_devices(&transport, &config).await?;
            bm300::render_scan(&devices, cli.format)?
        }
        Target { .. } => anyhow::bail!("one of --address or --scan is required"),
    };

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_requires_one_target() {
        assert!(Cli::try_parse_from(["bm300"]).is_err());
        assert!(Cli::try_parse_from(["bm300", "--scan", "--address", "A4:C1:38:00:00:01"]).is_err());

        let cli = Cli::try_parse_from(["bm300", "--scan", "--format", "json"]).unwrap();
        assert!(cli.target.scan);
        assert_eq!(cli.format, Format::Json);

        let cli = Cli::try_parse_from(["bm300", "--address", "A4:C1:38:00:00:01"]).unwrap();
        assert_eq!(cli.target.address.as_deref(), Some("A4:C1:38:00:00:01"));
        assert_eq!(cli.format, Format::Ascii);
    }
}
