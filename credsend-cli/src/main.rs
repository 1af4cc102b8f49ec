use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use credsend_core::form::Credentials;
use credsend_core::http::HttpResponse;
use credsend_core::sender::{self, DEFAULT_HOST};
use credsend_core::Result;

/// Provision Wi-Fi credentials to a Smart Plant Monitor AP.
#[derive(Parser, Debug)]
#[command(name = "credsend", version, about)]
struct Cli {
    /// AP IP address
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Portal TCP port
    #[arg(long, default_value_t = sender::DEFAULT_PORT)]
    port: u16,

    /// Target Wi-Fi SSID
    #[arg(long, required_unless_present = "probe")]
    ssid: Option<String>,

    /// Target Wi-Fi password (can be empty)
    #[arg(long = "pass", default_value = "")]
    pass: String,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 5.0)]
    timeout: f64,

    /// Fetch the portal's form page instead of posting credentials
    #[arg(long)]
    probe: bool,
}

async fn run(cli: Cli) -> u8 {
    // A negative or non-finite timeout is a failure of the exchange's
    // preconditions, reported like any other transport failure.
    let limit = match Duration::try_from_secs_f64(cli.timeout) {
        Ok(limit) => limit,
        Err(err) => {
            println!("ERROR: invalid timeout: {err}");
            return 2;
        }
    };

    let result = if cli.probe {
        sender::probe(&cli.host, cli.port, limit).await
    } else {
        let credentials = Credentials::new(cli.ssid.unwrap_or_default(), cli.pass);
        sender::send_credentials(&cli.host, cli.port, &credentials, limit).await
    };

    report(result)
}

/// Print the contract output and map the outcome to the process exit code:
/// 0 for HTTP 200, 1 for any other completed status, 2 for failure.
fn report(result: Result<HttpResponse>) -> u8 {
    match result {
        Ok(response) => {
            println!("Response: {} {}", response.status, response.reason);
            if !response.body.is_empty() {
                println!("{}", response.body_text());
            }
            if response.is_success() {
                0
            } else {
                1
            }
        }
        Err(err) => {
            println!("ERROR: {err}");
            2
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Diagnostics go through tracing (RUST_LOG); the contract output in
    // `run` stays on plain stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    ExitCode::from(run(Cli::parse()).await)
}
