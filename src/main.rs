use std::io;
use std::process::exit;

use anyhow::Result;
use promptrefine::{ApiClient, Config, Session};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = Config::from_cli();
    setup_tracing(config.verbose);

    if let Err(e) = run(&config).await {
        eprintln!("ERROR: {:#}", e);
        exit(1);
    }
}

async fn run(config: &Config) -> Result<()> {
    let client = ApiClient::new(config)?;
    let mut session = Session::new(io::stdin().lock(), io::stdout());

    session.run(&client, &config.output).await?;
    Ok(())
}

fn setup_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::new("promptrefine=warn"),
        1 => EnvFilter::new("promptrefine=info"),
        2 => EnvFilter::new("promptrefine=debug"),
        _ => EnvFilter::new("promptrefine=trace"),
    };

    // stdout is reserved for the prompts and the document
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}
