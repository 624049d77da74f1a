mod cli;
mod output;

use std::time::Duration;

use anyhow::{Context, Result};
use cardwatch_monitor::MonitorSession;
use cardwatch_transport::{AnyTransport, MockTransport, SerialTransport, Transport, probe};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Args;
use crate::output::ConsoleSink;

const SIMULATED_CARD_INTERVAL: Duration = Duration::from_secs(1);

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// Build a mock reader that presents `cards` one by one.
fn simulated_reader(cards: Vec<String>) -> AnyTransport {
    let (transport, handle) = MockTransport::with_name("simulated");
    tokio::spawn(async move {
        for card in cards {
            tokio::time::sleep(SIMULATED_CARD_INTERVAL).await;
            handle.present_card(&card);
        }
    });
    transport.into()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = args.resolve_config()?;

    let mut transport: AnyTransport = if args.simulate.is_empty() {
        SerialTransport::new(config.port.clone()).into()
    } else {
        simulated_reader(args.simulate.clone())
    };

    if args.probe {
        probe(&mut transport)
            .await
            .with_context(|| format!("connection test on {} failed", transport.name()))?;
        println!("Connection OK: {}", transport.name());
        return Ok(());
    }

    let session = MonitorSession::new(transport, config);
    let token = session.cancellation_token();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Stop requested");
                token.cancel();
            }
            Err(e) => warn!(error = %e, "Cannot listen for Ctrl+C"),
        }
    });

    let mut sink = ConsoleSink::new(std::io::stdout().lock(), args.format);
    let report = session.run(&mut sink).await.context("monitoring failed")?;
    sink.finish(&report).context("writing summary")?;

    Ok(())
}
