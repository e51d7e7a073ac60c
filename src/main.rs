//! SignalBridge - Main Entry Point
//!
//! Listens to a chat relay for trade signals and places the resulting orders
//! through an MT5 bridge (or a paper account with `--dry-run`).

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use signal_bridge::config::{load_config, AppConfig};
use signal_bridge::chat::ReconnectPolicy;
use signal_bridge::dispatch::acknowledgments;
use signal_bridge::{
    BridgeBrokerClient, ChatGateway, DispatchCoordinator, PaperBroker, SharedBrokerSession,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Use the simulated paper account instead of the MT5 bridge
    #[arg(long)]
    dry_run: bool,

    /// Dispatch this message once, print the acknowledgments and exit
    #[arg(long)]
    once: Option<String>,
}

fn init_logging(level: &str, json: bool) -> Result<()> {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn build_session(config: &AppConfig, dry_run: bool) -> Result<SharedBrokerSession> {
    if dry_run {
        return Ok(Arc::new(PaperBroker::from_config(&config.paper)));
    }
    let client = BridgeBrokerClient::from_config(&config.broker, config.risk.equity_source)?;
    Ok(Arc::new(client))
}

async fn run_chat(config: &AppConfig, coordinator: &DispatchCoordinator) {
    let gateway = ChatGateway::new(&config.chat)
        .with_heartbeat_interval(config.settings.heartbeat_interval_seconds);
    let delay = Duration::from_millis(config.settings.reconnect_delay_ms);
    let mut policy = ReconnectPolicy::new(config.settings.max_reconnect_attempts);

    loop {
        let established = match gateway.run(coordinator).await {
            Ok(()) => {
                warn!("Chat relay disconnected");
                true
            }
            Err(e) => {
                error!("Chat relay error: {}", e);
                false
            }
        };

        if !policy.should_retry(established) {
            error!(
                "Giving up after {} consecutive chat connection failures",
                policy.failures()
            );
            return;
        }

        info!("Reconnecting to chat relay in {:?}", delay);
        tokio::time::sleep(delay).await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = load_config(Some(&args.config))?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.settings.log_level.clone());
    init_logging(&level, args.log_json)?;

    info!("Starting SignalBridge");
    info!("Configuration file: {}", args.config);

    let session = build_session(&config, args.dry_run)?;
    session.initialize().await?;
    info!("Broker session ready ({})", session.venue_name());

    let coordinator = DispatchCoordinator::from_config(session.clone(), &config);

    if let Some(message) = args.once {
        let outcomes = coordinator.handle(&message).await;
        for ack in acknowledgments(&outcomes) {
            println!("{}", ack);
        }
    } else {
        tokio::select! {
            _ = run_chat(&config, &coordinator) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal, cleaning up...");
            }
        }
    }

    if let Err(e) = session.shutdown().await {
        warn!("Broker shutdown failed: {}", e);
    }
    info!("SignalBridge stopped");

    Ok(())
}
