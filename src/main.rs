//! OpenVR2WS client - terminal front end for the OpenVR2WS bridge

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use openvr2ws_client::cli;
use openvr2ws_client::client::ClientActor;
use openvr2ws_client::config::{parse_port, AppConfig};
use openvr2ws_client::connection::WebSocketTransport;
use openvr2ws_client::sink::ConsoleSink;

/// Connect to an OpenVR2WS bridge and inspect devices, input and settings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to an optional configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Bridge host
    #[arg(long, env = "OPENVR2WS_HOST")]
    host: Option<String>,

    /// Bridge port (falls back to 7708 when not a number)
    #[arg(short, long, env = "OPENVR2WS_PORT")]
    port: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Start polling analog and pose input immediately
    #[arg(long)]
    poll: bool,

    /// Print analog and pose snapshots on every poll
    #[arg(long)]
    show_streams: bool,

    /// Run without the interactive prompt
    #[arg(long)]
    no_repl: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level)?;

    let config = load_config(&args).await?;
    info!("Starting OpenVR2WS client for {}", config.url());

    let sink = ConsoleSink::new(config.console.show_streams);
    let (client, mut client_task) = ClientActor::spawn(config, WebSocketTransport::new(), sink)?;

    let repl = if args.no_repl {
        None
    } else {
        let handle = client.clone();
        let runtime = tokio::runtime::Handle::current();
        Some(tokio::task::spawn_blocking(move || cli::run_repl(handle, runtime)))
    };

    let client_running = tokio::select! {
        _ = shutdown_signal() => true,
        result = wait_repl(repl) => {
            if let Err(e) = result {
                warn!("REPL ended with error: {:#}", e);
            }
            true
        },
        _ = &mut client_task => {
            warn!("Client stopped unexpectedly");
            false
        },
    };

    if client_running {
        client.shutdown();
        let _ = client_task.await;
    }

    info!("OpenVR2WS client shutdown complete");
    Ok(())
}

/// File (if any) first, then command-line and environment overrides
async fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let config = AppConfig::load(path).await?;
            info!("Configuration loaded from {}", path);
            config
        },
        None => AppConfig::default(),
    };

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if args.port.is_some() {
        config.port = parse_port(args.port.as_deref());
    }
    if args.poll {
        config.timing.poll_on_start = true;
    }
    if args.show_streams {
        config.console.show_streams = true;
    }

    config.validate()?;
    Ok(config)
}

/// Resolves when the REPL exits; never when it is disabled
async fn wait_repl(repl: Option<tokio::task::JoinHandle<Result<()>>>) -> Result<()> {
    match repl {
        Some(task) => task.await?,
        None => std::future::pending().await,
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
