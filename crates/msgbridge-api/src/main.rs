//! msgbridge CLI and REST API entry point.
//!
//! Binary name: `msgbridge`
//!
//! Parses CLI arguments, loads configuration, wires the sync service to
//! the HTTP message store, then starts the API server with its background
//! poll loop or runs a one-shot connectivity check.

mod cli;
mod http;
mod state;

use std::time::Duration;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use msgbridge_core::store::MessageStore;
use msgbridge_core::sync::spawn_poll_loop;
use msgbridge_infra::config::load_bridge_config;
use msgbridge_infra::http_store::HttpMessageStore;
use msgbridge_types::config::BridgeConfig;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,msgbridge=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Shell completions don't need configuration
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "msgbridge", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_bridge_config(&cli.config).await;

    match cli.command {
        Commands::Serve {
            port,
            host,
            poll_interval_ms,
            store_url,
        } => {
            let config = apply_overrides(config, poll_interval_ms, store_url);
            serve(config, &host, port).await?;
        }

        Commands::Check { store_url } => {
            let config = apply_overrides(config, None, store_url);
            check(&config).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// CLI flags take priority over the configuration file.
fn apply_overrides(
    mut config: BridgeConfig,
    poll_interval_ms: Option<u64>,
    store_url: Option<String>,
) -> BridgeConfig {
    if let Some(interval) = poll_interval_ms {
        config.poll_interval_ms = interval;
    }
    if let Some(url) = store_url {
        config.store_base_url = url;
    }
    config
}

/// Start the API server and the background poll loop.
async fn serve(config: BridgeConfig, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::init(&config);

    // The original identity is informational; a store that is down at
    // boot only delays it until the first successful request.
    match state.service.store().current_user_identity().await {
        Ok(handle) => println!(
            "  logged in as {}",
            console::style(&handle).cyan()
        ),
        Err(err) => tracing::warn!(error = %err, "identity lookup failed at startup"),
    }

    let poll_handle = spawn_poll_loop(
        state.service.clone(),
        Duration::from_millis(config.poll_interval_ms),
        state.cancel.clone(),
    );

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} msgbridge listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let cancel = state.cancel.clone();
    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the poll loop with the server.
    cancel.cancel();
    poll_handle.await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// One-shot connectivity check against the upstream store.
async fn check(config: &BridgeConfig) -> anyhow::Result<()> {
    let store = HttpMessageStore::new(config);

    println!();
    println!(
        "  {} Checking store at {}",
        console::style("🔍").bold(),
        console::style(&config.store_base_url).cyan()
    );
    println!();

    let check_mark = |ok: bool| {
        if ok {
            format!("{}", console::style("✓").green())
        } else {
            format!("{}", console::style("✗").red())
        }
    };

    let identity = store.current_user_identity().await;
    match &identity {
        Ok(handle) => println!("  {} identity: {}", check_mark(true), handle),
        Err(err) => println!("  {} identity: {}", check_mark(false), err),
    }

    let chats = store.list_chats().await;
    match &chats {
        Ok(chats) => println!("  {} chats: {}", check_mark(true), chats.len()),
        Err(err) => println!("  {} chats: {}", check_mark(false), err),
    }
    println!();

    if identity.is_err() || chats.is_err() {
        anyhow::bail!("store check failed");
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
