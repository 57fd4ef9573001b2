use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use ztp_daemon::{ZtpConfig, ZtpRuntime};

/// Zero-touch provisioning daemon
#[derive(Parser)]
#[command(name = "ztp-daemon", version, about = "Zero-touch provisioning manager for ISC dhcpd")]
struct Args {
    /// Path to the YAML document holding core settings and hosts
    #[arg(short, long, default_value = "./config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting ztp-daemon");

    let config = ZtpConfig::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    info!(
        "Loaded {} hosts from {:?}",
        config.hosts.len(),
        args.config
    );

    let runtime = ZtpRuntime::spawn(config, args.config);
    info!("ztp-daemon ready");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    runtime.shutdown().await;
    info!("ztp-daemon stopped");
    Ok(())
}
