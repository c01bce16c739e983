use anyhow::Context;
use clap::Parser;
use pingora_core::server::configuration::Opt;
use std::path::PathBuf;

use imageview_proxy::config::Config;
use imageview_proxy::server::ImageViewServer;

/// ImageView Proxy - imageView2 image proxy built with Cloudflare's Pingora
#[derive(Parser, Debug)]
#[command(name = "imageview-proxy")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Daemon mode
    #[arg(short = 'd', long)]
    daemon: bool,

    /// Test configuration and exit
    #[arg(long)]
    test: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    config.validate().context("Configuration is invalid")?;

    if args.test {
        println!("configuration file {} test is successful", args.config.display());
        return Ok(());
    }

    imageview_proxy::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging subsystem: {}", e))?;

    tracing::info!(
        config_file = %args.config.display(),
        server_address = %config.server.address,
        server_port = config.server.port,
        bucket = %config.storage.bucket,
        metrics_enabled = config.server.metrics_port.is_some(),
        "Configuration loaded successfully"
    );

    let opt = Opt {
        daemon: args.daemon,
        ..Default::default()
    };

    let server = ImageViewServer::new(config, opt)
        .build()
        .context("Failed to build server")?;

    tracing::info!("Starting ImageView Proxy");

    // Run server forever (blocks until shutdown)
    server.run_forever();
}
