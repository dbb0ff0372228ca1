//! Glossary HTTP gateway binary.

use std::path::PathBuf;

use clap::Parser;
use glossary_bootstrap::{cancel_on_ctrl_c, init_logging, render_config};
use glossary_gateway::{GatewayConfig, GatewayModule};

/// Glossary REST gateway
#[derive(Parser)]
#[command(name = "glossary-gateway", version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides `bind_addr`)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = GatewayConfig::load(cli.config.as_deref())?;

    if cli.print_config {
        println!("{}", render_config(&cfg)?);
        return Ok(());
    }

    init_logging(&cfg.logging, cli.verbose)?;
    let addr = cfg.socket_addr(cli.port)?;

    GatewayModule::init(&cfg)?
        .serve(addr, cancel_on_ctrl_c())
        .await
}
