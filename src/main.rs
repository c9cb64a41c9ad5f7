use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use tabchat::core::config::{self, CliOverrides, TabchatConfig};
use tabchat::tui;

#[derive(Parser)]
#[command(name = "tabchat", about = "Terminal client for a multi-tab chat service")]
struct Args {
    /// Base URL of the chat API (overrides config and TABCHAT_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Start with every open tab tiled in a grid
    #[arg(long)]
    grid: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to tabchat.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("tabchat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Warning: {e}. Using defaults.");
        log::warn!("Ignoring config file: {}", e);
        TabchatConfig::default()
    });
    let overrides = CliOverrides {
        api_url: args.api_url,
        grid: args.grid,
    };
    let resolved = config::resolve(&file_config, &overrides);

    log::info!("tabchat starting up against {}", resolved.api_base_url);

    tui::run(resolved)
}
