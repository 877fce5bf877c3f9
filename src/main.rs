//! BlockSpy - terminal dashboard for a Minecraft server monitor
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::PathBuf;

use blockspy_core::prelude::*;
use blockspy_tui::LaunchOptions;
use clap::Parser;

/// BlockSpy - monitor Minecraft servers from the terminal
#[derive(Parser, Debug)]
#[command(name = "blockspy")]
#[command(about = "A terminal dashboard for the BlockSpy server monitor", long_about = None)]
struct Args {
    /// Backend base URL (overrides config.toml)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Interface language code, e.g. en or pt-BR
    #[arg(long = "lang", value_name = "CODE")]
    language: Option<String>,

    /// Color theme: dark or light
    #[arg(long, value_name = "THEME")]
    theme: Option<String>,

    /// Alternate config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Bulk-add the addresses listed in this file on startup
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;
    blockspy_core::logging::init()?;

    blockspy_tui::run(LaunchOptions {
        config_path: args.config,
        url: args.url,
        language: args.language,
        theme: args.theme,
        import: args.import,
    })
    .await
}
