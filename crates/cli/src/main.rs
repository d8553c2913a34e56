mod settings;

use std::io;

use anyhow::Result;
use clap::Parser;
use riceshine_config::Config;
use riceshine_core::{collect, load_art, SystemSource};
use riceshine_tui::Renderer;

#[derive(Parser)]
#[command(
    name = "riceshine",
    about = "Centered system fetch with ASCII art",
    version
)]
struct Cli {
    /// Open the settings file in $EDITOR
    #[arg(long)]
    settings: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.settings {
        return open_settings();
    }

    let config = Config::load()?;
    let art = load_art(
        &config.paths.ascii_art_path(),
        config.display.expand_ascii,
    )?;
    let snapshot = collect(&SystemSource::new(), &config.display);

    let mut out = io::stdout().lock();
    Renderer::for_terminal().render(&mut out, &config, &art, &snapshot, &chrono::Local::now())?;

    Ok(())
}

fn open_settings() -> Result<()> {
    let path = Config::config_path();
    println!("opening settings file: {}", path.display());
    if Config::ensure_file(&path)? {
        tracing::info!("Created default settings at {}", path.display());
    }

    if let Err(e) = settings::open_in_editor(&settings::editor_command(), &path) {
        println!("error opening editor: {e}");
    }
    Ok(())
}
