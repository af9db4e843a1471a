//! Vista CLI
//!
//! Create and validate scene configuration, and replay scripted page interactions
//! against a headless page.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vista_app::{ReplayScript, ReplaySession, SceneConfig, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "vista")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Vista scroll and interaction engine CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default vista.toml in the current directory
    Init,

    /// Validate a scene configuration
    Check {
        /// Directory containing vista.toml, or the file itself
        #[arg(default_value = ".")]
        source: String,
    },

    /// Replay a JSON script and print one frame per line
    Replay {
        /// Replay script
        script: String,

        /// Directory containing vista.toml (defaults are used when omitted)
        #[arg(short, long)]
        config: Option<String>,

        /// Print only the final frame
        #[arg(long)]
        last: bool,
    },

    /// Print the default configuration
    Defaults,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Init => cmd_init(),
        Commands::Check { source } => cmd_check(&source),
        Commands::Replay {
            script,
            config,
            last,
        } => cmd_replay(&script, config.as_deref(), last),
        Commands::Defaults => cmd_defaults(),
    }
}

fn cmd_init() -> Result<()> {
    let cwd = std::env::current_dir()?;
    let path = cwd.join(CONFIG_FILE);

    if path.exists() {
        anyhow::bail!("This directory already contains a {}", CONFIG_FILE);
    }

    let content = SceneConfig::default().to_toml()?;
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Created {}", path.display());
    info!("Run `vista check` to validate it after editing");
    Ok(())
}

fn cmd_check(source: &str) -> Result<()> {
    let path = PathBuf::from(source);
    let config = SceneConfig::load_from_dir(&path)?;

    info!(
        "Viewport {}x{}, reveal {}s ({}), pin distance {} ({:?})",
        config.viewport.width,
        config.viewport.height,
        config.reveal.duration,
        config.reveal.easing,
        config.pin.distance,
        config.pin.unit,
    );
    info!("Configuration is valid");
    Ok(())
}

fn cmd_replay(script: &str, config: Option<&str>, last: bool) -> Result<()> {
    let config = match config {
        Some(dir) => SceneConfig::load_from_dir(Path::new(dir))?,
        None => SceneConfig::default(),
    };

    let script = ReplayScript::from_path(Path::new(script))?;
    let mut session = ReplaySession::new(&config, &script)?;

    info!(
        "Replaying {} steps over {} elements",
        script.steps.len(),
        script.elements.len()
    );

    let outputs = session.run(&script.steps);
    debug!(frames = outputs.len(), "replay finished");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let frames = if last {
        outputs.last().map(std::slice::from_ref).unwrap_or_default()
    } else {
        outputs.as_slice()
    };
    for frame in frames {
        serde_json::to_writer(&mut out, frame)?;
        writeln!(out)?;
    }
    Ok(())
}

fn cmd_defaults() -> Result<()> {
    print!("{}", SceneConfig::default().to_toml()?);
    Ok(())
}
