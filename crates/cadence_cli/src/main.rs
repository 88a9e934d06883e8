//! Cadence CLI
//!
//! Run the cutscene engine headlessly and inspect easing curves.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod demo;

use cadence_animation::Easing;
use cadence_core::SchedulerConfig;

#[derive(Parser)]
#[command(name = "cadence")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cadence cutscene engine CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the demo cutscene against a recording canvas
    Demo {
        /// Scheduler config file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the configured frame rate
        #[arg(short, long)]
        frame_rate: Option<u32>,

        /// Give up after this many frames
        #[arg(long, default_value = "10000")]
        max_frames: u64,
    },

    /// Print sampled values of an easing curve
    Easing {
        /// Curve name, e.g. easeOutQuad
        name: String,

        /// Number of samples
        #[arg(short, long, default_value = "10")]
        steps: u32,
    },

    /// List the available easing curves
    Curves,

    /// Print the default scheduler config
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Demo {
            config,
            frame_rate,
            max_frames,
        } => cmd_demo(config.as_deref(), frame_rate, max_frames),

        Commands::Easing { name, steps } => cmd_easing(&name, steps),

        Commands::Curves => cmd_curves(),

        Commands::Config => cmd_config(),
    }
}

fn cmd_demo(config: Option<&Path>, frame_rate: Option<u32>, max_frames: u64) -> Result<()> {
    let mut config = match config {
        Some(path) => SchedulerConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SchedulerConfig::default(),
    };
    if let Some(rate) = frame_rate {
        config = config.with_frame_rate(rate);
    }

    info!("Playing demo at {} fps", config.frame_rate);
    let report = demo::play(config, max_frames)?;

    if !report.finished {
        anyhow::bail!("demo did not finish within {} frames", max_frames);
    }

    println!("frames:        {}", report.frames);
    println!("seconds:       {:.2}", report.seconds);
    println!("rects drawn:   {}", report.rects);
    println!("text drawn:    {}", report.texts);
    println!("sounds played: {}", report.sounds.join(", "));
    Ok(())
}

fn cmd_easing(name: &str, steps: u32) -> Result<()> {
    let easing = Easing::from_name(name);
    if easing.name() != name {
        anyhow::bail!(
            "Unknown easing '{}'. Run `cadence curves` for the list",
            name
        );
    }

    let steps = steps.max(1);
    for step in 0..=steps {
        let t = f64::from(step) / f64::from(steps);
        println!("{:>6.3}  {:>9.5}", t, easing.ease(t, 0.0, 1.0, 1.0));
    }
    Ok(())
}

fn cmd_curves() -> Result<()> {
    for easing in Easing::ALL {
        println!("{}", easing.name());
    }
    Ok(())
}

fn cmd_config() -> Result<()> {
    let text = SchedulerConfig::default().to_toml()?;
    print!("{text}");
    Ok(())
}
