use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use heatgrid_kernel::{World, make_test_world};
use heatgrid_persist::{Encoding, encode_and_flush, read_world};
use heatgrid_render::{DebugTextRenderer, Renderer, render_to_path};
use heatgrid_tools::WorldInspector;

mod config;

use config::StepConfig;

#[derive(Parser)]
#[command(name = "heatgrid", about = "Generate, step, inspect and render heat worlds")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the standard test world to stdout
    Make {
        /// Grid size (the world is SIZE x SIZE)
        #[arg(default_value_t = 128, value_parser = clap::value_parser!(u32).range(3..))]
        size: u32,
        /// Diffusion rate coefficient
        #[arg(default_value_t = 0.1)]
        alpha: f32,
        /// Use the binary encoding
        #[arg(short, long)]
        binary: bool,
    },
    /// Read a world from stdin, advance it, and write it to stdout
    Step {
        /// Time step (default 0.1)
        #[arg(long)]
        dt: Option<f32>,
        /// Number of steps (default 1)
        #[arg(short = 'n', long)]
        steps: Option<u32>,
        /// Use the binary encoding for output
        #[arg(short, long)]
        binary: bool,
        /// JSON file with dt/steps/binary; flags take precedence
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Read a world from stdin and render it as a bitmap
    Render {
        /// Destination file, or "-" for stdout
        #[arg(default_value = "-")]
        dest: PathBuf,
    },
    /// Read a world from stdin and print a summary
    Info {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
        /// Also print a character heat map
        #[arg(long)]
        map: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Make {
            size,
            alpha,
            binary,
        } => {
            let world = make_test_world(size, alpha)?;
            tracing::info!(size, alpha, binary, "generated test world");
            write_world(&world, Encoding::from_flag(binary))?;
        }
        Commands::Step {
            dt,
            steps,
            binary,
            config,
        } => {
            let base = match &config {
                Some(path) => StepConfig::load(path)?,
                None => StepConfig::default(),
            };
            let cfg = base.with_overrides(dt, steps, binary);

            let mut world = read_stdin_world()?;
            if world.alpha() * cfg.dt > 4.0 {
                tracing::warn!(
                    alpha = world.alpha(),
                    dt = cfg.dt,
                    "alpha*dt exceeds 4, stepping is unstable"
                );
            }
            if !world.border_is_sealed() {
                anyhow::bail!("world border has conductive cells; refusing to step");
            }

            world.step(cfg.dt, cfg.steps);
            tracing::info!(dt = cfg.dt, steps = cfg.steps, time = world.time(), "stepped world");
            write_world(&world, Encoding::from_flag(cfg.binary))?;
        }
        Commands::Render { dest } => {
            let world = read_stdin_world()?;
            tracing::info!("loaded world with w={}, h={}", world.width(), world.height());
            tracing::info!("rendering to {}", dest.display());
            render_to_path(&world, &dest)
                .with_context(|| format!("rendering to {}", dest.display()))?;
        }
        Commands::Info { json, map } => {
            let world = read_stdin_world()?;
            let summary = WorldInspector::summary(&world);
            let digest = WorldInspector::digest(&world);

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            if json {
                let value = serde_json::json!({ "summary": summary, "sha256": digest });
                serde_json::to_writer_pretty(&mut out, &value)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{summary}")?;
                writeln!(out, "sha256: {digest}")?;
            }
            if map {
                write!(out, "{}", DebugTextRenderer::new().render(&world))?;
            }
        }
    }

    Ok(())
}

fn read_stdin_world() -> anyhow::Result<World> {
    read_world(std::io::stdin().lock()).context("reading world from stdin")
}

fn write_world(world: &World, encoding: Encoding) -> anyhow::Result<()> {
    encode_and_flush(world, encoding, std::io::stdout().lock()).context("writing world to stdout")
}
