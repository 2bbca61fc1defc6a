use std::path::PathBuf;

use clap::{Parser, Subcommand};
use strata::{CanvasPolicy, GenerateOpts, GenerateSession, ProjectConfig, RngSampler, Sampler};

#[derive(Parser, Debug)]
#[command(name = "strata", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a batch of unique editions from a project config.
    Generate(GenerateArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Project config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Root directory holding one asset folder per layer.
    #[arg(long, default_value = "layers")]
    layers: PathBuf,

    /// Output directory (wiped and recreated).
    #[arg(long, default_value = "build")]
    out: PathBuf,

    /// Override the configured edition count.
    #[arg(long)]
    editions: Option<u32>,

    /// Override the configured RNG seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Keep the previous edition's pixels on the canvas instead of clearing
    /// it between editions.
    #[arg(long, default_value_t = false)]
    carry_canvas: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
    }
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut config = ProjectConfig::from_path(&args.config)?;
    if let Some(editions) = args.editions {
        config.editions = editions;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    let opts = GenerateOpts {
        editions: config.editions,
        canvas_policy: if args.carry_canvas {
            CanvasPolicy::Carry
        } else {
            CanvasPolicy::Fresh
        },
    };
    let mut session = GenerateSession::new(&config, &args.layers, &args.out, opts)?;

    let mut sampler: Box<dyn Sampler> = match config.seed {
        Some(seed) => Box::new(RngSampler::seeded(seed)),
        None => Box::new(RngSampler::from_entropy()),
    };
    let stats = session.generate(sampler.as_mut())?;
    session.write_metadata()?;

    eprintln!(
        "generated {} editions ({} duplicate renders) into {}",
        stats.editions_created,
        stats.duplicates,
        args.out.display()
    );
    Ok(())
}
