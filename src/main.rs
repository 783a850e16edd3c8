use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use xentune::options::{DEFAULT_MAX_CANDIDATES, DEFAULT_TOLERANCE};
use xentune::{EngineOptions, SymbolTable, TuningConfig};

mod report;

/// Compile microtonal tuning declarations and inspect the result
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Log engine debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Args, Debug)]
struct BuildArgs {
    /// Path to the tuning declaration text
    declaration: PathBuf,

    /// TOML symbol table to resolve accidental tokens with (built-in table if omitted)
    #[arg(long)]
    symbols: Option<PathBuf>,

    /// Enharmonic tolerance in cents
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Only enumerate chain degrees within -N..=N
    #[arg(long)]
    max_degree: Option<u32>,

    /// Refuse to enumerate more candidate notes than this
    #[arg(long, default_value_t = DEFAULT_MAX_CANDIDATES)]
    max_candidates: usize,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print an overview of the compiled tuning
    Summary {
        #[command(flatten)]
        build: BuildArgs,
    },
    /// List enharmonic classes in ascending pitch order
    Steps {
        #[command(flatten)]
        build: BuildArgs,
    },
    /// Show everything known about one spelling
    Note {
        #[command(flatten)]
        build: BuildArgs,

        /// Canonical note hash, e.g. "0 4 1"
        hash: String,

        /// Aux operation whose constant constrictions apply to up/down candidates
        #[arg(long, default_value_t = 0)]
        aux: usize,
    },
    /// Write the compiled tuning as JSON
    Dump {
        #[command(flatten)]
        build: BuildArgs,
    },
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(args.command) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Summary { build } => {
            let (config, table) = load(&build)?;
            print!("{}", report::summary(&config, &table));
        }
        Commands::Steps { build } => {
            let (config, table) = load(&build)?;
            print!("{}", report::steps(&config, &table));
        }
        Commands::Note { build, hash, aux } => {
            let (config, table) = load(&build)?;
            print!("{}", report::note(&config, &table, &hash, aux)?);
        }
        Commands::Dump { build } => {
            let (config, _) = load(&build)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

fn load(args: &BuildArgs) -> Result<(TuningConfig, SymbolTable)> {
    let table = match &args.symbols {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("reading symbol table '{}'", path.display()))?;
            SymbolTable::from_toml_str(&data)
                .with_context(|| format!("parsing symbol table '{}'", path.display()))?
        }
        None => SymbolTable::standard(),
    };

    let text = std::fs::read_to_string(&args.declaration)
        .with_context(|| format!("reading declaration '{}'", args.declaration.display()))?;

    let options = EngineOptions {
        enharmonic_tolerance: args.tolerance,
        max_degree: args.max_degree,
        max_candidates: args.max_candidates,
    };

    let config = TuningConfig::from_text(&text, &table, &options)
        .with_context(|| format!("compiling '{}'", args.declaration.display()))?;
    log::info!(
        "compiled {} spellings into {} classes",
        config.hashes().len(),
        config.stepwise().len()
    );

    Ok((config, table))
}
