//! # Cairn Command Line
//!
//! Generates, regenerates, patches and inspects dungeon map documents stored
//! as JSON files.

use cairn::{
    apply_patch, generate_base_map, regenerate, to_player_safe_map, CairnError, CairnResult,
    GeneratorConfig, Map, PatchAction, RegenerateOptions, RegenerationScope,
};
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use rand::{distributions::Alphanumeric, Rng};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Command line arguments for Cairn.
#[derive(Parser, Debug)]
#[command(name = "cairn")]
#[command(about = "Seed-driven dungeon map generation and editing")]
#[command(version)]
struct Args {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new map from a seed and configuration
    Generate {
        /// Seed string; a random one is chosen when omitted
        #[arg(short, long)]
        seed: Option<String>,

        /// Generator configuration JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Regenerate a whole map or one content category
    Regenerate {
        #[arg(long, value_enum)]
        scope: ScopeArg,

        /// Map document to regenerate
        #[arg(short, long)]
        map: PathBuf,

        /// Seed string; defaults to the seed stored in the map
        #[arg(short, long)]
        seed: Option<String>,

        /// Generator configuration JSON file; defaults to the map's own grid settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Replace locked items too
        #[arg(long)]
        no_preserve_locks: bool,

        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Apply a JSON array of patch actions to a map
    Patch {
        #[arg(short, long)]
        map: PathBuf,

        #[arg(short, long)]
        actions: PathBuf,

        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print the secret-free player view of a map
    PlayerView {
        #[arg(short, long)]
        map: PathBuf,

        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Check that every reference inside a map resolves
    Check {
        #[arg(short, long)]
        map: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScopeArg {
    Full,
    Layout,
    Doors,
    Traps,
    Encounters,
    Treasure,
    Dressing,
}

impl From<ScopeArg> for RegenerationScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Full => RegenerationScope::Full,
            ScopeArg::Layout => RegenerationScope::Layout,
            ScopeArg::Doors => RegenerationScope::Doors,
            ScopeArg::Traps => RegenerationScope::Traps,
            ScopeArg::Encounters => RegenerationScope::Encounters,
            ScopeArg::Treasure => RegenerationScope::Treasure,
            ScopeArg::Dressing => RegenerationScope::Dressing,
        }
    }
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    if let Err(err) = run(args.command) {
        error!("{}", err);
        std::process::exit(1);
    }
}

/// Initializes env_logger, letting `RUST_LOG` override the flag.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_target(false)
        .init();
}

fn run(command: Command) -> CairnResult<()> {
    info!("Cairn v{}", cairn::VERSION);

    match command {
        Command::Generate { seed, config, out } => {
            let seed = seed.unwrap_or_else(random_seed);
            let config = load_config(config.as_deref())?;
            config.validate()?;
            let map = generate_base_map(&seed, &config)?;
            write_json(out.as_deref(), &map)
        }
        Command::Regenerate {
            scope,
            map,
            seed,
            config,
            no_preserve_locks,
            out,
        } => {
            let existing: Map = read_json(&map)?;
            let seed = seed.unwrap_or_else(|| existing.metadata.seed.clone());
            let config = match config {
                Some(path) => read_json::<GeneratorConfig>(&path)?,
                None => GeneratorConfig::for_map(&existing),
            };
            config.validate()?;
            let options = RegenerateOptions {
                preserve_locks: !no_preserve_locks,
            };
            let regenerated = regenerate(scope.into(), &seed, &config, &existing, options)?;
            write_json(out.as_deref(), &regenerated)
        }
        Command::Patch { map, actions, out } => {
            let existing: Map = read_json(&map)?;
            let actions: Vec<PatchAction> = read_json(&actions)?;
            let result = apply_patch(&existing, &actions)?;
            info!(
                "{} applied, {} skipped",
                result.applied_count(),
                result.outcomes.len() - result.applied_count()
            );
            write_json(out.as_deref(), &result.map)
        }
        Command::PlayerView { map, out } => {
            let existing: Map = read_json(&map)?;
            write_json(out.as_deref(), &to_player_safe_map(&existing))
        }
        Command::Check { map } => {
            let existing: Map = read_json(&map)?;
            existing.check_integrity()?;
            println!(
                "ok: {} rooms, {} corridors, {} doors",
                existing.rooms.len(),
                existing.corridors.len(),
                existing.doors.len()
            );
            Ok(())
        }
    }
}

fn random_seed() -> String {
    let seed: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    info!("Using random seed {}", seed);
    seed
}

fn load_config(path: Option<&Path>) -> CairnResult<GeneratorConfig> {
    match path {
        Some(path) => read_json(path),
        None => Ok(GeneratorConfig::default()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> CairnResult<T> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(CairnError::from)
}

fn write_json<T: Serialize>(path: Option<&Path>, value: &T) -> CairnResult<()> {
    let text = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => {
            fs::write(path, text)?;
            info!("Wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}
