//! CLI frontend for the dicepool engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use dp_mechanics::{RollModifier, SumComponent};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "dp",
    about = "Dicepool: roll dice pools against obstacles",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log every pipeline stage to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where dice faces come from.
#[derive(Args, Clone, Debug)]
pub(crate) struct DiceArgs {
    /// RNG seed for a reproducible roll
    #[arg(short, long)]
    seed: Option<u64>,

    /// Replay these faces instead of rolling (comma separated)
    #[arg(long, value_delimiter = ',', conflicts_with = "seed")]
    script: Option<Vec<u32>>,
}

/// Configuration file and reference values.
#[derive(Args, Clone, Debug)]
pub(crate) struct ReferenceArgs {
    /// JSON configuration file (die settings and reference values)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reference value, e.g. --ref strength=3 (repeatable)
    #[arg(short = 'r', long = "ref", value_name = "KEY=VALUE")]
    refs: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll a dice pool against an obstacle
    Roll {
        /// Base dice component, e.g. --dice strength=3 (repeatable)
        #[arg(short, long = "dice", value_name = "KEY=N", value_parser = commands::roll::parse_component)]
        dice: Vec<SumComponent>,

        /// Bonus dice added after the modifier (ignored unless positive)
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        bonus: i32,

        /// Obstacle formula: a number, or e.g. "@will + 1" or "2d6"
        #[arg(short, long, default_value = "0")]
        obstacle: String,

        /// Modifier on the base dice: none, half-down, half-up
        #[arg(short, long, default_value = "none")]
        modifier: RollModifier,

        /// Faces per pool die (overrides the config)
        #[arg(long)]
        faces: Option<u32>,

        /// Lowest face that counts as a hit (overrides the config)
        #[arg(short, long)]
        threshold: Option<u32>,

        /// Compensation points carried through to the outcome
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        compensation: i32,

        #[command(flatten)]
        dice_args: DiceArgs,

        #[command(flatten)]
        reference_args: ReferenceArgs,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate a formula and show its terms
    Formula {
        /// The formula to evaluate
        formula: String,

        #[command(flatten)]
        dice_args: DiceArgs,

        #[command(flatten)]
        reference_args: ReferenceArgs,

        /// Print the evaluated formula as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the references a formula needs
    Refs {
        /// The formula to inspect
        formula: String,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "dp_mechanics=debug,dp_cli=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Roll {
            dice,
            bonus,
            obstacle,
            modifier,
            faces,
            threshold,
            compensation,
            dice_args,
            reference_args,
            json,
        } => commands::roll::run(commands::roll::RollArgs {
            dice,
            bonus,
            obstacle,
            modifier,
            faces,
            threshold,
            compensation,
            dice_args,
            reference_args,
            json,
        }),
        Commands::Formula {
            formula,
            dice_args,
            reference_args,
            json,
        } => commands::formula::run(&formula, &dice_args, &reference_args, json),
        Commands::Refs { formula } => commands::refs::run(&formula),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
