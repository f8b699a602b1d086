use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use dp_mechanics::{OutcomeKind, RollModifier, RollOutcome, SumComponent};

use crate::{DiceArgs, ReferenceArgs};

/// Arguments of `dp roll`.
pub(crate) struct RollArgs {
    pub dice: Vec<SumComponent>,
    pub bonus: i32,
    pub obstacle: String,
    pub modifier: RollModifier,
    pub faces: Option<u32>,
    pub threshold: Option<u32>,
    pub compensation: i32,
    pub dice_args: DiceArgs,
    pub reference_args: ReferenceArgs,
    pub json: bool,
}

/// Parse a `key=value` dice component such as `Strength=3`.
pub fn parse_component(s: &str) -> Result<SumComponent, String> {
    let (label, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=N, got '{s}'"))?;
    let label = label.trim();
    if label.is_empty() {
        return Err(format!("empty dice component name in '{s}'"));
    }
    let value = value
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid dice count in '{s}': {e}"))?;
    Ok(SumComponent::new(label.to_lowercase(), label, value))
}

pub fn run(args: RollArgs) -> Result<(), String> {
    let config = super::load_config(&args.reference_args)?;

    let mut builder = config
        .request_builder()
        .die(
            args.faces.unwrap_or(config.die_faces),
            args.threshold.unwrap_or(config.hit_threshold),
        )
        .bonus(args.bonus)
        .obstacle(args.obstacle)
        .modifier(args.modifier)
        .compensation_points(args.compensation);
    for component in args.dice {
        builder = builder.dice(component);
    }
    let request = builder.build().map_err(super::report)?;

    let mut dice = super::dice_source(&args.dice_args);
    let outcome = config
        .pool()
        .roll(&mut dice, &request)
        .map_err(super::report)?;

    if args.json {
        let json = serde_json::to_string_pretty(&outcome).map_err(|e| e.to_string())?;
        println!("{json}");
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

fn print_outcome(outcome: &RollOutcome) {
    let pool = outcome.total_dice_expression();
    if pool.is_empty() {
        println!("  Pool:     {} dice", outcome.effective_dice_count());
    } else {
        println!("  Pool:     {pool}");
    }
    if outcome.modifier() != RollModifier::None {
        println!(
            "  Modifier: {} ({} dice rolled)",
            outcome.modifier(),
            outcome.effective_dice_count()
        );
    }

    let obstacle = outcome.evaluated_obstacle();
    if obstacle.is_plain_integer {
        println!("  Obstacle: {}", outcome.obstacle());
    } else {
        println!("  Obstacle: {} (Ob {})", obstacle, outcome.obstacle());
    }
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Hits", "Misses", "Blanks"]);
    table.add_row(vec![
        join_faces(outcome.hits()),
        join_faces(outcome.misses()),
        outcome.blank_count().to_string(),
    ]);
    println!("{table}");
    println!();

    let label = outcome.outcome().to_string();
    let label = match outcome.outcome() {
        OutcomeKind::Success => label.green().bold(),
        OutcomeKind::Partial => label.yellow().bold(),
        OutcomeKind::Failure => label.red().bold(),
        OutcomeKind::None => label.dimmed(),
    };
    if outcome.degree() != 0 {
        println!("  {label} (degree {})", outcome.degree());
    } else {
        println!("  {label}");
    }
    if outcome.compensation_points() != 0 {
        println!("  compensation points: {}", outcome.compensation_points());
    }
}

fn join_faces(faces: &[u32]) -> String {
    if faces.is_empty() {
        return "—".to_string();
    }
    faces
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
