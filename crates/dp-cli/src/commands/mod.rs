pub mod formula;
pub mod refs;
pub mod roll;

use ariadne::{Color, Label, Report, ReportKind, Source};
use dp_mechanics::{DiceEvaluator, MechError, PoolConfig, ReferenceTable, RngDice, ScriptedDice};

use crate::{DiceArgs, ReferenceArgs};

/// Build the dice source: a replay script, a seeded RNG, or OS entropy.
fn dice_source(args: &DiceArgs) -> Box<dyn DiceEvaluator> {
    match (&args.script, args.seed) {
        (Some(faces), _) => Box::new(ScriptedDice::new(faces.iter().copied())),
        (None, Some(seed)) => Box::new(RngDice::seeded(seed)),
        (None, None) => Box::new(RngDice::from_os_rng()),
    }
}

/// Load the configuration file, then layer `--ref` values on top.
fn load_config(args: &ReferenceArgs) -> Result<PoolConfig, String> {
    let mut config = match &args.config {
        Some(path) => PoolConfig::load(path).map_err(|e| e.to_string())?,
        None => PoolConfig::default(),
    };

    let mut overrides = ReferenceTable::new();
    for assignment in &args.refs {
        let (key, value) = ReferenceTable::parse_assignment(assignment)?;
        overrides.insert(&key, value);
    }
    config.references.extend_from(&overrides);

    tracing::debug!(
        die_faces = config.die_faces,
        hit_threshold = config.hit_threshold,
        references = config.references.len(),
        "configuration loaded"
    );
    Ok(config)
}

/// Turn a mechanics error into a CLI error message, printing a source
/// diagnostic for malformed formulas.
fn report(err: MechError) -> String {
    match &err {
        MechError::MalformedFormula {
            formula,
            span,
            message,
        } => {
            eprint!("{}", render_formula_error(formula, span.clone(), message));
            "formula could not be evaluated".to_string()
        }
        MechError::UnresolvedReference(tokens) => {
            let flags: Vec<String> = tokens.iter().map(|t| format!("--ref {t}=<value>")).collect();
            format!("{err}\n  supply them with: {}", flags.join(" "))
        }
        _ => err.to_string(),
    }
}

/// Render a formula error with ariadne.
fn render_formula_error(formula: &str, span: std::ops::Range<usize>, message: &str) -> String {
    let name = "formula";
    let mut output = Vec::new();
    Report::build(ReportKind::Error, (name, span.clone()))
        .with_message(message)
        .with_label(
            Label::new((name, span))
                .with_message(message)
                .with_color(Color::Red),
        )
        .finish()
        .write((name, Source::from(formula)), &mut output)
        .ok();
    String::from_utf8(output).unwrap_or_default()
}
