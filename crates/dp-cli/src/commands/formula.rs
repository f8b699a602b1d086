use dp_mechanics::prepare;

use crate::{DiceArgs, ReferenceArgs};

pub fn run(
    formula: &str,
    dice_args: &DiceArgs,
    reference_args: &ReferenceArgs,
    json: bool,
) -> Result<(), String> {
    let config = super::load_config(reference_args)?;
    let prepared = prepare(formula, &config.references).map_err(super::report)?;

    let mut dice = super::dice_source(dice_args);
    let evaluated = prepared.evaluate(&mut dice).map_err(super::report)?;

    if json {
        let json = serde_json::to_string_pretty(&evaluated).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }

    println!("  {evaluated}");
    if evaluated.is_plain_integer {
        println!("  as obstacle: Ob {}", evaluated.obstacle());
    } else {
        println!(
            "  as obstacle: Ob {} (rolled obstacles add one)",
            evaluated.obstacle()
        );
    }
    Ok(())
}
