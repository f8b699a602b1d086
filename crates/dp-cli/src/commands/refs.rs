use dp_mechanics::referenced_tokens;

pub fn run(formula: &str) -> Result<(), String> {
    let tokens = referenced_tokens(formula);
    if tokens.is_empty() {
        println!("  No references.");
        return Ok(());
    }
    for token in &tokens {
        println!("  @{token}");
    }
    Ok(())
}
