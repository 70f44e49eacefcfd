//! Config validation command implementation.

use super::CliError;
use skyguard::MatchConfig;
use std::path::Path;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or describes an unplayable
/// match.
pub(crate) fn execute(path: &Path) -> Result<(), CliError> {
    println!("Validating: {}", path.display());
    println!();

    let config = match MatchConfig::from_json_file(path) {
        Ok(config) => config,
        Err(e) => {
            print_check("Configuration", false);
            return Err(e.into());
        }
    };
    print_check("Configuration", true);

    let level = config.level_def()?;
    println!();
    println!("Level: {} ({})", level.id, level.name);
    println!("Hero: {}", config.hero);
    for (tier, talent) in config.talents.slots() {
        println!("  Tier {tier} talent: {talent}");
    }
    println!("Seed: {}", config.seed);
    println!("Lives: {}", config.starting_lives);
    println!("Victory after wave: {}", config.victory_wave(level));
    println!();
    println!("Configuration is valid.");

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    println!("  [{status}] {name}");
}
