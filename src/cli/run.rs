//! Run command implementation.

use super::output::format_text;
use super::{CliError, MatchArgs, OutputFormat};
use skyguard::autopilot::StrategyKind;
use skyguard::batch::run_match;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub(crate) fn execute(args: &MatchArgs, format: OutputFormat, quiet: bool) -> Result<(), CliError> {
    let config = args.resolve()?;
    let strategy = StrategyKind::from(args.strategy);
    let player = strategy.create();

    if !quiet && format == OutputFormat::Text {
        println!(
            "Running level {} with {} (seed {}, {} player)...",
            config.level,
            config.hero,
            config.seed,
            player.name()
        );
        println!();
    }

    let result = run_match(config.seed, &config, strategy)?;

    match format {
        OutputFormat::Text => print!("{}", format_text(&result, player.name())),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}
