//! Content command implementation.

use super::{CliError, ContentKind};
use skyguard::content::{ENEMY_ROSTER, HERO_ROSTER, LEVELS, TOWER_ROSTER};

/// Execute the content command: dump static tables as JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub(crate) fn execute(kind: Option<ContentKind>) -> Result<(), CliError> {
    let json = match kind {
        Some(ContentKind::Heroes) => serde_json::to_string_pretty(&HERO_ROSTER)?,
        Some(ContentKind::Enemies) => serde_json::to_string_pretty(&ENEMY_ROSTER)?,
        Some(ContentKind::Towers) => serde_json::to_string_pretty(&TOWER_ROSTER)?,
        Some(ContentKind::Levels) => serde_json::to_string_pretty(&LEVELS)?,
        None => serde_json::to_string_pretty(&serde_json::json!({
            "heroes": HERO_ROSTER,
            "enemies": ENEMY_ROSTER,
            "towers": TOWER_ROSTER,
            "levels": LEVELS,
        }))?,
    };
    println!("{json}");
    Ok(())
}
