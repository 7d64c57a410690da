use std::fs;
use std::path::Path;

use colored::Colorize;

use fd_round::Transcript;

use super::Failure;

pub fn run(path: &Path) -> Result<(), Failure> {
    let json = fs::read_to_string(path)
        .map_err(|e| Failure::Other(format!("failed to read {}: {e}", path.display())))?;
    let transcript: Transcript = serde_json::from_str(&json)
        .map_err(|e| Failure::Other(format!("{} is not a transcript: {e}", path.display())))?;

    let reveals = transcript.verify()?;

    println!(
        "  {} round {} ({} entries, {reveals} reveals checked)",
        "Verified".green().bold(),
        transcript.round_id,
        transcript.len()
    );
    Ok(())
}
