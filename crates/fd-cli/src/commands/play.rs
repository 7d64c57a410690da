use std::fs;
use std::io;
use std::path::Path;

use colored::Colorize;
use tracing::info;

use fd_dice::{DiceSet, ProbabilityMatrix};
use fd_fair::FairGenerator;
use fd_round::{GameContext, Party, Prompter, Round, RoundConfig, RoundOutcome, Transcript};

use super::Failure;
use crate::table::TableRenderer;

pub fn run(
    definitions: &[String],
    config: &RoundConfig,
    transcript: Option<&Path>,
) -> Result<(), Failure> {
    let dice = DiceSet::parse(definitions).map_err(|e| Failure::Usage(e.to_string()))?;
    let matrix = ProbabilityMatrix::compute(&dice);
    let ctx = GameContext::new(&dice, &matrix, &TableRenderer, config);

    let stdin = io::stdin();
    let prompter = Prompter::new(stdin.lock(), io::stdout().lock());
    let report = Round::new(FairGenerator::new(), prompter, &dice).play(&ctx)?;

    match report.outcome {
        RoundOutcome::Finished {
            winner: Party::Player,
            ..
        } => println!("{}", "You won the round.".green().bold()),
        RoundOutcome::Finished { tie: true, .. } => {
            println!("{}", "The house takes the tie.".yellow().bold());
        }
        RoundOutcome::Finished { .. } => println!("{}", "The house won the round.".red().bold()),
        RoundOutcome::Aborted { .. } => {}
    }

    if let Some(path) = transcript {
        save(&report.transcript, path)?;
    }

    Ok(())
}

fn save(transcript: &Transcript, path: &Path) -> Result<(), Failure> {
    let json = serde_json::to_string_pretty(transcript)
        .map_err(|e| Failure::Other(format!("failed to serialize transcript: {e}")))?;
    fs::write(path, json)
        .map_err(|e| Failure::Other(format!("failed to write {}: {e}", path.display())))?;
    info!(path = %path.display(), entries = transcript.len(), "transcript written");
    Ok(())
}
