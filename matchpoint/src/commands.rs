//! Subcommand implementations.

use std::path::Path;

use anyhow::Context;
use scoring::tabular::{self, Approximation};
use store::{MatchOrigin, MatchRecord, MatchStore, ProfileStore};

/// Names invented by the decoder for players it could not identify.
fn is_placeholder(name: &str) -> bool {
    name.starts_with("Unknown T")
}

pub fn import(data_dir: &Path, csv: &Path, video: Option<String>) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(csv)
        .with_context(|| format!("reading {}", csv.display()))?;
    let mut recon = tabular::decode(&text).context("decoding CSV export")?;

    for approximation in &recon.approximations {
        match approximation {
            Approximation::PaddedRoster { team } => {
                tracing::warn!("{} roster incomplete; placeholder players added", team);
            }
            Approximation::UnresolvedName { name } => {
                tracing::warn!("could not place {:?}; attributed to the first seat", name);
            }
            Approximation::FinalGameCredited => {
                tracing::debug!("final game credited to the last point's winner");
            }
        }
    }

    let profiles = ProfileStore::new(data_dir.to_path_buf());
    for player in recon.players.iter_mut() {
        if is_placeholder(&player.name) {
            continue;
        }
        player.profile_id = profiles.resolve(&player.name)?.profile_id;
    }

    let record = MatchRecord::from_reconstructed(&recon, video);
    let matches = MatchStore::new(data_dir.to_path_buf());
    let id = matches.save(&record)?;
    profiles.apply_match_result(&record)?;

    println!("Imported match {}", id);
    println!("  {}", roster_line(&record));
    println!("  {}", summary_line(&record));
    Ok(())
}

pub fn export(data_dir: &Path, id: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let matches = MatchStore::new(data_dir.to_path_buf());
    let record = matches
        .load(id)?
        .with_context(|| format!("no stored match with id {}", id))?;
    let csv = tabular::encode(&record.events, &record.players());
    match output {
        Some(path) => {
            std::fs::write(path, csv).with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {} points to {}", record.events.len(), path.display());
        }
        None => println!("{}", csv),
    }
    Ok(())
}

pub fn list(data_dir: &Path) -> anyhow::Result<()> {
    let matches = MatchStore::new(data_dir.to_path_buf());
    let records = matches.list()?;
    if records.is_empty() {
        println!("No stored matches.");
        return Ok(());
    }
    for record in records {
        let origin = match record.origin {
            MatchOrigin::Live => "live",
            MatchOrigin::Imported => "imported",
        };
        println!(
            "{}  {:>10}  {:<8}  {}  {}",
            record.match_id,
            record.created_at,
            origin,
            roster_line(&record),
            summary_line(&record),
        );
    }
    Ok(())
}

pub fn show(data_dir: &Path, id: &str) -> anyhow::Result<()> {
    let matches = MatchStore::new(data_dir.to_path_buf());
    let record = matches
        .load(id)?
        .with_context(|| format!("no stored match with id {}", id))?;

    println!("{}", roster_line(&record));
    println!("{}", summary_line(&record));
    println!("{} points recorded", record.events.len());
    println!();

    for player in record.players() {
        let Some(stats) = record.stats.get(&player.profile_id) else {
            continue;
        };
        println!("{} ({})", player.name, player.seat.team());
        println!(
            "  points {}-{}  winners {}  aces {}  UE {}  FE {}  DF {}",
            stats.points_won,
            stats.points_lost,
            stats.winners,
            stats.aces,
            stats.unforced_errors,
            stats.forced_errors,
            stats.double_faults,
        );
        println!(
            "  1st serve {}/{}  2nd serve won {}/{}  unreturned {}",
            stats.first_serves_in,
            stats.first_serves_total,
            stats.second_serves_won,
            stats.second_serves_total,
            stats.serves_unreturned,
        );
        println!(
            "  return {}/{}  return winners {}  net {}/{}",
            stats.return_points_won,
            stats.return_points_total,
            stats.return_winners,
            stats.net_points_won,
            stats.net_points_approached,
        );
    }
    Ok(())
}

fn roster_line(record: &MatchRecord) -> String {
    let pair = |side: usize| {
        record.teams[side]
            .players
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    };
    format!("{} vs {}", pair(0), pair(1))
}

fn summary_line(record: &MatchRecord) -> String {
    match record.winner {
        Some(team) => format!("{}  ({} won)", record.score_line(), team),
        None => format!("{}  (no winner recorded)", record.score_line()),
    }
}
