//! Console output shown to the player.

use crate::history::{history_to_table, MatchRecord, WinLoss};
use crate::leaderboard::LeaderboardHit;

/// Wraps `body` between a titled rule and a plain rule of the same width.
pub fn surrounded(header: &str, body: &str) -> String {
    let title = format!("======= {} =======", header);
    let footer = "=".repeat(title.chars().count());
    format!("\n{}\n{}\n{}\n", title, body, footer)
}

/// Text announcing which opponents are ranked, or that none are.
pub fn leaderboard_alert(opponents: &[String], hits: &[LeaderboardHit]) -> String {
    if hits.is_empty() {
        return format!(
            "Not found on the leaderboard: {}, have fun!",
            opponents.join(", ")
        );
    }

    let body: Vec<String> = hits.iter().map(|hit| hit.to_string()).collect();
    surrounded("Leaderboard Alert", &body.join("\n"))
}

/// Recent matches table plus the all-time record. Empty if nothing was played.
pub fn recent_matches(records: &[MatchRecord], summary: WinLoss) -> Option<String> {
    if records.is_empty() {
        return None;
    }

    Some(format!(
        "\nLast {} Matches\n{}\nTotal Wins: {} Losses: {}",
        records.len(),
        history_to_table(records),
        summary.wins,
        summary.losses
    ))
}
