//! Remote leaderboard snapshot.
//!
//! The leaderboard is fetched once at startup and never refreshed. A long
//! session will therefore see ranks drift out of date; the snapshot keeps
//! its fetch time so lookups can report how old it is.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::{debug, info};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::queue::Queue;

pub const DEFAULT_LEADERBOARD_URL: &str = "https://api2.hirezstudios.com/stats/leaderboard";

/// Order in which queues are searched and reported.
const LOOKUP_ORDER: [Queue; 2] = [Queue::Brawl, Queue::Duel];

/// Raw response body.
#[derive(Debug, Deserialize)]
struct LeaderboardResponse {
    rows: Vec<LeaderboardRow>,
}

/// One row as returned by the API. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardRow {
    pub match_queue_id: u32,
    pub ranking: u32,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub god_1: Option<String>,
    #[serde(default)]
    pub god_2: Option<String>,
    #[serde(default)]
    pub god_3: Option<String>,
}

/// A ranked player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: String,
    pub gods: Vec<String>,
}

/// A lookup result: an entry and the queue it was ranked in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardHit {
    pub queue: Queue,
    pub entry: LeaderboardEntry,
}

impl std::fmt::Display for LeaderboardHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Player: {} | Queue: {} | Rank: {} | Gods: {}",
            self.entry.name,
            self.queue,
            self.entry.rank,
            self.entry.gods.join(", ")
        )
    }
}

/// Immutable per-queue leaderboard, ordered by rank.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    queues: BTreeMap<Queue, Vec<LeaderboardEntry>>,
    fetched_at: DateTime<Local>,
}

impl Leaderboard {
    /// Downloads and parses the leaderboard.
    pub fn fetch(url: &str) -> Result<Self> {
        info!("Fetching leaderboard from {}", url);

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let body = client
            .get(url)
            .header("User-Agent", "dko-tracker")
            .send()
            .context("Leaderboard request failed")?
            .error_for_status()
            .context("Leaderboard returned an error status")?
            .text()
            .context("Failed to read leaderboard response")?;

        Self::from_json(&body)
    }

    /// Parses a response body (`{"rows": [...]}`).
    pub fn from_json(body: &str) -> Result<Self> {
        let response: LeaderboardResponse =
            serde_json::from_str(body).context("Failed to parse leaderboard JSON")?;
        Ok(Self::from_rows(response.rows))
    }

    /// Partitions rows by queue and sorts each queue by rank.
    ///
    /// Rows for queues this tool does not track are skipped.
    pub fn from_rows(rows: Vec<LeaderboardRow>) -> Self {
        let mut queues: BTreeMap<Queue, Vec<LeaderboardEntry>> = Queue::ALL
            .into_iter()
            .filter(|q| q.leaderboard_id().is_some())
            .map(|q| (q, Vec::new()))
            .collect();

        for row in rows {
            let Some(queue) = Queue::from_leaderboard_id(row.match_queue_id) else {
                debug!("Skipping leaderboard row for queue id {}", row.match_queue_id);
                continue;
            };
            let Some(name) = row.player_name else {
                debug!("Skipping nameless leaderboard row ranked {} in {}", row.ranking, queue);
                continue;
            };

            let gods = [row.god_1, row.god_2, row.god_3]
                .into_iter()
                .flatten()
                .filter(|god| god != "null")
                .map(|god| title_case(&god))
                .collect();

            if let Some(entries) = queues.get_mut(&queue) {
                entries.push(LeaderboardEntry {
                    rank: row.ranking,
                    name,
                    gods,
                });
            }
        }

        for entries in queues.values_mut() {
            entries.sort_by_key(|entry| entry.rank);
        }

        Self {
            queues,
            fetched_at: Local::now(),
        }
    }

    /// Entries for a queue, best rank first. Empty for unranked queues.
    pub fn entries(&self, queue: Queue) -> &[LeaderboardEntry] {
        self.queues.get(&queue).map(Vec::as_slice).unwrap_or_default()
    }

    /// Finds a player by exact display name.
    ///
    /// Returns at most one hit per queue, brawl before duel: the best-ranked
    /// entry with that name.
    pub fn lookup(&self, player_name: &str) -> Vec<LeaderboardHit> {
        LOOKUP_ORDER
            .into_iter()
            .filter_map(|queue| {
                self.entries(queue)
                    .iter()
                    .find(|entry| entry.name == player_name)
                    .map(|entry| LeaderboardHit {
                        queue,
                        entry: entry.clone(),
                    })
            })
            .collect()
    }

    pub fn fetched_at(&self) -> DateTime<Local> {
        self.fetched_at
    }

    pub fn age(&self) -> chrono::Duration {
        Local::now() - self.fetched_at
    }
}

/// Capitalizes the first letter of each alphabetic run and lowercases the rest.
fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if previous_is_letter {
            result.extend(c.to_lowercase());
        } else {
            result.extend(c.to_uppercase());
        }
        previous_is_letter = c.is_alphabetic();
    }
    result
}
