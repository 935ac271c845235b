//! Local match history.
//!
//! One SQLite file, one append-only `match_results` table. The connection is
//! opened once and used sequentially by the detection loop.

pub mod table;

pub use table::history_to_table;

use anyhow::{anyhow, bail, Context, Result};
use log::info;
use rusqlite::{params, Connection, Row};
use std::path::Path;

use crate::queue::Queue;

pub const DEFAULT_HISTORY_FILE: &str = "match_history.db";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Loss,
}

impl MatchResult {
    fn to_i64(self) -> i64 {
        match self {
            MatchResult::Win => 1,
            MatchResult::Loss => 0,
        }
    }

    fn from_i64(value: i64) -> Self {
        if value == 1 {
            MatchResult::Win
        } else {
            MatchResult::Loss
        }
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchResult::Win => write!(f, "Win"),
            MatchResult::Loss => write!(f, "Loss"),
        }
    }
}

/// A stored match.
///
/// Opponent slots beyond the queue's team size are always `None`, whatever
/// the row holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub id: i64,
    pub date: String,
    pub opponent1: Option<String>,
    pub opponent2: Option<String>,
    pub opponent3: Option<String>,
    pub queue: Queue,
    pub result: MatchResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WinLoss {
    pub wins: u32,
    pub losses: u32,
}

fn row_to_record(row: &Row) -> Result<MatchRecord> {
    let code: i64 = row.get("game_mode")?;
    let queue = Queue::from_history_code(code)
        .ok_or_else(|| anyhow!("unknown game_mode code {}", code))?;
    let size = queue.team_size();

    Ok(MatchRecord {
        id: row.get("id")?,
        date: row.get::<_, Option<String>>("date")?.unwrap_or_default(),
        opponent1: row.get("opponent1")?,
        opponent2: if size >= 2 { row.get("opponent2")? } else { None },
        opponent3: if size >= 3 { row.get("opponent3")? } else { None },
        queue,
        result: MatchResult::from_i64(row.get("result")?),
    })
}

pub struct MatchHistory {
    conn: Connection,
}

impl MatchHistory {
    /// Opens (creating if needed) the history file.
    pub fn open(path: &Path) -> Result<Self> {
        let history = Self::open_file(path)
            .with_context(|| format!("failed to open match history {}", path.display()))?;
        info!("Match history: {}", path.display());
        Ok(history)
    }

    fn open_file(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create history directory {}", parent.display())
            })?;
        }
        Self::init(Connection::open(path)?)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(include_str!("schema.sql"))
            .context("failed to create match_results table")?;
        Ok(Self { conn })
    }

    /// Stores one finished match against 1-3 opponents.
    pub fn record(&self, queue: Queue, result: MatchResult, opponents: &[String]) -> Result<i64> {
        if opponents.is_empty() || opponents.len() > 3 {
            bail!("expected 1-3 opponents, got {}", opponents.len());
        }
        let slot = |i: usize| opponents.get(i).map(String::as_str);

        self.conn
            .execute(
                "INSERT INTO match_results (opponent1, opponent2, opponent3, game_mode, result)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![slot(0), slot(1), slot(2), queue.history_code(), result.to_i64()],
            )
            .context("failed to insert match result")?;

        Ok(self.conn.last_insert_rowid())
    }

    /// The `limit` most recent matches in a queue, newest first.
    pub fn recent(&self, queue: Queue, limit: usize) -> Result<Vec<MatchRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, opponent1, opponent2, opponent3, game_mode, result
             FROM match_results
             WHERE game_mode = ?1
             ORDER BY id DESC
             LIMIT ?2",
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut rows = stmt.query(params![queue.history_code(), limit])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(row_to_record(row)?);
        }

        Ok(records)
    }

    pub fn win_loss_counts(&self, queue: Queue) -> Result<WinLoss> {
        let count = |result: MatchResult| -> Result<u32> {
            let n: u32 = self.conn.query_row(
                "SELECT COUNT(*) FROM match_results WHERE game_mode = ?1 AND result = ?2",
                params![queue.history_code(), result.to_i64()],
                |row| row.get(0),
            )?;
            Ok(n)
        };

        Ok(WinLoss {
            wins: count(MatchResult::Win)?,
            losses: count(MatchResult::Loss)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_record_and_recent_round_trip() {
        let history = MatchHistory::open_in_memory().unwrap();
        history
            .record(Queue::Duel, MatchResult::Win, &names(&["Bob"]))
            .unwrap();

        let recent = history.recent(Queue::Duel, 5).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].result, MatchResult::Win);
        assert_eq!(recent[0].result.to_string(), "Win");
        assert_eq!(recent[0].opponent1.as_deref(), Some("Bob"));
        assert_eq!(recent[0].opponent2, None);
        assert_eq!(recent[0].opponent3, None);
        assert_eq!(recent[0].queue, Queue::Duel);
        assert!(!recent[0].date.is_empty());
    }

    #[test]
    fn test_slots_follow_queue_size() {
        let history = MatchHistory::open_in_memory().unwrap();
        history
            .record(Queue::Brawl, MatchResult::Loss, &names(&["Ana", "Bob"]))
            .unwrap();
        history
            .record(Queue::Arcade, MatchResult::Win, &names(&["Ana", "Bob", "Cy"]))
            .unwrap();

        let brawl = &history.recent(Queue::Brawl, 5).unwrap()[0];
        assert_eq!(brawl.opponent2.as_deref(), Some("Bob"));
        assert_eq!(brawl.opponent3, None);
        assert_eq!(brawl.result.to_string(), "Loss");

        let arcade = &history.recent(Queue::Arcade, 5).unwrap()[0];
        assert_eq!(arcade.opponent3.as_deref(), Some("Cy"));
    }

    #[test]
    fn test_recent_newest_first_and_limited() {
        let history = MatchHistory::open_in_memory().unwrap();
        for i in 0..7 {
            history
                .record(Queue::Duel, MatchResult::Win, &names(&[&format!("p{}", i)]))
                .unwrap();
        }
        history
            .record(Queue::Brawl, MatchResult::Win, &names(&["other"]))
            .unwrap();

        let recent = history.recent(Queue::Duel, 5).unwrap();
        let opponents: Vec<&str> = recent.iter().filter_map(|r| r.opponent1.as_deref()).collect();
        assert_eq!(opponents, vec!["p6", "p5", "p4", "p3", "p2"]);
    }

    #[test]
    fn test_win_loss_counts_per_queue() {
        let history = MatchHistory::open_in_memory().unwrap();
        for _ in 0..3 {
            history.record(Queue::Duel, MatchResult::Win, &names(&["a"])).unwrap();
        }
        for _ in 0..2 {
            history.record(Queue::Duel, MatchResult::Loss, &names(&["b"])).unwrap();
        }
        history.record(Queue::Brawl, MatchResult::Win, &names(&["c", "d"])).unwrap();

        assert_eq!(
            history.win_loss_counts(Queue::Duel).unwrap(),
            WinLoss { wins: 3, losses: 2 }
        );
        assert_eq!(
            history.win_loss_counts(Queue::Arcade).unwrap(),
            WinLoss::default()
        );
    }

    #[test]
    fn test_opponent_count_validated() {
        let history = MatchHistory::open_in_memory().unwrap();
        assert!(history.record(Queue::Duel, MatchResult::Win, &[]).is_err());
        assert!(history
            .record(Queue::Arcade, MatchResult::Win, &names(&["a", "b", "c", "d"]))
            .is_err());
    }

    #[test]
    fn test_unusable_path_fails_fast() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"plain file").unwrap();

        let err = MatchHistory::open(&blocker.join("history.db")).err().unwrap();
        assert!(err.to_string().starts_with("failed to open match history"));
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history").join(DEFAULT_HISTORY_FILE);

        {
            let history = MatchHistory::open(&path).unwrap();
            history.record(Queue::Duel, MatchResult::Win, &names(&["Bob"])).unwrap();
        }
        {
            let history = MatchHistory::open(&path).unwrap();
            let _again = MatchHistory::open(&path).unwrap();
            assert_eq!(history.recent(Queue::Duel, 10).unwrap().len(), 1);
        }
    }
}
