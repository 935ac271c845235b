//! Competitive queues (game modes) and their identifiers.
//!
//! The leaderboard API and the local history store number queues
//! independently; each mapping lives here and nowhere else.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Queue {
    #[serde(rename = "1v1 duel")]
    Duel,
    #[serde(rename = "2v2 brawl")]
    Brawl,
    #[serde(rename = "3v3 arcade")]
    Arcade,
}

impl Queue {
    pub const ALL: [Queue; 3] = [Queue::Duel, Queue::Brawl, Queue::Arcade];

    /// Display name, also the text shown in the game's queue banner.
    pub fn name(&self) -> &'static str {
        match self {
            Queue::Duel => "1v1 duel",
            Queue::Brawl => "2v2 brawl",
            Queue::Arcade => "3v3 arcade",
        }
    }

    /// Short form accepted on the command line.
    pub fn selector(&self) -> &'static str {
        match self {
            Queue::Duel => "1v1",
            Queue::Brawl => "2v2",
            Queue::Arcade => "3v3",
        }
    }

    pub fn from_selector(selector: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|q| q.selector() == selector)
            .ok_or_else(|| anyhow!("unknown queue selector '{}'", selector))
    }

    /// `match_queue_id` used by the remote leaderboard, if it ranks this queue.
    pub fn leaderboard_id(&self) -> Option<u32> {
        match self {
            Queue::Duel => Some(511),
            Queue::Brawl => Some(469),
            Queue::Arcade => None,
        }
    }

    pub fn from_leaderboard_id(id: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|q| q.leaderboard_id() == Some(id))
    }

    /// `game_mode` code stored in the match history.
    pub fn history_code(&self) -> i64 {
        match self {
            Queue::Duel => 1,
            Queue::Brawl => 2,
            Queue::Arcade => 3,
        }
    }

    pub fn from_history_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.history_code() == code)
    }

    /// Number of opponents faced in this queue.
    pub fn team_size(&self) -> usize {
        match self {
            Queue::Duel => 1,
            Queue::Brawl => 2,
            Queue::Arcade => 3,
        }
    }
}

impl std::fmt::Display for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors() {
        assert_eq!(Queue::from_selector("1v1").unwrap(), Queue::Duel);
        assert_eq!(Queue::from_selector("3v3").unwrap(), Queue::Arcade);
        assert!(Queue::from_selector("4v4").is_err());
        assert!(Queue::from_selector("1V1").is_err());
    }

    #[test]
    fn test_id_spaces_are_independent() {
        assert_eq!(Queue::from_leaderboard_id(511), Some(Queue::Duel));
        assert_eq!(Queue::from_leaderboard_id(469), Some(Queue::Brawl));
        assert_eq!(Queue::from_leaderboard_id(1), None);
        assert_eq!(Queue::from_history_code(1), Some(Queue::Duel));
        assert_eq!(Queue::from_history_code(511), None);
        for q in Queue::ALL {
            assert_eq!(Queue::from_history_code(q.history_code()), Some(q));
        }
    }

    #[test]
    fn test_team_size_matches_queue_format() {
        let sizes: Vec<usize> = Queue::ALL.iter().map(Queue::team_size).collect();
        assert_eq!(sizes, vec![1, 2, 3]);
        for q in Queue::ALL {
            assert!(q.selector().starts_with(&q.team_size().to_string()));
        }
    }

    #[test]
    fn test_serde_uses_display_names() {
        assert_eq!(serde_json::to_string(&Queue::Brawl).unwrap(), "\"2v2 brawl\"");
        let q: Queue = serde_json::from_str("\"3v3 arcade\"").unwrap();
        assert_eq!(q, Queue::Arcade);
    }
}
