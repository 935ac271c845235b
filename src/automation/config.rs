//! Configuration types for detection.
//!
//! Loads settings from config.json at startup. Provides the screen layout
//! (checkpoints and text regions per screen), polling intervals, and OCR
//! settings. The loaded value is immutable and handed to the state machine.

use anyhow::{bail, Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::leaderboard::DEFAULT_LEADERBOARD_URL;
use crate::queue::Queue;
use crate::screen::{Checkpoint, Color, ScreenDefinition, Section};

/// A queue the banner OCR may report, and the characters that identify it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueueRule {
    pub queue: Queue,
    pub must_contain: Vec<char>,
}

/// The home screen, where the selected queue's name is shown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueueDetectionScreen {
    #[serde(flatten)]
    pub screen: ScreenDefinition,
    /// Checked in order; the first match wins.
    pub valid_queues: Vec<QueueRule>,
}

/// Screens that depend on the queue being played.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueueScreens {
    pub queue: Queue,
    pub character_selection: ScreenDefinition,
    /// Without one, results are always entered by hand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_results: Option<ScreenDefinition>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenLayout {
    pub queue_detection: QueueDetectionScreen,
    pub queues: Vec<QueueScreens>,
}

impl ScreenLayout {
    pub fn screens(&self, queue: Queue) -> Option<&QueueScreens> {
        self.queues.iter().find(|s| s.queue == queue)
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Leaderboard endpoint, fetched once at startup
    #[serde(default = "default_leaderboard_url")]
    pub leaderboard_url: String,
    /// Interval between queue screen checks (milliseconds)
    #[serde(default = "default_queue_poll_ms")]
    pub queue_poll_ms: u64,
    /// Interval between queue screen checks in debug mode (milliseconds)
    #[serde(default = "default_queue_poll_debug_ms")]
    pub queue_poll_debug_ms: u64,
    /// Pause after reading an unrecognized queue name (milliseconds)
    #[serde(default = "default_invalid_queue_retry_ms")]
    pub invalid_queue_retry_ms: u64,
    /// Interval between character select checks (milliseconds)
    #[serde(default = "default_slow_poll_ms")]
    pub character_select_poll_ms: u64,
    /// Interval between match result checks (milliseconds)
    #[serde(default = "default_slow_poll_ms")]
    pub result_poll_ms: u64,
    /// Tesseract page segmentation mode for the single-line result banner
    #[serde(default = "default_result_psm")]
    pub result_psm: u8,
    /// Number of past matches shown when a queue is detected
    #[serde(default = "default_recent_matches")]
    pub recent_matches: usize,
    #[serde(default = "default_layout")]
    pub layout: ScreenLayout,
}

fn default_leaderboard_url() -> String {
    DEFAULT_LEADERBOARD_URL.to_string()
}

fn default_queue_poll_ms() -> u64 {
    500
}

fn default_queue_poll_debug_ms() -> u64 {
    2000
}

fn default_invalid_queue_retry_ms() -> u64 {
    5000
}

fn default_slow_poll_ms() -> u64 {
    3000
}

fn default_result_psm() -> u8 {
    7 // single text line
}

fn default_recent_matches() -> usize {
    5
}

fn default_layout() -> ScreenLayout {
    ScreenLayout::default()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            leaderboard_url: default_leaderboard_url(),
            queue_poll_ms: default_queue_poll_ms(),
            queue_poll_debug_ms: default_queue_poll_debug_ms(),
            invalid_queue_retry_ms: default_invalid_queue_retry_ms(),
            character_select_poll_ms: default_slow_poll_ms(),
            result_poll_ms: default_slow_poll_ms(),
            result_psm: default_result_psm(),
            recent_matches: default_recent_matches(),
            layout: default_layout(),
        }
    }
}

impl AppConfig {
    pub fn queue_poll_interval(&self, debug: bool) -> Duration {
        Duration::from_millis(if debug {
            self.queue_poll_debug_ms
        } else {
            self.queue_poll_ms
        })
    }

    pub fn invalid_queue_retry(&self) -> Duration {
        Duration::from_millis(self.invalid_queue_retry_ms)
    }

    pub fn character_select_interval(&self) -> Duration {
        Duration::from_millis(self.character_select_poll_ms)
    }

    pub fn result_interval(&self) -> Duration {
        Duration::from_millis(self.result_poll_ms)
    }

    /// Checks the layout for mistakes.
    ///
    /// Returns warnings for settings that are legal but almost certainly
    /// wrong; returns an error for settings detection cannot work with.
    pub fn validate(&self) -> Result<Vec<String>> {
        let layout = &self.layout;
        let mut warnings = Vec::new();

        check_screen("queue_detection", &layout.queue_detection.screen, &mut warnings)?;
        if layout.queue_detection.screen.locations.is_empty() {
            bail!("queue_detection has no text locations");
        }

        let mut seen = HashSet::new();
        for screens in &layout.queues {
            if !seen.insert(screens.queue) {
                bail!("screens for {} are defined more than once", screens.queue);
            }
            let name = format!("{} character_selection", screens.queue);
            check_screen(&name, &screens.character_selection, &mut warnings)?;
            if screens.character_selection.locations.is_empty() {
                warnings.push(format!("{} has no opponent name locations", name));
            }
            match &screens.match_results {
                Some(results) => {
                    let name = format!("{} match_results", screens.queue);
                    check_screen(&name, results, &mut warnings)?;
                }
                None => warnings.push(format!(
                    "{} has no match_results screen; results will be asked for manually",
                    screens.queue
                )),
            }
        }

        let rules = &layout.queue_detection.valid_queues;
        for (i, rule) in rules.iter().enumerate() {
            let name_chars: Vec<char> = rule.queue.name().chars().collect();
            let unmatchable: Vec<char> = rule
                .must_contain
                .iter()
                .copied()
                .filter(|c| !name_chars.contains(c))
                .collect();
            if !unmatchable.is_empty() {
                warnings.push(format!(
                    "valid queue '{}' requires {:?}, which its name does not contain; \
                     it can never be detected",
                    rule.queue, unmatchable
                ));
            }

            for earlier in &rules[..i] {
                if same_characters(&earlier.must_contain, &rule.must_contain) {
                    warnings.push(format!(
                        "valid queue '{}' requires the same characters {:?} as '{}'",
                        rule.queue, rule.must_contain, earlier.queue
                    ));
                }
            }

            if layout.screens(rule.queue).is_none() {
                warnings.push(format!(
                    "valid queue '{}' has no character_selection screen",
                    rule.queue
                ));
            }
        }

        Ok(warnings)
    }
}

fn check_screen(name: &str, screen: &ScreenDefinition, warnings: &mut Vec<String>) -> Result<()> {
    if screen.checkpoints.is_empty() {
        bail!("{} has no checkpoints", name);
    }
    if let Some(empty) = screen
        .checkpoints
        .iter()
        .find(|c| c.section.width() == 0 || c.section.height() == 0)
    {
        bail!("{} has a checkpoint with no area: {}", name, empty);
    }
    if let Some(threshold) = screen.test_threshold {
        if threshold > screen.checkpoints.len() {
            warnings.push(format!(
                "{} needs {} matching checkpoints but only has {}",
                name,
                threshold,
                screen.checkpoints.len()
            ));
        }
    }
    Ok(())
}

fn same_characters(a: &[char], b: &[char]) -> bool {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

/// Loads configuration.
///
/// An explicit path must exist and parse. Otherwise config.json next to the
/// executable is used if present, falling back to defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        info!("Config loaded from {}", path.display());
        return Ok(config);
    }

    let config_path = crate::paths::get_exe_dir().join("config.json");
    info!("Looking for config at: {}", config_path.display());

    if !config_path.exists() {
        info!("config.json not found. Using default config.");
        return Ok(AppConfig::default());
    }

    match fs::read_to_string(&config_path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => {
                info!("Config loaded from config.json");
                Ok(config)
            }
            Err(e) => {
                warn!("Failed to parse config.json: {}. Using defaults.", e);
                Ok(AppConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read config.json: {}. Using defaults.", e);
            Ok(AppConfig::default())
        }
    }
}

fn section(coords: [u32; 4]) -> Section {
    Section::from_coords(coords).expect("built-in layout bounds are ordered")
}

fn checkpoint(coords: [u32; 4], color: [u8; 3]) -> Checkpoint {
    Checkpoint::new(section(coords), Color::from(color))
}

impl Default for ScreenLayout {
    /// Layout for a 2560x1440 display.
    fn default() -> Self {
        let home_screen = vec![
            checkpoint([2197, 89, 2203, 95], [10, 113, 155]),
            checkpoint([180, 85, 190, 95], [255, 255, 255]),
            checkpoint([2132, 1112, 2135, 1115], [16, 135, 180]),
        ];

        let character_select = |red_team_box: Checkpoint| {
            vec![
                checkpoint([543, 849, 553, 859], [7, 108, 144]).named("god_select_frame"),
                checkpoint([160, 1100, 166, 1106], [4, 96, 134]).named("god_select_frame"),
                checkpoint([1058, 1169, 1068, 1179], [255, 184, 0]).named("lock_in_button"),
                red_team_box,
            ]
        };

        Self {
            queue_detection: QueueDetectionScreen {
                screen: ScreenDefinition::new(home_screen, vec![section([2033, 1040, 2235, 1128])]),
                valid_queues: vec![
                    QueueRule {
                        queue: Queue::Duel,
                        must_contain: vec!['1', 'v', '1'],
                    },
                    QueueRule {
                        queue: Queue::Brawl,
                        must_contain: vec!['2', 'v', '2'],
                    },
                    // Kept as shipped; config validation flags it for the operator
                    QueueRule {
                        queue: Queue::Arcade,
                        must_contain: vec!['2', 'v', '2'],
                    },
                ],
            },
            queues: vec![
                QueueScreens {
                    queue: Queue::Duel,
                    character_selection: ScreenDefinition::new(
                        character_select(
                            checkpoint([2245, 320, 2251, 326], [188, 20, 17]).named("red_team_box"),
                        ),
                        vec![section([1989, 347, 2213, 387])],
                    ),
                    match_results: None,
                },
                QueueScreens {
                    queue: Queue::Brawl,
                    character_selection: ScreenDefinition::new(
                        character_select(
                            checkpoint([2235, 535, 2241, 541], [190, 20, 20]).named("red_team_box"),
                        ),
                        vec![
                            section([1930, 484, 2218, 519]),
                            section([1958, 612, 2218, 658]),
                        ],
                    ),
                    match_results: Some(
                        ScreenDefinition::new(
                            vec![
                                checkpoint([463, 535, 469, 541], [0, 107, 151]),
                                checkpoint([463, 843, 469, 849], [223, 24, 24]),
                                checkpoint([463, 535, 469, 541], [223, 24, 24]),
                                checkpoint([463, 843, 469, 849], [0, 107, 151]),
                            ],
                            vec![section([1025, 240, 1550, 344])],
                        )
                        .with_threshold(2),
                    ),
                },
                QueueScreens {
                    queue: Queue::Arcade,
                    character_selection: ScreenDefinition::new(
                        character_select(
                            checkpoint([2235, 930, 2241, 935], [190, 20, 20]).named("red_team_box"),
                        ),
                        vec![
                            section([1930, 595, 2218, 650]),
                            section([1930, 730, 2218, 783]),
                            section([1930, 860, 2218, 920]),
                        ],
                    ),
                    match_results: None,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_flags_duplicate_arcade_rule() {
        let warnings = AppConfig::default().validate().unwrap();
        assert!(warnings
            .iter()
            .any(|w| w.contains("'3v3 arcade' requires the same characters")
                && w.contains("'2v2 brawl'")));
        assert!(warnings.iter().any(|w| w.contains("'3v3 arcade' requires")
            && w.contains("never be detected")));
        // The duel and brawl rules are fine
        assert!(!warnings.iter().any(|w| w.contains("'1v1 duel' requires")));
    }

    #[test]
    fn test_default_layout_warns_on_missing_result_screens() {
        let warnings = AppConfig::default().validate().unwrap();
        assert!(warnings
            .iter()
            .any(|w| w.starts_with("1v1 duel has no match_results")));
        assert!(!warnings
            .iter()
            .any(|w| w.starts_with("2v2 brawl has no match_results")));
    }

    #[test]
    fn test_empty_checkpoints_is_an_error() {
        let mut config = AppConfig::default();
        config.layout.queues[0].character_selection.checkpoints.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_area_checkpoint_is_an_error() {
        let mut config = AppConfig::default();
        config.layout.queue_detection.screen.checkpoints[0] =
            checkpoint([3, 3, 3, 3], [10, 113, 155]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("no area"));
    }

    #[test]
    fn test_duplicate_queue_screens_is_an_error() {
        let mut config = AppConfig::default();
        let copy = config.layout.queues[0].clone();
        config.layout.queues.push(copy);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_excessive_threshold_warns() {
        let mut config = AppConfig::default();
        config.layout.queues[1]
            .match_results
            .as_mut()
            .unwrap()
            .test_threshold = Some(9);
        let warnings = config.validate().unwrap();
        assert!(warnings.iter().any(|w| w.contains("needs 9 matching checkpoints")));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"result_poll_ms": 1000}"#).unwrap();
        assert_eq!(config.result_interval(), Duration::from_secs(1));
        assert_eq!(config.queue_poll_interval(false), Duration::from_millis(500));
        assert_eq!(config.queue_poll_interval(true), Duration::from_secs(2));
        assert_eq!(config.layout, ScreenLayout::default());
    }

    #[test]
    fn test_layout_survives_json() {
        let json = serde_json::to_string_pretty(&ScreenLayout::default()).unwrap();
        let parsed: ScreenLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ScreenLayout::default());
        let results = parsed.screens(Queue::Brawl).unwrap().match_results.as_ref().unwrap();
        assert_eq!(results.test_threshold, Some(2));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("missing.json"))).is_err());

        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"recent_matches": 10}"#).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap().recent_matches, 10);
    }
}
