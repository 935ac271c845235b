//! Detection state machine.
//!
//! The state machine sequences through:
//! Queue → Character select → Opponent names → Result → Record → Loop.
//! Every wait is a fixed-interval poll with no timeout; the player is
//! expected to eventually reach the awaited screen.

use anyhow::Result;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::automation::config::{AppConfig, QueueScreens};
use crate::automation::prompt::ResultPrompt;
use crate::automation::queue::{match_queue, QueueDetection};
use crate::capture::ScreenSource;
use crate::history::{MatchHistory, MatchResult};
use crate::leaderboard::Leaderboard;
use crate::ocr::{ExtractOptions, TextExtractor, TextRecognizer};
use crate::queue::Queue;
use crate::report;
use crate::screen::{detect_screen, ScreenDefinition};

/// Detection state machine states.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionState {
    /// Watching the home screen for a queue banner
    WaitingForQueue,
    /// Queue known; showing recent history
    QueueDetected(Queue),
    /// Waiting for the character selection screen
    WaitingForCharacterSelect(Queue),
    /// Character selection showing; reading opponent names
    CharacterSelectDetected(Queue),
    /// Match in progress; waiting for the result banner
    WaitingForResult { queue: Queue, opponents: Vec<String> },
    /// Result known; storing it
    ResultRecorded {
        queue: Queue,
        opponents: Vec<String>,
        result: MatchResult,
    },
}

impl std::fmt::Display for DetectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionState::WaitingForQueue => write!(f, "Waiting for queue"),
            DetectionState::QueueDetected(queue) => write!(f, "Queue detected ({})", queue),
            DetectionState::WaitingForCharacterSelect(queue) => {
                write!(f, "Waiting for character select ({})", queue)
            }
            DetectionState::CharacterSelectDetected(queue) => {
                write!(f, "Character select ({})", queue)
            }
            DetectionState::WaitingForResult { queue, .. } => {
                write!(f, "Waiting for result ({})", queue)
            }
            DetectionState::ResultRecorded { queue, result, .. } => {
                write!(f, "Recording {} ({})", result, queue)
            }
        }
    }
}

/// The external capabilities the state machine drives.
pub struct Services<'a> {
    pub screen: &'a dyn ScreenSource,
    pub ocr: &'a dyn TextRecognizer,
    pub leaderboard: &'a Leaderboard,
    pub history: &'a MatchHistory,
    pub prompt: &'a dyn ResultPrompt,
}

/// Detection context holding state, configuration and collaborators.
pub struct DetectionContext<'a> {
    /// Current state
    pub state: DetectionState,
    config: &'a AppConfig,
    services: Services<'a>,
    /// Queue chosen on the command line; skips queue detection
    preselected: Option<Queue>,
    debug: bool,
    debug_dir: Option<PathBuf>,
}

/// Sleeps `interval` between probes until `probe` returns true.
fn wait_until(interval: Duration, mut probe: impl FnMut() -> bool) {
    while !probe() {
        thread::sleep(interval);
    }
}

/// Maps the lowercase result banner to a result.
pub fn classify_result(text: &str) -> Option<MatchResult> {
    match text {
        "victory" => Some(MatchResult::Win),
        "defeat" => Some(MatchResult::Loss),
        _ => None,
    }
}

impl<'a> DetectionContext<'a> {
    pub fn new(config: &'a AppConfig, services: Services<'a>, preselected: Option<Queue>) -> Self {
        let start = match preselected {
            Some(queue) => DetectionState::QueueDetected(queue),
            None => DetectionState::WaitingForQueue,
        };
        Self {
            state: start,
            config,
            services,
            preselected,
            debug: false,
            debug_dir: None,
        }
    }

    /// Enables checkpoint tracing, slower queue polling, and saving every
    /// OCR capture to `debug_dir`.
    pub fn with_debug(mut self, debug_dir: PathBuf) -> Self {
        self.debug = true;
        self.debug_dir = Some(debug_dir);
        self
    }

    /// State to return to after a match or a failed detection.
    fn start_state(&self) -> DetectionState {
        match self.preselected {
            Some(queue) => DetectionState::QueueDetected(queue),
            None => DetectionState::WaitingForQueue,
        }
    }

    fn extractor(&self) -> TextExtractor<'a> {
        let extractor = TextExtractor::new(self.services.screen, self.services.ocr);
        match &self.debug_dir {
            Some(dir) => extractor.with_debug_dir(dir.clone()),
            None => extractor,
        }
    }

    fn is_showing(&self, definition: &ScreenDefinition) -> bool {
        detect_screen(
            self.services.screen,
            definition,
            definition.test_threshold,
            self.debug,
        )
    }

    fn screens(&self, queue: Queue) -> Option<&'a QueueScreens> {
        self.config.layout.screens(queue)
    }

    /// Advances the state machine by one step.
    ///
    /// Each step may block for as long as it takes the awaited screen to appear.
    pub fn step(&mut self) -> Result<()> {
        let next = match &self.state {
            DetectionState::WaitingForQueue => match self.detect_queue() {
                QueueDetection::Recognized(queue) => {
                    info!("Valid queue name detected: {}, waiting for match to start...", queue);
                    DetectionState::QueueDetected(queue)
                }
                QueueDetection::Unrecognized(text) => {
                    warn!("Invalid queue name detected: {}", text);
                    thread::sleep(self.config.invalid_queue_retry());
                    DetectionState::WaitingForQueue
                }
                QueueDetection::NoText => {
                    warn!("No queue text detected");
                    thread::sleep(self.config.invalid_queue_retry());
                    DetectionState::WaitingForQueue
                }
            },

            DetectionState::QueueDetected(queue) => {
                let queue = *queue;
                self.show_recent_matches(queue)?;
                if self.screens(queue).is_some() {
                    info!("Waiting for {} character selection screen...", queue);
                    DetectionState::WaitingForCharacterSelect(queue)
                } else {
                    warn!("No character selection screen configured for {}", queue);
                    thread::sleep(self.config.invalid_queue_retry());
                    DetectionState::WaitingForQueue
                }
            }

            DetectionState::WaitingForCharacterSelect(queue) => {
                let queue = *queue;
                if let Some(screens) = self.screens(queue) {
                    wait_until(self.config.character_select_interval(), || {
                        self.is_showing(&screens.character_selection)
                    });
                }
                info!("Found character selection screen, looking for opponent names...");
                DetectionState::CharacterSelectDetected(queue)
            }

            DetectionState::CharacterSelectDetected(queue) => {
                let queue = *queue;
                match self.detect_opponent_names(queue) {
                    Some(opponents) => {
                        self.announce_opponents(&opponents);
                        info!("Good luck! Waiting for match results...");
                        DetectionState::WaitingForResult { queue, opponents }
                    }
                    None => {
                        warn!("No opponents were able to be detected, restarting detection...");
                        self.start_state()
                    }
                }
            }

            DetectionState::WaitingForResult { queue, opponents } => {
                let queue = *queue;
                let opponents = opponents.clone();
                let result = match self.detect_match_result(queue) {
                    Some(result) => result,
                    None => {
                        println!("No match results detected");
                        self.services.prompt.ask_result()?
                    }
                };
                DetectionState::ResultRecorded {
                    queue,
                    opponents,
                    result,
                }
            }

            DetectionState::ResultRecorded {
                queue,
                opponents,
                result,
            } => {
                self.services.history.record(*queue, *result, opponents)?;
                match result {
                    MatchResult::Win => println!("You have won!"),
                    MatchResult::Loss => println!("You have been defeated!"),
                }
                self.start_state()
            }
        };

        debug!("{} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Waits for the home screen, then reads the queue banner.
    fn detect_queue(&self) -> QueueDetection {
        let detection = &self.config.layout.queue_detection;
        wait_until(self.config.queue_poll_interval(self.debug), || {
            let found = self.is_showing(&detection.screen);
            if !found {
                debug!("Queue not detected");
            }
            found
        });
        info!("Queue detected");

        let texts = self
            .extractor()
            .process_locations(&detection.screen.locations, ExtractOptions::new(true));
        let Some(text) = texts.first() else {
            return QueueDetection::NoText;
        };

        info!("Found queue text: {}", text);
        match_queue(text, &detection.valid_queues)
    }

    /// Reads opponent names for as long as character selection stays up.
    ///
    /// Returns `None` if the screen goes away before any name is read.
    fn detect_opponent_names(&self, queue: Queue) -> Option<Vec<String>> {
        let screen = &self.screens(queue)?.character_selection;
        let extractor = self.extractor();

        while self.is_showing(screen) {
            let mut names =
                extractor.process_locations(&screen.locations, ExtractOptions::new(false));
            if !names.is_empty() {
                if names.len() > 3 {
                    warn!("Read {} opponent names, keeping the first 3", names.len());
                    names.truncate(3);
                }
                return Some(names);
            }
            thread::sleep(self.config.character_select_interval());
        }
        None
    }

    /// Waits for the result banner and classifies it.
    ///
    /// `None` means the banner could not be read (or this queue has no
    /// result screen configured) and a human must decide.
    fn detect_match_result(&self, queue: Queue) -> Option<MatchResult> {
        let screen = self.screens(queue)?.match_results.as_ref()?;

        wait_until(self.config.result_interval(), || self.is_showing(screen));

        let options = ExtractOptions::new(true).with_psm(self.config.result_psm);
        let texts = self.extractor().process_locations(&screen.locations, options);
        debug!("Result banner text: {:?}", texts);

        texts.first().and_then(|text| classify_result(text))
    }

    fn announce_opponents(&self, opponents: &[String]) {
        let leaderboard = self.services.leaderboard;
        debug!(
            "Leaderboard snapshot is {} minutes old",
            leaderboard.age().num_minutes()
        );

        let hits: Vec<_> = opponents
            .iter()
            .flat_map(|name| leaderboard.lookup(name))
            .collect();
        println!("{}", report::leaderboard_alert(opponents, &hits));
    }

    fn show_recent_matches(&self, queue: Queue) -> Result<()> {
        let history = self.services.history;
        let records = history.recent(queue, self.config.recent_matches)?;
        if let Some(text) = report::recent_matches(&records, history.win_loss_counts(queue)?) {
            println!("{}", text);
        }
        Ok(())
    }
}
