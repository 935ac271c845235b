//! Boxed text table for recent matches.

use super::MatchRecord;

#[derive(Clone, Copy)]
enum Align {
    Left,
    Center,
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = width.saturating_sub(text.chars().count());
    match align {
        Align::Left => format!("{}{}", text, " ".repeat(fill)),
        Align::Center => {
            let left = fill / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(fill - left))
        }
    }
}

fn border(widths: &[usize], left: char, join: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "═".repeat(w + 2)).collect();
    format!("{}{}{}", left, segments.join(&join.to_string()), right)
}

fn row(cells: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .zip(aligns)
        .map(|((cell, width), align)| format!(" {} ", pad(cell, *width, *align)))
        .collect();
    format!("│{}│", padded.join("│"))
}

/// Renders matches as an outlined table.
///
/// Opponent columns are shown up to the team size of the first record's
/// queue; callers pass records from a single queue.
pub fn history_to_table(records: &[MatchRecord]) -> String {
    let Some(first) = records.first() else {
        return "No matches found".to_string();
    };
    let opponent_columns = first.queue.team_size();

    let mut headers = vec!["date".to_string()];
    let mut aligns = vec![Align::Left];
    for i in 1..=opponent_columns {
        headers.push(format!("opponent{}", i));
        aligns.push(Align::Left);
    }
    headers.push("game_mode".to_string());
    headers.push("result".to_string());
    aligns.extend([Align::Center, Align::Center]);

    let body: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            let opponents = [&record.opponent1, &record.opponent2, &record.opponent3];
            let mut cells = vec![record.date.clone()];
            cells.extend(
                opponents
                    .into_iter()
                    .take(opponent_columns)
                    .map(|o| o.clone().unwrap_or_default()),
            );
            cells.push(record.queue.to_string());
            cells.push(record.result.to_string());
            cells
        })
        .collect();

    let widths: Vec<usize> = (0..headers.len())
        .map(|col| {
            body.iter()
                .map(|cells| cells[col].chars().count())
                .chain(std::iter::once(headers[col].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = vec![
        border(&widths, '╒', '╤', '╕'),
        row(&headers, &widths, &aligns),
        border(&widths, '╞', '╪', '╡'),
    ];
    lines.extend(body.iter().map(|cells| row(cells, &widths, &aligns)));
    lines.push(border(&widths, '╘', '╧', '╛'));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MatchResult;
    use crate::queue::Queue;

    fn record(queue: Queue, opponents: [Option<&str>; 3], result: MatchResult) -> MatchRecord {
        let [opponent1, opponent2, opponent3] = opponents.map(|o| o.map(str::to_string));
        MatchRecord {
            id: 1,
            date: "2024-05-01 20:15:00".to_string(),
            opponent1,
            opponent2,
            opponent3,
            queue,
            result,
        }
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(history_to_table(&[]), "No matches found");
    }

    #[test]
    fn test_duel_table_has_one_opponent_column() {
        let table =
            history_to_table(&[record(Queue::Duel, [Some("Bob"), None, None], MatchResult::Win)]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[1].contains("opponent1"));
        assert!(!lines[1].contains("opponent2"));
        assert!(lines[3].contains("Bob"));
        assert!(lines[3].contains("1v1 duel"));
        assert!(lines[0].starts_with('╒') && lines[4].starts_with('╘'));

        // Every line has the same display width
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|l| l.chars().count() == width));
    }

    #[test]
    fn test_brawl_table_shows_second_opponent() {
        let table = history_to_table(&[
            record(Queue::Brawl, [Some("Ana"), Some("Bob"), None], MatchResult::Loss),
            record(Queue::Brawl, [Some("Cy"), None, None], MatchResult::Win),
        ]);
        let header = table.lines().nth(1).unwrap();
        assert!(header.contains("opponent2"));
        assert!(!header.contains("opponent3"));
        assert!(table.contains("Loss"));
    }

    #[test]
    fn test_arcade_table_fills_every_opponent_cell() {
        let table = history_to_table(&[record(
            Queue::Arcade,
            [Some("Ana"), None, Some("Cy")],
            MatchResult::Win,
        )]);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[1].contains("opponent3"));
        let cells: Vec<&str> = lines[3].split('│').map(str::trim).collect();
        assert_eq!(&cells[2..5], &["Ana", "", "Cy"]);
    }

    #[test]
    fn test_center_padding() {
        assert_eq!(pad("Win", 7, Align::Center), "  Win  ");
        assert_eq!(pad("Win", 6, Align::Center), " Win  ");
        assert_eq!(pad("Win", 6, Align::Left), "Win   ");
    }
}
