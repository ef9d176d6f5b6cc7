//! Verdict parsing.
//!
//! Backends are asked to close the story with one verdict line. The last line
//! carrying a marker wins; a response without one leaves survival
//! undetermined.

use againstai_core::ids::UserId;

use crate::narrative::Contestant;
use crate::prompt::{ALL_PERISHED_MARKER, ALL_SURVIVED_MARKER, SURVIVORS_MARKER};

/// Extracts the surviving user ids from a narrative's verdict line.
#[must_use]
pub fn parse_verdict(text: &str, contestants: &[Contestant]) -> Option<Vec<UserId>> {
    text.lines()
        .rev()
        .map(|line| line.trim().trim_matches(|c| c == '*' || c == '"'))
        .find_map(|line| parse_line(line, contestants))
}

fn parse_line(line: &str, contestants: &[Contestant]) -> Option<Vec<UserId>> {
    let upper = line.to_uppercase();
    // Blanket outcomes must fill the whole line, so prose that merely opens
    // with the same words is not a verdict.
    let outcome =
        upper.trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());
    if outcome == ALL_SURVIVED_MARKER {
        return Some(contestants.iter().map(|c| c.user_id).collect());
    }
    if outcome == ALL_PERISHED_MARKER {
        return Some(Vec::new());
    }
    if !upper.starts_with(SURVIVORS_MARKER) {
        return None;
    }

    // Uppercasing Cyrillic keeps the char count, so slicing by the marker's
    // char length is safe on the original line.
    let names: String = line.chars().skip(SURVIVORS_MARKER.chars().count()).collect();
    let wanted: Vec<String> = names
        .split(',')
        .map(|name| name.trim().trim_end_matches('.').to_lowercase())
        .filter(|name| !name.is_empty())
        .collect();

    Some(
        contestants
            .iter()
            .filter(|c| {
                let full = c.display_name().to_lowercase();
                let first = c.first_name.to_lowercase();
                wanted.iter().any(|name| *name == full || *name == first)
            })
            .map(|c| c.user_id)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contestants() -> Vec<Contestant> {
        vec![
            Contestant {
                user_id: UserId(1),
                first_name: "Иван".into(),
                last_name: "Иванов".into(),
                action: "бегу".into(),
            },
            Contestant {
                user_id: UserId(2),
                first_name: "Петр".into(),
                last_name: "Петров".into(),
                action: "прячусь".into(),
            },
        ]
    }

    #[test]
    fn test_survivor_list_is_matched_by_full_name() {
        let text = "Огонь охватил здание.\n\nВЫЖИЛИ: Иван Иванов";

        assert_eq!(parse_verdict(text, &contestants()), Some(vec![UserId(1)]));
    }

    #[test]
    fn test_survivor_list_matches_case_insensitively_and_by_first_name() {
        let text = "История.\nВыжили: петр, Иван Иванов.";

        assert_eq!(
            parse_verdict(text, &contestants()),
            Some(vec![UserId(1), UserId(2)])
        );
    }

    #[test]
    fn test_all_perished_yields_empty_survivor_set() {
        assert_eq!(
            parse_verdict("Конец.\nПОГИБЛИ ВСЕ", &contestants()),
            Some(Vec::new())
        );
    }

    #[test]
    fn test_all_survived_yields_every_contestant() {
        assert_eq!(
            parse_verdict("Конец.\n**ВЫЖИЛИ ВСЕ**\n", &contestants()),
            Some(vec![UserId(1), UserId(2)])
        );
    }

    #[test]
    fn test_blanket_outcome_tolerates_trailing_punctuation() {
        assert_eq!(
            parse_verdict("Конец.\nПОГИБЛИ ВСЕ.", &contestants()),
            Some(Vec::new())
        );
    }

    #[test]
    fn test_prose_opening_with_outcome_words_is_not_a_verdict() {
        // Arrange
        let boastful = "ВЫЖИЛИ ВСЕГО ДВОЕ";
        let explained = "ПОГИБЛИ ВСЕ ИЗ-ЗА пожара";

        // Act
        let from_boastful = parse_verdict(boastful, &contestants());
        let from_explained = parse_verdict(explained, &contestants());

        // Assert
        assert_eq!(from_boastful, None);
        assert_eq!(from_explained, None);
    }

    #[test]
    fn test_earlier_verdict_survives_trailing_outcome_prose() {
        let text = "ВЫЖИЛИ: Петр\nПОГИБЛИ ВСЕ ОСТАЛЬНЫЕ";

        assert_eq!(parse_verdict(text, &contestants()), Some(vec![UserId(2)]));
    }

    #[test]
    fn test_last_verdict_line_wins() {
        let text = "ВЫЖИЛИ: Иван\nНо потом...\nПОГИБЛИ ВСЕ";

        assert_eq!(parse_verdict(text, &contestants()), Some(Vec::new()));
    }

    #[test]
    fn test_missing_verdict_is_undetermined() {
        assert_eq!(parse_verdict("Просто история.", &contestants()), None);
    }

    #[test]
    fn test_unknown_names_are_ignored() {
        assert_eq!(
            parse_verdict("ВЫЖИЛИ: Рассказчик", &contestants()),
            Some(Vec::new())
        );
    }
}
