//! Deterministic offline narrator.
//!
//! Used whenever the backend fails so that a round always completes with
//! displayable text. Cooperative rounds are judged by a small keyword
//! vocabulary; competitive rounds keep the first contestant alive.

use againstai_core::ids::UserId;
use againstai_core::mode::GameMode;

use crate::narrative::{Contestant, Narrative};

/// Keywords that signal a player abandoning the group.
pub const SELFISH_KEYWORDS: &[&str] = &[
    "убегаю",
    "бегу",
    "покидаю",
    "оставляю",
    "эгоистично",
    "спасаюсь",
    "убить",
];

/// Keywords that signal a player working with the group.
pub const COOPERATIVE_KEYWORDS: &[&str] = &[
    "помогаю",
    "помогаем",
    "спасаем",
    "вместе",
    "команда",
    "группа",
    "объединяемся",
    "сотрудничаем",
];

const OFFLINE_NOTE: &str = "(Сервис повествования недоступен, итог рассчитан в офлайн-режиме.)";

const SCENARIO_EXCERPT_CHARS: usize = 50;

/// Produces a narrative without calling any backend.
#[must_use]
pub fn offline_narrative(scenario: &str, contestants: &[Contestant], mode: GameMode) -> Narrative {
    let survivors = match mode {
        GameMode::Cooperative => cooperative_survivors(contestants),
        GameMode::Competitive => contestants.first().map(|c| c.user_id).into_iter().collect(),
    };

    let names: Vec<String> = contestants
        .iter()
        .filter(|c| survivors.contains(&c.user_id))
        .map(Contestant::display_name)
        .collect();

    let text = match mode {
        GameMode::Cooperative => cooperative_text(&excerpt(scenario), &names),
        GameMode::Competitive => competitive_text(&excerpt(scenario), &names),
    };

    Narrative {
        text,
        survivors: Some(survivors),
        degraded: true,
    }
}

/// Everyone survives unless someone acted selfishly and nobody cooperated.
fn cooperative_survivors(contestants: &[Contestant]) -> Vec<UserId> {
    let actions: Vec<String> = contestants.iter().map(|c| c.action.to_lowercase()).collect();
    let mentions = |vocabulary: &[&str]| {
        actions
            .iter()
            .any(|action| vocabulary.iter().any(|keyword| action.contains(keyword)))
    };

    let selfish = mentions(SELFISH_KEYWORDS);
    let cooperative = mentions(COOPERATIVE_KEYWORDS);

    if !selfish || cooperative {
        contestants.iter().map(|c| c.user_id).collect()
    } else {
        Vec::new()
    }
}

fn excerpt(scenario: &str) -> String {
    if scenario.chars().count() > SCENARIO_EXCERPT_CHARS {
        let head: String = scenario.chars().take(SCENARIO_EXCERPT_CHARS).collect();
        format!("{}...", head.trim_end())
    } else {
        scenario.to_owned()
    }
}

fn cooperative_text(scenario: &str, survivors: &[String]) -> String {
    if survivors.is_empty() {
        format!(
            "В сценарии «{scenario}» команда столкнулась с серьёзным испытанием.\n\n\
Кто-то решил спасаться в одиночку, и общий план развалился. Без слаженных \
действий группа не смогла выбраться.\n\n\
ПОГИБЛИ ВСЕ\n\n{OFFLINE_NOTE}"
        )
    } else {
        format!(
            "В сценарии «{scenario}» команда столкнулась с серьёзным испытанием.\n\n\
Игроки держались вместе и действовали согласованно. Команда в составе {} \
нашла путь к спасению.\n\n\
ВЫЖИЛИ ВСЕ\n\n{OFFLINE_NOTE}",
            survivors.join(", ")
        )
    }
}

fn competitive_text(scenario: &str, survivors: &[String]) -> String {
    if survivors.is_empty() {
        format!(
            "В сценарии «{scenario}» некому было бороться за жизнь.\n\n\
ПОГИБЛИ ВСЕ\n\n{OFFLINE_NOTE}"
        )
    } else {
        format!(
            "В сценарии «{scenario}» каждый действовал по-своему.\n\n\
Одни полагались на силу, другие на хитрость, но обстоятельства оказались \
сильнее большинства. Лишь {} удалось выбраться.\n\n\
ВЫЖИЛИ: {}\n\n{OFFLINE_NOTE}",
            survivors.join(", "),
            survivors.join(", ")
        )
    }
}
