//! User-facing message rendering.

use againstai_core::error::GameError;
use againstai_core::ids::UserId;
use againstai_core::mode::GameMode;
use againstai_core::settings::GameSettings;
use againstai_core::transport::{MessageOption, OutboundMessage};
use againstai_core::validation::{TextField, ValidationError};

use crate::domain::lobby::{LobbySnapshot, LobbyState};
use crate::domain::registration::Profile;

fn mode_options() -> [MessageOption; 2] {
    [
        MessageOption::ChooseMode {
            mode: GameMode::Competitive,
        },
        MessageOption::ChooseMode {
            mode: GameMode::Cooperative,
        },
    ]
}

fn scenario_options() -> [MessageOption; 2] {
    [MessageOption::EnterScenario, MessageOption::RandomScenario]
}

fn state_title(state: LobbyState) -> &'static str {
    match state {
        LobbyState::WaitingForPlayers => "ожидание игроков",
        LobbyState::WaitingForScenario => "выбор сценария",
        LobbyState::WaitingForActions => "игроки действуют",
        LobbyState::ProcessingResults => "подсчёт результатов",
        LobbyState::GameOver => "игра окончена",
    }
}

#[must_use]
pub fn ask_name() -> OutboundMessage {
    OutboundMessage::text(
        "Привет! Это игра «Против ИИ»: вы описываете, как выжить в безвыходной \
ситуации, а ИИ решает, что из этого вышло.\n\nКак вас зовут? Напишите имя и фамилию.",
    )
}

#[must_use]
pub fn ask_name_to_join(target: &str) -> OutboundMessage {
    OutboundMessage::text(format!(
        "Вас пригласили в лобби {target}. Сначала представьтесь: напишите имя и фамилию."
    ))
}

#[must_use]
pub fn welcome(profile: &Profile) -> OutboundMessage {
    OutboundMessage::with_options(
        format!(
            "Приятно познакомиться, {}! Отправьте ID лобби или код приглашения, \
чтобы присоединиться, или создайте новое лобби.",
            profile.first_name
        ),
        vec![MessageOption::CreateLobby],
    )
}

#[must_use]
pub fn lobby_created(snapshot: &LobbySnapshot) -> OutboundMessage {
    OutboundMessage::text(format!(
        "Лобби создано! Вы капитан.\nID лобби: {}\nКод приглашения: {}\n\
Поделитесь им с друзьями.",
        snapshot.id, snapshot.invite_code
    ))
}

#[must_use]
pub fn join_redirected(target: &str, reason: &GameError) -> OutboundMessage {
    let why = match reason {
        GameError::LobbyFull(_) => "оно заполнено",
        GameError::GameAlreadyStarted(_) => "игра там уже началась",
        _ => "оно не найдено",
    };
    OutboundMessage::text(format!(
        "Не удалось присоединиться к лобби {target}: {why}. Мы создали для вас новое лобби."
    ))
}

/// Lobby status as seen by `recipient`. The captain gets the controls for
/// the current phase.
#[must_use]
pub fn lobby_status(
    snapshot: &LobbySnapshot,
    recipient: UserId,
    headline: Option<&str>,
) -> OutboundMessage {
    let mut text = String::new();
    if let Some(headline) = headline {
        text.push_str(headline);
        text.push_str("\n\n");
    }
    text.push_str(&format!(
        "Лобби {} (код {})\nРежим: {}\nСтатус: {}\n\nИгроки ({}):\n",
        snapshot.id,
        snapshot.invite_code,
        snapshot.mode.title(),
        state_title(snapshot.state),
        snapshot.players.len()
    ));
    for player in &snapshot.players {
        let mut line = format!("• {}", player.name);
        if player.is_captain {
            line.push_str(" (капитан)");
        }
        if snapshot.state == LobbyState::WaitingForActions && player.has_submitted {
            line.push_str(" ✓");
        }
        if !player.is_alive {
            line.push_str(" ☠");
        }
        text.push_str(&line);
        text.push('\n');
    }

    let mut options = Vec::new();
    if snapshot.is_captain(recipient) {
        match snapshot.state {
            LobbyState::WaitingForPlayers => {
                options.push(MessageOption::InvitePlayers {
                    lobby_id: snapshot.id.clone(),
                });
                options.push(MessageOption::StartGame);
            }
            LobbyState::WaitingForScenario => {
                options.extend(scenario_options());
                options.extend(mode_options());
            }
            _ => {}
        }
    }
    options.push(MessageOption::LeaveLobby);

    OutboundMessage::with_options(text.trim_end().to_owned(), options)
}

#[must_use]
pub fn player_joined(name: &str) -> String {
    format!("{name} присоединился к лобби.")
}

#[must_use]
pub fn player_left(name: &str, new_captain: Option<&str>) -> String {
    match new_captain {
        Some(captain) => format!("{name} покинул лобби. Новый капитан: {captain}."),
        None => format!("{name} покинул лобби."),
    }
}

#[must_use]
pub fn left_lobby() -> OutboundMessage {
    OutboundMessage::with_options("Вы покинули лобби.", vec![MessageOption::CreateLobby])
}

#[must_use]
pub fn game_started(is_captain: bool) -> OutboundMessage {
    if is_captain {
        OutboundMessage::with_options(
            "Игра начинается! Выберите режим игры.",
            mode_options().to_vec(),
        )
    } else {
        OutboundMessage::text("Игра начинается! Капитан выбирает режим и сценарий.")
    }
}

#[must_use]
pub fn mode_chosen(mode: GameMode, is_captain: bool, state: LobbyState) -> OutboundMessage {
    if !is_captain {
        return OutboundMessage::text(format!("Капитан выбрал режим: {}.", mode.title()));
    }
    if state == LobbyState::WaitingForScenario {
        OutboundMessage::with_options(
            format!("Режим: {}. Теперь выберите сценарий.", mode.title()),
            scenario_options().to_vec(),
        )
    } else {
        OutboundMessage::with_options(
            format!("Режим: {}.", mode.title()),
            vec![MessageOption::StartGame],
        )
    }
}

#[must_use]
pub fn enter_scenario(max_chars: usize) -> OutboundMessage {
    OutboundMessage::text(format!(
        "Опишите опасную ситуацию, в которой окажутся игроки (до {max_chars} символов)."
    ))
}

/// The scenario announcement opening a round.
#[must_use]
pub fn round_opened(snapshot: &LobbySnapshot, is_captain: bool) -> OutboundMessage {
    let scenario = snapshot.scenario.as_deref().unwrap_or_default();
    let call = if is_captain {
        "Сценарий принят. Теперь опишите, что будете делать вы."
    } else {
        "Напишите, что вы будете делать."
    };
    OutboundMessage::text(format!(
        "Раунд {}. Режим: {}\n\nСценарий: {scenario}\n\n{call}",
        snapshot.round,
        snapshot.mode.title()
    ))
}

#[must_use]
pub fn action_recorded(pending: usize) -> OutboundMessage {
    if pending == 0 {
        OutboundMessage::text("Ваше действие принято. Все игроки сделали ход.")
    } else {
        OutboundMessage::text(format!(
            "Ваше действие принято. Ждём остальных игроков: {pending}."
        ))
    }
}

#[must_use]
pub fn adjudicating() -> OutboundMessage {
    OutboundMessage::text("Все игроки сделали ход. ИИ оценивает ваши действия...")
}

#[must_use]
pub fn round_result(text: &str) -> OutboundMessage {
    OutboundMessage::text(format!("Итоги раунда:\n\n{text}"))
}

#[must_use]
pub fn next_scenario() -> OutboundMessage {
    let mut options = scenario_options().to_vec();
    options.extend(mode_options());
    OutboundMessage::with_options(
        "Капитан, выберите следующий сценарий или смените режим.",
        options,
    )
}

#[must_use]
pub fn game_over() -> OutboundMessage {
    OutboundMessage::with_options(
        "Капитан завершил игру. Спасибо за игру!",
        vec![MessageOption::LeaveLobby],
    )
}

fn validation_guidance(err: ValidationError, settings: &GameSettings) -> String {
    let (label, allowed, max) = match err.field() {
        TextField::Name => (
            "Имя",
            "только буквы, пробелы и дефис",
            settings.max_name_length,
        ),
        TextField::Scenario => (
            "Сценарий",
            "буквы, цифры, пробелы и знаки . , - ! ? _ ( ) : ; \" '",
            settings.max_text_length,
        ),
        TextField::Action => (
            "Действие",
            "буквы, цифры, пробелы и знаки . , - ! ? _ ( ) : ; \" '",
            settings.max_text_length,
        ),
    };
    let problem = match err {
        ValidationError::Empty(_) => "пустой текст".to_owned(),
        ValidationError::TooLong { max, .. } => format!("слишком длинный текст (максимум {max} символов)"),
        ValidationError::InvalidCharacters(_) => "недопустимые символы".to_owned(),
    };
    format!("{label}: {problem}. Допустимы {allowed}, до {max} символов. Попробуйте ещё раз.")
}

/// Explains a rejected request to the user who made it.
#[must_use]
pub fn guidance(err: &GameError, settings: &GameSettings) -> OutboundMessage {
    match err {
        GameError::Validation(e) => OutboundMessage::text(validation_guidance(*e, settings)),
        GameError::NotRegistered(_) => {
            OutboundMessage::text("Сначала представьтесь: отправьте /start.")
        }
        GameError::LobbyNotFound(target) => OutboundMessage::with_options(
            format!("Лобби {target} не найдено. Проверьте ID или создайте новое лобби."),
            vec![MessageOption::CreateLobby],
        ),
        GameError::NotInLobby(_) => OutboundMessage::with_options(
            "Вы не состоите в лобби.",
            vec![MessageOption::CreateLobby],
        ),
        GameError::AlreadyInLobby { lobby_id, .. } => OutboundMessage::with_options(
            format!("Вы уже в лобби {lobby_id}. Сначала покиньте его."),
            vec![MessageOption::LeaveLobby],
        ),
        GameError::LobbyFull(lobby_id) => OutboundMessage::with_options(
            format!(
                "Лобби {lobby_id} заполнено (максимум {} игроков). Создайте новое лобби.",
                settings.max_players
            ),
            vec![MessageOption::CreateLobby],
        ),
        GameError::GameAlreadyStarted(lobby_id) => OutboundMessage::with_options(
            format!("В лобби {lobby_id} игра уже началась. Создайте новое лобби."),
            vec![MessageOption::CreateLobby],
        ),
        GameError::InvalidPhase { .. } => {
            OutboundMessage::text("Сейчас это недоступно. Дождитесь своей очереди.")
        }
        GameError::NotCaptain(_) => {
            OutboundMessage::text("Это может сделать только капитан лобби.")
        }
        GameError::NotEnoughPlayers { required, actual } => OutboundMessage::text(format!(
            "Для начала игры нужно минимум {required} игрока, сейчас в лобби {actual}."
        )),
        GameError::ActionAlreadySubmitted(_) => OutboundMessage::text(
            "Вы уже отправили действие в этом раунде. Дождитесь остальных игроков.",
        ),
        GameError::PlayerAlreadyPresent(_) => OutboundMessage::text("Вы уже в этом лобби."),
        GameError::PlayerNotFound(_) => OutboundMessage::text("Вы не участник этого лобби."),
        GameError::Configuration(_) => {
            OutboundMessage::text("Внутренняя ошибка. Попробуйте позже.")
        }
    }
}
