//! End-to-end game flows driven through the coordinator.

mod common;

use std::sync::Arc;
use std::time::Duration;

use againstai_core::error::GameError;
use againstai_core::ids::UserId;
use againstai_core::mode::GameMode;
use againstai_core::transport::MessageOption;
use againstai_lobby::domain::events::UserEvent;
use againstai_lobby::domain::lobby::LobbyState;
use againstai_test_support::{FailingBackend, ScriptedBackend, SlowBackend};

use common::text;

const ANNA: UserId = UserId(1);
const BORIS: UserId = UserId(2);
const VERA: UserId = UserId(3);

#[tokio::test]
async fn test_full_round_with_unavailable_backend_completes_with_fallback() {
    // Arrange
    let h = common::harness(Arc::new(FailingBackend::unavailable()));
    let lobby_id = h
        .lobby_with(&[(ANNA, "Анна Иванова"), (BORIS, "Борис Петров")])
        .await;
    h.open_round(ANNA, "Пожар на складе!").await;

    // Act
    h.coordinator.handle(ANNA, text("тушу огонь")).await.unwrap();
    h.coordinator.handle(BORIS, text("зову на помощь")).await.unwrap();

    // Assert
    let snapshot = h.snapshot(&lobby_id);
    assert_eq!(snapshot.state, LobbyState::WaitingForScenario);
    assert_eq!(snapshot.round, 1);
    assert!(snapshot.last_narrative.is_some());
    for user in [ANNA, BORIS] {
        let results: Vec<String> = h
            .transport
            .texts_for(user)
            .into_iter()
            .filter(|t| t.starts_with("Итоги раунда"))
            .collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].len() > "Итоги раунда:\n\n".len());
    }
}

#[tokio::test]
async fn test_second_round_uses_chosen_mode_and_resets_actions() {
    let backend = Arc::new(ScriptedBackend::new("Все спаслись.\nВЫЖИЛИ: Анна Иванова, Борис Петров"));
    let h = common::harness(backend.clone());
    let lobby_id = h
        .lobby_with(&[(ANNA, "Анна Иванова"), (BORIS, "Борис Петров")])
        .await;
    h.open_round(ANNA, "Пожар на складе!").await;
    h.coordinator.handle(ANNA, text("тушу огонь")).await.unwrap();
    h.coordinator.handle(BORIS, text("зову на помощь")).await.unwrap();

    h.coordinator
        .handle(
            ANNA,
            UserEvent::ChooseMode {
                mode: GameMode::Cooperative,
            },
        )
        .await
        .unwrap();
    h.coordinator
        .handle(ANNA, UserEvent::RandomScenario)
        .await
        .unwrap();

    let snapshot = h.snapshot(&lobby_id);
    assert_eq!(snapshot.state, LobbyState::WaitingForActions);
    assert_eq!(snapshot.round, 2);
    assert_eq!(snapshot.mode, GameMode::Cooperative);
    assert!(snapshot.players.iter().all(|p| !p.has_submitted));
    assert_eq!(backend.prompts().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_last_submissions_trigger_exactly_one_round() {
    // Arrange
    let backend = Arc::new(ScriptedBackend::new("История.\nВЫЖИЛИ: Вера"));
    let h = common::harness(backend.clone());
    let lobby_id = h
        .lobby_with(&[(ANNA, "Анна Иванова"), (BORIS, "Борис Петров"), (VERA, "Вера")])
        .await;
    h.open_round(ANNA, "Корабль тонет!").await;
    h.coordinator.handle(ANNA, text("плыву к берегу")).await.unwrap();

    // Act
    let boris = {
        let coordinator = Arc::clone(&h.coordinator);
        tokio::spawn(async move { coordinator.handle(BORIS, text("держусь за обломок")).await })
    };
    let vera = {
        let coordinator = Arc::clone(&h.coordinator);
        tokio::spawn(async move { coordinator.handle(VERA, text("ищу шлюпку")).await })
    };
    boris.await.unwrap().unwrap();
    vera.await.unwrap().unwrap();

    // Assert
    assert_eq!(backend.prompts().len(), 1);
    let snapshot = h.snapshot(&lobby_id);
    assert_eq!(snapshot.state, LobbyState::WaitingForScenario);
    assert_eq!(
        snapshot
            .players
            .iter()
            .filter(|p| p.is_alive)
            .map(|p| p.user_id)
            .collect::<Vec<_>>(),
        vec![VERA]
    );
    for user in [ANNA, BORIS, VERA] {
        let results = h
            .transport
            .texts_for(user)
            .into_iter()
            .filter(|t| t.starts_with("Итоги раунда"))
            .count();
        assert_eq!(results, 1);
    }
}

#[tokio::test]
async fn test_unreachable_player_does_not_block_round() {
    let h = common::harness(Arc::new(ScriptedBackend::new("Финал.\nПОГИБЛИ ВСЕ")));
    let lobby_id = h
        .lobby_with(&[(ANNA, "Анна Иванова"), (BORIS, "Борис Петров")])
        .await;
    h.open_round(ANNA, "Лавина!").await;
    h.transport.make_unreachable(BORIS);

    h.coordinator.handle(ANNA, text("копаю укрытие")).await.unwrap();
    h.coordinator.handle(BORIS, text("бегу вниз")).await.unwrap();

    assert_eq!(h.snapshot(&lobby_id).state, LobbyState::WaitingForScenario);
    assert!(
        h.transport
            .texts_for(ANNA)
            .iter()
            .any(|t| t.contains("ПОГИБЛИ ВСЕ"))
    );
    assert!(h.snapshot(&lobby_id).players.iter().all(|p| !p.is_alive));
}

#[tokio::test]
async fn test_captain_leaving_passes_captaincy_to_earliest_member() {
    // Arrange
    let h = common::harness(Arc::new(FailingBackend::unavailable()));
    let lobby_id = h
        .lobby_with(&[(ANNA, "Анна"), (BORIS, "Борис"), (VERA, "Вера")])
        .await;

    // Act
    h.coordinator.handle(ANNA, UserEvent::Leave).await.unwrap();

    // Assert
    let snapshot = h.snapshot(&lobby_id);
    assert_eq!(snapshot.captain_id, Some(BORIS));
    assert_eq!(h.coordinator.directory().lobby_of(ANNA), None);
    let notice = h.transport.last_for(VERA).unwrap();
    assert!(notice.text.starts_with("Анна покинул лобби. Новый капитан: Борис."));
    let captain_view = h.transport.last_for(BORIS).unwrap();
    assert!(captain_view.options.contains(&MessageOption::StartGame));
}

#[tokio::test]
async fn test_leave_during_action_collection_completes_round() {
    let backend = Arc::new(ScriptedBackend::new("Итог.\nВЫЖИЛИ: Анна"));
    let h = common::harness(backend.clone());
    let lobby_id = h
        .lobby_with(&[(ANNA, "Анна"), (BORIS, "Борис"), (VERA, "Вера")])
        .await;
    h.open_round(ANNA, "Поезд остановился в тоннеле.").await;
    h.coordinator.handle(ANNA, text("иду к выходу")).await.unwrap();
    h.coordinator.handle(BORIS, text("жду")).await.unwrap();

    h.coordinator.handle(VERA, UserEvent::Leave).await.unwrap();

    assert_eq!(backend.prompts().len(), 1);
    assert!(!backend.prompts()[0].contains("Вера"));
    let snapshot = h.snapshot(&lobby_id);
    assert_eq!(snapshot.state, LobbyState::WaitingForScenario);
    assert_eq!(snapshot.players.len(), 2);
}

#[tokio::test]
async fn test_last_player_leaving_closes_lobby() {
    let h = common::harness(Arc::new(FailingBackend::unavailable()));
    let lobby_id = h.lobby_with(&[(ANNA, "Анна")]).await;
    let invite_code = h.snapshot(&lobby_id).invite_code;

    h.coordinator.handle(ANNA, UserEvent::Leave).await.unwrap();

    assert_eq!(h.coordinator.directory().lobby_count(), 0);
    h.register(BORIS, "Борис").await;
    let result = h.coordinator.handle(BORIS, text(&invite_code)).await;
    assert_eq!(result, Err(GameError::LobbyNotFound(invite_code)));
}

#[tokio::test(start_paused = true)]
async fn test_everyone_leaving_mid_adjudication_drops_the_round() {
    // Arrange
    let h = common::harness(Arc::new(SlowBackend {
        delay: Duration::from_secs(30),
        response: "История.\nВЫЖИЛИ ВСЕ".into(),
    }));
    h.lobby_with(&[(ANNA, "Анна"), (BORIS, "Борис")]).await;
    h.open_round(ANNA, "Лавина!").await;
    h.coordinator.handle(ANNA, text("копаю нору")).await.unwrap();
    let round = {
        let coordinator = Arc::clone(&h.coordinator);
        tokio::spawn(async move { coordinator.handle(BORIS, text("бегу вниз")).await })
    };
    tokio::time::sleep(Duration::from_secs(1)).await;

    // Act
    h.coordinator.handle(ANNA, UserEvent::Leave).await.unwrap();
    h.coordinator.handle(BORIS, UserEvent::Leave).await.unwrap();
    round.await.unwrap().unwrap();

    // Assert
    let directory = h.coordinator.directory();
    assert_eq!(directory.lobby_count(), 0);
    assert_eq!(directory.lobby_of(ANNA), None);
    assert_eq!(directory.lobby_of(BORIS), None);
    for user in [ANNA, BORIS] {
        let texts = h.transport.texts_for(user);
        assert!(texts.iter().any(|t| t.contains("ИИ оценивает")));
        assert!(!texts.iter().any(|t| t.starts_with("Итоги раунда")));
    }
}

#[tokio::test]
async fn test_join_by_lowercase_invite_code() {
    let h = common::harness(Arc::new(FailingBackend::unavailable()));
    let lobby_id = h.lobby_with(&[(ANNA, "Анна")]).await;
    let invite_code = h.snapshot(&lobby_id).invite_code;
    h.register(BORIS, "Борис").await;

    h.coordinator
        .handle(
            BORIS,
            UserEvent::JoinLobby {
                target: invite_code.to_lowercase(),
            },
        )
        .await
        .unwrap();

    assert_eq!(h.coordinator.directory().lobby_of(BORIS), Some(lobby_id));
    assert!(
        h.transport
            .texts_for(ANNA)
            .iter()
            .any(|t| t.starts_with("Борис присоединился"))
    );
}

#[tokio::test]
async fn test_invite_link_to_started_game_redirects_to_new_lobby() {
    // Arrange
    let h = common::harness(Arc::new(FailingBackend::unavailable()));
    let started = h.lobby_with(&[(ANNA, "Анна"), (BORIS, "Борис")]).await;
    h.coordinator.handle(ANNA, UserEvent::StartGame).await.unwrap();

    // Act
    h.coordinator
        .handle(
            VERA,
            UserEvent::JoinLobby {
                target: started.to_string(),
            },
        )
        .await
        .unwrap();
    h.coordinator.handle(VERA, text("Вера")).await.unwrap();

    // Assert
    let own = h.coordinator.directory().lobby_of(VERA).unwrap();
    assert_ne!(own, started);
    assert_eq!(h.snapshot(&own).captain_id, Some(VERA));
    assert_eq!(h.snapshot(&started).players.len(), 2);
    assert!(
        h.transport
            .texts_for(VERA)
            .iter()
            .any(|t| t.contains("игра там уже началась"))
    );
}

#[tokio::test]
async fn test_actions_are_rejected_while_waiting_for_scenario() {
    let h = common::harness(Arc::new(FailingBackend::unavailable()));
    let lobby_id = h.lobby_with(&[(ANNA, "Анна"), (BORIS, "Борис")]).await;
    h.coordinator.handle(ANNA, UserEvent::StartGame).await.unwrap();

    let result = h.coordinator.handle(BORIS, text("что-то делаю")).await;

    assert!(matches!(result, Err(GameError::InvalidPhase { .. })));
    assert_eq!(h.snapshot(&lobby_id).state, LobbyState::WaitingForScenario);
}

#[tokio::test]
async fn test_double_submission_is_rejected() {
    let h = common::harness(Arc::new(FailingBackend::unavailable()));
    let lobby_id = h
        .lobby_with(&[(ANNA, "Анна"), (BORIS, "Борис"), (VERA, "Вера")])
        .await;
    h.open_round(ANNA, "Шторм!").await;
    h.coordinator.handle(BORIS, text("прячусь")).await.unwrap();

    let result = h.coordinator.handle(BORIS, text("передумал")).await;

    assert_eq!(result, Err(GameError::ActionAlreadySubmitted(BORIS)));
    assert_eq!(h.snapshot(&lobby_id).state, LobbyState::WaitingForActions);
}

#[tokio::test]
async fn test_end_game_notifies_everyone() {
    let h = common::harness(Arc::new(FailingBackend::unavailable()));
    let lobby_id = h.lobby_with(&[(ANNA, "Анна"), (BORIS, "Борис")]).await;
    h.coordinator.handle(ANNA, UserEvent::StartGame).await.unwrap();

    let by_member = h.coordinator.handle(BORIS, UserEvent::EndGame).await;
    h.coordinator.handle(ANNA, UserEvent::EndGame).await.unwrap();

    assert_eq!(by_member, Err(GameError::NotCaptain(BORIS)));
    assert_eq!(h.snapshot(&lobby_id).state, LobbyState::GameOver);
    for user in [ANNA, BORIS] {
        assert!(h.transport.last_for(user).unwrap().text.contains("Спасибо за игру"));
    }
}
