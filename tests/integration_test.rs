use spyword::error::GameError;
use spyword::protocol::JoinResponse;
use spyword::state::AppState;
use spyword::types::{ChatKind, GameConfig, Role, RoundState};
use std::sync::Arc;

struct Table {
    state: Arc<AppState>,
    players: Vec<JoinResponse>,
}

impl Table {
    async fn seat(seed: u64, names: &[&str]) -> Self {
        let state = Arc::new(AppState::with_seed(GameConfig::default(), seed));
        let mut players = Vec::new();
        for name in names {
            players.push(state.join(name, "R1").await.expect("join should succeed"));
        }
        Self { state, players }
    }

    fn id(&self, index: usize) -> &str {
        &self.players[index].player_id
    }

    /// Index of the current spy, learned from each player's private view
    async fn spy_index(&self) -> usize {
        let mut spy = None;
        for (i, p) in self.players.iter().enumerate() {
            let view = self.state.poll_state("R1", &p.player_id).await.unwrap();
            match view.you.role {
                Some(Role::Spy) => {
                    assert!(spy.is_none(), "more than one spy");
                    assert!(view.you.word.is_none());
                    spy = Some(i);
                }
                Some(Role::Civilian) => assert!(view.you.word.is_some()),
                None => panic!("player without a role during a round"),
            }
        }
        spy.expect("exactly one spy")
    }
}

/// End-to-end: three players, the spy is caught by two of three votes
#[tokio::test]
async fn test_three_player_round_spy_caught() {
    let table = Table::seat(17, &["A", "B", "C"]).await;
    let host = table.id(0).to_string();
    assert!(table.players[0].you.is_host);

    table.state.start_game("R1", &host).await.unwrap();
    table.state.start_vote("R1", &host).await.unwrap();

    // Two civilians vote for the spy, the spy votes for a civilian
    let spy = table.spy_index().await;
    let civilians: Vec<usize> = (0..3).filter(|&i| i != spy).collect();
    let (x, y) = (civilians[0], civilians[1]);

    table
        .state
        .cast_vote("R1", table.id(x), table.id(spy))
        .await
        .unwrap();
    table
        .state
        .cast_vote("R1", table.id(spy), table.id(x))
        .await
        .unwrap();
    table
        .state
        .cast_vote("R1", table.id(y), table.id(spy))
        .await
        .unwrap();

    let response = table.state.end_round("R1", &host).await.unwrap();
    let outcome = response.outcome;

    assert!(outcome.spy_caught);
    assert_eq!(outcome.votes_against_spy, 2);
    assert_eq!(outcome.minimum_to_catch, 2);

    let score_of = |i: usize| {
        response
            .room
            .players
            .iter()
            .find(|p| p.id == table.id(i))
            .unwrap()
            .score
    };
    assert_eq!(score_of(x), 1);
    assert_eq!(score_of(y), 1);
    assert_eq!(score_of(spy), 0);

    // Narration landed in the chat, next round already running
    assert!(response
        .room
        .chat
        .iter()
        .any(|e| e.kind == ChatKind::System && e.message.contains("was caught")));
    assert_eq!(response.room.current_round, 2);
    assert_eq!(response.room.round_state, RoundState::Playing);
}

/// Playing all rounds ends the game and wipes the room back to the lobby
#[tokio::test]
async fn test_full_game_resets_after_last_round() {
    let table = Table::seat(23, &["Alice", "Bob", "Carol", "Dave"]).await;
    let host = table.id(0).to_string();

    table.state.start_game("R1", &host).await.unwrap();
    table
        .state
        .send_chat("R1", "Bob", "who asks first?")
        .await
        .unwrap();

    let mut last = None;
    let mut version_before_reset = 0;
    for round in 1..=3 {
        let view = table.state.poll_state("R1", &host).await.unwrap();
        assert_eq!(view.room.current_round, round);
        assert_eq!(view.room.discussion_order.len(), 4);

        table.state.start_vote("R1", &host).await.unwrap();
        version_before_reset = table.state.room_version("R1").await.unwrap().version;
        // Nobody votes: the spy always escapes
        let response = table.state.end_round("R1", &host).await.unwrap();
        assert!(!response.outcome.spy_caught);
        last = Some(response);
    }

    let response = last.unwrap();
    assert!(response.outcome.game_over);
    assert_eq!(response.outcome.final_standings.len(), 4);
    let total: u32 = response
        .outcome
        .final_standings
        .iter()
        .map(|s| s.score)
        .sum();
    assert_eq!(total, 3, "one escape point per round");

    let room = response.room;
    assert!(!room.game_started);
    assert_eq!(room.round_state, RoundState::Waiting);
    assert_eq!(room.current_round, 0);
    assert!(room.chat.is_empty());
    assert!(room.players.iter().all(|p| p.score == 0));
    assert_eq!(room.players.iter().filter(|p| p.is_host).count(), 1);
    assert!(room.players[0].is_host);
    assert!(response.you.role.is_none());
    // The reset keeps the version moving forward
    assert!(room.version > version_before_reset);
    assert_eq!(
        table.state.room_version("R1").await.unwrap().version,
        room.version
    );

    // The same table can start a new game
    table.state.start_game("R1", &host).await.unwrap();
}

#[tokio::test]
async fn test_failed_operations_do_not_mutate() {
    let table = Table::seat(5, &["A", "B", "C"]).await;
    let host = table.id(0).to_string();
    let version = table.state.room_version("R1").await.unwrap().version;

    let cases = vec![
        table.state.start_game("R1", table.id(1)).await.err(),
        table.state.start_vote("R1", &host).await.err(),
        table.state.end_round("R1", &host).await.err(),
        table
            .state
            .cast_vote("R1", table.id(1), table.id(2))
            .await
            .err(),
        table.state.send_chat("R1", "A", "").await.err(),
    ];
    assert!(matches!(cases[0], Some(GameError::Forbidden(_))));
    assert!(matches!(cases[1], Some(GameError::InvalidPhase(_))));
    assert!(matches!(cases[2], Some(GameError::InvalidPhase(_))));
    assert!(matches!(cases[3], Some(GameError::InvalidPhase(_))));
    assert!(matches!(cases[4], Some(GameError::InvalidInput(_))));

    let after = table.state.room_version("R1").await.unwrap().version;
    assert_eq!(version, after);
}

#[tokio::test]
async fn test_unknown_room_is_not_found() {
    let state = AppState::default();

    assert!(matches!(
        state.poll_state("NOPE", "x").await,
        Err(GameError::NotFound(_))
    ));
    assert!(matches!(
        state.start_game("NOPE", "x").await,
        Err(GameError::NotFound(_))
    ));
    assert!(matches!(
        state.room_version("NOPE").await,
        Err(GameError::NotFound(_))
    ));
    assert_eq!(state.room_count().await, 0);
}

#[tokio::test]
async fn test_chat_is_bounded() {
    let table = Table::seat(1, &["A"]).await;

    for i in 0..75 {
        table
            .state
            .send_chat("R1", "A", &format!("msg {}", i))
            .await
            .unwrap();
    }

    let view = table.state.poll_state("R1", table.id(0)).await.unwrap();
    assert_eq!(view.room.chat.len(), 50);
    assert_eq!(view.room.chat[0].message, "msg 25");
    assert_eq!(view.room.chat[49].message, "msg 74");
}

/// Concurrent joins to one room serialise: exactly one host, no lost players
#[tokio::test]
async fn test_concurrent_joins_keep_single_host() {
    let state = Arc::new(AppState::default());

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let state = state.clone();
            tokio::spawn(async move { state.join(&format!("P{}", i), "BUSY").await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let room = state.get_room("BUSY").await.unwrap();
    let room = room.lock().await;
    assert_eq!(room.players.len(), 20);
    assert_eq!(room.players.iter().filter(|p| p.is_host).count(), 1);
    assert!(room.players[0].is_host);
}
