/// Concurrency tests for the shared table
/// Many sessions race for seats and slaps; the table lock must serialize them
use ratscrew_engine::cards::parse_cards;
use ratscrew_engine::engine::Match;
use ratscrew_engine::game::{IgnoreReason, Outcome};
use ratscrew_engine::seats::Seat;
use ratscrew_web::events::{EventBus, TableEvent};
use ratscrew_web::metrics::MetricsCollector;
use ratscrew_web::server::AppContext;
use ratscrew_web::table::TableService;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

fn cards(text: &str) -> Vec<ratscrew_engine::cards::Card> {
    parse_cards(text).expect("valid cards")
}

/// Two seated sessions over a pile that is already a double.
fn slappable_table() -> Arc<TableService> {
    let game = Match::builder()
        .seed(7)
        .hand(Seat::First, cards("2♠ 3♠"))
        .hand(Seat::Second, cards("4♦ 6♦"))
        .pile(cards("5♣ 5♥"))
        .build();
    let table = TableService::new(game, Arc::new(EventBus::new()), MetricsCollector::new());
    table.join_with("a").expect("join a");
    table.join_with("b").expect("join b");
    Arc::new(table)
}

/// Test many sessions joining at once
#[tokio::test]
async fn test_concurrent_joins_seat_exactly_two() {
    let context = AppContext::new_for_tests();
    let table = context.table();

    let mut join_set = JoinSet::new();
    for _ in 0..10 {
        let table = Arc::clone(&table);
        join_set.spawn(async move { table.join().expect("join") });
    }

    let mut seated = 0;
    let mut full = 0;
    let mut dealt = 0;
    while let Some(result) = join_set.join_next().await {
        match result.expect("task completed").outcome {
            Outcome::Joined { dealt: d, .. } => {
                seated += 1;
                if d {
                    dealt += 1;
                }
            }
            Outcome::Ignored {
                reason: IgnoreReason::TableFull,
            } => full += 1,
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    assert_eq!(seated, 2);
    assert_eq!(full, 8);
    assert_eq!(dealt, 1);
    assert_eq!(table.active_sessions().len(), 10);
    assert_eq!(table.current_state().expect("state").total_cards(), 52);
}

/// Test that only the first of two simultaneous slaps takes the pile
#[tokio::test]
async fn test_concurrent_slaps_have_one_winner() {
    for _ in 0..20 {
        let table = slappable_table();

        let mut join_set = JoinSet::new();
        for session in ["a", "b"] {
            let table = Arc::clone(&table);
            join_set.spawn(async move { table.slap(session).expect("slap").outcome });
        }

        let mut winners = 0;
        let mut burns = 0;
        while let Some(result) = join_set.join_next().await {
            match result.expect("task completed") {
                Outcome::SlapWon { cards, .. } => {
                    assert_eq!(cards, 2);
                    winners += 1;
                }
                Outcome::Burned { .. } => burns += 1,
                other => panic!("unexpected outcome: {other:?}"),
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(burns, 1);
        let state = table.current_state().expect("state");
        assert_eq!(state.total_cards(), 6);
        assert_eq!(state.pile.len(), 1);
        assert!(state.challenge.is_none());
    }
}

/// Test that observers see every accepted transition in order
#[tokio::test]
async fn test_observer_sees_serialized_transitions() {
    let table = slappable_table();
    let (initial, mut subscription) = table.observe().expect("observe");
    assert_eq!(initial.pile.len(), 2);

    let mut join_set = JoinSet::new();
    for session in ["a", "b", "a", "b"] {
        let table = Arc::clone(&table);
        join_set.spawn(async move { table.slap(session).expect("slap").outcome });
    }
    let mut accepted = 0;
    while let Some(result) = join_set.join_next().await {
        if !result.expect("task completed").is_ignored() {
            accepted += 1;
        }
    }

    let mut totals = Vec::new();
    while let Ok(Some(event)) =
        tokio::time::timeout(Duration::from_millis(50), subscription.receiver.recv()).await
    {
        if let TableEvent::StateUpdated { state } = event {
            totals.push(state.total_cards());
        }
    }

    assert_eq!(totals.len(), accepted);
    assert!(totals.iter().all(|&total| total == 6));
}
