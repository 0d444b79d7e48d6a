use ratscrew_engine::cards::parse_cards;
use ratscrew_engine::challenge::Challenge;
use ratscrew_engine::deck::Deck;
use ratscrew_engine::engine::Match;
use ratscrew_engine::game::{IgnoreReason, Outcome, Phase};
use ratscrew_engine::seats::Seat;

#[test]
fn second_join_deals_seeded_deck_in_halves() {
    let mut table = Match::new_with_seed(2024);
    assert_eq!(
        table.join("a"),
        Outcome::Joined {
            seat: Seat::First,
            dealt: false
        }
    );
    assert_eq!(table.phase(), Phase::WaitingForPlayers);
    assert_eq!(table.total_cards(), 0);

    assert_eq!(
        table.join("b"),
        Outcome::Joined {
            seat: Seat::Second,
            dealt: true
        }
    );

    let expected = Deck::new_with_seed(2024).shuffled();
    assert_eq!(table.hand(Seat::First).to_vec(), expected[..26].to_vec());
    assert_eq!(table.hand(Seat::Second).to_vec(), expected[26..].to_vec());
    assert_eq!(table.phase(), Phase::Dealt);
    assert_eq!(table.turn(), Seat::First);
}

#[test]
fn third_join_is_ignored() {
    let mut table = Match::new_with_seed(5);
    table.join("a");
    table.join("b");
    let before = table.snapshot();

    assert_eq!(
        table.join("c"),
        Outcome::Ignored {
            reason: IgnoreReason::TableFull
        }
    );
    assert_eq!(
        table.join("a"),
        Outcome::Ignored {
            reason: IgnoreReason::AlreadySeated
        }
    );
    assert_eq!(table.snapshot(), before);
}

#[test]
fn play_out_of_turn_is_ignored() {
    let mut table = Match::new_with_seed(5);
    table.join("a");
    table.join("b");
    let before = table.snapshot();

    assert_eq!(
        table.play("b"),
        Outcome::Ignored {
            reason: IgnoreReason::NotYourTurn
        }
    );
    assert_eq!(
        table.play("nobody"),
        Outcome::Ignored {
            reason: IgnoreReason::NotSeated
        }
    );
    assert_eq!(table.snapshot(), before);
}

#[test]
fn play_with_empty_hand_is_ignored() {
    let mut table = Match::builder()
        .seat(Seat::First, "a")
        .seat(Seat::Second, "b")
        .hand(Seat::Second, parse_cards("5♦").unwrap())
        .build();
    let before = table.snapshot();
    assert_eq!(
        table.play_seat(Seat::First),
        Outcome::Ignored {
            reason: IgnoreReason::EmptyHand
        }
    );
    assert_eq!(table.snapshot(), before);
}

#[test]
fn leaving_clears_pile_only() {
    let chase = Challenge {
        challenger: Seat::First,
        remaining: 2,
    };
    let mut table = Match::builder()
        .seat(Seat::First, "a")
        .seat(Seat::Second, "b")
        .hand(Seat::First, parse_cards("2♦ 3♦").unwrap())
        .hand(Seat::Second, parse_cards("4♣").unwrap())
        .pile(parse_cards("Q♠ 9♥").unwrap())
        .challenge(chase)
        .build();

    assert_eq!(
        table.leave("a"),
        Outcome::Left {
            seat: Seat::First,
            discarded: 2
        }
    );
    assert!(table.pile().is_empty());
    assert_eq!(table.hand(Seat::First).len(), 2);
    assert_eq!(table.hand(Seat::Second).len(), 1);
    assert_eq!(table.turn(), Seat::Second);
    assert_eq!(table.challenge(), Some(chase));
    assert_eq!(table.phase(), Phase::WaitingForPlayers);
    assert_eq!(table.session_at(Seat::First), None);
}

#[test]
fn rejoining_takes_the_free_seat_without_redealing() {
    let mut table = Match::new_with_seed(11);
    table.join("a");
    table.join("b");
    table.play("a");
    let hands_before = table.snapshot().seats.map(|s| s.hand);

    table.leave("a");
    assert_eq!(
        table.join("c"),
        Outcome::Joined {
            seat: Seat::First,
            dealt: false
        }
    );
    assert_eq!(table.snapshot().seats.map(|s| s.hand), hands_before);
    assert_eq!(table.seat_of("c"), Some(Seat::First));
    // the played card was discarded with the pile
    assert_eq!(table.total_cards(), 51);
}

#[test]
fn leave_by_unknown_session_is_ignored() {
    let mut table = Match::new_with_seed(3);
    table.join("a");
    assert!(table.leave("zzz").is_ignored());
    assert_eq!(table.seat_of("a"), Some(Seat::First));
}
