use ratscrew_engine::cards::parse_cards;
use ratscrew_engine::challenge::Challenge;
use ratscrew_engine::engine::Match;
use ratscrew_engine::game::{IgnoreReason, Outcome};
use ratscrew_engine::rules::SlapRule;
use ratscrew_engine::seats::Seat;

fn table_with_pile(pile: &str, first_hand: &str) -> Match {
    Match::builder()
        .seed(9)
        .seat(Seat::First, "p1")
        .seat(Seat::Second, "p2")
        .hand(Seat::First, parse_cards(first_hand).unwrap())
        .hand(Seat::Second, parse_cards("8♦ 8♣").unwrap())
        .pile(parse_cards(pile).unwrap())
        .build()
}

#[test]
fn false_slap_burns_front_card_to_bottom() {
    let mut table = table_with_pile("2♠ 5♥", "9♣ 3♦");
    let turn_before = table.turn();

    let outcome = table.slap("p1");

    assert_eq!(
        outcome,
        Outcome::Burned {
            seat: Seat::First,
            card: "9♣".parse().unwrap()
        }
    );
    assert_eq!(table.pile().to_vec(), parse_cards("2♠ 5♥ 9♣").unwrap());
    assert_eq!(table.hand(Seat::First).to_vec(), parse_cards("3♦").unwrap());
    assert_eq!(table.turn(), turn_before);
    assert_eq!(table.challenge(), None);
    assert_eq!(outcome.notification(), None);
}

#[test]
fn false_slap_leaves_open_chase_alone() {
    let chase = Challenge {
        challenger: Seat::Second,
        remaining: 2,
    };
    let mut table = Match::builder()
        .seat(Seat::First, "p1")
        .seat(Seat::Second, "p2")
        .hand(Seat::First, parse_cards("9♣ 3♦").unwrap())
        .hand(Seat::Second, parse_cards("6♣").unwrap())
        .pile(parse_cards("Q♠ 4♥").unwrap())
        .challenge(chase)
        .build();
    assert_eq!(table.turn(), Seat::First);

    assert!(matches!(table.slap("p2"), Outcome::Burned { .. }));
    assert_eq!(table.pile().bottom(), Some(&"6♣".parse().unwrap()));
    assert_eq!(table.challenge(), Some(chase));
    assert_eq!(table.turn(), Seat::First);
}

#[test]
fn false_slap_with_empty_hand_changes_nothing() {
    let mut table = table_with_pile("2♠ 5♥", "");
    let before = table.snapshot();
    assert_eq!(
        table.slap("p1"),
        Outcome::Ignored {
            reason: IgnoreReason::NothingToBurn
        }
    );
    assert_eq!(table.snapshot(), before);
}

#[test]
fn valid_slap_takes_pile_and_turn_and_clears_chase() {
    let mut table = Match::builder()
        .seat(Seat::First, "p1")
        .seat(Seat::Second, "p2")
        .hand(Seat::First, parse_cards("2♦").unwrap())
        .hand(Seat::Second, parse_cards("4♣").unwrap())
        .pile(parse_cards("7♥ 7♠ K♣").unwrap())
        .challenge(Challenge {
            challenger: Seat::First,
            remaining: 3,
        })
        .build();

    let outcome = table.slap("p2");

    assert_eq!(
        outcome,
        Outcome::SlapWon {
            seat: Seat::Second,
            rule: SlapRule::Double,
            cards: 3
        }
    );
    assert_eq!(outcome.notification().as_deref(), Some("Player 2 won the slap!"));
    assert!(table.pile().is_empty());
    assert_eq!(table.challenge(), None);
    assert_eq!(table.turn(), Seat::Second);
    assert_eq!(
        table.hand(Seat::Second).to_vec(),
        parse_cards("4♣ K♣ 7♠ 7♥").unwrap()
    );
}

#[test]
fn player_with_no_cards_can_still_win_a_slap() {
    let mut table = table_with_pile("K♠ Q♥", "");
    assert!(matches!(
        table.slap("p1"),
        Outcome::SlapWon {
            rule: SlapRule::Marriage,
            ..
        }
    ));
    assert_eq!(table.hand(Seat::First).len(), 2);
}

#[test]
fn spectators_cannot_slap() {
    let mut table = table_with_pile("7♥ 7♠", "9♣");
    let before = table.snapshot();
    assert_eq!(
        table.slap("spectator"),
        Outcome::Ignored {
            reason: IgnoreReason::NotSeated
        }
    );
    assert_eq!(table.snapshot(), before);
}

#[test]
fn first_slap_wins_the_race() {
    let mut table = table_with_pile("6♦ 4♠", "9♣");
    assert!(matches!(table.slap("p2"), Outcome::SlapWon { .. }));
    // the pile is gone, so the late slap is a false slap
    assert!(matches!(
        table.slap("p1"),
        Outcome::Burned {
            seat: Seat::First,
            ..
        }
    ));
    assert_eq!(table.pile().len(), 1);
    assert_eq!(table.turn(), Seat::Second);
}
