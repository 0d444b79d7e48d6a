use ratscrew_engine::cards::parse_cards;
use ratscrew_engine::rules::{is_slappable, matching_rule, SlapRule};

fn rule(pile: &str) -> Option<SlapRule> {
    matching_rule(&parse_cards(pile).expect("valid cards"))
}

#[test]
fn double() {
    assert_eq!(rule("7♥ 7♠"), Some(SlapRule::Double));
}

#[test]
fn sandwich() {
    assert_eq!(rule("5♣ 9♦ 5♥"), Some(SlapRule::Sandwich));
}

#[test]
fn tens() {
    assert_eq!(rule("6♦ 4♠"), Some(SlapRule::Tens));
    assert_eq!(rule("10♦ 10♠"), Some(SlapRule::Double));
}

#[test]
fn marriage_either_order() {
    assert_eq!(rule("K♠ Q♥"), Some(SlapRule::Marriage));
    assert_eq!(rule("Q♣ K♦"), Some(SlapRule::Marriage));
}

#[test]
fn top_bottom() {
    assert_eq!(rule("3♠ 8♥ 9♦ 3♣"), Some(SlapRule::TopBottom));
}

#[test]
fn no_pattern() {
    assert!(!is_slappable(&parse_cards("2♠ 5♥").unwrap()));
    assert!(!is_slappable(&parse_cards("A♠ 9♦ 4♣ J♥").unwrap()));
}

#[test]
fn empty_and_single_card_piles() {
    assert!(!is_slappable(&[]));
    assert!(!is_slappable(&parse_cards("K♠").unwrap()));
}

#[test]
fn earlier_rule_is_reported_first() {
    // Double and Top-Bottom both hold; Double is evaluated first
    assert_eq!(rule("9♠ 9♥ 2♦ 9♣"), Some(SlapRule::Double));
    // Sandwich and Tens both hold
    assert_eq!(rule("4♠ 6♥ 4♦"), Some(SlapRule::Sandwich));
}
