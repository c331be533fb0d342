use serde::Serialize;

use crate::deck::Card;

pub const BLACKJACK: u8 = 21;

fn naive_total(cards: &[Card]) -> (u16, usize) {
    let mut total: u16 = 0;
    let mut aces = 0;

    for card in cards {
        total += u16::from(card.value());
        if card.is_ace() {
            aces += 1;
        }
    }

    (total, aces)
}

/// Blackjack total, softening one ace at a time from 11 to 1 while the hand is over 21.
pub fn evaluate_total(cards: &[Card]) -> u8 {
    let (mut total, mut aces) = naive_total(cards);

    while total > u16::from(BLACKJACK) && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    u8::try_from(total).unwrap_or(u8::MAX)
}

/// True when the hand holds an ace and counting every ace as 11 still stays at or under 21.
pub fn has_soft_ace(cards: &[Card]) -> bool {
    let (total, aces) = naive_total(cards);
    aces > 0 && total <= u16::from(BLACKJACK)
}

pub fn is_bust(cards: &[Card]) -> bool {
    evaluate_total(cards) > BLACKJACK
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Hand { cards: Vec::new() }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Hand { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The dealer's first card, shown face-up before the reveal.
    pub fn up_card(&self) -> Option<Card> {
        self.cards.first().copied()
    }

    /// Point value of the up-card alone, or 0 for an empty hand.
    pub fn up_card_value(&self) -> u8 {
        self.up_card().map_or(0, |card| card.value())
    }

    pub fn total(&self) -> u8 {
        evaluate_total(&self.cards)
    }

    pub fn has_soft_ace(&self) -> bool {
        has_soft_ace(&self.cards)
    }

    pub fn is_bust(&self) -> bool {
        is_bust(&self.cards)
    }
}

impl From<Vec<Card>> for Hand {
    fn from(cards: Vec<Card>) -> Self {
        Hand::from_cards(cards)
    }
}

#[cfg(test)]
pub(crate) fn hand_of(labels: &[&str]) -> Hand {
    use crate::deck::{Rank, Suit};

    labels
        .iter()
        .map(|label| {
            let rank = Rank::from_label(label).expect("valid rank label");
            Card::new(rank, Suit::Spades)
        })
        .collect::<Vec<_>>()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_totals() {
        assert_eq!(hand_of(&["2", "3"]).total(), 5);
        assert_eq!(hand_of(&["K", "Q"]).total(), 20);
        assert_eq!(hand_of(&["A", "K"]).total(), 21);
        assert_eq!(Hand::new().total(), 0);
    }

    #[test]
    fn single_ace_softens_by_exactly_ten() {
        let hand = hand_of(&["A", "6", "9"]);
        assert_eq!(hand.total(), 16);

        let hand = hand_of(&["A", "K", "5"]);
        assert_eq!(hand.total(), 26 - 10);
    }

    #[test]
    fn two_aces_and_nine_make_twenty_one() {
        assert_eq!(hand_of(&["A", "A", "9"]).total(), 21);
    }

    #[test]
    fn every_ace_may_soften() {
        assert_eq!(hand_of(&["A", "A", "A", "A"]).total(), 14);
        assert_eq!(hand_of(&["A", "A", "K", "Q"]).total(), 22);
    }

    #[test]
    fn total_is_order_independent() {
        let forward = hand_of(&["A", "7", "A", "5"]);
        let backward = hand_of(&["5", "A", "7", "A"]);
        assert_eq!(forward.total(), backward.total());
        assert_eq!(forward.total(), 14);
    }

    #[test]
    fn aceless_hands_are_never_adjusted() {
        let hand = hand_of(&["K", "Q", "3"]);
        assert_eq!(hand.total(), 23);
        assert!(hand.is_bust());
        assert!(!hand.has_soft_ace());
    }

    #[test]
    fn soft_ace_requires_all_aces_high_to_fit() {
        assert!(hand_of(&["A", "6"]).has_soft_ace());
        assert!(hand_of(&["A", "K"]).has_soft_ace());
        assert!(!hand_of(&["A", "6", "9"]).has_soft_ace());
        // two aces at 11 already overshoot
        assert!(!hand_of(&["A", "A"]).has_soft_ace());
    }

    #[test]
    fn up_card_value_ignores_later_cards() {
        let hand = hand_of(&["A", "9"]);
        assert_eq!(hand.up_card_value(), 11);
        assert_eq!(Hand::new().up_card_value(), 0);
    }
}
