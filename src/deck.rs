use std::fmt;

use rand::{rngs::SmallRng, SeedableRng};
use serde::Serialize;

use crate::random::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Rank {
    #[serde(rename = "A")]
    Ace,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Ranks worth ten points, in the order an exact ten-valued draw picks from.
    pub const TEN_VALUED: [Rank; 4] = [Rank::Ten, Rank::Jack, Rank::Queen, Rank::King];

    /// Face value with every ace counted as 11. Softening aces is a hand-level concern.
    pub fn point_value(self) -> u8 {
        match self {
            Rank::Ace => 11,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
        }
    }

    /// The literal rank for a pip value in `2..=9`.
    pub fn from_pips(value: u8) -> Option<Rank> {
        match value {
            2..=9 => Some(Rank::ALL[value as usize - 1]),
            _ => None,
        }
    }

    pub fn from_label(label: &str) -> Option<Rank> {
        Rank::ALL.into_iter().find(|rank| rank.label() == label)
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }

    pub fn is_ace(self) -> bool {
        self == Rank::Ace
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Suit {
    #[serde(rename = "♠")]
    Spades,
    #[serde(rename = "♥")]
    Hearts,
    #[serde(rename = "♦")]
    Diamonds,
    #[serde(rename = "♣")]
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Spades => "♠",
            Suit::Hearts => "♥",
            Suit::Diamonds => "♦",
            Suit::Clubs => "♣",
        }
    }

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }

    pub fn value(&self) -> u8 {
        self.rank.point_value()
    }

    pub fn is_ace(&self) -> bool {
        self.rank.is_ace()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.symbol())
    }
}

/// A card described by the points it must contribute rather than by its rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardRequest {
    /// Any of 10, J, Q, K.
    Ten,
    Ace,
    /// A literal pip rank, 2 through 9.
    Exact(Rank),
}

impl CardRequest {
    /// 10 asks for a ten-valued card, 11 for an ace, 2..=9 for that rank.
    pub fn for_value(value: u8) -> Option<CardRequest> {
        match value {
            10 => Some(CardRequest::Ten),
            11 => Some(CardRequest::Ace),
            _ => Rank::from_pips(value).map(CardRequest::Exact),
        }
    }
}

/// An endless shoe: every draw is independent and nothing is ever depleted.
pub struct Shoe<R> {
    source: R,
}

impl Shoe<SmallRng> {
    pub fn seeded(seed: u64) -> Self {
        Shoe::new(SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Shoe::new(SmallRng::from_entropy())
    }
}

impl<R: RandomSource> Shoe<R> {
    pub fn new(source: R) -> Self {
        Shoe { source }
    }

    /// Uniform over all 52 rank and suit combinations.
    pub fn deal_card(&mut self) -> Card {
        let rank = Rank::ALL[self.source.next_index(Rank::ALL.len())];
        let suit = self.random_suit();
        Card::new(rank, suit)
    }

    pub fn deal(&mut self, request: CardRequest) -> Card {
        let rank = match request {
            CardRequest::Ten => {
                Rank::TEN_VALUED[self.source.next_index(Rank::TEN_VALUED.len())]
            }
            CardRequest::Ace => Rank::Ace,
            CardRequest::Exact(rank) => rank,
        };
        let suit = self.random_suit();
        Card::new(rank, suit)
    }

    /// Deals a card worth exactly `value` points, if any single card is.
    pub fn deal_exact(&mut self, value: u8) -> Option<Card> {
        CardRequest::for_value(value).map(|request| self.deal(request))
    }

    fn random_suit(&mut self) -> Suit {
        Suit::ALL[self.source.next_index(Suit::ALL.len())]
    }
}
