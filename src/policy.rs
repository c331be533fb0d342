use std::fmt;

use serde::Serialize;

use crate::hand::BLACKJACK;

/// The conventional total a dealer stands on.
pub const DEALER_FLOOR: u8 = 17;

/// A dealer total the rigger must reach, always within `17..=21`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Target(u8);

impl Target {
    pub fn new(value: u8) -> Option<Target> {
        (DEALER_FLOOR..=BLACKJACK)
            .contains(&value)
            .then_some(Target(value))
    }

    /// Beat the player outright when arithmetic allows, otherwise tie at 21.
    /// A busted player gets no target: the round is already the dealer's.
    pub fn for_player_total(player_total: u8) -> Option<Target> {
        if player_total > BLACKJACK {
            return None;
        }
        let value = DEALER_FLOOR.max(player_total + 1).min(BLACKJACK);
        Some(Target(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_player_totals_hit_the_floor() {
        for pt in 0..=16 {
            assert_eq!(Target::for_player_total(pt), Some(Target(17)), "pt={pt}");
        }
    }

    #[test]
    fn dealer_aims_one_above_the_player() {
        assert_eq!(Target::for_player_total(17).map(Target::value), Some(18));
        assert_eq!(Target::for_player_total(18).map(Target::value), Some(19));
        assert_eq!(Target::for_player_total(20).map(Target::value), Some(21));
    }

    #[test]
    fn twenty_one_clamps_to_a_tie() {
        assert_eq!(Target::for_player_total(21).map(Target::value), Some(21));
    }

    #[test]
    fn bust_has_no_target() {
        assert_eq!(Target::for_player_total(22), None);
        assert_eq!(Target::for_player_total(30), None);
    }

    #[test]
    fn constructor_rejects_out_of_range_values() {
        assert_eq!(Target::new(16), None);
        assert_eq!(Target::new(22), None);
        assert_eq!(Target::new(19).map(Target::value), Some(19));
    }
}
