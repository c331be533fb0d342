//! Greedy construction of a dealer hand that lands on a chosen total.
//!
//! The up-card is kept for display continuity. Every later card is requested by the
//! points still missing, preferring ten-valued cards while the gap allows one, so the
//! hand reads like a plausible dealer draw.

use log::{debug, warn};
use serde::Serialize;

use crate::{
    deck::{Card, CardRequest, Shoe},
    hand::Hand,
    policy::Target,
    random::RandomSource,
};

/// A corrective path taken while forcing the dealer's result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Fallback {
    /// Ace softening pushed the hand past its target mid-construction.
    SoftAceOvershoot,
    /// The finished dealer hand was over 21 and got overwritten.
    BustOverwrite,
    /// The dealer finished under the player and drew more cards, or was overwritten
    /// with a natural 21 when those fell short.
    TopUp,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RiggedHand {
    pub hand: Hand,
    pub fallback: Option<Fallback>,
}

/// Card to request when `need` points are missing.
///
/// Gaps of ten or more take a ten-valued card, which also covers a gap of 11. A gap of
/// one takes an ace: the running total is at least 16 whenever that happens, so the ace
/// softens to 1 and lands exactly on target.
pub fn request_for_need(need: u8) -> Option<CardRequest> {
    match need {
        0 => None,
        1 => Some(CardRequest::Ace),
        n if n >= 10 => Some(CardRequest::Ten),
        n => CardRequest::for_value(n),
    }
}

/// A ten-valued card plus an ace.
pub fn natural_twenty_one<R: RandomSource>(shoe: &mut Shoe<R>) -> Hand {
    let ten = shoe.deal(CardRequest::Ten);
    let ace = shoe.deal(CardRequest::Ace);
    Hand::from_cards(vec![ten, ace])
}

/// Adds `card` to a hand under construction. A soft ace that carries the hand past
/// `goal` swaps the whole hand for a natural 21.
pub fn push_toward<R: RandomSource>(
    shoe: &mut Shoe<R>,
    hand: &mut Hand,
    card: Card,
    goal: u8,
) -> Option<Fallback> {
    hand.push(card);
    let total = hand.total();
    if total > goal && hand.has_soft_ace() {
        warn!("soft ace overshot dealer target {goal} at {total}, substituting a natural 21");
        *hand = natural_twenty_one(shoe);
        return Some(Fallback::SoftAceOvershoot);
    }
    None
}

pub fn rig_dealer_hand<R: RandomSource>(
    shoe: &mut Shoe<R>,
    up_card: Card,
    target: Target,
) -> RiggedHand {
    let goal = target.value();
    let mut hand = Hand::from_cards(vec![up_card]);
    let mut total = hand.total();

    while total < goal {
        let need = goal - total;
        let Some(request) = request_for_need(need) else {
            break;
        };
        let card = shoe.deal(request);
        debug!("rigging dealer toward {goal}: needed {need}, drew {card}");
        if let Some(fallback) = push_toward(shoe, &mut hand, card, goal) {
            return RiggedHand {
                hand,
                fallback: Some(fallback),
            };
        }
        total = hand.total();
    }

    // One card tops out at 11, below any target, so this only pads a hand whose
    // up-card already met the goal.
    if hand.len() == 1 {
        if let Some(request) = request_for_need(goal.saturating_sub(total)) {
            hand.push(shoe.deal(request));
        }
    }

    RiggedHand {
        hand,
        fallback: None,
    }
}
