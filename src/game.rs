use std::fmt;

use log::{info, warn};
use serde::Serialize;

use crate::{
    deck::{Card, Shoe},
    hand::{Hand, BLACKJACK},
    policy::Target,
    random::RandomSource,
    rigger::{self, Fallback, RiggedHand},
};

/// How a round ended. Every variant is a dealer win.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Outcome {
    PlayerBust {
        #[serde(rename = "playerTotal")]
        player_total: u8,
    },
    DealerWins {
        #[serde(rename = "dealerTotal")]
        dealer_total: u8,
        #[serde(rename = "playerTotal")]
        player_total: u8,
    },
}

impl Outcome {
    pub fn player_total(&self) -> u8 {
        match *self {
            Outcome::PlayerBust { player_total } | Outcome::DealerWins { player_total, .. } => {
                player_total
            }
        }
    }

    pub fn dealer_total(&self) -> Option<u8> {
        match *self {
            Outcome::PlayerBust { .. } => None,
            Outcome::DealerWins { dealer_total, .. } => Some(dealer_total),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::PlayerBust { .. } => write!(f, "You busted. Dealer wins."),
            Outcome::DealerWins {
                dealer_total,
                player_total,
            } => write!(
                f,
                "Dealer: {dealer_total} vs You: {player_total}. Dealer wins."
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
    /// Corrective paths taken on the way. Empty in every normal round.
    pub fallbacks: Vec<Fallback>,
}

/// Each top-up card closes the gap or takes ten off it, so four always reach 21.
const MAX_TOP_UP_DRAWS: usize = 4;

pub struct RiggedGame<R> {
    shoe: Shoe<R>,
}

impl<R: RandomSource> RiggedGame<R> {
    pub fn new(shoe: Shoe<R>) -> Self {
        RiggedGame { shoe }
    }

    pub fn deal_card(&mut self) -> Card {
        self.shoe.deal_card()
    }

    pub fn rig_dealer(&mut self, up_card: Card, target: Target) -> RiggedHand {
        rigger::rig_dealer_hand(&mut self.shoe, up_card, target)
    }

    /// Replaces the dealer's hand so it ends at or above the player's total.
    /// A busted player short-circuits and the dealer hand stays as dealt.
    pub fn resolve(&mut self, player: &Hand, dealer: &mut Hand) -> Resolution {
        let player_total = player.total();
        let Some(target) = Target::for_player_total(player_total) else {
            info!("player busted at {player_total}, dealer hand left as dealt");
            return Resolution {
                outcome: Outcome::PlayerBust { player_total },
                target: None,
                fallbacks: Vec::new(),
            };
        };

        let up_card = match dealer.up_card() {
            Some(card) => card,
            None => self.deal_card(),
        };
        let rigged = self.rig_dealer(up_card, target);
        *dealer = rigged.hand;

        let mut fallbacks: Vec<Fallback> = rigged.fallback.into_iter().collect();
        let dealer_total = self.finish_dealer(player_total, dealer, &mut fallbacks);

        info!("dealer {dealer_total} vs player {player_total}, target {target}");
        Resolution {
            outcome: Outcome::DealerWins {
                dealer_total,
                player_total,
            },
            target: Some(target),
            fallbacks,
        }
    }

    /// Applies the post-construction guards and returns the dealer's final total:
    /// a busted dealer hand becomes a natural 21, and a dealer left under the player
    /// draws until it reaches the player, or becomes a natural 21 if the draws fall short.
    pub fn finish_dealer(
        &mut self,
        player_total: u8,
        dealer: &mut Hand,
        fallbacks: &mut Vec<Fallback>,
    ) -> u8 {
        let mut dealer_total = dealer.total();

        if dealer_total > BLACKJACK {
            warn!("dealer hand busted at {dealer_total}, overwriting with a natural 21");
            *dealer = rigger::natural_twenty_one(&mut self.shoe);
            dealer_total = BLACKJACK;
            fallbacks.push(Fallback::BustOverwrite);
        }

        if dealer_total < player_total {
            warn!("dealer stopped at {dealer_total} under player {player_total}, topping up");
            fallbacks.push(Fallback::TopUp);
            let goal = BLACKJACK.min(player_total + 1);
            for _ in 0..MAX_TOP_UP_DRAWS {
                let need = goal.saturating_sub(dealer_total);
                let Some(request) = rigger::request_for_need(need) else {
                    break;
                };
                dealer.push(self.shoe.deal(request));
                dealer_total = dealer.total();
                if dealer_total >= player_total {
                    break;
                }
            }

            if dealer_total < player_total || dealer_total > BLACKJACK {
                warn!("top-up left the dealer at {dealer_total}, overwriting with a natural 21");
                *dealer = rigger::natural_twenty_one(&mut self.shoe);
                dealer_total = BLACKJACK;
            }
        }

        dealer_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::hand_of;
    use crate::random::ScriptedSource;

    fn scripted(script: &[usize]) -> RiggedGame<ScriptedSource> {
        RiggedGame::new(Shoe::new(ScriptedSource::new(script.iter().copied())))
    }

    #[test]
    fn eighteen_against_seven_up_resolves_at_nineteen() {
        let mut game = scripted(&[0, 0, 0]);
        let player = hand_of(&["K", "8"]);
        let mut dealer = hand_of(&["7", "3"]);

        let resolution = game.resolve(&player, &mut dealer);

        assert_eq!(resolution.target, Target::new(19));
        assert_eq!(dealer.total(), 19);
        assert_eq!(dealer.len(), 3);
        assert!(resolution.fallbacks.is_empty());
        assert_eq!(
            resolution.outcome.to_string(),
            "Dealer: 19 vs You: 18. Dealer wins."
        );
    }

    #[test]
    fn twenty_one_ties_and_the_dealer_takes_it() {
        let mut game = RiggedGame::new(Shoe::seeded(21));
        let player = hand_of(&["A", "K"]);
        let mut dealer = hand_of(&["9", "4"]);

        let resolution = game.resolve(&player, &mut dealer);

        assert_eq!(
            resolution.outcome,
            Outcome::DealerWins {
                dealer_total: 21,
                player_total: 21
            }
        );
        assert_eq!(
            resolution.outcome.to_string(),
            "Dealer: 21 vs You: 21. Dealer wins."
        );
    }

    #[test]
    fn player_bust_leaves_dealer_untouched() {
        let mut game = scripted(&[1, 2, 3]);
        let player = hand_of(&["K", "Q", "3"]);
        let dealt = hand_of(&["5", "6"]);
        let mut dealer = dealt.clone();

        let resolution = game.resolve(&player, &mut dealer);

        assert_eq!(resolution.outcome, Outcome::PlayerBust { player_total: 23 });
        assert_eq!(resolution.target, None);
        assert_eq!(dealer, dealt);
        assert_eq!(resolution.outcome.to_string(), "You busted. Dealer wins.");
        // the rigger never drew
        assert_eq!(game.shoe.deal_card().rank, crate::deck::Rank::Two);
    }

    #[test]
    fn busted_dealer_hand_is_overwritten_with_twenty_one() {
        let mut game = RiggedGame::new(Shoe::seeded(4));
        let mut dealer = hand_of(&["K", "Q", "5"]);
        let mut fallbacks = Vec::new();

        let total = game.finish_dealer(19, &mut dealer, &mut fallbacks);

        assert_eq!(total, 21);
        assert_eq!(dealer.total(), 21);
        assert_eq!(dealer.len(), 2);
        assert_eq!(fallbacks, vec![Fallback::BustOverwrite]);
    }

    #[test]
    fn short_dealer_is_topped_up_and_flagged() {
        let mut game = RiggedGame::new(Shoe::seeded(8));
        let mut dealer = hand_of(&["10", "7"]);
        let mut fallbacks = Vec::new();

        let total = game.finish_dealer(20, &mut dealer, &mut fallbacks);

        assert_eq!(total, 21);
        assert_eq!(dealer.len(), 3);
        assert_eq!(fallbacks, vec![Fallback::TopUp]);
    }

    #[test]
    fn far_short_dealer_keeps_drawing_until_it_wins() {
        // ten-valued pick and its suit, then the suit of the 7
        let mut game = scripted(&[0, 0, 0]);
        let mut dealer = hand_of(&["2", "2"]);
        let mut fallbacks = Vec::new();

        let total = game.finish_dealer(20, &mut dealer, &mut fallbacks);

        assert!((20..=21).contains(&total), "dealer finished at {total}");
        assert_eq!(dealer.total(), total);
        assert_eq!(total, 21);
        assert_eq!(dealer.len(), 4);
        assert_eq!(fallbacks, vec![Fallback::TopUp]);
    }

    #[test]
    fn top_up_never_reports_a_short_dealer() {
        let mut game = RiggedGame::new(Shoe::seeded(13));
        for player_total in 4..=21 {
            for low in ["2", "3", "4", "5", "6"] {
                let mut dealer = hand_of(&["2", low]);
                let mut fallbacks = Vec::new();

                let total = game.finish_dealer(player_total, &mut dealer, &mut fallbacks);

                assert!(total >= player_total, "{total} under {player_total}");
                assert!(total <= 21);
                assert_eq!(dealer.total(), total);
            }
        }
    }

    #[test]
    fn winning_dealer_passes_guards_untouched() {
        let mut game = RiggedGame::new(Shoe::seeded(8));
        let before = hand_of(&["10", "9"]);
        let mut dealer = before.clone();
        let mut fallbacks = Vec::new();

        assert_eq!(game.finish_dealer(19, &mut dealer, &mut fallbacks), 19);
        assert_eq!(dealer, before);
        assert!(fallbacks.is_empty());
    }

    #[test]
    fn empty_dealer_hand_gets_an_up_card_first() {
        let mut game = RiggedGame::new(Shoe::seeded(2));
        let player = hand_of(&["9", "8"]);
        let mut dealer = Hand::new();

        let resolution = game.resolve(&player, &mut dealer);

        assert!(dealer.len() >= 2);
        assert_eq!(resolution.outcome.dealer_total(), Some(18));
    }

    #[test]
    fn outcome_serializes_with_a_kind_tag() {
        let outcome = Outcome::DealerWins {
            dealer_total: 20,
            player_total: 19,
        };
        let json = serde_json::to_value(outcome).unwrap();
        assert_eq!(json["kind"], "dealerWins");
        assert_eq!(json["dealerTotal"], 20);
        assert_eq!(json["playerTotal"], 19);
    }
}
