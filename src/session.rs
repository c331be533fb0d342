//! Session controller: bankroll, the locked bet, both hands and the round lifecycle.
//!
//! Every state-changing call returns a [`Snapshot`], the plain-data view a
//! presentation layer renders. Rejected input leaves the state untouched apart from the
//! status message, which carries the rejection text.

use std::fmt;

use log::info;
use rand::rngs::SmallRng;
use serde::Serialize;

use crate::{
    config::TableConfig,
    deck::{Card, Shoe},
    error::{ConfigError, GameError},
    game::{Resolution, RiggedGame},
    hand::{Hand, BLACKJACK},
    random::RandomSource,
};

const WELCOME: &str = "Press Deal to start. (Dealer wins all ties.)";
const IN_PLAY: &str = "Hit or Stand. (Remember: ties go to the dealer.)";

/// Round lifecycle. Between calls a round rests in `NotStarted`, `InPlay` or `Resolved`.
/// The other phases only last inside a single call; `RoundState::settled_via` keeps the
/// one a round was settled through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    NotStarted,
    /// Bet debited, opening cards not yet dealt.
    BetLocked,
    InPlay,
    /// Player went over 21; settles straight away.
    PlayerBust,
    /// Player stood; settles straight away.
    Standing,
    Resolved,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::NotStarted => "not started",
            Phase::BetLocked => "locking a bet",
            Phase::InPlay => "in play",
            Phase::PlayerBust => "settling a bust",
            Phase::Standing => "settling a stand",
            Phase::Resolved => "resolved",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundState {
    pub bankroll: u32,
    pub locked_bet: u32,
    pub player_hand: Hand,
    pub dealer_hand: Hand,
    pub dealer_revealed: bool,
    pub round_over: bool,
    pub phase: Phase,
    /// `PlayerBust` or `Standing` once the round has settled.
    pub settled_via: Option<Phase>,
    pub status_message: String,
}

impl RoundState {
    fn fresh(bankroll: u32) -> Self {
        RoundState {
            bankroll,
            locked_bet: 0,
            player_hand: Hand::new(),
            dealer_hand: Hand::new(),
            dealer_revealed: false,
            round_over: false,
            phase: Phase::NotStarted,
            settled_via: None,
            status_message: WELCOME.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub label: String,
    pub rank: String,
    pub suit: String,
    pub value: u8,
    pub red: bool,
    pub face_down: bool,
}

impl CardView {
    fn face_up(card: &Card) -> Self {
        CardView {
            label: card.to_string(),
            rank: card.rank.label().to_string(),
            suit: card.suit.symbol().to_string(),
            value: card.value(),
            red: card.suit.is_red(),
            face_down: false,
        }
    }

    fn face_down() -> Self {
        CardView {
            label: String::new(),
            rank: String::new(),
            suit: String::new(),
            value: 0,
            red: false,
            face_down: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub deal: bool,
    pub hit: bool,
    pub stand: bool,
    pub restart: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub dealer_hand: Vec<CardView>,
    pub player_hand: Vec<CardView>,
    /// Up-card value until the reveal, the full total afterwards.
    pub dealer_total_display: u8,
    pub player_total: u8,
    pub bankroll: u32,
    pub locked_bet: u32,
    pub status_message: String,
    pub phase: Phase,
    pub bankroll_exhausted: bool,
    pub overlay_delay_ms: u32,
    pub controls: Controls,
}

pub struct Session<R = SmallRng> {
    config: TableConfig,
    state: RoundState,
    game: RiggedGame<R>,
    last_resolution: Option<Resolution>,
}

impl Session<SmallRng> {
    pub fn seeded(config: TableConfig, seed: u64) -> Result<Self, ConfigError> {
        Session::with_shoe(config, Shoe::seeded(seed))
    }

    pub fn from_entropy(config: TableConfig) -> Result<Self, ConfigError> {
        Session::with_shoe(config, Shoe::from_entropy())
    }
}

impl<R: RandomSource> Session<R> {
    pub fn new(config: TableConfig, source: R) -> Result<Self, ConfigError> {
        Session::with_shoe(config, Shoe::new(source))
    }

    fn with_shoe(config: TableConfig, shoe: Shoe<R>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Session {
            state: RoundState::fresh(config.starting_bankroll),
            config,
            game: RiggedGame::new(shoe),
            last_resolution: None,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Resolution of the most recent finished round, if it has not been cleared.
    pub fn last_resolution(&self) -> Option<&Resolution> {
        self.last_resolution.as_ref()
    }

    pub fn bankroll_exhausted(&self) -> bool {
        self.state.bankroll < self.config.min_bet
    }

    /// The largest bet the table and the bankroll both allow.
    pub fn max_bet(&self) -> u32 {
        self.config.max_bet.min(self.state.bankroll)
    }

    /// Clamps into the table limits, then down to the bankroll. A bankroll below the
    /// minimum bet cannot cover any wager.
    pub fn clamp_bet(&self, requested: u32) -> Result<u32, GameError> {
        let bankroll = self.state.bankroll;
        let min_bet = self.config.min_bet;
        let bet = requested.clamp(min_bet, self.config.max_bet).min(bankroll);
        if bet < min_bet {
            return Err(GameError::InsufficientBankroll { bankroll, min_bet });
        }
        Ok(bet)
    }

    pub fn start_round(&mut self, requested: u32) -> Result<Snapshot, GameError> {
        if self.state.phase != Phase::NotStarted {
            return self.reject(GameError::DealUnavailable(self.state.phase));
        }
        let bet = match self.clamp_bet(requested) {
            Ok(bet) => bet,
            Err(err) => return self.reject(err),
        };

        self.state.bankroll -= bet;
        self.state.locked_bet = bet;
        self.state.phase = Phase::BetLocked;
        self.last_resolution = None;
        info!(
            "{}: bet {bet}, bankroll now {}",
            self.state.phase, self.state.bankroll
        );

        self.state.player_hand.clear();
        self.state.dealer_hand.clear();
        for _ in 0..2 {
            let card = self.game.deal_card();
            self.state.player_hand.push(card);
        }
        for _ in 0..2 {
            let card = self.game.deal_card();
            self.state.dealer_hand.push(card);
        }
        self.state.dealer_revealed = false;
        self.state.round_over = false;
        self.state.phase = Phase::InPlay;
        self.state.status_message = IN_PLAY.to_string();

        // Two cards cannot bust once aces soften, but an opening bust still settles here.
        if self.state.player_hand.total() > BLACKJACK {
            self.settle(Phase::PlayerBust);
        }

        Ok(self.snapshot())
    }

    pub fn player_hit(&mut self) -> Result<Snapshot, GameError> {
        if self.state.phase != Phase::InPlay {
            return self.reject(GameError::NotInPlay);
        }
        let card = self.game.deal_card();
        self.state.player_hand.push(card);

        if self.state.player_hand.is_bust() {
            self.settle(Phase::PlayerBust);
        }
        Ok(self.snapshot())
    }

    pub fn player_stand(&mut self) -> Result<Snapshot, GameError> {
        if self.state.phase != Phase::InPlay {
            return self.reject(GameError::NotInPlay);
        }
        self.settle(Phase::Standing);
        Ok(self.snapshot())
    }

    /// Clears the finished round and returns to the deal prompt. Bankroll carries over.
    pub fn next_round(&mut self) -> Snapshot {
        self.state = RoundState::fresh(self.state.bankroll);
        self.last_resolution = None;
        self.snapshot()
    }

    /// Back to the starting bankroll with an empty table.
    pub fn reset_session(&mut self) -> Snapshot {
        info!("session reset to bankroll {}", self.config.starting_bankroll);
        self.state = RoundState::fresh(self.config.starting_bankroll);
        self.last_resolution = None;
        self.snapshot()
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        let dealer_hand = state
            .dealer_hand
            .cards()
            .iter()
            .enumerate()
            .map(|(index, card)| {
                if index == 1 && !state.dealer_revealed {
                    CardView::face_down()
                } else {
                    CardView::face_up(card)
                }
            })
            .collect();
        let dealer_total_display = if state.dealer_revealed {
            state.dealer_hand.total()
        } else {
            state.dealer_hand.up_card_value()
        };
        let in_play = state.phase == Phase::InPlay;
        let exhausted = self.bankroll_exhausted();

        Snapshot {
            dealer_hand,
            player_hand: state
                .player_hand
                .cards()
                .iter()
                .map(CardView::face_up)
                .collect(),
            dealer_total_display,
            player_total: state.player_hand.total(),
            bankroll: state.bankroll,
            locked_bet: state.locked_bet,
            status_message: state.status_message.clone(),
            phase: state.phase,
            bankroll_exhausted: exhausted && state.phase != Phase::InPlay,
            overlay_delay_ms: self.config.overlay_delay_ms,
            controls: Controls {
                deal: state.phase == Phase::NotStarted && !exhausted,
                hit: in_play,
                stand: in_play,
                restart: state.round_over,
            },
        }
    }

    /// Reveals the dealer, forces the outcome and closes the round. The locked bet was
    /// taken at deal time and nothing is paid back.
    fn settle(&mut self, via: Phase) {
        self.state.phase = via;
        info!("{via}: revealing the dealer");
        self.state.dealer_revealed = true;
        let resolution = self
            .game
            .resolve(&self.state.player_hand, &mut self.state.dealer_hand);
        self.state.status_message = resolution.outcome.to_string();
        self.state.round_over = true;
        self.state.phase = Phase::Resolved;
        self.state.settled_via = Some(via);
        info!(
            "round over: {} (bet {} kept by the house)",
            self.state.status_message, self.state.locked_bet
        );
        self.last_resolution = Some(resolution);
    }

    fn reject(&mut self, err: GameError) -> Result<Snapshot, GameError> {
        info!("rejected: {err}");
        self.state.status_message = err.to_string();
        Err(err)
    }
}
