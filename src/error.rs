use thiserror::Error;

use crate::session::Phase;

/// Player input the table refused. None of these end the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Bankroll of {bankroll} cannot cover the minimum bet of {min_bet}.")]
    InsufficientBankroll { bankroll: u32, min_bet: u32 },
    #[error("Cannot deal while the round is {0}.")]
    DealUnavailable(Phase),
    #[error("No hand is in play.")]
    NotInPlay,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("minimum bet must be at least 1")]
    ZeroMinimumBet,
    #[error("minimum bet {min_bet} exceeds maximum bet {max_bet}")]
    InvertedBetRange { min_bet: u32, max_bet: u32 },
}
