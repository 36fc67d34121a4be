use thiserror::Error;

use crate::MatchCount;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LotteryError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("No lotto drawn yet")]
    NoDrawYet,
    #[error("No results to pay out: check tickets against a draw first")]
    NoResultsYet,
    #[error("Not enough money. You have {balance} left but are trying to remove {requested}")]
    InsufficientFunds { balance: f64, requested: f64 },
    #[error("Don't know how to compare a ledger holding {balance} with {other}")]
    TypeMismatch { balance: f64, other: f64 },
    #[error("Match count {index} is out of range for a reward schedule of {len} tiers")]
    IndexOutOfRange { index: MatchCount, len: usize },
}

impl LotteryError {
    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
