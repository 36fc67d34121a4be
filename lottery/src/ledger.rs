use std::{cmp::Ordering, fmt::Display};

use crate::LotteryError;

/// A guarded balance. Debits may not overdraw it, credits are unbounded.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Ledger {
    amount: f64,
}

/// Anything a [`Ledger`] can be ordered against.
#[derive(Debug, Clone, Copy)]
pub enum Comparand<'a> {
    Ledger(&'a Ledger),
    Amount(f64),
}

impl Ledger {
    pub fn new(amount: f64) -> Self {
        Self { amount }
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Removes `amount` from the balance and returns what is left.
    /// The balance is untouched when the request can't be covered.
    pub fn debit(&mut self, amount: f64) -> Result<f64, LotteryError> {
        // A NaN request never compares and is refused too.
        if !matches!(
            amount.partial_cmp(&self.amount),
            Some(Ordering::Less | Ordering::Equal)
        ) {
            return Err(LotteryError::InsufficientFunds {
                balance: self.amount,
                requested: amount,
            });
        }
        self.amount -= amount;
        tracing::trace!("Debited {amount}, balance {}", self.amount);
        Ok(self.amount)
    }

    pub fn credit(&mut self, amount: f64) -> f64 {
        self.amount += amount;
        tracing::trace!("Credited {amount}, balance {}", self.amount);
        self.amount
    }

    pub fn compare<'a>(&self, other: impl Into<Comparand<'a>>) -> Result<Ordering, LotteryError> {
        let other = match other.into() {
            Comparand::Ledger(ledger) => ledger.amount,
            Comparand::Amount(amount) => amount,
        };
        self.amount
            .partial_cmp(&other)
            .ok_or(LotteryError::TypeMismatch {
                balance: self.amount,
                other,
            })
    }
}

impl Display for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("Ledger(amount={})", self.amount))
    }
}

impl<'a> From<&'a Ledger> for Comparand<'a> {
    fn from(ledger: &'a Ledger) -> Self {
        Comparand::Ledger(ledger)
    }
}

impl From<f64> for Comparand<'_> {
    fn from(amount: f64) -> Self {
        Comparand::Amount(amount)
    }
}

impl From<u32> for Comparand<'_> {
    fn from(amount: u32) -> Self {
        Comparand::Amount(amount.into())
    }
}

impl From<i32> for Comparand<'_> {
    fn from(amount: i32) -> Self {
        Comparand::Amount(amount.into())
    }
}
