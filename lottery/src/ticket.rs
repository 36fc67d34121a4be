use std::fmt::Display;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Ledger, LotteryError, Number, Ticket};

/// How lucky dip tickets are made and what they cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DipSettings {
    pub balls_per_ticket: usize,
    /// Generated numbers are taken from `[0, max_number)`.
    pub max_number: Number,
    pub cost_per_ticket: f64,
}

/// Tickets handed over by the caller, either a raw matrix or an existing [`TicketSet`].
#[derive(Debug, Clone, Copy)]
pub enum TicketSource<'a> {
    Matrix(&'a [Ticket]),
    Set(&'a TicketSet),
}

impl<'a> TicketSource<'a> {
    pub fn tickets(&self) -> &'a [Ticket] {
        match *self {
            TicketSource::Matrix(matrix) => matrix,
            TicketSource::Set(set) => set.tickets(),
        }
    }
}

impl<'a> From<&'a [Ticket]> for TicketSource<'a> {
    fn from(matrix: &'a [Ticket]) -> Self {
        TicketSource::Matrix(matrix)
    }
}

impl<'a, const N: usize> From<&'a [Ticket; N]> for TicketSource<'a> {
    fn from(matrix: &'a [Ticket; N]) -> Self {
        TicketSource::Matrix(matrix)
    }
}

impl<'a> From<&'a Vec<Ticket>> for TicketSource<'a> {
    fn from(matrix: &'a Vec<Ticket>) -> Self {
        TicketSource::Matrix(matrix)
    }
}

impl<'a> From<&'a TicketSet> for TicketSource<'a> {
    fn from(set: &'a TicketSet) -> Self {
        TicketSource::Set(set)
    }
}

/// An immutable collection of number combinations, paid for on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSet {
    tickets: Vec<Ticket>,
}

impl TicketSet {
    /// Builds a ticket set from exactly one of `ticket_count` (lucky dip) or `numbers` (supplied).
    pub fn new<R: Rng + ?Sized>(
        ledger: &mut Ledger,
        settings: &DipSettings,
        ticket_count: Option<usize>,
        numbers: Option<TicketSource<'_>>,
        rng: &mut R,
    ) -> Result<Self, LotteryError> {
        match (ticket_count, numbers) {
            (Some(ticket_count), None) => Self::generate(ledger, settings, ticket_count, rng),
            (None, Some(numbers)) => Self::supplied(ledger, settings, numbers),
            (None, None) => Err(LotteryError::configuration(
                "Need to give argument to either ticket_count or numbers",
            )),
            (Some(_), Some(_)) => Err(LotteryError::configuration(
                "Need to give argument to either ticket_count or numbers (not both)",
            )),
        }
    }

    /// Draws `ticket_count` lucky dips, paying for each one as soon as it is drawn.
    ///
    /// If the ledger runs dry part way through, the error is returned and the
    /// tickets already paid for stay paid for.
    pub fn generate<R: Rng + ?Sized>(
        ledger: &mut Ledger,
        settings: &DipSettings,
        ticket_count: usize,
        rng: &mut R,
    ) -> Result<Self, LotteryError> {
        let DipSettings {
            balls_per_ticket,
            max_number,
            cost_per_ticket,
        } = *settings;
        if balls_per_ticket > max_number as usize {
            return Err(LotteryError::configuration(format!(
                "Cannot pick {balls_per_ticket} distinct numbers below {max_number}"
            )));
        }

        let mut tickets: Vec<Ticket> = Vec::with_capacity(ticket_count);
        for i in 0..ticket_count {
            let mut ticket: Ticket =
                rand::seq::index::sample(&mut *rng, max_number as usize, balls_per_ticket)
                    .into_iter()
                    .map(|n| n as Number)
                    .collect();
            ticket.sort_unstable();
            tracing::debug!("Lucky dip {i}: {:?}", ticket);
            tickets.push(ticket);

            if let Err(e) = ledger.debit(cost_per_ticket) {
                tracing::warn!(
                    "Ledger ran out after {} of {ticket_count} tickets: {e}",
                    tickets.len() - 1
                );
                return Err(e);
            }
        }

        Ok(Self { tickets })
    }

    /// Takes the given tickets as they are and pays for all of them at once.
    pub fn supplied<'a>(
        ledger: &mut Ledger,
        settings: &DipSettings,
        numbers: impl Into<TicketSource<'a>>,
    ) -> Result<Self, LotteryError> {
        let numbers: TicketSource<'a> = numbers.into();
        let tickets = numbers.tickets();
        if let Some(first) = tickets.first() {
            if let Some(row) = tickets.iter().position(|t| t.len() != first.len()) {
                return Err(LotteryError::configuration(format!(
                    "Ticket {row} has {} numbers while ticket 0 has {}",
                    tickets[row].len(),
                    first.len()
                )));
            }
        }

        ledger.debit(settings.cost_per_ticket * tickets.len() as f64)?;

        Ok(Self {
            tickets: tickets.to_vec(),
        })
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ticket> {
        self.tickets.iter()
    }
}

impl<'a> IntoIterator for &'a TicketSet {
    type Item = &'a Ticket;
    type IntoIter = std::slice::Iter<'a, Ticket>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for TicketSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (i, ticket) in self.tickets.iter().enumerate() {
            if i > 0 {
                f.write_str(",\n ")?;
            }
            f.write_fmt(format_args!("{:?}", ticket))?;
        }
        f.write_str("]")
    }
}
