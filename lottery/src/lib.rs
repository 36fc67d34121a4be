pub mod draw;
pub mod error;
pub mod ledger;
pub mod schedule;
pub mod ticket;

pub use draw::{match_count, Draw, DrawSettings};
pub use error::LotteryError;
pub use ledger::{Comparand, Ledger};
pub use schedule::RewardSchedule;
pub use ticket::{DipSettings, TicketSet, TicketSource};

/// A single ball number.
pub type Number = u32;
/// How many numbers a ticket shares with the drawn numbers.
pub type MatchCount = usize;
pub type Ticket = Vec<Number>;
