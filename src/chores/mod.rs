//! The housekeeping chores that can be run on a board
//!
//! Every chore works on an opened [`BoardSession`](crate::board::BoardSession), and is independent from the others.

pub mod shopping;
pub use shopping::{ShoppingChore, ShoppingConfig};
pub mod replay;
pub use replay::{ReplayChore, ReplayConfig, ReplayOutcome};
pub mod reminder;
pub use reminder::{ReminderChore, ReminderConfig, ReminderDefinition, ReminderSchedule};
