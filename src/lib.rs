//! This crate keeps a Trello board tidy, by running scheduled housekeeping chores on it.
//!
//! It provides a Trello client in the [`client`] module, that implements the [`BoardService`](traits::BoardService) trait, and that can be used as a stand-alone module.
//!
//! The chores are in the [`chores`] module:
//! * shopping items that have been bought (i.e. archived) are put back into lists per category,
//! * cards that should be done again every few days are taken out of the archive, and come back to the to-do list when they are due,
//! * recurring reminders are created the day before they are due.
//!
//! A [`Housekeeper`] runs the chores selected in the [`Settings`](config::Settings) one after the other. \
//! Because running against an actual Trello board is not suited for tests, an in-memory board service is available in the [`mock_board`] module (behind the `mock_board` feature).

pub mod traits;

pub mod ids;
pub mod board;
pub use board::BoardSession;
pub mod card;
pub use card::Card;

pub mod client;
pub mod resource;
pub mod chores;
pub mod housekeeper;
pub use housekeeper::Housekeeper;
pub mod progress;

pub mod config;
pub use config::Settings;
pub mod error;
pub use error::HousekeeperError;
pub mod utils;

pub mod mock_board;
pub mod mock_behaviour;

/// A housekeeper that works on an actual Trello board
pub type TrelloHousekeeper = Housekeeper<client::Client>;
