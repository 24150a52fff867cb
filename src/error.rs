//! Errors that callers may want to tell apart from generic I/O or HTTP failures
//!
//! Functions of this crate return `Box<dyn Error>`. When the cause is one of these variants, it can be retrieved with `downcast_ref::<HousekeeperError>()`

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HousekeeperError {
    /// No board visible to the credentials has this name. This aborts a run
    #[error("board not found: {0:?}")]
    BoardNotFound(String),

    /// A list that a chore cannot work without does not exist on the board
    #[error("list not found: {0:?}")]
    ListNotFound(String),

    #[error("environment variable {0} is not set")]
    MissingCredential(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The board service answered with a non-success HTTP status
    #[error("unexpected HTTP status {status} for {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },
}
