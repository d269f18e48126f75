//! x3270 script protocol for Mainframe3270
//!
//! One action per line goes out; zero or more `data: ` lines, a status
//! line and an `ok`/`error` result line come back.

pub mod action;
pub mod command;
pub mod status;

pub use action::Action;
pub use command::{execute, Command, Completion, Response, DATA_PREFIX, NO_ERROR_MESSAGE};
pub use status::Status;

use mf3270_transport::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The emulator answered `error`; carries its own diagnostic text
    #[error("{0}")]
    Command(String),

    #[error("expected \"ok\" or \"error\" result, but received: {0}")]
    UnexpectedResult(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ProtocolError {
    pub fn is_not_connected(&self) -> bool {
        matches!(self, ProtocolError::Transport(TransportError::NotConnected))
    }

    /// Broken pipe or connection reset underneath the exchange
    pub fn is_disconnect(&self) -> bool {
        match self {
            ProtocolError::Transport(e) => e.is_disconnect(),
            _ => false,
        }
    }
}
