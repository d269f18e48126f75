//! 3270 session driver for Mainframe3270
//!
//! Wraps one emulator process behind [`Emulator`]: screen geometry per
//! terminal model, 1-based coordinates at the public boundary, and the
//! primitive operations every keyword is built from.

pub mod config;
pub mod emulator;
pub mod model;

pub use config::EmulatorConfig;
pub use emulator::Emulator;
pub use model::{Geometry, Model, ModelNumber, Position, MODEL_IDS};

use mf3270_protocol::ProtocolError;
use mf3270_transport::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error("This Emulator instance has been terminated")]
    Terminated,

    #[error("You have exceeded the y-axis limit of the mainframe screen")]
    YAxisLimit,

    #[error("You have exceeded the x-axis limit of the mainframe screen")]
    XAxisLimit,

    #[error("Model should be one of {valid}, but was '{model}'.")]
    UnknownModel { model: String, valid: String },

    #[error("length limit {length}, but got \"{text}\"")]
    FieldTruncated { length: usize, text: String },

    #[error("keyboard not unlocked, state was: {0}")]
    KeyboardState(String),

    /// The emulator answered with a data shape the operation cannot use
    #[error("{0}")]
    UnexpectedData(String),

    #[error("No previous host to reconnect to")]
    NoHost,

    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl EmulatorError {
    pub fn is_not_connected(&self) -> bool {
        match self {
            EmulatorError::Protocol(e) => e.is_not_connected(),
            EmulatorError::Transport(e) => matches!(e, TransportError::NotConnected),
            _ => false,
        }
    }

    /// The emulator went away underneath us (broken pipe, reset socket)
    pub fn is_disconnect(&self) -> bool {
        match self {
            EmulatorError::Protocol(e) => e.is_disconnect(),
            EmulatorError::Transport(e) => e.is_disconnect(),
            _ => false,
        }
    }

    /// Error text reported by the emulator itself, if that is what failed
    pub fn command_message(&self) -> Option<&str> {
        match self {
            EmulatorError::Protocol(ProtocolError::Command(message)) => Some(message),
            _ => None,
        }
    }
}
