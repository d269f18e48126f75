//! Mainframe3270 keyword library
//!
//! Test-automation keywords for IBM 3270 sessions: open and switch
//! connections, read and write the screen, assert on its contents, wait for
//! text or input fields and take HTML screenshots. Every keyword runs against
//! the current connection of a [`Mainframe3270`] instance.

pub mod args;
pub mod cache;
pub mod cli;
pub mod config;
pub mod keywords;
pub mod library;
pub mod result_mode;
pub mod session_file;
pub mod text;

pub use args::ExtraArgs;
pub use cache::ConnectionCache;
pub use config::LibraryConfig;
pub use keywords::ConnectionOptions;
pub use library::Mainframe3270;
pub use result_mode::{PositionValue, ResultMode};
pub use session_file::SessionFile;

pub use mf3270_emulator::{Emulator, EmulatorError, Position};

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeywordError {
    #[error("No connection open")]
    NoConnection,

    #[error("Non-existing index or alias '{0}'.")]
    UnknownConnection(String),

    #[error("{0}")]
    SessionFile(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A page assertion did not hold; carries the default or caller message
    #[error("{0}")]
    Assertion(String),

    #[error("Cannot split argument line: {0}")]
    ArgumentSyntax(String),

    #[error("Invalid regular expression: {0}")]
    Regex(#[from] regex::Error),

    #[error("Failed to read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Emulator(#[from] EmulatorError),
}
