//! Keywords, one module per concern
//!
//! Each module adds an `impl Mainframe3270` block.

mod assertions;
mod commands;
mod connection;
mod read_write;
mod screenshot;
mod wait;

pub use connection::{ConnectionOptions, DEFAULT_PORT};
