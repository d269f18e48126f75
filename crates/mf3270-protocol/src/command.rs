//! One action/response exchange
//!
//! ```text
//! -> MoveCursor(3, 9)\n
//! <- data: <payload>\n        zero or more
//! <- <12 status fields>\n     exactly once
//! <- ok\n | error\n           exactly once; empty only after Quit
//! ```

use crate::{Action, ProtocolError, Status};
use bytes::Bytes;
use mf3270_transport::Transport;
use tracing::debug;

/// Marker in front of every data line
pub const DATA_PREFIX: &[u8] = b"data: ";

/// Error text used when the emulator failed without saying why
pub const NO_ERROR_MESSAGE: &str = "[no error message]";

/// How a well-formed exchange ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Ok,
    Error,
    /// Empty result line, accepted only for `Quit`
    QuitEmpty,
}

/// Parsed answer to one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Data lines in arrival order, prefix and line ending removed
    pub data: Vec<Bytes>,
    pub status_line: Bytes,
    pub completion: Completion,
}

impl Response {
    pub fn status(&self) -> Status {
        Status::parse(&self.status_line)
    }
}

/// A single action in flight.
///
/// Data lines and the status line are kept on the command itself so the
/// caller can still inspect the status after the emulator reported an error.
#[derive(Debug)]
pub struct Command {
    action: Action,
    data: Vec<Bytes>,
    status_line: Option<Bytes>,
}

impl Command {
    pub fn new(action: impl Into<Action>) -> Self {
        Self {
            action: action.into(),
            data: Vec::new(),
            status_line: None,
        }
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn data(&self) -> &[Bytes] {
        &self.data
    }

    /// `None` until the status line has been read
    pub fn status_line(&self) -> Option<&Bytes> {
        self.status_line.as_ref()
    }

    /// Send the action and collect the full response
    pub async fn execute<T>(&mut self, transport: &mut T) -> Result<Completion, ProtocolError>
    where
        T: Transport + ?Sized,
    {
        debug!("Sending action: {}", self.action);
        transport.write(&self.action.encode()).await?;

        loop {
            let line = transport.read_line().await?;
            match line.strip_prefix(DATA_PREFIX) {
                Some(payload) => self.data.push(Bytes::copy_from_slice(trim_line_end(payload))),
                None => {
                    self.status_line = Some(Bytes::copy_from_slice(trim_end(&line)));
                    break;
                }
            }
        }

        let result = transport.read_line().await?;
        let result = String::from_utf8_lossy(trim_end(&result)).into_owned();
        self.handle_result(&result)
    }

    fn handle_result(&self, result: &str) -> Result<Completion, ProtocolError> {
        if result.is_empty() && self.action.is_quit() {
            debug!("Quit acknowledged with an empty result");
            return Ok(Completion::QuitEmpty);
        }

        match result {
            "ok" => Ok(Completion::Ok),
            "error" => {
                let message = if self.data.is_empty() {
                    NO_ERROR_MESSAGE.to_string()
                } else {
                    let joined: Vec<u8> = self.data.concat();
                    String::from_utf8_lossy(&joined).trim_end().to_string()
                };
                debug!("Action {} failed: {}", self.action, message);
                Err(ProtocolError::Command(message))
            }
            other => Err(ProtocolError::UnexpectedResult(other.to_string())),
        }
    }

    pub fn into_response(self, completion: Completion) -> Response {
        Response {
            data: self.data,
            status_line: self.status_line.unwrap_or_default(),
            completion,
        }
    }
}

/// Execute `action` on `transport` and return the response
pub async fn execute<T>(transport: &mut T, action: impl Into<Action>) -> Result<Response, ProtocolError>
where
    T: Transport + ?Sized,
{
    let mut command = Command::new(action);
    let completion = command.execute(transport).await?;
    Ok(command.into_response(completion))
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|b| *b != b'\n' && *b != b'\r')
        .map_or(0, |i| i + 1);
    &line[..end]
}

fn trim_end(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    &line[..end]
}
