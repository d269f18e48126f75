//! Emulator actions in x3270 action-call syntax, e.g. `MoveCursor(3, 9)`

use bytes::Bytes;
use std::fmt;
use std::time::Duration;

/// One action line, without its terminating newline
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Action(Bytes);

impl Action {
    pub const QUIT: &'static [u8] = b"Quit";

    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Only the literal `Quit` action may be answered with an empty result
    pub fn is_quit(&self) -> bool {
        self.0.as_ref() == Self::QUIT
    }

    /// Wire form: the action bytes followed by a single newline
    pub fn encode(&self) -> Vec<u8> {
        let mut line = Vec::with_capacity(self.0.len() + 1);
        line.extend_from_slice(&self.0);
        line.push(b'\n');
        line
    }

    pub fn quit() -> Self {
        Self::new(Self::QUIT)
    }

    /// A no-op that still refreshes the status line
    pub fn ignore() -> Self {
        Self::new(&b"ignore"[..])
    }

    pub fn enter() -> Self {
        Self::new(&b"Enter"[..])
    }

    pub fn tab() -> Self {
        Self::new(&b"Tab"[..])
    }

    pub fn back_tab() -> Self {
        Self::new(&b"BackTab"[..])
    }

    pub fn delete() -> Self {
        Self::new(&b"Delete"[..])
    }

    pub fn delete_field() -> Self {
        Self::new(&b"DeleteField"[..])
    }

    pub fn disconnect() -> Self {
        Self::new(&b"Disconnect"[..])
    }

    pub fn query_cursor() -> Self {
        Self::new(&b"Query(Cursor)"[..])
    }

    pub fn connect(host: &str) -> Self {
        Self::from(format!("Connect({host})"))
    }

    /// Cursor move; coordinates are 0-based
    pub fn move_cursor(row: u16, col: u16) -> Self {
        Self::from(format!("MoveCursor({row}, {col})"))
    }

    /// Screen read of `length` characters; coordinates are 0-based
    pub fn ascii(row: u16, col: u16, length: usize) -> Self {
        Self::from(format!("ascii({row},{col},{length})"))
    }

    /// Type `text` at the cursor. Embedded double quotes are escaped.
    pub fn string(text: &str) -> Self {
        Self::from(format!("String(\"{}\")", text.replace('"', "\\\"")))
    }

    pub fn pf(key: impl fmt::Display) -> Self {
        Self::from(format!("PF({key})"))
    }

    /// Block until the host positions the cursor on an input field
    pub fn wait_input_field(timeout: Duration) -> Self {
        Self::from(format!("Wait({}, InputField)", format_seconds(timeout)))
    }

    /// Render the current screen as HTML into `path`
    pub fn print_text_html(path: &str) -> Self {
        Self::from(format!("PrintText(html,file,{path})"))
    }
}

fn format_seconds(duration: Duration) -> String {
    if duration.subsec_nanos() == 0 {
        duration.as_secs().to_string()
    } else {
        duration.as_secs_f64().to_string()
    }
}

impl From<&str> for Action {
    fn from(value: &str) -> Self {
        Self(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl From<String> for Action {
    fn from(value: String) -> Self {
        Self(Bytes::from(value))
    }
}

impl From<Vec<u8>> for Action {
    fn from(value: Vec<u8>) -> Self {
        Self(Bytes::from(value))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}
