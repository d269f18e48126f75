//! The 12-field status line that follows every action

use std::fmt;

/// Snapshot of the emulator after one action.
///
/// Each field is `None` when its token was empty, so an all-`None` status
/// means no status line was received at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    line: String,
    /// `U` unlocked, `L` locked, `E` error
    pub keyboard: Option<String>,
    /// `F` formatted, `U` unformatted
    pub screen_format: Option<String>,
    /// `P` protected, `U` unprotected
    pub field_protection: Option<String>,
    /// `C(host)` when connected, `N` when not
    pub connection_state: Option<String>,
    /// `I` 3270, `L` NVT line, `C` NVT character, `P` unnegotiated, `N` not connected
    pub emulator_mode: Option<String>,
    pub model_number: Option<String>,
    pub row_number: Option<String>,
    pub col_number: Option<String>,
    /// 0-based
    pub cursor_row: Option<String>,
    /// 0-based
    pub cursor_col: Option<String>,
    pub window_id: Option<String>,
    /// Seconds spent on the action, `-` if unknown
    pub exec_time: Option<String>,
}

impl Status {
    pub const FIELD_COUNT: usize = 12;

    /// Split a raw status line into its positional fields
    pub fn parse(line: &[u8]) -> Self {
        let text = String::from_utf8_lossy(line);
        let mut parts = text.split(' ').map(|token| {
            if token.is_empty() {
                None
            } else {
                Some(token.to_string())
            }
        });
        let mut next = || parts.next().flatten();

        Self {
            keyboard: next(),
            screen_format: next(),
            field_protection: next(),
            connection_state: next(),
            emulator_mode: next(),
            model_number: next(),
            row_number: next(),
            col_number: next(),
            cursor_row: next(),
            cursor_col: next(),
            window_id: next(),
            exec_time: next(),
            line: text.trim_end().to_string(),
        }
    }

    /// The raw line, trailing whitespace removed
    pub fn as_str(&self) -> &str {
        &self.line
    }

    pub fn fields(&self) -> [Option<&str>; Self::FIELD_COUNT] {
        [
            self.keyboard.as_deref(),
            self.screen_format.as_deref(),
            self.field_protection.as_deref(),
            self.connection_state.as_deref(),
            self.emulator_mode.as_deref(),
            self.model_number.as_deref(),
            self.row_number.as_deref(),
            self.col_number.as_deref(),
            self.cursor_row.as_deref(),
            self.cursor_col.as_deref(),
            self.window_id.as_deref(),
            self.exec_time.as_deref(),
        ]
    }

    pub fn keyboard_unlocked(&self) -> bool {
        self.keyboard.as_deref() == Some("U")
    }

    /// Network-connected to a host, as opposed to a live but idle emulator
    pub fn is_connected(&self) -> bool {
        self.connection_state
            .as_deref()
            .is_some_and(|state| state.starts_with("C("))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "STATUS: {}", self.line)
    }
}
