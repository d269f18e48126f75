//! Shape of position results

use mf3270_emulator::Position;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// How keywords hand back screen positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultMode {
    /// `(ypos, xpos)`
    #[default]
    AsTuple,
    /// `{'ypos': y, 'xpos': x}`
    AsDict,
}

impl FromStr for ResultMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['_', ' ', '-'], "").as_str() {
            "astuple" | "tuple" => Ok(ResultMode::AsTuple),
            "asdict" | "dict" => Ok(ResultMode::AsDict),
            _ => Err(format!("unknown result mode '{s}'")),
        }
    }
}

impl ResultMode {
    /// Parse `mode`, falling back to [`ResultMode::AsTuple`] with a warning
    pub fn parse_or_default(mode: &str) -> Self {
        mode.parse().unwrap_or_else(|_| {
            warn!(
                "\"mode\" should be either \"AsDict\" or \"AsTuple\", got \"{}\". \
                 Returning the result as tuple",
                mode
            );
            ResultMode::AsTuple
        })
    }
}

/// A position shaped by a [`ResultMode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionValue {
    Tuple(u16, u16),
    Dict { ypos: u16, xpos: u16 },
}

impl PositionValue {
    pub fn new(position: Position, mode: ResultMode) -> Self {
        match mode {
            ResultMode::AsTuple => PositionValue::Tuple(position.row, position.col),
            ResultMode::AsDict => PositionValue::Dict {
                ypos: position.row,
                xpos: position.col,
            },
        }
    }

    pub fn position(&self) -> Position {
        match *self {
            PositionValue::Tuple(row, col) => Position::new(row, col),
            PositionValue::Dict { ypos, xpos } => Position::new(ypos, xpos),
        }
    }
}

impl fmt::Display for PositionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionValue::Tuple(row, col) => write!(f, "({row}, {col})"),
            PositionValue::Dict { ypos, xpos } => write!(f, "{{'ypos': {ypos}, 'xpos': {xpos}}}"),
        }
    }
}

pub fn prepare_positions(positions: Vec<Position>, mode: ResultMode) -> Vec<PositionValue> {
    positions
        .into_iter()
        .map(|position| PositionValue::new(position, mode))
        .collect()
}
