//! Terminal models and the screen geometry they imply
//!
//! Coordinates handed to and returned from this module are 1-based, the
//! way the terminal's status area shows them.

use crate::EmulatorError;
use std::fmt;
use std::str::FromStr;

/// Every accepted model identifier, grouped by screen size
pub const MODEL_IDS: [&str; 20] = [
    "2", "3278-2", "3278-2-E", "3279-2", "3279-2-E",
    "3", "3278-3", "3278-3-E", "3279-3", "3279-3-E",
    "4", "3278-4", "3278-4-E", "3279-4", "3279-4-E",
    "5", "3278-5", "3278-5-E", "3279-5", "3279-5-E",
];

/// Screen size class shared by a model and its 3278/3279 variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelNumber {
    Two,
    Three,
    Four,
    Five,
}

impl ModelNumber {
    pub fn geometry(self) -> Geometry {
        match self {
            ModelNumber::Two => Geometry::new(24, 80),
            ModelNumber::Three => Geometry::new(32, 80),
            ModelNumber::Four => Geometry::new(43, 80),
            ModelNumber::Five => Geometry::new(27, 132),
        }
    }

    fn from_index(group: usize) -> Self {
        match group {
            0 => ModelNumber::Two,
            1 => ModelNumber::Three,
            2 => ModelNumber::Four,
            _ => ModelNumber::Five,
        }
    }
}

/// A validated model identifier.
///
/// The identifier is kept verbatim since it is passed on to the emulator
/// as its `model` resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Model {
    id: &'static str,
    number: ModelNumber,
}

impl Model {
    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn number(&self) -> ModelNumber {
        self.number
    }

    pub fn geometry(&self) -> Geometry {
        self.number.geometry()
    }

    /// Valid identifiers formatted for error messages
    pub fn valid_ids() -> String {
        let quoted: Vec<String> = MODEL_IDS.iter().map(|id| format!("'{id}'")).collect();
        match quoted.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
            _ => quoted.join(""),
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self {
            id: MODEL_IDS[0],
            number: ModelNumber::Two,
        }
    }
}

impl FromStr for Model {
    type Err = EmulatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MODEL_IDS
            .iter()
            .position(|id| *id == s)
            .map(|index| Model {
                id: MODEL_IDS[index],
                number: ModelNumber::from_index(index / 5),
            })
            .ok_or_else(|| EmulatorError::UnknownModel {
                model: s.to_string(),
                valid: Model::valid_ids(),
            })
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id)
    }
}

/// 1-based screen coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: u16,
    pub col: u16,
}

impl Position {
    pub fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

impl From<(u16, u16)> for Position {
    fn from((row, col): (u16, u16)) -> Self {
        Self { row, col }
    }
}

impl From<Position> for (u16, u16) {
    fn from(position: Position) -> Self {
        (position.row, position.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Rows and columns of the active screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
    pub rows: u16,
    pub columns: u16,
}

impl Geometry {
    pub const fn new(rows: u16, columns: u16) -> Self {
        Self { rows, columns }
    }

    pub fn cells(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Reject coordinates outside the screen.
    ///
    /// Row and column 0 do not exist on a 1-based screen and fail with the
    /// same axis errors as overflowing ones.
    pub fn check_limits(&self, row: u16, col: u16) -> Result<(), EmulatorError> {
        if row == 0 || row > self.rows {
            return Err(EmulatorError::YAxisLimit);
        }
        if col == 0 || col > self.columns {
            return Err(EmulatorError::XAxisLimit);
        }
        Ok(())
    }

    /// Limits for reading `length` characters starting at `(row, col)`
    pub fn check_read(&self, row: u16, col: u16, length: usize) -> Result<(), EmulatorError> {
        self.check_limits(row, col)?;
        if col as usize + length > self.columns as usize + 1 {
            return Err(EmulatorError::XAxisLimit);
        }
        Ok(())
    }

    /// Map a 1-based offset into the row-major screen text to its position
    pub fn position_of(&self, index: usize) -> Position {
        let columns = self.columns as usize;
        let row = (index + columns - 1) / columns;
        let col = match index % columns {
            0 => columns,
            remainder => remainder,
        };
        Position::new(row as u16, col as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("2", 24, 80)]
    #[test_case("3278-2-E", 24, 80)]
    #[test_case("3", 32, 80)]
    #[test_case("3279-3", 32, 80)]
    #[test_case("4", 43, 80)]
    #[test_case("3278-4", 43, 80)]
    #[test_case("5", 27, 132)]
    #[test_case("3279-5-E", 27, 132)]
    fn test_model_geometry(id: &str, rows: u16, columns: u16) {
        let model: Model = id.parse().unwrap();
        assert_eq!(model.id(), id);
        assert_eq!(model.geometry(), Geometry::new(rows, columns));
    }

    #[test]
    fn test_every_listed_id_parses() {
        for id in MODEL_IDS {
            assert_eq!(id.parse::<Model>().unwrap().to_string(), id);
        }
    }

    #[test_case("1")]
    #[test_case("6")]
    #[test_case("3278-6")]
    #[test_case("3279-2-e")]
    #[test_case("")]
    fn test_unknown_model(id: &str) {
        let err = id.parse::<Model>().unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Model should be one of '2', '3278-2'"));
        assert!(message.contains("'3279-5' or '3279-5-E'"));
        assert!(message.ends_with(&format!("but was '{id}'.")));
    }

    #[test]
    fn test_check_read_overflow() {
        let geometry = ModelNumber::Two.geometry();

        assert!(geometry.check_read(1, 71, 10).is_ok());
        assert!(geometry.check_read(1, 1, 80).is_ok());
        assert!(matches!(geometry.check_read(1, 77, 10), Err(EmulatorError::XAxisLimit)));
        assert!(matches!(geometry.check_read(25, 1, 1), Err(EmulatorError::YAxisLimit)));
    }

    #[test]
    fn test_position_of_row_edges() {
        let geometry = Geometry::new(24, 80);

        assert_eq!(geometry.position_of(1), Position::new(1, 1));
        assert_eq!(geometry.position_of(80), Position::new(1, 80));
        assert_eq!(geometry.position_of(81), Position::new(2, 1));
        assert_eq!(geometry.position_of(1920), Position::new(24, 80));
    }

    #[test]
    fn test_positions_order_like_tuples() {
        assert!(Position::new(2, 1) > Position::new(1, 80));
        assert!(Position::new(3, 5) < Position::new(3, 6));
    }

    fn geometries() -> impl Strategy<Value = Geometry> {
        prop_oneof![
            Just(ModelNumber::Two.geometry()),
            Just(ModelNumber::Three.geometry()),
            Just(ModelNumber::Four.geometry()),
            Just(ModelNumber::Five.geometry()),
        ]
    }

    proptest! {
        #[test]
        fn prop_in_bounds_is_accepted(geometry in geometries(), row in 1u16..=43, col in 1u16..=132) {
            prop_assume!(row <= geometry.rows && col <= geometry.columns);
            prop_assert!(geometry.check_limits(row, col).is_ok());
        }

        #[test]
        fn prop_row_overflow_is_y_axis(geometry in geometries(), extra in 1u16..100, col in 1u16..=80) {
            let result = geometry.check_limits(geometry.rows + extra, col);
            prop_assert!(matches!(result, Err(EmulatorError::YAxisLimit)));
        }

        #[test]
        fn prop_col_overflow_is_x_axis(geometry in geometries(), row in 1u16..=24, extra in 1u16..100) {
            let result = geometry.check_limits(row, geometry.columns + extra);
            prop_assert!(matches!(result, Err(EmulatorError::XAxisLimit)));
        }

        #[test]
        fn prop_position_of_inverts_row_major_offset(geometry in geometries(), offset in 0usize..3564) {
            prop_assume!(offset < geometry.cells());
            let position = geometry.position_of(offset + 1);
            let columns = geometry.columns as usize;
            prop_assert_eq!(position.row as usize, offset / columns + 1);
            prop_assert_eq!(position.col as usize, offset % columns + 1);
        }
    }
}
