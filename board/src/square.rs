use core::{fmt, str::FromStr};

/// A square on the board
///
/// Stored as a `(row, column)` pair, each on `0..8`. Row 0 is the far side of the board from
/// White (rank 8) and column 0 is the a-file, so `e2` is row 6, column 4.
///
/// Every value of this type is on the board; anything else is rejected with
/// [`InvalidPosition`] when it is built.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    row: u8,
    column: u8,
}

/// A position which isn't on the board
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPosition {
    #[error("({row}, {column}) is not on the board")]
    OutOfBounds { row: i32, column: i32 },
    #[error("`{0}` does not name a square")]
    Unparseable(String),
}

impl Position {
    pub const A1: Self = Self::at(7, 0);
    pub const B1: Self = Self::at(7, 1);
    pub const C1: Self = Self::at(7, 2);
    pub const D1: Self = Self::at(7, 3);
    pub const E1: Self = Self::at(7, 4);
    pub const F1: Self = Self::at(7, 5);
    pub const G1: Self = Self::at(7, 6);
    pub const H1: Self = Self::at(7, 7);
    pub const A8: Self = Self::at(0, 0);
    pub const B8: Self = Self::at(0, 1);
    pub const C8: Self = Self::at(0, 2);
    pub const D8: Self = Self::at(0, 3);
    pub const E8: Self = Self::at(0, 4);
    pub const F8: Self = Self::at(0, 5);
    pub const G8: Self = Self::at(0, 6);
    pub const H8: Self = Self::at(0, 7);

    /// Build a position from a row and column, failing if either is off the board
    ///
    /// ```
    /// use board::Position;
    /// assert_eq!(Position::new(6, 4).unwrap().to_string(), "e2");
    /// assert!(Position::new(8, 0).is_err());
    /// assert!(Position::new(0, -1).is_err());
    /// ```
    pub fn new(row: i32, column: i32) -> Result<Self, InvalidPosition> {
        if (0..8).contains(&row) && (0..8).contains(&column) {
            Ok(Self::at(row as u8, column as u8))
        } else {
            Err(InvalidPosition::OutOfBounds { row, column })
        }
    }

    /// Build a position from coordinates already known to be on the board
    ///
    /// Panics if they aren't, which in a `const` is a compile error.
    pub const fn at(row: u8, column: u8) -> Self {
        assert!(row < 8 && column < 8, "position off the board");
        Self { row, column }
    }

    pub const fn row(self) -> u8 {
        self.row
    }

    pub const fn column(self) -> u8 {
        self.column
    }

    /// The letter of the file this square is on, `'a'..='h'`
    pub const fn file(self) -> char {
        (b'a' + self.column) as char
    }

    /// The number of the rank this square is on, `1..=8`
    pub const fn rank(self) -> u8 {
        8 - self.row
    }

    /// Index into a row-major array of the 64 squares
    pub const fn index(self) -> usize {
        (self.row * 8 + self.column) as usize
    }

    /// Inverse of [`Self::index`]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 64 {
            Some(Self::at((index / 8) as u8, (index % 8) as u8))
        } else {
            None
        }
    }

    /// Offset the given number of rows and columns, if the result is still on the board.
    ///
    /// ```rust
    /// use board::Position;
    /// let d2: Position = "d2".parse().unwrap();
    /// assert_eq!(Position::A1.offset(-1, 3), Some(d2));
    /// assert_eq!(d2.offset(1, -3), Some(Position::A1));
    /// assert_eq!(d2.offset(0, 0), Some(d2));
    /// assert_eq!(Position::D1.offset(1, 0), None);
    /// assert_eq!(Position::D8.offset(-1, 0), None);
    /// assert_eq!(Position::A1.offset(0, -1), None);
    /// assert_eq!(Position::H1.offset(0, 1), None);
    /// ```
    pub const fn offset(self, rows: i8, columns: i8) -> Option<Self> {
        let row = self.row as i8 + rows;
        let column = self.column as i8 + columns;
        if 0 <= row && row < 8 && 0 <= column && column < 8 {
            Some(Self::at(row as u8, column as u8))
        } else {
            None
        }
    }

    /// An iterator over all squares on the board, row by row from a8
    ///
    /// ```
    /// assert_eq!(board::Position::all().count(), 64);
    /// ```
    pub fn all() -> impl Iterator<Item = Self> {
        (0..64).filter_map(Self::from_index)
    }
}

impl TryFrom<(i32, i32)> for Position {
    type Error = InvalidPosition;

    fn try_from((row, column): (i32, i32)) -> Result<Self, Self::Error> {
        Self::new(row, column)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("row", &self.row)
            .field("column", &self.column)
            .field("readable", &format_args!("{self}"))
            .finish()
    }
}
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}
impl FromStr for Position {
    type Err = InvalidPosition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparseable = || InvalidPosition::Unparseable(s.to_string());
        let &[file, rank] = s.as_bytes() else {
            return Err(unparseable());
        };
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(unparseable());
        }
        Ok(Self::at(b'8' - rank, file - b'a'))
    }
}
