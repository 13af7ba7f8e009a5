use core::{
    fmt,
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not},
};

use crate::Position;

/// A set of squares, one bit per square (which is equivalent to a `u64`)
///
/// Bit `n` is the square with [`Position::index`] `n`.
#[repr(transparent)]
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct SquareSet(pub u64);

impl SquareSet {
    /// Create an empty set
    pub const fn empty() -> Self {
        Self(0)
    }

    /// The set holding only the given square
    pub const fn from_position(position: Position) -> Self {
        Self(1 << position.index())
    }

    /// Query if the set is empty
    ///
    /// ```
    /// use board::SquareSet;
    /// assert!(SquareSet::empty().is_empty());
    /// assert!(!SquareSet(0x01).is_empty());
    /// ```
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the given square is in the set
    pub const fn contains(self, position: Position) -> bool {
        self.0 & (1 << position.index()) != 0
    }

    /// Returns true if `self & other` is not empty
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns true if `self & other == other`
    pub const fn is_superset(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Add a square to the set
    pub fn insert(&mut self, position: Position) {
        *self |= position;
    }

    /// Returns the number of squares in the set
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Produce an iterator of all squares in the set, in [`Position::index`] order
    ///
    /// ```
    /// use board::{Position, SquareSet};
    /// assert_eq!(SquareSet::empty().iter().count(), 0);
    /// assert_eq!(
    ///     (SquareSet::from(Position::H1) | Position::A8).iter().collect::<Vec<_>>(),
    ///     vec![Position::A8, Position::H1],
    /// );
    /// assert_eq!(SquareSet(!0).iter().count(), 64);
    /// ```
    pub fn iter(self) -> impl Iterator<Item = Position> {
        (0..64)
            .filter(move |&index| self.0 & (1 << index) != 0)
            .filter_map(Position::from_index)
    }
}

/// Bit-wise operations for combining things
///
/// These are `const` equivalents to `&`, `|`, `!`
impl SquareSet {
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub const fn negation(self) -> Self {
        Self(!self.0)
    }
}

impl BitOr<SquareSet> for SquareSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}
impl BitOr<Position> for SquareSet {
    type Output = Self;

    fn bitor(self, rhs: Position) -> Self::Output {
        self.union(Self::from(rhs))
    }
}
impl<T> BitOrAssign<T> for SquareSet
where
    SquareSet: BitOr<T, Output = SquareSet>,
{
    fn bitor_assign(&mut self, rhs: T) {
        *self = *self | rhs
    }
}
impl BitAnd<SquareSet> for SquareSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(rhs)
    }
}
impl<T> BitAndAssign<T> for SquareSet
where
    SquareSet: BitAnd<T, Output = SquareSet>,
{
    fn bitand_assign(&mut self, rhs: T) {
        *self = *self & rhs
    }
}
impl Not for SquareSet {
    type Output = Self;
    fn not(self) -> Self::Output {
        self.negation()
    }
}

impl From<Position> for SquareSet {
    fn from(value: Position) -> Self {
        Self::from_position(value)
    }
}
impl FromIterator<Position> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, position| set | position)
    }
}
impl fmt::Debug for SquareSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().map(|position| position.to_string()))
            .finish()
    }
}
/// Display as a TUI version of a grid, rank 8 at the top
///
/// ```
/// use board::{Position, SquareSet};
///
/// assert_eq!(
///     SquareSet::from(Position::A1).to_string(),
///     "        \n        \n        \n        \n        \n        \n        \nX       \n",
/// );
/// assert_eq!(
///     SquareSet::from(Position::A8).to_string(),
///     "X       \n        \n        \n        \n        \n        \n        \n        \n",
/// );
/// assert_eq!(
///     SquareSet::from(Position::H1).to_string(),
///     "        \n        \n        \n        \n        \n        \n        \n       X\n",
/// );
/// ```
impl fmt::Display for SquareSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for row in 0..8 {
            for column in 0..8 {
                f.write_char(if self.contains(Position::at(row, column)) {
                    'X'
                } else {
                    ' '
                })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}
