use core::fmt;

use crate::{rules, Color, Piece, PieceKind, Position, SquareSet};

/// The 64 squares of a chessboard and what stands on them
///
/// This knows nothing about whose turn it is, castling or en passant; it only answers questions
/// about piece placement, including which squares a side attacks.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FenPlacementError {
    #[error("expected 8 ranks of pieces, found {0}")]
    RankCount(usize),
    #[error("rank {rank} describes {squares} squares instead of 8")]
    RankLength { rank: u8, squares: usize },
    #[error("`{0}` is not a piece")]
    UnknownPiece(char),
}

impl Board {
    /// A board with no pieces on it
    pub const EMPTY: Self = Self {
        squares: [[None; 8]; 8],
    };

    /// The pieces at the start of a chess game
    pub const STANDARD: Self = {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut squares = [[None; 8]; 8];
        let mut column = 0;
        while column < 8 {
            squares[0][column] = Some(Piece::new(BACK_RANK[column], Color::Black));
            squares[1][column] = Some(Piece::new(PieceKind::Pawn, Color::Black));
            squares[6][column] = Some(Piece::new(PieceKind::Pawn, Color::White));
            squares[7][column] = Some(Piece::new(BACK_RANK[column], Color::White));
            column += 1;
        }
        Self { squares }
    };

    /// Find the piece, if any, at the given square
    pub const fn get(&self, position: Position) -> Option<Piece> {
        self.squares[position.row() as usize][position.column() as usize]
    }

    /// Put a piece on the square, returning whatever was there before
    pub fn place(&mut self, position: Position, piece: Piece) -> Option<Piece> {
        self.slot(position).replace(piece)
    }

    /// Empty the square, returning whatever was there
    pub fn remove(&mut self, position: Position) -> Option<Piece> {
        self.slot(position).take()
    }

    fn slot(&mut self, position: Position) -> &mut Option<Piece> {
        &mut self.squares[position.row() as usize][position.column() as usize]
    }

    /// Every occupied square and its piece, row by row from a8
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(|position| Some((position, self.get(position)?)))
    }

    /// The occupied squares holding pieces of the given color
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    /// The set of squares holding pieces of the given color
    pub fn occupancy(&self, color: Color) -> SquareSet {
        self.pieces_of(color).map(|(position, _)| position).collect()
    }

    /// Get the square on which the given player's King resides
    ///
    /// Returns the first one found if, in a hand-built position, there are several.
    pub fn king_position(&self, color: Color) -> Option<Position> {
        let king = Piece::new(PieceKind::King, color);
        self.pieces()
            .find_map(|(position, piece)| (piece == king).then_some(position))
    }

    /// Returns the set of all squares attacked by the given player
    ///
    /// A square is attacked if one of the player's pieces could capture something standing
    /// there. Squares holding the player's own pieces count, since those pieces are defended, and
    /// pawns only attack diagonally.
    pub fn attacked_squares(&self, by: Color) -> SquareSet {
        self.pieces_of(by)
            .map(|(from, piece)| rules::attacks(self, from, piece))
            .fold(SquareSet::empty(), SquareSet::union)
    }

    /// Returns `true` if any piece of `by` attacks the given square
    pub fn is_square_attacked(&self, target: Position, by: Color) -> bool {
        self.pieces_of(by)
            .any(|(from, piece)| rules::attacks(self, from, piece).contains(target))
    }

    /// Parse the piece placement field of a FEN string
    ///
    /// ```
    /// use board::Board;
    /// let board = Board::from_fen_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
    /// assert_eq!(board, Board::STANDARD);
    /// ```
    pub fn from_fen_placement(placement: &str) -> Result<Self, FenPlacementError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenPlacementError::RankCount(ranks.len()));
        }
        let mut board = Self::EMPTY;
        for (row, rank) in ranks.into_iter().enumerate() {
            let mut column = 0;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    column += skip as usize;
                    continue;
                }
                let piece = Piece::from_fen_letter(c).ok_or(FenPlacementError::UnknownPiece(c))?;
                if column < 8 {
                    board.squares[row][column] = Some(piece);
                }
                column += 1;
            }
            if column != 8 {
                return Err(FenPlacementError::RankLength {
                    rank: 8 - row as u8,
                    squares: column,
                });
            }
        }
        Ok(board)
    }

    /// Write the piece placement field of a FEN string
    pub fn to_fen_placement(&self) -> String {
        self.squares
            .iter()
            .map(|row| {
                let mut rank = String::with_capacity(8);
                let mut empty_run = 0;
                for square in row {
                    match square {
                        Some(piece) => {
                            if empty_run > 0 {
                                rank.push_str(&empty_run.to_string());
                                empty_run = 0;
                            }
                            rank.push(piece.fen_letter());
                        }
                        None => empty_run += 1,
                    }
                }
                if empty_run > 0 {
                    rank.push_str(&empty_run.to_string());
                }
                rank
            })
            .collect::<Vec<String>>()
            .join("/")
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Board")
            .field(&self.to_fen_placement())
            .finish()
    }
}

/// Draw the board as text, from White's side
///
/// ```
/// use board::Board;
/// let drawing = Board::STANDARD.to_string();
/// assert!(drawing.starts_with("8 r n b q k b n r\n7 p p p p p p p p\n6 . . . . . . . .\n"));
/// assert!(drawing.ends_with("1 R N B Q K B N R\n  a b c d e f g h\n"));
/// ```
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, squares) in self.squares.iter().enumerate() {
            write!(f, "{}", 8 - row)?;
            for square in squares {
                match square {
                    Some(piece) => write!(f, " {piece}")?,
                    None => f.write_str(" .")?,
                }
            }
            f.write_str("\n")?;
        }
        f.write_str("  a b c d e f g h\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(name: &str) -> Position {
        name.parse().unwrap()
    }

    #[test]
    fn test_place_and_remove() {
        let mut board = Board::EMPTY;
        let knight = Piece::new(PieceKind::Knight, Color::Black);
        assert_eq!(board.place(square("c6"), knight), None);
        assert_eq!(board.get(square("c6")), Some(knight));
        assert_eq!(board.pieces().count(), 1);
        assert_eq!(board.remove(square("c6")), Some(knight));
        assert_eq!(board.get(square("c6")), None);
        assert_eq!(board, Board::EMPTY);
    }

    #[test]
    fn test_standard_layout() {
        let board = Board::STANDARD;
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board.king_position(Color::White), Some(Position::E1));
        assert_eq!(board.king_position(Color::Black), Some(Position::E8));
        assert_eq!(
            board.get(Position::D1),
            Some(Piece::new(PieceKind::Queen, Color::White))
        );
        assert_eq!(board.occupancy(Color::White).len(), 16);
    }

    #[test]
    fn test_opening_attacks() {
        let board = Board::STANDARD;
        // Pawns cover the third rank and nothing reaches the fourth
        for column in 0..8 {
            assert!(board.is_square_attacked(Position::at(5, column), Color::White));
            assert!(!board.is_square_attacked(Position::at(4, column), Color::White));
            assert!(board.is_square_attacked(Position::at(2, column), Color::Black));
        }
        assert_eq!(board.attacked_squares(Color::White).len(), 22);
    }

    #[test]
    fn test_pawn_pushes_are_not_attacks() {
        let mut board = Board::EMPTY;
        board.place(square("e4"), Piece::new(PieceKind::Pawn, Color::White));
        assert!(!board.is_square_attacked(square("e5"), Color::White));
        assert!(board.is_square_attacked(square("d5"), Color::White));
        assert!(board.is_square_attacked(square("f5"), Color::White));
        assert!(!board.is_square_attacked(square("d3"), Color::White));
    }

    #[test]
    fn test_sliding_attacks_stop_at_blockers() {
        let board = Board::from_fen_placement("8/8/8/3p4/8/8/8/3R4").unwrap();
        assert!(board.is_square_attacked(square("d4"), Color::White));
        assert!(board.is_square_attacked(square("d5"), Color::White));
        assert!(!board.is_square_attacked(square("d6"), Color::White));
        assert!(board.is_square_attacked(square("h1"), Color::White));
    }

    #[test]
    fn test_fen_placement_round_trip() {
        for placement in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8",
            "8/8/8/8/8/8/8/8",
        ] {
            let board = Board::from_fen_placement(placement).unwrap();
            assert_eq!(board.to_fen_placement(), placement);
        }
    }

    #[test]
    fn test_fen_placement_errors() {
        assert_eq!(
            Board::from_fen_placement("8/8/8"),
            Err(FenPlacementError::RankCount(3))
        );
        assert_eq!(
            Board::from_fen_placement("8/8/8/8/8/8/8/7"),
            Err(FenPlacementError::RankLength { rank: 1, squares: 7 })
        );
        assert_eq!(
            Board::from_fen_placement("8/8/8/8/8/8/8/7x"),
            Err(FenPlacementError::UnknownPiece('x'))
        );
    }
}
