use board::{Color, Piece, PieceKind, Position};

bitflags::bitflags! {
    /// Which castles are allowed (the king and rook haven't moved yet)
    ///
    /// These castles aren't necessarily legal right now, as they may be blocked by intervening
    /// pieces and/or checks.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CastlingRights: u8 {
        const WhiteKingside = 0b0000_0001;
        const WhiteQueenside = 0b0000_0010;
        /// A mask for whether white can castle in either direction
        const White = 0b0000_0011;
        const BlackKingside = 0b0000_0100;
        const BlackQueenside = 0b0000_1000;
        /// A mask for whether black can castle in either direction
        const Black = 0b0000_1100;
    }
}

impl CastlingRights {
    /// The single right for one side castling in one direction
    pub const fn for_side(color: Color, kingside: bool) -> Self {
        match (kingside, color) {
            (true, Color::White) => Self::WhiteKingside,
            (false, Color::White) => Self::WhiteQueenside,
            (true, Color::Black) => Self::BlackKingside,
            (false, Color::Black) => Self::BlackQueenside,
        }
    }

    /// Update the rights according to `piece` moving from `source` to `target`
    ///
    /// Once lost, a right never comes back: moving the king loses both of its side's rights,
    /// moving a rook off its corner loses that corner's right, and anything landing on a corner
    /// (capturing the rook there) loses that corner's right too.
    ///
    /// ```
    /// use board::{Color, Piece, PieceKind, Position};
    /// use game::CastlingRights;
    ///
    /// let king = Piece::new(PieceKind::King, Color::White);
    /// let rights = CastlingRights::all().after_move(king, Position::E1, Position::F1);
    /// assert_eq!(rights, CastlingRights::Black);
    /// ```
    #[must_use]
    pub fn after_move(self, piece: Piece, source: Position, target: Position) -> Self {
        // The piece being moved can't castle anymore
        let rights = match piece.kind {
            PieceKind::King => {
                self & !match piece.color {
                    Color::White => Self::White,
                    Color::Black => Self::Black,
                }
            }
            PieceKind::Rook => self & !Self::for_corner(source),
            _ => self,
        };
        rights & !Self::for_corner(target)
    }

    /// The right which depends on a rook standing on the given square, if it's a corner
    fn for_corner(square: Position) -> Self {
        match square {
            Position::A1 => Self::WhiteQueenside,
            Position::H1 => Self::WhiteKingside,
            Position::A8 => Self::BlackQueenside,
            Position::H8 => Self::BlackKingside,
            _ => Self::empty(),
        }
    }

    /// Where the rook starts and ends when castling
    pub const fn rook_squares(color: Color, kingside: bool) -> (Position, Position) {
        let row = color.home_row();
        if kingside {
            (Position::at(row, 7), Position::at(row, 5))
        } else {
            (Position::at(row, 0), Position::at(row, 3))
        }
    }

    /// Display the rights in FEN format
    pub fn to_fen(self) -> String {
        let mut options = String::with_capacity(4);
        for (right, letter) in [
            (Self::WhiteKingside, 'K'),
            (Self::WhiteQueenside, 'Q'),
            (Self::BlackKingside, 'k'),
            (Self::BlackQueenside, 'q'),
        ] {
            if self.contains(right) {
                options.push(letter);
            }
        }
        if options.is_empty() {
            options.push('-');
        }
        options
    }

    /// Parse the castling field of a FEN string
    ///
    /// Returns `None` if the field holds anything other than `-` or the letters `KQkq`, each at
    /// most once and in that order.
    pub fn from_fen(mut fen: &str) -> Option<Self> {
        let mut rights = Self::empty();
        if fen == "-" {
            return Some(rights);
        }
        for (right, letter) in [
            (Self::WhiteKingside, "K"),
            (Self::WhiteQueenside, "Q"),
            (Self::BlackKingside, "k"),
            (Self::BlackQueenside, "q"),
        ] {
            if let Some(rest) = fen.strip_prefix(letter) {
                rights |= right;
                fen = rest;
            }
        }
        (fen.is_empty() && !rights.is_empty()).then_some(rights)
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rook_moves_lose_one_side() {
        let rook = Piece::new(PieceKind::Rook, Color::Black);
        let h5: Position = "h5".parse().unwrap();
        let rights = CastlingRights::all().after_move(rook, Position::H8, h5);
        assert_eq!(
            rights,
            CastlingRights::White | CastlingRights::BlackQueenside
        );
        // A rook that isn't on its corner doesn't affect anything
        let a5: Position = "a5".parse().unwrap();
        let a4: Position = "a4".parse().unwrap();
        assert_eq!(rights.after_move(rook, a5, a4), rights);
    }

    #[test]
    fn test_capturing_on_corner_loses_right() {
        let bishop = Piece::new(PieceKind::Bishop, Color::Black);
        let b2: Position = "b2".parse().unwrap();
        let rights = CastlingRights::all().after_move(bishop, b2, Position::A1);
        assert!(!rights.contains(CastlingRights::WhiteQueenside));
        assert!(rights.contains(CastlingRights::WhiteKingside));
        assert!(rights.contains(CastlingRights::Black));
    }

    #[test]
    fn test_rights_never_return() {
        let king = Piece::new(PieceKind::King, Color::White);
        let rights = CastlingRights::all()
            .after_move(king, Position::E1, Position::F1)
            .after_move(king, Position::F1, Position::E1);
        assert!(!rights.intersects(CastlingRights::White));
    }

    #[test]
    fn test_fen_round_trip() {
        for fen in ["KQkq", "KQ", "Kq", "k", "-"] {
            assert_eq!(CastlingRights::from_fen(fen).unwrap().to_fen(), fen);
        }
        for bad in ["", "qk", "KK", "X", "KQkq-"] {
            assert_eq!(CastlingRights::from_fen(bad), None, "{bad}");
        }
    }

    #[test]
    fn test_rook_squares() {
        assert_eq!(
            CastlingRights::rook_squares(Color::White, true),
            (Position::H1, Position::F1)
        );
        assert_eq!(
            CastlingRights::rook_squares(Color::Black, false),
            (Position::A8, Position::D8)
        );
    }
}
