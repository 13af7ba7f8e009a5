use core::fmt;

use board::{Color, MoveRequest, Piece, PieceKind, Position};

/// What makes a move special, if anything
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    CastleKingside,
    CastleQueenside,
    /// A pawn capturing a pawn which just double-stepped past it
    EnPassant,
    Promotion,
}

/// All the details of a move figured out
///
/// For castles, `from` and `to` are the king's squares; the rook's follow from
/// [`CastlingRights::rook_squares`](crate::CastlingRights::rook_squares).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    /// The piece which moves (for a promotion, the pawn)
    pub piece: Piece,
    /// The piece removed from the board, which for en passant isn't on `to`
    pub captured: Option<Piece>,
    pub promotion: Option<PieceKind>,
    pub kind: MoveKind,
}

impl Move {
    /// The king's half of a castle
    pub const fn castle(color: Color, kingside: bool) -> Self {
        let row = color.home_row();
        Self {
            from: Position::at(row, 4),
            to: Position::at(row, if kingside { 6 } else { 2 }),
            piece: Piece::new(PieceKind::King, color),
            captured: None,
            promotion: None,
            kind: if kingside {
                MoveKind::CastleKingside
            } else {
                MoveKind::CastleQueenside
            },
        }
    }

    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    pub const fn is_castle(&self) -> bool {
        matches!(self.kind, MoveKind::CastleKingside | MoveKind::CastleQueenside)
    }

    /// The same move with the promotion piece chosen
    #[must_use]
    pub const fn with_promotion(self, promotion: PieceKind) -> Self {
        Self {
            promotion: Some(promotion),
            ..self
        }
    }

    /// Returns the square against which the opponent may respond with an en passant
    ///
    /// This is `None` unless this move is a pawn double-step, in which case it's the square the
    /// pawn skipped over.
    pub fn en_passant_target(&self) -> Option<Position> {
        if self.piece.kind != PieceKind::Pawn || self.from.row().abs_diff(self.to.row()) != 2 {
            return None;
        }
        Some(Position::at(
            (self.from.row() + self.to.row()) / 2,
            self.from.column(),
        ))
    }
}

/// Long algebraic notation, like `Ng1-f3`, `e5xd6` or `e7-e8=Q`
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MoveKind::CastleKingside => return f.write_str("O-O"),
            MoveKind::CastleQueenside => return f.write_str("O-O-O"),
            _ => {}
        }
        if self.piece.kind != PieceKind::Pawn {
            write!(f, "{}", self.piece.kind.fen_letter())?;
        }
        let separator = if self.is_capture() { 'x' } else { '-' };
        write!(f, "{}{separator}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "={}", promotion.fen_letter())?;
        }
        Ok(())
    }
}

impl From<Move> for MoveRequest {
    fn from(value: Move) -> Self {
        Self {
            from: value.from,
            to: value.to,
            promotion: value.promotion,
        }
    }
}
