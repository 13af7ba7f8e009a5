use board::{rules, Board, Color, Piece, PieceKind, Position, SquareSet};

use crate::{CastlingRights, GameStatus, Move, MoveKind};

/// Everything about a position needed to decide which moves are legal in it
///
/// This is a plain value: copying it is how a caller gets a position to look at (or search
/// through) without being able to change the game it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Snapshot {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    /// The square a pawn may capture onto en passant, only set right after a double-step
    pub(crate) en_passant: Option<Position>,
}

impl Snapshot {
    /// The position at the start of a game
    pub const STANDARD: Self = Self {
        board: Board::STANDARD,
        side_to_move: Color::White,
        castling: CastlingRights::all(),
        en_passant: None,
    };

    pub const fn board(&self) -> &Board {
        &self.board
    }

    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub const fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub const fn en_passant_target(&self) -> Option<Position> {
        self.en_passant
    }

    /// Every move the piece on `from` could make, ignoring whether it leaves its king attacked
    ///
    /// Empty unless `from` holds a piece of the side to move.
    pub fn pseudo_legal_moves_from(&self, from: Position) -> Vec<Move> {
        let Some(piece) = self.board.get(from) else {
            return Vec::new();
        };
        if piece.color != self.side_to_move {
            return Vec::new();
        }
        let mut moves: Vec<Move> = rules::destinations(&self.board, from, self.en_passant)
            .iter()
            .map(|to| self.describe(from, to, piece))
            .collect();
        if piece.kind == PieceKind::King {
            moves.extend(
                [true, false]
                    .into_iter()
                    .filter(|&kingside| self.can_castle(kingside))
                    .map(|kingside| Move::castle(piece.color, kingside)),
            );
        }
        moves
    }

    /// Figure out the details of a move which the movement rules allow
    fn describe(&self, from: Position, to: Position, piece: Piece) -> Move {
        let mut mv = Move {
            from,
            to,
            piece,
            captured: self.board.get(to),
            promotion: None,
            kind: MoveKind::Normal,
        };
        if piece.kind == PieceKind::Pawn
            && from.column() != to.column()
            && mv.captured.is_none()
            && self.en_passant == Some(to)
        {
            // The captured pawn passed over `to`, so it's beside the capturing one
            mv.captured = self.board.get(Position::at(from.row(), to.column()));
            mv.kind = MoveKind::EnPassant;
        } else if rules::is_promotion(piece, to) {
            mv.kind = MoveKind::Promotion;
        }
        mv
    }

    /// Whether the side to move may castle in the given direction
    ///
    /// The right must still be held, the king and rook must be on their starting squares with
    /// nothing between them, and none of the squares the king stands on, crosses or lands on may
    /// be attacked.
    fn can_castle(&self, kingside: bool) -> bool {
        let color = self.side_to_move;
        if !self.castling.contains(CastlingRights::for_side(color, kingside)) {
            return false;
        }
        let row = color.home_row();
        let castle = Move::castle(color, kingside);
        let (rook_square, _) = CastlingRights::rook_squares(color, kingside);
        if self.board.get(castle.from) != Some(castle.piece)
            || self.board.get(rook_square) != Some(Piece::new(PieceKind::Rook, color))
        {
            return false;
        }
        let (between, king_path): (&[u8], [u8; 3]) = if kingside {
            (&[5, 6], [4, 5, 6])
        } else {
            (&[1, 2, 3], [4, 3, 2])
        };
        between
            .iter()
            .all(|&column| self.board.get(Position::at(row, column)).is_none())
            && king_path.iter().all(|&column| {
                !self
                    .board
                    .is_square_attacked(Position::at(row, column), color.other())
            })
    }

    /// The legal moves of the piece on `from`
    ///
    /// Empty unless `from` holds a piece of the side to move. Promotions come back once, with no
    /// piece chosen.
    pub fn legal_moves_from(&self, from: Position) -> Vec<Move> {
        self.pseudo_legal_moves_from(from)
            .into_iter()
            .filter(|mv| self.leaves_king_safe(mv))
            .collect()
    }

    /// The squares the piece on `from` can legally move to
    pub fn legal_destinations_from(&self, from: Position) -> SquareSet {
        self.legal_moves_from(from)
            .into_iter()
            .map(|mv| mv.to)
            .collect()
    }

    /// All legal moves of the side to move
    pub fn legal_moves(&self) -> Vec<Move> {
        Position::all()
            .flat_map(|from| self.legal_moves_from(from))
            .collect()
    }

    /// Returns `true` if the side to move has any legal move
    pub fn has_legal_move(&self) -> bool {
        self.board
            .pieces_of(self.side_to_move)
            .any(|(from, _)| !self.legal_moves_from(from).is_empty())
    }

    /// Play `mv` on a copy and check the mover's king isn't attacked afterwards
    fn leaves_king_safe(&self, mv: &Move) -> bool {
        let mut after = *self;
        after.apply(match mv.kind {
            MoveKind::Promotion => mv.with_promotion(PieceKind::Queen),
            _ => *mv,
        });
        !after.in_check(mv.piece.color)
    }

    /// Returns `true` if the given color's King is attacked
    ///
    /// Panics if that side has no king, which legal play can never cause.
    pub fn in_check(&self, color: Color) -> bool {
        let king = self
            .board
            .king_position(color)
            .unwrap_or_else(|| panic!("{color} has no king on {:?}", self.board));
        self.board.is_square_attacked(king, color.other())
    }

    /// Whether moving the piece on `from` to `to` would need a promotion choice
    pub fn is_promotion(&self, from: Position, to: Position) -> bool {
        self.board
            .get(from)
            .is_some_and(|piece| rules::is_promotion(piece, to))
    }

    pub fn status(&self) -> GameStatus {
        if self.has_legal_move() {
            GameStatus::InProgress
        } else if self.in_check(self.side_to_move) {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        }
    }

    /// The position after making the given move, which must be legal here
    #[must_use]
    pub fn after(&self, mv: Move) -> Self {
        let mut after = *self;
        after.apply(mv);
        after
    }

    /// Make the given move, which must have come from [`Self::legal_moves_from`] on this position
    ///
    /// A promotion with no piece chosen leaves the pawn on the last row.
    pub(crate) fn apply(&mut self, mv: Move) {
        let color = mv.piece.color;
        self.board.remove(mv.from);
        match mv.kind {
            MoveKind::EnPassant => {
                self.board.remove(Position::at(mv.from.row(), mv.to.column()));
            }
            MoveKind::CastleKingside | MoveKind::CastleQueenside => {
                let (rook_from, rook_to) =
                    CastlingRights::rook_squares(color, mv.kind == MoveKind::CastleKingside);
                if let Some(rook) = self.board.remove(rook_from) {
                    self.board.place(rook_to, rook);
                }
            }
            MoveKind::Normal | MoveKind::Promotion => {}
        }
        let placed = match (mv.kind, mv.promotion) {
            (MoveKind::Promotion, Some(kind)) => Piece::new(kind, color),
            _ => mv.piece,
        };
        self.board.place(mv.to, placed);
        self.castling = self.castling.after_move(mv.piece, mv.from, mv.to);
        self.en_passant = mv.en_passant_target();
        self.side_to_move = color.other();
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::Game;

    fn square(name: &str) -> Position {
        name.parse().unwrap()
    }

    fn snapshot(fen: &str) -> Snapshot {
        Game::from_fen(fen).unwrap().snapshot()
    }

    #[test]
    fn test_twenty_opening_moves() {
        let start = Snapshot::STANDARD;
        assert_eq!(start.legal_moves().len(), 20);
        assert_eq!(
            start.legal_destinations_from(Position::G1),
            [square("f3"), square("h3")].into_iter().collect::<SquareSet>(),
        );
        // Nothing for the side not to move, or for empty squares
        assert!(start.legal_moves_from(Position::G8).is_empty());
        assert!(start.legal_moves_from(square("e4")).is_empty());
    }

    #[test]
    fn test_pinned_piece_cannot_leave_line() {
        // The knight on e2 is pinned against the king by the rook on e8
        let pinned = snapshot("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(pinned.legal_moves_from(square("e2")).is_empty());
        assert!(!pinned.pseudo_legal_moves_from(square("e2")).is_empty());
    }

    #[test]
    fn test_must_answer_check() {
        let checked = snapshot("4k3/8/8/8/8/8/3P4/r3K3 w - - 0 1");
        assert!(checked.in_check(Color::White));
        let moves = checked.legal_moves();
        assert!(moves.iter().all(|mv| mv.piece.kind == PieceKind::King));
        assert_eq!(
            checked.legal_destinations_from(Position::E1),
            [square("e2"), square("f2")].into_iter().collect::<SquareSet>(),
        );
    }

    #[test]
    fn test_castling_requires_empty_and_safe_path() {
        let open = snapshot("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let king_moves = open.legal_moves_from(Position::E1);
        assert!(king_moves.contains(&Move::castle(Color::White, true)));
        assert!(king_moves.contains(&Move::castle(Color::White, false)));

        // The bishop on b1 blocks the queenside
        let blocked = snapshot("r3k2r/8/8/8/8/8/8/RB2K2R w KQkq - 0 1");
        let king_moves = blocked.legal_moves_from(Position::E1);
        assert!(!king_moves.contains(&Move::castle(Color::White, false)));
        assert!(king_moves.contains(&Move::castle(Color::White, true)));

        // The rook on f8 attacks f1, which the king would pass through
        let attacked = snapshot("r3kr2/8/8/8/8/8/8/R3K2R w KQq - 0 1");
        let king_moves = attacked.legal_moves_from(Position::E1);
        assert!(!king_moves.contains(&Move::castle(Color::White, true)));
        assert!(king_moves.contains(&Move::castle(Color::White, false)));

        // No castling out of check
        let checked = snapshot("4k3/8/8/8/8/8/8/R3K2r w Q - 0 1");
        assert!(checked.in_check(Color::White));
        assert!(!checked
            .legal_moves_from(Position::E1)
            .iter()
            .any(Move::is_castle));
    }

    #[test]
    fn test_castling_moves_rook() {
        let open = snapshot("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let after = open.after(Move::castle(Color::White, false));
        assert_eq!(
            after.board().get(Position::C1),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            after.board().get(Position::D1),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
        assert_eq!(after.board().get(Position::A1), None);
        assert_eq!(after.board().get(Position::E1), None);
        assert_eq!(after.castling_rights(), CastlingRights::Black);
    }

    #[test]
    fn test_en_passant_capture_removes_pawn() {
        let position = snapshot("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let capture = position
            .legal_moves_from(square("e5"))
            .into_iter()
            .find(|mv| mv.to == square("d6"))
            .unwrap();
        assert_eq!(capture.kind, MoveKind::EnPassant);
        assert_eq!(
            capture.captured,
            Some(Piece::new(PieceKind::Pawn, Color::Black))
        );
        let after = position.after(capture);
        assert_eq!(after.board().get(square("d5")), None);
        assert_eq!(after.board().pieces().count(), 3);
        assert_eq!(after.en_passant_target(), None);
    }

    #[test]
    fn test_en_passant_that_exposes_king() {
        // Taking en passant would clear the fifth rank between the king and the rook
        let position = snapshot("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1");
        assert!(!position
            .legal_moves_from(square("e5"))
            .iter()
            .any(|mv| mv.kind == MoveKind::EnPassant));
    }

    #[test]
    fn test_promotion_moves() {
        let position = snapshot("3r3k/4P3/8/8/8/8/8/K7 w - - 0 1");
        let moves = position.legal_moves_from(square("e7"));
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|mv| mv.kind == MoveKind::Promotion));
        assert!(position.is_promotion(square("e7"), square("e8")));
        assert!(!position.is_promotion(Position::A1, square("a2")));
        let after = position.after(moves[0].with_promotion(PieceKind::Knight));
        assert_eq!(
            after.board().get(moves[0].to),
            Some(Piece::new(PieceKind::Knight, Color::White))
        );
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(Snapshot::STANDARD.status(), GameStatus::InProgress);
        let mated = snapshot("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert_eq!(mated.status(), GameStatus::Checkmate);
        let stalemate = snapshot("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(!stalemate.in_check(Color::Black));
        assert_eq!(stalemate.status(), GameStatus::Stalemate);
    }
}
