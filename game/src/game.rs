use board::{Board, Color, MoveRequest, PieceKind, Position, SanMove, SquareSet};

use crate::{CastlingRights, GameStatus, Move, MoveError, MoveKind, Result, Snapshot};

/// A game of chess in progress
///
/// This is the only way to change a game: every change goes through [`Game::make_move`] (or one
/// of its wrappers), which refuses anything that isn't a legal move without touching the game.
/// Everything else is a read-only view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    snapshot: Snapshot,
    /// Every move made, in the order they were made
    history: Vec<Move>,
    /// The same moves in algebraic notation, written as they were made
    san_history: Vec<SanMove>,
    /// Number of half-moves since a pawn was moved or a piece was captured
    halfmove_clock: u32,
    /// The number of the current turn, starting at 1 and increasing after Black moves
    fullmove_number: u32,
    status: GameStatus,
}

impl Game {
    /// A game at the standard starting position
    pub fn new() -> Self {
        Self::from_parts(Snapshot::STANDARD, 0, 1)
    }

    pub(crate) fn from_parts(
        snapshot: Snapshot,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Self {
        Self {
            snapshot,
            history: Vec::new(),
            san_history: Vec::new(),
            halfmove_clock,
            fullmove_number,
            status: snapshot.status(),
        }
    }

    /// Throw away the current game and start again from the standard position
    pub fn new_game(&mut self) {
        log::debug!("Starting a new game after {} moves", self.history.len());
        *self = Self::new();
    }

    /// Move the piece on `from` to `to`, if that's legal
    ///
    /// `promotion` is what a pawn reaching the last row turns into, and must be given for such a
    /// move; for any other move it is ignored. On success this returns the move as made.
    ///
    /// ```
    /// use game::{Game, MoveError};
    ///
    /// let mut game = Game::new();
    /// let e2 = "e2".parse()?;
    /// let e5 = "e5".parse()?;
    /// assert_eq!(
    ///     game.make_move(e2, e5, None),
    ///     Err(MoveError::IllegalMove { from: e2, to: e5 }),
    /// );
    /// game.make_move(e2, "e4".parse()?, None)?;
    /// assert!(!game.white_to_move());
    /// # Ok::<_, Box<dyn std::error::Error>>(())
    /// ```
    pub fn make_move(
        &mut self,
        from: Position,
        to: Position,
        promotion: Option<PieceKind>,
    ) -> Result<Move> {
        let candidate = self
            .snapshot
            .legal_moves_from(from)
            .into_iter()
            .find(|mv| mv.to == to)
            .ok_or(MoveError::IllegalMove { from, to })?;
        let mv = match (candidate.kind, promotion) {
            (MoveKind::Promotion, None) => return Err(MoveError::PromotionRequired { from, to }),
            (MoveKind::Promotion, Some(kind)) if !kind.is_promotable() => {
                return Err(MoveError::InvalidPromotion(kind))
            }
            (MoveKind::Promotion, Some(kind)) => candidate.with_promotion(kind),
            _ => candidate,
        };

        let san = self.snapshot.san(&mv);
        self.snapshot.apply(mv);
        if mv.piece.kind == PieceKind::Pawn || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if mv.piece.color == Color::Black {
            self.fullmove_number += 1;
        }
        self.history.push(mv);
        self.san_history.push(san);
        self.status = self.snapshot.status();
        log::debug!("{} played {san} ({mv})", mv.piece.color);
        if self.status.is_over() {
            log::debug!("Game over by {}", self.status);
        }
        Ok(mv)
    }

    /// Make a move given in coordinate notation
    pub fn make_request(&mut self, request: MoveRequest) -> Result<Move> {
        self.make_move(request.from, request.to, request.promotion)
    }

    /// Make a move given as raw `(row, column)` pairs, which may be off the board
    pub fn make_move_at(
        &mut self,
        from: (i32, i32),
        to: (i32, i32),
        promotion: Option<PieceKind>,
    ) -> Result<Move> {
        self.make_move(from.try_into()?, to.try_into()?, promotion)
    }

    /// Make a move given in standard algebraic notation, like `Nf3` or `exd8=Q`
    pub fn make_san_move(&mut self, notation: &str) -> Result<Move> {
        let san: SanMove = notation.parse()?;
        let mv = self.snapshot.resolve_san(&san)?;
        self.make_move(mv.from, mv.to, mv.promotion)
    }

    /// The squares the piece on `from` can legally move to
    ///
    /// This is empty if there's no piece there or it isn't that side's turn.
    pub fn legal_moves_from(&self, from: Position) -> SquareSet {
        self.snapshot.legal_destinations_from(from)
    }

    /// Every legal move of the side to move
    pub fn legal_moves(&self) -> Vec<Move> {
        self.snapshot.legal_moves()
    }

    pub fn white_to_move(&self) -> bool {
        self.snapshot.side_to_move().is_white()
    }

    pub fn side_to_move(&self) -> Color {
        self.snapshot.side_to_move()
    }

    /// Whether the given side's king is attacked right now
    pub fn in_check(&self, color: Color) -> bool {
        self.snapshot.in_check(color)
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_over()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// The side which delivered checkmate, if the game ended that way
    pub fn winner(&self) -> Option<Color> {
        (self.status == GameStatus::Checkmate).then(|| self.side_to_move().other())
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// The moves made so far in algebraic notation
    pub fn san_history(&self) -> &[SanMove] {
        &self.san_history
    }

    pub fn board(&self) -> &Board {
        self.snapshot.board()
    }

    /// A copy of the current position, for looking at away from the game
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot
    }

    /// Whether moving the piece on `from` to `to` needs a promotion piece
    pub fn is_promotion(&self, from: Position, to: Position) -> bool {
        self.snapshot.is_promotion(from, to)
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.snapshot.castling_rights()
    }

    pub fn en_passant_target(&self) -> Option<Position> {
        self.snapshot.en_passant_target()
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
