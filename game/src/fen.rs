use board::{Board, Color, FenPlacementError, PieceKind, Position};

use crate::{CastlingRights, Game, Snapshot};

/// Why a FEN string couldn't be read
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("FEN is missing the {0} field")]
    MissingField(&'static str),
    #[error("unexpected text after the FEN: `{0}`")]
    TrailingText(String),
    #[error("invalid piece placement: {0}")]
    Placement(#[from] FenPlacementError),
    #[error("`{0}` is not a side to move")]
    SideToMove(String),
    #[error("`{0}` is not a set of castling rights")]
    Castling(String),
    #[error("`{0}` is not a square the side to move could capture onto en passant")]
    EnPassant(String),
    #[error("`{0}` is not a move counter")]
    Counter(String),
    #[error("{color} has {count} kings instead of one")]
    KingCount { color: Color, count: usize },
    #[error("the side which just moved is still in check")]
    OpponentInCheck,
}

impl Snapshot {
    /// Read the first four fields of a FEN string
    fn from_fen_fields<'a>(fields: &mut impl Iterator<Item = &'a str>) -> Result<Self, FenError> {
        let mut next = |name| fields.next().ok_or(FenError::MissingField(name));
        let board = Board::from_fen_placement(next("piece placement")?)?;
        let side_to_move = match next("side to move")? {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };
        let castling = next("castling")?;
        let castling = CastlingRights::from_fen(castling)
            .ok_or_else(|| FenError::Castling(castling.to_string()))?;
        let en_passant = match next("en passant")? {
            "-" => None,
            square => {
                // The pawn which double-stepped belongs to the side not to move
                let expected_row = side_to_move.other().pawn_row() as i8
                    + side_to_move.other().forward();
                let target = square
                    .parse::<Position>()
                    .ok()
                    .filter(|target| target.row() as i8 == expected_row)
                    .ok_or_else(|| FenError::EnPassant(square.to_string()))?;
                Some(target)
            }
        };

        for color in [Color::White, Color::Black] {
            let count = board
                .pieces_of(color)
                .filter(|(_, piece)| piece.kind == PieceKind::King)
                .count();
            if count != 1 {
                return Err(FenError::KingCount { color, count });
            }
        }
        let snapshot = Self {
            board,
            side_to_move,
            castling,
            en_passant,
        };
        if snapshot.in_check(side_to_move.other()) {
            return Err(FenError::OpponentInCheck);
        }
        Ok(snapshot)
    }
}

impl Game {
    /// Set up a game from the position in a FEN string
    ///
    /// The two move counters at the end may be left off, in which case they start at 0 and 1.
    ///
    /// ```
    /// use game::Game;
    ///
    /// let game = Game::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")?;
    /// assert!(!game.white_to_move());
    /// assert_eq!(game.en_passant_target(), Some("e3".parse::<board::Position>()?));
    /// # Ok::<_, Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut fields = fen.split_whitespace();
        let snapshot = Snapshot::from_fen_fields(&mut fields)?;
        let mut counter = |default: u32| match fields.next() {
            Some(field) => field
                .parse::<u32>()
                .map_err(|_| FenError::Counter(field.to_string())),
            None => Ok(default),
        };
        let halfmove_clock = counter(0)?;
        let fullmove_number = counter(1)?;
        if fullmove_number == 0 {
            return Err(FenError::Counter(0.to_string()));
        }
        let rest: Vec<&str> = fields.collect();
        if !rest.is_empty() {
            return Err(FenError::TrailingText(rest.join(" ")));
        }
        log::debug!("Loaded position {fen}");
        Ok(Self::from_parts(snapshot, halfmove_clock, fullmove_number))
    }

    /// Write out the current position as a FEN string
    pub fn to_fen(&self) -> String {
        let snapshot = self.snapshot();
        let side_to_move = match snapshot.side_to_move() {
            Color::White => "w",
            Color::Black => "b",
        };
        let en_passant = snapshot
            .en_passant_target()
            .map_or_else(|| "-".to_string(), |target| target.to_string());
        format!(
            "{} {side_to_move} {} {en_passant} {} {}",
            snapshot.board().to_fen_placement(),
            snapshot.castling_rights().to_fen(),
            self.halfmove_clock(),
            self.fullmove_number(),
        )
    }
}
