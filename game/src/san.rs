use board::{CheckStatus, PieceKind, Position, SanMove, SanMoveType, SanNormalMove};

use crate::{Move, MoveError, MoveKind, Result, Snapshot};

impl Snapshot {
    /// Write a legal move of this position in standard algebraic notation
    ///
    /// The source file and/or rank are only given when another piece of the same kind could also
    /// reach the target, and pawn captures always give the source file.
    pub fn san(&self, mv: &Move) -> SanMove {
        let move_type = match mv.kind {
            MoveKind::CastleKingside => SanMoveType::CastleKingside,
            MoveKind::CastleQueenside => SanMoveType::CastleQueenside,
            _ => {
                let (from_file, from_rank) = if mv.piece.kind == PieceKind::Pawn {
                    (mv.is_capture().then_some(mv.from.file()), None)
                } else {
                    self.disambiguation(mv)
                };
                SanMoveType::Normal(SanNormalMove {
                    kind: mv.piece.kind,
                    from_file,
                    from_rank,
                    capture: mv.is_capture(),
                    to: mv.to,
                    promotion: mv.promotion,
                })
            }
        };
        let after = self.after(*mv);
        let check = if !after.in_check(after.side_to_move) {
            CheckStatus::None
        } else if after.has_legal_move() {
            CheckStatus::Check
        } else {
            CheckStatus::Checkmate
        };
        SanMove { move_type, check }
    }

    /// The least of the source square needed to tell `mv` apart from other legal moves
    fn disambiguation(&self, mv: &Move) -> (Option<char>, Option<u8>) {
        let rivals: Vec<Position> = self
            .board
            .pieces_of(self.side_to_move)
            .filter(|&(from, piece)| piece == mv.piece && from != mv.from)
            .filter(|&(from, _)| self.legal_destinations_from(from).contains(mv.to))
            .map(|(from, _)| from)
            .collect();
        if rivals.is_empty() {
            (None, None)
        } else if rivals.iter().all(|rival| rival.column() != mv.from.column()) {
            (Some(mv.from.file()), None)
        } else if rivals.iter().all(|rival| rival.row() != mv.from.row()) {
            (None, Some(mv.from.rank()))
        } else {
            (Some(mv.from.file()), Some(mv.from.rank()))
        }
    }

    /// Find the legal move meant by the given algebraic notation
    ///
    /// This uses the position to fill in what the notation leaves out, mainly where the piece
    /// comes from. The check marker and capture flag are not checked against the position. A
    /// promotion piece is carried over onto the move, so a promotion written without one comes
    /// back with none chosen.
    pub fn resolve_san(&self, san: &SanMove) -> Result<Move> {
        let normal = match san.move_type {
            SanMoveType::CastleKingside | SanMoveType::CastleQueenside => {
                let kingside = san.move_type == SanMoveType::CastleKingside;
                let castle = Move::castle(self.side_to_move, kingside);
                return self
                    .legal_moves_from(castle.from)
                    .into_iter()
                    .find(|mv| mv.kind == castle.kind)
                    .ok_or(MoveError::IllegalMove {
                        from: castle.from,
                        to: castle.to,
                    });
            }
            SanMoveType::Normal(normal) => normal,
        };
        let mut candidates = self
            .board
            .pieces_of(self.side_to_move)
            .filter(|&(from, piece)| {
                piece.kind == normal.kind
                    && normal.from_file.map_or(true, |file| from.file() == file)
                    && normal.from_rank.map_or(true, |rank| from.rank() == rank)
            })
            .flat_map(|(from, _)| self.legal_moves_from(from))
            .filter(|mv| mv.to == normal.to && !mv.is_castle());
        let Some(found) = candidates.next() else {
            return Err(MoveError::NoSourcePiece(san.to_string()));
        };
        if candidates.next().is_some() {
            return Err(MoveError::AmbiguousSourcePiece(san.to_string()));
        }
        Ok(match normal.promotion {
            Some(kind) if found.kind == MoveKind::Promotion => found.with_promotion(kind),
            _ => found,
        })
    }
}
