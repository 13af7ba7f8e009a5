//! How each kind of piece moves
//!
//! Every piece kind has a movement rule: a pure function from a board and a square to the
//! pseudo-legal destinations of the piece standing there. These ignore whether the move would
//! leave the mover's king attacked, and they never produce castling, which depends on more state
//! than the board holds.

use crate::{Board, Color, Piece, PieceKind, Position, SquareSet};

/// A movement rule
///
/// The last argument is the square a pawn may capture onto en passant, if any.
pub type MovementRule = fn(&Board, Position, Piece, Option<Position>) -> SquareSet;

/// The rule for each kind, in [`PieceKind`] declaration order
const RULES: [MovementRule; 6] = [
    pawn_moves,
    rook_moves,
    knight_moves,
    bishop_moves,
    queen_moves,
    king_moves,
];

/// The offsets corresponding to all possible knight moves
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// The offsets corresponding to all possible (non-castling) king moves
const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Look up the movement rule for a kind of piece
pub const fn movement_rule(kind: PieceKind) -> MovementRule {
    RULES[kind as usize]
}

/// The pseudo-legal destinations of whatever piece stands on `from`
///
/// Empty if the square is empty.
pub fn destinations(board: &Board, from: Position, en_passant: Option<Position>) -> SquareSet {
    match board.get(from) {
        Some(piece) => movement_rule(piece.kind)(board, from, piece, en_passant),
        None => SquareSet::empty(),
    }
}

/// The squares a piece standing on `from` attacks
///
/// Unlike the movement rules this includes squares held by friendly pieces, and for pawns only
/// the two forward diagonals count.
pub fn attacks(board: &Board, from: Position, piece: Piece) -> SquareSet {
    match piece.kind {
        PieceKind::Pawn => pawn_attacks(from, piece.color),
        PieceKind::Knight => step(from, &KNIGHT_OFFSETS),
        PieceKind::King => step(from, &KING_OFFSETS),
        PieceKind::Bishop => slide(board, from, &BISHOP_DIRECTIONS),
        PieceKind::Rook => slide(board, from, &ROOK_DIRECTIONS),
        PieceKind::Queen => {
            slide(board, from, &BISHOP_DIRECTIONS) | slide(board, from, &ROOK_DIRECTIONS)
        }
    }
}

/// Whether moving `piece` onto `to` needs a promotion choice
pub fn is_promotion(piece: Piece, to: Position) -> bool {
    piece.kind == PieceKind::Pawn && to.row() == piece.color.promotion_row()
}

fn step(from: Position, offsets: &[(i8, i8)]) -> SquareSet {
    offsets
        .iter()
        .filter_map(|&(rows, columns)| from.offset(rows, columns))
        .collect()
}

fn slide(board: &Board, from: Position, directions: &[(i8, i8)]) -> SquareSet {
    let mut reached = SquareSet::empty();
    for &(rows, columns) in directions {
        let mut next = from.offset(rows, columns);
        while let Some(square) = next {
            reached |= square;
            if board.get(square).is_some() {
                break;
            }
            next = square.offset(rows, columns);
        }
    }
    reached
}

fn pawn_attacks(from: Position, color: Color) -> SquareSet {
    step(from, &[(color.forward(), 1), (color.forward(), -1)])
}

/// Drop the squares a piece can't land on because its own side is there
fn without_friendly(board: &Board, piece: Piece, reached: SquareSet) -> SquareSet {
    reached & !board.occupancy(piece.color)
}

fn pawn_moves(
    board: &Board,
    from: Position,
    piece: Piece,
    en_passant: Option<Position>,
) -> SquareSet {
    let forward = piece.color.forward();
    let mut reached = SquareSet::empty();
    if let Some(single) = from.offset(forward, 0).filter(|&s| board.get(s).is_none()) {
        reached |= single;
        if from.row() == piece.color.pawn_row() {
            if let Some(double) = single.offset(forward, 0).filter(|&s| board.get(s).is_none()) {
                reached |= double;
            }
        }
    }
    for target in pawn_attacks(from, piece.color).iter() {
        let enemy_there = board
            .get(target)
            .is_some_and(|other| other.color != piece.color);
        if enemy_there || en_passant == Some(target) {
            reached |= target;
        }
    }
    reached
}

fn knight_moves(board: &Board, from: Position, piece: Piece, _: Option<Position>) -> SquareSet {
    without_friendly(board, piece, step(from, &KNIGHT_OFFSETS))
}

fn bishop_moves(board: &Board, from: Position, piece: Piece, _: Option<Position>) -> SquareSet {
    without_friendly(board, piece, slide(board, from, &BISHOP_DIRECTIONS))
}

fn rook_moves(board: &Board, from: Position, piece: Piece, _: Option<Position>) -> SquareSet {
    without_friendly(board, piece, slide(board, from, &ROOK_DIRECTIONS))
}

// Breaks the queen down into a rook and a bishop
fn queen_moves(
    board: &Board,
    from: Position,
    piece: Piece,
    en_passant: Option<Position>,
) -> SquareSet {
    rook_moves(board, from, piece, en_passant) | bishop_moves(board, from, piece, en_passant)
}

fn king_moves(board: &Board, from: Position, piece: Piece, _: Option<Position>) -> SquareSet {
    without_friendly(board, piece, step(from, &KING_OFFSETS))
}
