//! Counting the leaves of the legal move tree, to check move generation against known counts

use board::PieceKind;

use crate::{Move, MoveKind, Snapshot};

/// The number of distinct move sequences of length `depth` from the given position
///
/// Each choice of promotion piece counts as its own move.
///
/// ```
/// use game::{perft, Snapshot};
/// assert_eq!(perft(&Snapshot::STANDARD, 0), 1);
/// assert_eq!(perft(&Snapshot::STANDARD, 2), 400);
/// ```
pub fn perft(snapshot: &Snapshot, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = snapshot.legal_moves().into_iter().flat_map(with_promotions);
    if depth == 1 {
        return moves.count() as u64;
    }
    moves.map(|mv| perft(&snapshot.after(mv), depth - 1)).sum()
}

/// Split a promotion into one move per piece it could promote into
fn with_promotions(mv: Move) -> impl Iterator<Item = Move> {
    let promotions: &[PieceKind] = match mv.kind {
        MoveKind::Promotion => &PieceKind::PROMOTIONS,
        _ => &[],
    };
    let plain = promotions.is_empty().then_some(mv);
    promotions
        .iter()
        .map(move |&kind| mv.with_promotion(kind))
        .chain(plain)
}
