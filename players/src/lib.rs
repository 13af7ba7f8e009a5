//! Traits for an arbitrary player

use board::{MoveRequest, SanMove};
use game::{Game, Move, MoveError};

/// A player in a game
///
/// This trait is generic over how the player decides what to do, so terminal and computer players
/// can both implement this. Players never change the game themselves: they suggest moves, and
/// whoever owns the game decides whether to make them.
pub trait Player {
    /// Decide on a move to make in the given game, where it's this player's turn
    ///
    /// Returns `None` if the player won't move, such as when a human quits.
    fn choose_move(&mut self, game: &Game) -> Option<MoveRequest>;

    /// React to a move being made by either side
    fn react_to_move(&mut self, _mv: &Move, _notation: &SanMove) {}

    /// React to the game refusing the move this player just chose
    ///
    /// [`Self::choose_move`] will be asked again afterwards.
    fn move_rejected(&mut self, _error: &MoveError) {}
}

impl<P: Player + ?Sized> Player for Box<P> {
    fn choose_move(&mut self, game: &Game) -> Option<MoveRequest> {
        (**self).choose_move(game)
    }

    fn react_to_move(&mut self, mv: &Move, notation: &SanMove) {
        (**self).react_to_move(mv, notation)
    }

    fn move_rejected(&mut self, error: &MoveError) {
        (**self).move_rejected(error)
    }
}
