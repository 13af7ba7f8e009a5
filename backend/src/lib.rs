//! The turn driver: owns the game, asks each side for moves and runs computer searches in the
//! background

use std::{
    sync::mpsc::{self, Receiver, TryRecvError},
    thread::{self, JoinHandle},
    time::Duration,
};

use board::{Color, MoveRequest};
use game::{Game, GameStatus, Move, MoveError};
use heuristic::HeuristicPlayer;
use players::Player;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("it is {0}'s turn, and {0} is played by the computer")]
    NotYourTurn(Color),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("the computer's search stopped without answering")]
    SearchFailed,
}

/// Who is sitting on one side of the board
pub enum Seat {
    /// Someone whose moves are asked for as they're needed, usually at a terminal
    Human(Box<dyn Player>),
    /// The computer, whose moves are searched for on another thread
    Computer(HeuristicPlayer),
}

impl Seat {
    pub fn is_computer(&self) -> bool {
        matches!(self, Self::Computer(_))
    }

    fn player(&mut self) -> &mut dyn Player {
        match self {
            Self::Human(player) => &mut **player,
            Self::Computer(player) => player,
        }
    }
}

/// A search running on another thread, and the position it was started for
struct PendingSearch {
    generation: u64,
    receiver: Receiver<Option<MoveRequest>>,
    handle: JoinHandle<()>,
}

/// A backend which queries moves from the two players until the game is done
///
/// Every change to the game bumps the generation. A computer search remembers the generation it
/// was started in, and its answer is thrown away if the game has changed since.
pub struct Backend {
    game: Game,
    white: Seat,
    black: Seat,
    generation: u64,
    pending: Option<PendingSearch>,
    /// How long a computer search waits before answering
    delay: Duration,
}

impl Backend {
    /// Create a new instance with the chess starting board
    pub fn new(white: Seat, black: Seat) -> Self {
        Self::from_game(Game::new(), white, black)
    }

    /// Create a new instance playing on from an existing game
    pub fn from_game(game: Game, white: Seat, black: Seat) -> Self {
        let mut backend = Self {
            game,
            white,
            black,
            generation: 0,
            pending: None,
            delay: Duration::ZERO,
        };
        backend.dispatch_if_computer();
        backend
    }

    /// Have the computer pause this long before each of its moves
    ///
    /// A search which is already running is started again so the pause applies to it too.
    pub fn with_computer_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        if self.pending.is_some() {
            self.dispatch_search();
        }
        self
    }

    /// Get the state of the game right now
    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a computer search has been started and not yet collected
    pub fn is_searching(&self) -> bool {
        self.pending.is_some()
    }

    pub fn seat_to_move(&self) -> &Seat {
        match self.game.side_to_move() {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn seat_to_move_mut(&mut self) -> &mut Seat {
        self.turn().1
    }

    /// The game alongside the seat of whoever is to move, borrowed separately
    fn turn(&mut self) -> (&Game, &mut Seat) {
        let seat = match self.game.side_to_move() {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        };
        (&self.game, seat)
    }

    /// Start again from the standard position
    ///
    /// Any search still running was for the old game, so its answer will be discarded.
    pub fn new_game(&mut self) {
        self.game.new_game();
        self.generation += 1;
        log::debug!("New game, generation {}", self.generation);
        self.dispatch_if_computer();
    }

    /// Make a move for the human whose turn it is
    ///
    /// The move is applied before the computer starts thinking about its reply.
    pub fn submit_human_move(&mut self, request: MoveRequest) -> Result<Move> {
        if self.seat_to_move().is_computer() {
            return Err(Error::NotYourTurn(self.game.side_to_move()));
        }
        let mv = self.accept(request)?;
        self.dispatch_if_computer();
        Ok(mv)
    }

    /// Apply a move through the game's own checks and tell both players about it
    fn accept(&mut self, request: MoveRequest) -> Result<Move> {
        let mv = self.game.make_request(request)?;
        self.generation += 1;
        if let Some(notation) = self.game.san_history().last().copied() {
            self.white.player().react_to_move(&mv, &notation);
            self.black.player().react_to_move(&mv, &notation);
        }
        Ok(mv)
    }

    fn dispatch_if_computer(&mut self) {
        if !self.game.is_game_over() && self.seat_to_move().is_computer() {
            self.dispatch_search();
        }
    }

    /// Start the computer thinking on its own copy of the current position
    ///
    /// A search which was already running is abandoned.
    fn dispatch_search(&mut self) {
        let generation = self.generation;
        let snapshot = self.game.snapshot();
        let delay = self.delay;
        let mut player = match self.seat_to_move_mut() {
            Seat::Computer(player) => player.fork(),
            Seat::Human(_) => return,
        };
        let (sender, receiver) = mpsc::channel();
        let handle = thread::spawn(move || {
            thread::sleep(delay);
            // The backend may have moved on and hung up, which is fine
            let _ = sender.send(player.best_move(&snapshot));
        });
        log::debug!(
            "Searching for {} in generation {generation}",
            snapshot.side_to_move()
        );
        if let Some(abandoned) = self.pending.replace(PendingSearch {
            generation,
            receiver,
            handle,
        }) {
            log::debug!(
                "Abandoning the search from generation {}",
                abandoned.generation
            );
        }
    }

    /// Collect the running search if it has finished, without waiting for it
    ///
    /// Returns the move the computer made, or `None` if there's nothing to collect yet or the
    /// answer was out of date.
    pub fn poll_search(&mut self) -> Result<Option<Move>> {
        let Some(pending) = self.pending.as_ref() else {
            return Ok(None);
        };
        match pending.receiver.try_recv() {
            Ok(answer) => self.finish_search(answer),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                Err(Error::SearchFailed)
            }
        }
    }

    /// Block until the running search answers, then collect it like [`Self::poll_search`]
    pub fn wait_for_search(&mut self) -> Result<Option<Move>> {
        let Some(pending) = self.pending.as_ref() else {
            return Ok(None);
        };
        match pending.receiver.recv() {
            Ok(answer) => self.finish_search(answer),
            Err(_) => {
                self.pending = None;
                Err(Error::SearchFailed)
            }
        }
    }

    fn finish_search(&mut self, answer: Option<MoveRequest>) -> Result<Option<Move>> {
        let Some(pending) = self.pending.take() else {
            return Ok(None);
        };
        if pending.handle.join().is_err() {
            return Err(Error::SearchFailed);
        }
        if pending.generation != self.generation {
            log::debug!(
                "Discarding a search from generation {}, now at {}",
                pending.generation,
                self.generation
            );
            return Ok(None);
        }
        let Some(request) = answer else {
            panic!(
                "the computer found no move in a game which isn't over: {}",
                self.game.to_fen()
            );
        };
        let mv = self.accept(request)?;
        self.dispatch_if_computer();
        Ok(Some(mv))
    }

    /// Play the game until it ends or a human stops answering
    ///
    /// Returns the status the game was left in, so `InProgress` means a human quit.
    pub fn play_game(&mut self) -> Result<GameStatus> {
        while !self.game.is_game_over() {
            if self.seat_to_move().is_computer() {
                if self.pending.is_none() {
                    self.dispatch_search();
                }
                self.wait_for_search()?;
                continue;
            }
            let (game, seat) = self.turn();
            let Some(request) = seat.player().choose_move(game) else {
                log::debug!("{} stopped playing", self.game.side_to_move());
                return Ok(self.game.status());
            };
            match self.submit_human_move(request) {
                Ok(_) => {}
                Err(Error::Move(err)) => self.seat_to_move_mut().player().move_rejected(&err),
                Err(err) => return Err(err),
            }
        }
        Ok(self.game.status())
    }
}
