//! A computer player which scores every legal move on its own, without looking ahead

use core::{cmp::Ordering, fmt, str::FromStr};

use board::{MoveRequest, PieceKind, Position};
use game::{Game, Move, MoveKind, Snapshot};
use rand::{rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng};

/// How strongly the computer plays
///
/// Every difficulty looks at exactly the same thing, the moves available right now. What changes
/// is how much random noise is added to each move's score: the easier the difficulty, the more
/// often noise outweighs the difference between a good move and a bad one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a difficulty (expected easy, medium, hard or a depth from 1 to 4)")]
pub struct ParseDifficultyError(String);

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// A flat amount added to every move's score
    ///
    /// Since it's the same for every move it never changes which move wins.
    pub const fn bias(self) -> i32 {
        match self {
            Self::Easy => 0,
            Self::Medium => 2,
            Self::Hard => 4,
        }
    }

    /// The (exclusive) upper bound on the random amount added to each move's score
    pub const fn noise(self) -> i32 {
        match self {
            Self::Easy => 24,
            Self::Medium => 12,
            Self::Hard => 5,
        }
    }

    /// The difficulty matching a search depth setting from 1 to 4
    ///
    /// ```
    /// use heuristic::Difficulty;
    /// assert_eq!(Difficulty::from_depth(1), Some(Difficulty::Easy));
    /// assert_eq!(Difficulty::from_depth(4), Some(Difficulty::Hard));
    /// assert_eq!(Difficulty::from_depth(5), None);
    /// ```
    pub const fn from_depth(depth: u8) -> Option<Self> {
        match depth {
            1 => Some(Self::Easy),
            2 => Some(Self::Medium),
            3 | 4 => Some(Self::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        })
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let difficulty = match s.to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            depth => depth.parse().ok().and_then(Self::from_depth),
        };
        difficulty.ok_or_else(|| ParseDifficultyError(s.to_string()))
    }
}

/// How much a piece is worth capturing
///
/// The king can't actually be captured; its value only needs to dwarf everything else.
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight | PieceKind::Bishop => 300,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20_000,
    }
}

/// A bonus for moving towards the middle of the board
///
/// ```
/// use board::Position;
/// use heuristic::center_bonus;
/// assert_eq!(center_bonus("e4".parse().unwrap()), 10);
/// assert_eq!(center_bonus("c6".parse().unwrap()), 4);
/// assert_eq!(center_bonus(Position::A1), 0);
/// ```
pub fn center_bonus(square: Position) -> i32 {
    let within = |low, high| {
        (low..=high).contains(&square.row()) && (low..=high).contains(&square.column())
    };
    if within(3, 4) {
        10
    } else if within(2, 5) {
        4
    } else {
        0
    }
}

/// Score a move: what it captures, where it lands, and some noise
fn score_move<R: Rng + ?Sized>(mv: &Move, difficulty: Difficulty, rng: &mut R) -> i32 {
    // For en passant this is the pawn beside the target square, not what's on it
    let captured = mv.captured.map_or(0, |piece| piece_value(piece.kind));
    captured + center_bonus(mv.to) + difficulty.bias() + rng.gen_range(0..difficulty.noise())
}

/// Pick a move for the side to move
///
/// This is a single-ply scorer, not a search: each legal move is scored on its own and the
/// highest score wins, with ties broken at random. Difficulty never changes how far ahead it
/// looks. Promotions always choose a queen.
///
/// Returns `None` only if there are no legal moves, which means the game is already over.
pub fn find_best_move<R: Rng + ?Sized>(
    snapshot: &Snapshot,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<Move> {
    let scored: Vec<(Move, i32)> = Position::all()
        .flat_map(|from| snapshot.legal_moves_from(from))
        .map(|mv| {
            let score = score_move(&mv, difficulty, rng);
            log::trace!("{mv} scores {score}");
            (mv, score)
        })
        .collect();
    let chosen = pick_best(scored, rng)?;
    Some(match chosen.kind {
        MoveKind::Promotion => chosen.with_promotion(PieceKind::Queen),
        _ => chosen,
    })
}

/// The highest scoring move, chosen uniformly at random among those tied for the top score
fn pick_best<R: Rng + ?Sized>(
    scored: impl IntoIterator<Item = (Move, i32)>,
    rng: &mut R,
) -> Option<Move> {
    let mut best_score = i32::MIN;
    let mut best = Vec::new();
    for (mv, score) in scored {
        match score.cmp(&best_score) {
            Ordering::Greater => {
                best_score = score;
                best.clear();
                best.push(mv);
            }
            Ordering::Equal => best.push(mv),
            Ordering::Less => {}
        }
    }
    let chosen = *best.choose(rng)?;
    log::debug!(
        "Chose {chosen} with score {best_score} out of {} tied moves",
        best.len()
    );
    Some(chosen)
}

/// A computer player which picks moves with [`find_best_move`]
#[derive(Clone, Debug)]
pub struct HeuristicPlayer {
    difficulty: Difficulty,
    /// How we decide what to do
    rng: SmallRng,
}

impl HeuristicPlayer {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            rng: SmallRng::from_entropy(),
        }
    }

    /// A player whose choices are the same every time for the same seed
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Split off an independent player of the same difficulty
    ///
    /// The new player is seeded from this one, so a seeded player's forks are reproducible too.
    /// This is how a search gets its own player to take to another thread.
    pub fn fork(&mut self) -> Self {
        Self::with_seed(self.difficulty, self.rng.gen())
    }

    /// Pick a move in the given position
    pub fn best_move(&mut self, snapshot: &Snapshot) -> Option<MoveRequest> {
        find_best_move(snapshot, self.difficulty, &mut self.rng).map(MoveRequest::from)
    }
}

impl Default for HeuristicPlayer {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

impl players::Player for HeuristicPlayer {
    fn choose_move(&mut self, game: &Game) -> Option<MoveRequest> {
        self.best_move(&game.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use quickcheck::quickcheck;

    fn snapshot(fen: &str) -> Snapshot {
        Game::from_fen(fen).unwrap().snapshot()
    }

    #[test]
    fn test_difficulty_parsing() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.to_string().parse::<Difficulty>(), Ok(difficulty));
        }
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("2".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert_eq!(
            "impossible".parse::<Difficulty>(),
            Err(ParseDifficultyError("impossible".to_string()))
        );
        assert!("0".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_harder_means_less_noise() {
        assert!(Difficulty::Easy.noise() > Difficulty::Medium.noise());
        assert!(Difficulty::Medium.noise() > Difficulty::Hard.noise());
        // Noise can never outweigh winning a pawn
        let best_quiet_move = Difficulty::Easy.noise() + center_bonus(Position::at(3, 3));
        assert!(best_quiet_move < piece_value(PieceKind::Pawn));
    }

    #[test]
    fn test_takes_the_queen() {
        let position = snapshot("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1");
        for difficulty in Difficulty::ALL {
            let mut rng = SmallRng::seed_from_u64(7);
            let mv = find_best_move(&position, difficulty, &mut rng).unwrap();
            assert_eq!(mv.to.to_string(), "d5", "{difficulty}");
            assert!(mv.is_capture());
        }
    }

    #[test]
    fn test_values_en_passant_capture() {
        // Taking en passant wins a pawn, which beats every quiet move
        let position = snapshot("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let mut player = HeuristicPlayer::with_seed(Difficulty::Easy, 3);
        let mv = player.best_move(&position).unwrap();
        assert_eq!(mv.to_string(), "e5d6");
    }

    #[test]
    fn test_promotes_to_queen() {
        let position = snapshot("7k/4P3/8/8/8/8/8/K7 w - - 0 1");
        let mut rng = SmallRng::seed_from_u64(0);
        for _ in 0..20 {
            let mv = find_best_move(&position, Difficulty::Easy, &mut rng).unwrap();
            if mv.kind == MoveKind::Promotion {
                assert_eq!(mv.promotion, Some(PieceKind::Queen));
            }
        }
    }

    #[test]
    fn test_no_move_when_game_over() {
        let mated = snapshot("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(find_best_move(&mated, Difficulty::Hard, &mut rng), None);
        let stalemate = snapshot("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(find_best_move(&stalemate, Difficulty::Hard, &mut rng), None);
    }

    #[test]
    fn test_seeded_players_repeat_themselves() {
        let mut first = HeuristicPlayer::with_seed(Difficulty::Medium, 42);
        let mut second = HeuristicPlayer::with_seed(Difficulty::Medium, 42);
        let start = Snapshot::STANDARD;
        assert_eq!(first.fork().best_move(&start), second.fork().best_move(&start));
        assert_eq!(first.best_move(&start), second.best_move(&start));
    }

    #[test]
    fn test_ties_are_broken_randomly() {
        let moves = Snapshot::STANDARD.legal_moves();
        let chosen: HashSet<Move> = (0..64)
            .filter_map(|seed| {
                let mut rng = SmallRng::seed_from_u64(seed);
                pick_best(moves.iter().map(|&mv| (mv, 7)), &mut rng)
            })
            .collect();
        assert!(chosen.len() > 1);
        assert!(chosen.iter().all(|mv| moves.contains(mv)));
    }

    #[test]
    fn test_only_top_score_is_picked() {
        let moves = Snapshot::STANDARD.legal_moves();
        let (top, rest) = moves.split_at(2);
        for seed in 0..32 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let scored = top
                .iter()
                .map(|&mv| (mv, 10))
                .chain(rest.iter().map(|&mv| (mv, 9)));
            let chosen = pick_best(scored, &mut rng).unwrap();
            assert!(top.contains(&chosen), "{chosen}");
        }
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(pick_best(Vec::<(Move, i32)>::new(), &mut rng), None);
    }

    quickcheck! {
        fn test_only_legal_moves(seed: u64) -> bool {
            let mut white = HeuristicPlayer::with_seed(Difficulty::Easy, seed);
            let mut black = HeuristicPlayer::with_seed(Difficulty::Hard, seed.wrapping_add(1));
            let mut game = Game::new();
            for ply in 0..60 {
                let player = if ply % 2 == 0 { &mut white } else { &mut black };
                let Some(request) = player.best_move(&game.snapshot()) else {
                    return game.is_game_over();
                };
                if game.make_request(request).is_err() {
                    return false;
                }
            }
            true
        }
    }
}
