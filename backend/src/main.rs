use std::{process::ExitCode, str::FromStr, time::Duration};

use backend::{Backend, Seat};
use clap::Parser;
use game::{Game, GameStatus};
use heuristic::{Difficulty, HeuristicPlayer, ParseDifficultyError};
use terminal_ui::TerminalUiPlayer;

#[derive(Parser, Debug)]
#[command(name = "chess", about = "Play chess in the terminal, against a person or the computer")]
struct Args {
    /// Who plays white: human, easy, medium, hard, or a depth from 1 to 4
    #[arg(long, default_value = "human")]
    white: Side,

    /// Who plays black: human, easy, medium, hard, or a depth from 1 to 4
    #[arg(long, default_value = "medium")]
    black: Side,

    /// Seed for the computer's choices, to replay the same game
    #[arg(long)]
    seed: Option<u64>,

    /// Start from this position instead of the standard one
    #[arg(long)]
    fen: Option<String>,

    /// Milliseconds to pause before each computer move when no human is playing
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,
}

#[derive(Clone, Copy, Debug)]
enum Side {
    Human,
    Computer(Difficulty),
}

impl FromStr for Side {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("human") {
            Ok(Self::Human)
        } else {
            s.parse().map(Self::Computer)
        }
    }
}

impl Side {
    fn seat(self, seed: Option<u64>) -> Seat {
        match (self, seed) {
            (Self::Human, _) => Seat::Human(Box::new(TerminalUiPlayer::new())),
            (Self::Computer(difficulty), Some(seed)) => {
                Seat::Computer(HeuristicPlayer::with_seed(difficulty, seed))
            }
            (Self::Computer(difficulty), None) => Seat::Computer(HeuristicPlayer::new(difficulty)),
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    log::debug!("{args:?}");

    let game = match args.fen.as_deref().map(Game::from_fen).transpose() {
        Ok(game) => game.unwrap_or_default(),
        Err(err) => {
            eprintln!("Can't start from that position: {err}");
            return ExitCode::FAILURE;
        }
    };
    let white = args.white.seat(args.seed);
    let black = args.black.seat(args.seed.map(|seed| seed.wrapping_add(1)));
    let delay = if white.is_computer() && black.is_computer() {
        Duration::from_millis(args.delay_ms)
    } else {
        Duration::ZERO
    };
    let mut backend = Backend::from_game(game, white, black).with_computer_delay(delay);

    let status = match backend.play_game() {
        Ok(status) => status,
        Err(err) => {
            eprintln!("The game stopped: {err}");
            return ExitCode::FAILURE;
        }
    };
    let game = backend.game();
    println!("{}", game.board());
    if !game.san_history().is_empty() {
        println!("{}", terminal_ui::numbered_history(game.san_history()));
    }
    match (status, game.winner()) {
        (GameStatus::Checkmate, Some(winner)) => println!("Checkmate, {winner} wins"),
        (GameStatus::Stalemate, _) => println!("Stalemate, it's a draw"),
        _ => println!("Game abandoned with {} to move", game.side_to_move()),
    }
    ExitCode::SUCCESS
}
