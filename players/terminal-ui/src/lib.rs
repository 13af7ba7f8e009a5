//! A player for a human typing in the terminal

use std::io::{self, BufRead, Read, Write};

use board::{MoveRequest, PieceKind, SanMove};
use game::{Game, GameStatus, Move, MoveError};

/// An input for a human typing in the terminal
///
/// Moves can be typed in algebraic notation (`Nf3`, `exd5`, `O-O`, `e8=Q`) or as the source and
/// target squares (`e2e4`, `e7e8q`). Typing `quit` or closing the input ends the game.
pub struct TerminalUiPlayer<In = StdinLines, Out = io::Stdout> {
    input: In,
    output: Out,
}

impl TerminalUiPlayer {
    /// Create a new player reading from stdin and writing to stdout
    pub fn new() -> Self {
        Self::with_io(StdinLines::default(), io::stdout())
    }
}

/// Standard input, read one line at a time
///
/// Stdin is only locked while a line is being read, so any number of players on the same thread
/// can share it. Nothing past the end of the line is taken out of stdin's own buffer.
#[derive(Debug, Default)]
pub struct StdinLines {
    line: Vec<u8>,
    consumed: usize,
}

impl Read for StdinLines {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let amount = available.len().min(buf.len());
        buf[..amount].copy_from_slice(&available[..amount]);
        self.consume(amount);
        Ok(amount)
    }
}

impl BufRead for StdinLines {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.consumed == self.line.len() {
            self.line.clear();
            self.consumed = 0;
            io::stdin().lock().read_until(b'\n', &mut self.line)?;
        }
        Ok(&self.line[self.consumed..])
    }

    fn consume(&mut self, amount: usize) {
        self.consumed = (self.consumed + amount).min(self.line.len());
    }
}

impl Default for TerminalUiPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<In: BufRead, Out: Write> TerminalUiPlayer<In, Out> {
    pub fn with_io(input: In, output: Out) -> Self {
        Self { input, output }
    }

    /// Print the prompt and read a trimmed line, or `None` if the input is finished
    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut buffer = String::new();
        if self.input.read_line(&mut buffer)? == 0 {
            return Ok(None);
        }
        Ok(Some(buffer.trim().to_string()))
    }

    fn show_game(&mut self, game: &Game) -> io::Result<()> {
        writeln!(self.output)?;
        write!(self.output, "{}", game.board())?;
        let history = game.san_history();
        if !history.is_empty() {
            writeln!(self.output, "{}", numbered_history(history))?;
        }
        let side = game.side_to_move();
        match game.status() {
            GameStatus::InProgress if game.in_check(side) => {
                writeln!(self.output, "{side} to move, and in check")
            }
            GameStatus::InProgress => writeln!(self.output, "{side} to move"),
            GameStatus::Checkmate => writeln!(self.output, "Checkmate, {} wins", side.other()),
            GameStatus::Stalemate => writeln!(self.output, "Stalemate"),
        }
    }

    /// Turn what the user typed into a move, asking for a promotion piece if it's missing
    fn interpret(
        &mut self,
        game: &Game,
        typed: &str,
    ) -> io::Result<Result<MoveRequest, MoveError>> {
        let mut request = match typed.parse::<MoveRequest>() {
            Ok(request) => request,
            Err(_) => {
                return Ok(typed
                    .parse::<SanMove>()
                    .map_err(MoveError::from)
                    .and_then(|san| game.snapshot().resolve_san(&san))
                    .map(MoveRequest::from)
                    .and_then(|request| require_promotion(game, request)))
            }
        };
        if request.promotion.is_none() && game.is_promotion(request.from, request.to) {
            loop {
                let Some(answer) = self.prompt("Promote to (q, r, b, n): ")? else {
                    return Ok(Err(MoveError::PromotionRequired {
                        from: request.from,
                        to: request.to,
                    }));
                };
                match answer.chars().next().and_then(PieceKind::from_letter) {
                    Some(kind) if kind.is_promotable() && answer.len() == 1 => {
                        request.promotion = Some(kind);
                        break;
                    }
                    _ => writeln!(self.output, "`{answer}` is not a piece a pawn can become")?,
                }
            }
        }
        Ok(Ok(request))
    }

    fn read_move(&mut self, game: &Game) -> io::Result<Option<MoveRequest>> {
        self.show_game(game)?;
        loop {
            let Some(typed) = self.prompt("Please input your move: ")? else {
                return Ok(None);
            };
            match typed.as_str() {
                "" => continue,
                "quit" | "exit" | "resign" => return Ok(None),
                _ => {}
            }
            match self.interpret(game, &typed)? {
                Ok(request) => return Ok(Some(request)),
                Err(err) => writeln!(self.output, "{err}, try again")?,
            }
        }
    }
}

/// Algebraic notation names the promotion piece itself, so a missing one is an error
fn require_promotion(game: &Game, request: MoveRequest) -> Result<MoveRequest, MoveError> {
    if request.promotion.is_none() && game.is_promotion(request.from, request.to) {
        Err(MoveError::PromotionRequired {
            from: request.from,
            to: request.to,
        })
    } else {
        Ok(request)
    }
}

/// Lay out moves in algebraic notation as numbered turns, `1. e4 e5 2. Nf3`
pub fn numbered_history(moves: &[SanMove]) -> String {
    moves
        .chunks(2)
        .enumerate()
        .map(|(turn, pair)| match pair {
            [white, black] => format!("{}. {white} {black}", turn + 1),
            [white] => format!("{}. {white}", turn + 1),
            _ => String::new(),
        })
        .collect::<Vec<String>>()
        .join(" ")
}

impl<In: BufRead, Out: Write> players::Player for TerminalUiPlayer<In, Out> {
    fn choose_move(&mut self, game: &Game) -> Option<MoveRequest> {
        self.read_move(game).unwrap_or_else(|err| {
            log::error!("Error talking to the terminal: {err}");
            None
        })
    }

    fn react_to_move(&mut self, mv: &Move, notation: &SanMove) {
        let _ = writeln!(self.output, "{} played {notation}", mv.piece.color);
    }

    fn move_rejected(&mut self, error: &MoveError) {
        let _ = writeln!(self.output, "That move was refused: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use players::Player;

    fn player(input: &str) -> TerminalUiPlayer<&[u8], Vec<u8>> {
        TerminalUiPlayer::with_io(input.as_bytes(), Vec::new())
    }

    fn output(player: &TerminalUiPlayer<&[u8], Vec<u8>>) -> String {
        String::from_utf8(player.output.clone()).unwrap()
    }

    #[test]
    fn test_reads_both_notations() {
        let game = Game::new();
        let mut typist = player("e2e4\nNf3\n");
        assert_eq!(
            typist.choose_move(&game).map(|request| request.to_string()),
            Some("e2e4".to_string())
        );
        assert_eq!(
            typist.choose_move(&game).map(|request| request.to_string()),
            Some("g1f3".to_string())
        );
    }

    #[test]
    fn test_reprompts_after_bad_input() {
        let game = Game::new();
        let mut typist = player("\nnonsense\nNd4\nd2d4\n");
        let request = typist.choose_move(&game).unwrap();
        assert_eq!(request.to_string(), "d2d4");
        let printed = output(&typist);
        assert_eq!(printed.matches("try again").count(), 2);
        assert!(printed.contains("White to move"));
    }

    #[test]
    fn test_asks_for_promotion() {
        let game = Game::from_fen("7k/4P3/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let mut typist = player("e7e8\nk\nn\n");
        let request = typist.choose_move(&game).unwrap();
        assert_eq!(request.promotion, Some(PieceKind::Knight));
        assert!(output(&typist).contains("not a piece a pawn can become"));

        let mut typist = player("e8\ne8=Q\n");
        let request = typist.choose_move(&game).unwrap();
        assert_eq!(request.promotion, Some(PieceKind::Queen));
    }

    #[test]
    fn test_stdin_players_share_one_thread() {
        let (sender, receiver) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let white = TerminalUiPlayer::new();
            let black = TerminalUiPlayer::new();
            let _ = sender.send((white.input.consumed, black.input.consumed));
        });
        assert_eq!(
            receiver.recv_timeout(std::time::Duration::from_secs(3)),
            Ok((0, 0)),
            "building the second player blocked on stdin"
        );
    }

    #[test]
    fn test_quitting() {
        let game = Game::new();
        assert_eq!(player("quit\n").choose_move(&game), None);
        assert_eq!(player("").choose_move(&game), None);
    }

    #[test]
    fn test_shows_history_and_result() {
        let mut game = Game::new();
        for notation in ["f3", "e5", "g4", "Qh4#"] {
            game.make_san_move(notation).unwrap();
        }
        let mut typist = player("");
        assert_eq!(typist.choose_move(&game), None);
        let printed = output(&typist);
        assert!(printed.contains("1. f3 e5 2. g4 Qh4#"));
        assert!(printed.contains("Checkmate, Black wins"));
    }
}
