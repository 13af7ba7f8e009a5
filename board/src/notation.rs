//! Move notations: standard algebraic notation for people, and coordinate notation for programs

use core::{fmt, str::FromStr};

use crate::{PieceKind, Position};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("`{0}` is not a move in algebraic notation")]
    InvalidAlgebraicNotation(String),
    #[error("`{0}` is not a move in coordinate notation")]
    InvalidCoordinateNotation(String),
}

/// The data parsed out from a move in standard algebraic notation
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SanMove {
    /// What move happened on the board
    pub move_type: SanMoveType,
    /// Whether the move leaves the opponent in check(mate)
    pub check: CheckStatus,
}
impl fmt::Display for SanMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.move_type, self.check)
    }
}
impl FromStr for SanMove {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (check, body) = if let Some(body) = s.strip_suffix('#') {
            (CheckStatus::Checkmate, body)
        } else if let Some(body) = s.strip_suffix('+') {
            (CheckStatus::Check, body)
        } else {
            (CheckStatus::None, s)
        };
        let move_type = body
            .parse()
            .map_err(|_| NotationError::InvalidAlgebraicNotation(s.to_string()))?;
        Ok(Self { move_type, check })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SanMoveType {
    /// A move which isn't a castle (because those are notated entirely unrelatedly)
    Normal(SanNormalMove),
    CastleKingside,
    CastleQueenside,
}
impl fmt::Display for SanMoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal(mv) => mv.fmt(f),
            Self::CastleKingside => f.write_str("O-O"),
            Self::CastleQueenside => f.write_str("O-O-O"),
        }
    }
}
impl FromStr for SanMoveType {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "O-O" | "0-0" => Self::CastleKingside,
            "O-O-O" | "0-0-0" => Self::CastleQueenside,
            _ => Self::Normal(s.parse()?),
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CheckStatus {
    None,
    Check,
    Checkmate,
}
/// Returns the status as appended to a move in algebraic notation
impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "",
            Self::Check => "+",
            Self::Checkmate => "#",
        })
    }
}

/// All the data from a move that isn't a castle
///
/// This doesn't include the check status after the move, because that is shared with castling in
/// the [`SanMove`] struct.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SanNormalMove {
    pub kind: PieceKind,
    pub from_file: Option<char>,
    pub from_rank: Option<u8>,
    pub capture: bool,
    pub to: Position,
    pub promotion: Option<PieceKind>,
}
impl fmt::Display for SanNormalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind != PieceKind::Pawn {
            write!(f, "{}", self.kind.fen_letter())?;
        }
        if let Some(file) = self.from_file {
            write!(f, "{file}")?;
        }
        if let Some(rank) = self.from_rank {
            write!(f, "{rank}")?;
        }
        if self.capture {
            f.write_str("x")?;
        }
        write!(f, "{}", self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "={}", promotion.fen_letter())?;
        }
        Ok(())
    }
}
impl FromStr for SanNormalMove {
    type Err = NotationError;

    fn from_str(original: &str) -> Result<Self, Self::Err> {
        let invalid = || NotationError::InvalidAlgebraicNotation(original.to_string());
        let mut s = original;
        let kind = match s.chars().next() {
            Some(letter @ ('R' | 'N' | 'B' | 'Q' | 'K')) => {
                s = &s[1..];
                PieceKind::from_letter(letter).ok_or_else(invalid)?
            }
            _ => PieceKind::Pawn,
        };
        let promotion = match s.rsplit_once('=') {
            Some((rest, letter)) => {
                let mut letters = letter.chars();
                let promotion = match (letters.next(), letters.next()) {
                    (Some(c), None) => PieceKind::from_letter(c)
                        .filter(|kind| c.is_ascii_uppercase() && kind.is_promotable()),
                    _ => None,
                };
                s = rest;
                Some(promotion.ok_or_else(invalid)?)
            }
            None => None,
        };
        if s.len() < 2 || !s.is_char_boundary(s.len() - 2) {
            return Err(invalid());
        }
        let (prefix, target) = s.split_at(s.len() - 2);
        let to = Position::from_str(target).map_err(|_| invalid())?;
        let mut prefix = prefix;
        let capture = match prefix.strip_suffix('x') {
            Some(rest) => {
                prefix = rest;
                true
            }
            None => false,
        };
        let mut chars = prefix.chars().peekable();
        let from_file = chars.next_if(|c| ('a'..='h').contains(c));
        let from_rank = chars
            .next_if(|c| ('1'..='8').contains(c))
            .and_then(|c| c.to_digit(10))
            .map(|rank| rank as u8);
        if chars.next().is_some() {
            return Err(invalid());
        }
        Ok(Self {
            kind,
            from_file,
            from_rank,
            capture,
            to,
            promotion,
        })
    }
}

/// A move given only by its source and target squares, like `e2e4` or `e7e8q`
///
/// This is what front ends hand to the game: it names a move without knowing anything about the
/// position it is played in.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct MoveRequest {
    pub from: Position,
    pub to: Position,
    /// What a pawn reaching the last rank turns into
    pub promotion: Option<PieceKind>,
}
impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.fen_letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}
impl FromStr for MoveRequest {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NotationError::InvalidCoordinateNotation(s.to_string());
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(invalid());
        }
        let from = s[0..2].parse().map_err(|_| invalid())?;
        let to = s[2..4].parse().map_err(|_| invalid())?;
        let promotion = match s[4..].chars().next() {
            Some(letter) => Some(
                PieceKind::from_letter(letter)
                    .filter(|kind| kind.is_promotable())
                    .ok_or_else(invalid)?,
            ),
            None => None,
        };
        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algebraic_round_trip() {
        #[track_caller]
        fn assert_round_trip(algebraic: &str) {
            let round_trip = SanMove::from_str(algebraic)
                .expect("Couldn't parse input from string")
                .to_string();
            assert_eq!(algebraic, &round_trip);
        }
        assert_round_trip("e4");
        assert_round_trip("e4#");
        assert_round_trip("exd5");
        assert_round_trip("Qxd5");
        assert_round_trip("Qaxg8");
        assert_round_trip("Nb5xd4");
        assert_round_trip("R1e2+");
        assert_round_trip("e8=Q");
        assert_round_trip("fxg1=N+");
        assert_round_trip("O-O");
        assert_round_trip("O-O-O");
    }

    #[test]
    fn test_algebraic_fields() {
        let parsed: SanMove = "Nbxd7+".parse().unwrap();
        assert_eq!(parsed.check, CheckStatus::Check);
        let SanMoveType::Normal(normal) = parsed.move_type else {
            panic!("parsed as a castle");
        };
        assert_eq!(normal.kind, PieceKind::Knight);
        assert_eq!(normal.from_file, Some('b'));
        assert_eq!(normal.from_rank, None);
        assert!(normal.capture);
        assert_eq!(normal.to.to_string(), "d7");
        assert_eq!("0-0".parse::<SanMoveType>(), Ok(SanMoveType::CastleKingside));
    }

    #[test]
    fn test_algebraic_rejects_garbage() {
        for bad in ["", "x", "Z4", "e9", "Kxx4", "e8=K", "e8=", "exd5junk", "Nbb1d2", "é4"] {
            assert!(bad.parse::<SanMove>().is_err(), "{bad} parsed");
        }
    }

    #[test]
    fn test_coordinate_notation() {
        let request: MoveRequest = "e7e8q".parse().unwrap();
        assert_eq!(request.from.to_string(), "e7");
        assert_eq!(request.to.to_string(), "e8");
        assert_eq!(request.promotion, Some(PieceKind::Queen));
        assert_eq!(request.to_string(), "e7e8q");
        assert_eq!("g1f3".parse::<MoveRequest>().unwrap().promotion, None);
        for bad in ["e2", "e2e9", "e7e8k", "e2e4e", "i2i4"] {
            assert_eq!(
                bad.parse::<MoveRequest>(),
                Err(NotationError::InvalidCoordinateNotation(bad.to_string())),
            );
        }
    }
}
