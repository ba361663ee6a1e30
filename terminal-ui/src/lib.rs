//! Two people taking turns at one terminal

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use board::{Move, MoveFromStrErr, Position, PositionFromStrErr};
use game::{config::VariantConfig, Game, GameState};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("couldn't open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Game(#[from] game::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Start a game of the variant described in the file, or of standard chess
pub fn load_game(variant: Option<&Path>) -> Result<Game, Error> {
    let config = match variant {
        Some(path) => {
            let file = File::open(path).map_err(|source| Error::Open {
                path: path.to_path_buf(),
                source,
            })?;
            VariantConfig::from_reader(BufReader::new(file))?
        }
        None => VariantConfig::standard(),
    };
    Ok(config.into_game()?)
}

/// A line typed at the prompt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `rank,file rank,file`
    Move(Move),
    /// `promote <name>`
    Promote(String),
    /// `moves rank,file`: list where the piece there can go
    Moves(Position),
    Reset,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("nothing entered")]
    Empty,
    #[error("`promote` needs the name of a piece")]
    MissingPiece,
    #[error(transparent)]
    Position(#[from] PositionFromStrErr),
    #[error(transparent)]
    Move(#[from] MoveFromStrErr),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (word, rest) = s.split_once(' ').unwrap_or((s, ""));
        match word {
            "" => Err(CommandError::Empty),
            "q" | "quit" => Ok(Self::Quit),
            "reset" => Ok(Self::Reset),
            "moves" => Ok(Self::Moves(rest.parse()?)),
            "promote" => match rest.trim() {
                "" => Err(CommandError::MissingPiece),
                name => Ok(Self::Promote(name.to_string())),
            },
            _ => Ok(Self::Move(s.parse()?)),
        }
    }
}

/// Reads commands for whoever's turn it is, and shows the board after each one
pub struct TerminalUi<R, W> {
    game: Game,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalUi<R, W> {
    pub fn new(game: Game, input: R, output: W) -> Self {
        Self {
            game,
            input,
            output,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Play until the game ends, someone quits, or the input runs out
    pub fn run(&mut self) -> io::Result<GameState> {
        self.show_board()?;
        while !self.game.state().is_over() {
            write!(self.output, "{} > ", self.prompt())?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => self.handle(command)?,
                Err(CommandError::Empty) => {}
                Err(err) => writeln!(self.output, "{err}")?,
            }
        }
        match self.game.state() {
            GameState::Victory(winner) => writeln!(self.output, "{winner} wins")?,
            GameState::Draw => writeln!(self.output, "draw")?,
            _ => {}
        }
        Ok(self.game.state().clone())
    }

    fn prompt(&self) -> String {
        match self.game.state() {
            GameState::Promoting(piece) => {
                let names: Vec<_> = piece
                    .promotion_pieces
                    .iter()
                    .filter_map(|&id| self.game.piece(id))
                    .map(|archetype| archetype.name.to_lowercase())
                    .collect();
                format!("{} promotes to ({})", piece.owner, names.join("/"))
            }
            _ => self.game.active_player().to_string(),
        }
    }

    fn handle(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::Move(mv) => match self.game.try_move(mv, true) {
                Ok(()) => self.show_board()?,
                Err(err) => writeln!(self.output, "{err}")?,
            },
            Command::Promote(name) => {
                let id = self
                    .game
                    .archetypes()
                    .iter()
                    .find(|archetype| archetype.name.eq_ignore_ascii_case(&name))
                    .map(|archetype| archetype.id);
                match id.map(|id| self.game.try_promote_to(id)) {
                    Some(Ok(())) => self.show_board()?,
                    Some(Err(err)) => writeln!(self.output, "{err}")?,
                    None => writeln!(self.output, "no piece called {name:?}")?,
                }
            }
            Command::Moves(at) => match self.game.board().piece(at) {
                Some(piece) => {
                    let ends: Vec<_> = self
                        .game
                        .legal_moves(piece)
                        .iter()
                        .map(|mv| mv.end().to_string())
                        .collect();
                    writeln!(self.output, "{}", ends.join(" "))?;
                }
                None => writeln!(self.output, "no piece at {at}")?,
            },
            Command::Reset => {
                if let Err(err) = self.game.reset() {
                    writeln!(self.output, "{err}")?;
                }
                self.show_board()?;
            }
            Command::Quit => {}
        }
        Ok(())
    }

    fn show_board(&mut self) -> io::Result<()> {
        write!(self.output, "{}", self.game.board())?;
        let threatened = self
            .game
            .important_pieces_threatened(self.game.active_player());
        if threatened > 0 && !self.game.state().is_over() {
            writeln!(self.output, "{} is in check", self.game.active_player())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use board::Player;

    fn play(input: &str) -> (GameState, String) {
        let game = load_game(None).unwrap();
        let mut output = Vec::new();
        let state = TerminalUi::new(game, Cursor::new(input), &mut output)
            .run()
            .unwrap();
        (state, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "1,4 3,4".parse::<Command>(),
            Ok(Command::Move(
                Move::new(Position::new(1, 4), Position::new(3, 4)).unwrap()
            ))
        );
        assert_eq!("  quit ".parse::<Command>(), Ok(Command::Quit));
        assert_eq!(
            "promote Queen".parse::<Command>(),
            Ok(Command::Promote("Queen".to_string()))
        );
        assert_eq!("promote".parse::<Command>(), Err(CommandError::MissingPiece));
        assert_eq!(
            "moves 0,1".parse::<Command>(),
            Ok(Command::Moves(Position::new(0, 1)))
        );
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert!("1,4".parse::<Command>().is_err());
    }

    #[test]
    fn test_fools_mate() {
        let (state, output) = play("1,5 2,5\n6,4 4,4\n1,6 3,6\n7,3 3,7\n");
        assert_eq!(state, GameState::Victory(Player::Black));
        assert!(output.ends_with("black wins\n"));
    }

    #[test]
    fn test_bad_input_keeps_going() {
        let (state, output) = play("nonsense\n1,4 4,4\n\n0,1 2,2\nquit\n0,6 2,5\n");
        assert_eq!(state, GameState::OnGoing);
        assert!(output.contains("the piece can't make the move 1,4 4,4"));
        assert!(output.contains("black > "));
    }

    #[test]
    fn test_list_moves() {
        let (_, output) = play("moves 0,1\nmoves 4,4\n");
        assert!(output.contains("2,0 2,2\n"));
        assert!(output.contains("no piece at 4,4"));
    }

    #[test]
    fn test_missing_variant_file() {
        let err = load_game(Some(Path::new("/no/such/variant.json"))).unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
    }
}
