//! Whole variants described as JSON

use std::{collections::BTreeMap, io};

use serde::{Deserialize, Serialize};

use board::{
    records::PieceRecord,
    variants::{Standard, Variant, STANDARD_LAYOUT},
    ArchetypeRef, Board, LayoutError, Piece, Player, SetupPosition,
};

use crate::{Game, Result};

fn default_players() -> Vec<Player> {
    Player::SIDES.to_vec()
}

/// Everything needed to start a game of some variant
///
/// Boards and layouts are drawn as text, one row per rank with the highest rank first. In
/// `shape`, `#` marks a square which doesn't exist; in `layout`, `.` is an empty square and any
/// other character is looked up in `legend`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantConfig {
    pub name: String,
    pub ranks: usize,
    pub files: usize,
    /// Leave out for a rectangular board
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Vec<String>>,
    pub archetypes: Vec<PieceRecord>,
    pub legend: BTreeMap<char, ArchetypeRef>,
    pub layout: Vec<String>,
    /// In turn order; white then black if left out
    #[serde(default = "default_players")]
    pub players: Vec<Player>,
}

impl VariantConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl io::Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The built-in 8x8 game
    pub fn standard() -> Self {
        Self {
            name: Standard.name().to_string(),
            ranks: 8,
            files: 8,
            shape: None,
            archetypes: Standard
                .archetypes()
                .iter()
                .map(PieceRecord::from)
                .collect(),
            legend: Standard::legend().into_iter().collect(),
            layout: STANDARD_LAYOUT.iter().map(|row| row.to_string()).collect(),
            players: Standard.players(),
        }
    }

    /// The empty board, checked against the configured size
    pub fn board(&self) -> Result<Board> {
        let board = match &self.shape {
            Some(shape) => Board::with_shape(shape.as_slice())?,
            None => Board::try_new(self.ranks, self.files)?,
        };
        check_size(self, board.ranks(), board.files())?;
        Ok(board)
    }

    pub fn setup(&self) -> Result<SetupPosition> {
        let files = self.layout.first().map_or(0, |row| row.chars().count());
        check_size(self, self.layout.len(), files)?;
        let legend = self.legend.iter().map(|(&symbol, &entry)| (symbol, entry)).collect();
        Ok(SetupPosition::from_text(self.layout.as_slice(), &legend)?)
    }

    pub fn into_game(self) -> Result<Game> {
        let board = self.board()?;
        let setup = self.setup()?;
        let archetypes = self
            .archetypes
            .into_iter()
            .map(Piece::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(variant = %self.name, "starting game");
        Game::with_setup(board, archetypes, self.players, setup)
    }
}

fn check_size(config: &VariantConfig, ranks: usize, files: usize) -> Result<(), LayoutError> {
    if (ranks, files) == (config.ranks, config.files) {
        Ok(())
    } else {
        Err(LayoutError::WrongSize {
            expected: (config.ranks, config.files),
            found: (ranks, files),
        })
    }
}
