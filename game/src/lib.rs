//! A game played on a [`Board`]: whose turn it is, which moves are legal, promotion, and how the
//! game ends
//!
//! The board only knows how pieces move. The [`Game`] adds the rules that need the whole
//! position: a player may only move their own pieces, may not leave an important piece
//! threatened, and loses when they can't move while one is.

use board::{
    variants::Variant, ArchetypeRef, Board, LayoutError, Move, Piece, PieceId, Player, Position,
    RecordError, SetupPosition,
};
use tracing::{debug, info, trace};

pub mod config;
pub mod threats;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("a game needs at least one player")]
    NoPlayers,
    #[error("no archetype with id {0}")]
    UnknownArchetype(PieceId),
    #[error("{0} is not a square on the board")]
    NotOnBoard(Position),
    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("invalid record: {0}")]
    Record(#[from] RecordError),
    #[error("invalid variant config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("the game is over")]
    GameOver,
    #[error("a piece is waiting to be promoted")]
    AwaitingPromotion,
    #[error("it is {active}'s turn, but the piece belongs to {owner}")]
    NotPlayersTurn { active: Player, owner: Player },
    #[error("no piece at {0}")]
    SourcePieceMissing(Position),
    #[error("the piece can't make the move {0}")]
    MoveNeverLegal(Move),
    #[error("the move leaves {0} important piece(s) threatened")]
    MovingIntoCheck(usize),
    #[error("no piece is waiting to be promoted")]
    NotPromoting,
    #[error("{0} is not one of the pieces on offer")]
    PromotionNotOffered(PieceId),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Where a game is in its lifecycle
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    OnGoing,
    /// The piece has reached its promotion zone, and the game waits for [`Game::promote_to`]
    Promoting(Piece),
    Draw,
    Victory(Player),
}
impl GameState {
    /// Whether no more moves can be made
    pub const fn is_over(&self) -> bool {
        matches!(self, Self::Draw | Self::Victory(_))
    }
}

/// A game in progress
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    setup: SetupPosition,
    /// The templates placed pieces are copied from
    archetypes: Vec<Piece>,
    /// Never empty
    players: Vec<Player>,
    active_player: Player,
    state: GameState,
}

impl Game {
    /// Start a game on a board that already has its pieces placed
    ///
    /// The first player moves first.
    pub fn new(board: Board, archetypes: Vec<Piece>, players: Vec<Player>) -> Result<Self> {
        let active_player = *players.first().ok_or(Error::NoPlayers)?;
        Ok(Self {
            setup: SetupPosition::from_board(&board),
            board,
            archetypes,
            players,
            active_player,
            state: GameState::OnGoing,
        })
    }

    /// Start a game by placing a copy of each archetype where `setup` says
    ///
    /// Any pieces already on the board are removed first.
    pub fn with_setup(
        board: Board,
        archetypes: Vec<Piece>,
        players: Vec<Player>,
        setup: SetupPosition,
    ) -> Result<Self> {
        let mut game = Self::new(board, archetypes, players)?;
        game.setup = setup;
        game.reset()?;
        Ok(game)
    }

    pub fn from_variant(variant: &impl Variant) -> Result<Self> {
        info!(variant = variant.name(), "starting game");
        Self::with_setup(
            variant.board(),
            variant.archetypes(),
            variant.players(),
            variant.setup(),
        )
    }

    /// Put the pieces back where the setup says and start again from the first player's turn
    ///
    /// If the setup can't be placed, the game is left as it was.
    pub fn reset(&mut self) -> Result<()> {
        let mut board = self.board.clone();
        board.clear_pieces();
        board.clear_archetypes();
        for (archetype, position, owner) in self.setup.pieces() {
            let mut piece = self
                .piece(archetype)
                .ok_or(Error::UnknownArchetype(archetype))?
                .clone()
                .owned_by(owner);
            piece.has_moved = false;
            if !board.place_piece(piece, position) {
                return Err(Error::NotOnBoard(position));
            }
            board.set_archetype(position, Some(ArchetypeRef::new(archetype, owner)));
        }
        self.board = board;
        self.active_player = self.players[0];
        self.state = GameState::OnGoing;
        debug!(pieces = self.setup.len(), "placed setup");
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn setup(&self) -> &SetupPosition {
        &self.setup
    }

    pub fn archetypes(&self) -> &[Piece] {
        &self.archetypes
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn active_player(&self) -> Player {
        self.active_player
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The archetype with the given id
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.archetypes.iter().find(|archetype| archetype.id == id)
    }

    /// Make a move, returning whether it was made
    ///
    /// See [`Game::try_move`] for when a move is refused.
    pub fn make_move(&mut self, mv: Move, only_allow_legal_moves: bool) -> bool {
        self.try_move(mv, only_allow_legal_moves).is_ok()
    }

    /// Make a move, or say why it can't be made
    ///
    /// No move can be made while a promotion is pending or once the game is over. Otherwise the
    /// piece at the start must be able to make the move, and if `only_allow_legal_moves` is set
    /// it must also belong to the active player and the move must not leave any of their
    /// important pieces threatened. A refused move changes nothing.
    ///
    /// After the move, the game waits for a promotion if the piece can promote where it landed,
    /// and otherwise passes the turn on.
    pub fn try_move(&mut self, mv: Move, only_allow_legal_moves: bool) -> Result<()> {
        let result = self.apply_move(mv, only_allow_legal_moves);
        match &result {
            Ok(()) => trace!(%mv, "made move"),
            Err(err) => debug!(%mv, %err, "rejected move"),
        }
        result
    }

    fn apply_move(&mut self, mv: Move, only_allow_legal_moves: bool) -> Result<()> {
        match self.state {
            GameState::OnGoing => {}
            GameState::Promoting(_) => return Err(Error::AwaitingPromotion),
            GameState::Draw | GameState::Victory(_) => return Err(Error::GameOver),
        }
        let piece = self
            .board
            .piece(mv.start())
            .ok_or(Error::SourcePieceMissing(mv.start()))?;
        if only_allow_legal_moves && piece.owner != self.active_player {
            return Err(Error::NotPlayersTurn {
                active: self.active_player,
                owner: piece.owner,
            });
        }
        let board = self.board.after_move(mv).ok_or(Error::MoveNeverLegal(mv))?;
        if only_allow_legal_moves {
            let threatened = threats::important_pieces_threatened(&board, self.active_player);
            if threatened > 0 {
                return Err(Error::MovingIntoCheck(threatened));
            }
        }
        self.board = board;

        let promoting = self
            .board
            .piece(mv.end())
            .filter(|piece| piece.can_promote())
            .cloned();
        match promoting {
            Some(piece) => {
                info!(piece = %piece.name, at = %mv.end(), "waiting for promotion");
                self.state = GameState::Promoting(piece);
            }
            None => self.next_turn(),
        }
        Ok(())
    }

    /// Promote the waiting piece into a copy of the archetype with the given id, returning
    /// whether it was promoted
    pub fn promote_to(&mut self, id: PieceId) -> bool {
        self.try_promote_to(id).is_ok()
    }

    /// Promote the waiting piece, or say why it can't be promoted
    ///
    /// The archetype must be one the waiting piece offers. On success the new piece replaces the
    /// old one, and the turn passes on.
    pub fn try_promote_to(&mut self, id: PieceId) -> Result<()> {
        let result = self.apply_promotion(id);
        if let Err(err) = &result {
            debug!(%id, %err, "rejected promotion");
        }
        result
    }

    fn apply_promotion(&mut self, id: PieceId) -> Result<()> {
        let GameState::Promoting(waiting) = &self.state else {
            return Err(Error::NotPromoting);
        };
        if !waiting.promotion_pieces.contains(&id) {
            return Err(Error::PromotionNotOffered(id));
        }
        let mut promoted = self
            .piece(id)
            .ok_or(Error::UnknownArchetype(id))?
            .clone()
            .owned_by(waiting.owner);
        promoted.has_moved = true;
        let at = waiting.position();
        info!(from = %waiting.name, to = %promoted.name, %at, "promoted");
        if !self.board.place_piece(promoted, at) {
            return Err(Error::NotOnBoard(at));
        }
        self.state = GameState::OnGoing;
        self.next_turn();
        Ok(())
    }

    /// Rearrange the starting layout, moving an entry without any regard for how its piece moves
    ///
    /// This is for editing a game before it's played: the turn and state don't change. Returns
    /// false if the setup has no entry at the start or the board has no square at the end. While
    /// the entry's piece is still unmoved at the start, it follows the entry on the board too.
    pub fn move_setup(&mut self, mv: Move) -> bool {
        let Some(entry) = self.setup.get(mv.start()) else {
            debug!(%mv, "no setup entry to move");
            return false;
        };
        if !self.setup.apply_move(mv, &self.board) {
            debug!(%mv, "rejected setup move");
            return false;
        }
        let unmoved = self.board.piece(mv.start()).is_some_and(|piece| {
            piece.id == entry.archetype && piece.owner == entry.owner && !piece.has_moved
        });
        match unmoved.then(|| self.board.after_setup_move(mv)).flatten() {
            Some(board) => self.board = board,
            None => {
                self.board.set_archetype(mv.start(), None);
                self.board.set_archetype(mv.end(), Some(entry));
            }
        }
        true
    }

    /// Whether the active player could make the move
    ///
    /// This ignores whose piece is moving and the state of the game.
    pub fn is_move_legal(&self, mv: Move) -> bool {
        self.is_move_legal_for(mv, self.active_player)
    }

    fn is_move_legal_for(&self, mv: Move, player: Player) -> bool {
        self.board
            .after_move(mv)
            .is_some_and(|board| threats::important_pieces_threatened(&board, player) == 0)
    }

    /// Every legal move for the piece
    pub fn legal_moves(&self, piece: &Piece) -> Vec<Move> {
        self.candidate_moves(piece)
            .filter(|&mv| self.is_move_legal(mv))
            .collect()
    }

    /// Whether any of the player's pieces has a move which leaves that player out of check
    pub fn player_has_legal_moves(&self, player: Player) -> bool {
        self.board.pieces(player).any(|piece| {
            self.candidate_moves(piece)
                .any(|mv| self.is_move_legal_for(mv, player))
        })
    }

    /// Moves from the piece's position to every other square of the board
    fn candidate_moves<'a>(&'a self, piece: &Piece) -> impl Iterator<Item = Move> + 'a {
        let start = piece.position();
        self.board
            .positions()
            .filter_map(move |end| Move::new(start, end))
    }

    /// The number of `player`'s important pieces that are currently threatened
    pub fn important_pieces_threatened(&self, player: Player) -> usize {
        threats::important_pieces_threatened(&self.board, player)
    }

    /// Pass the turn to the next player, and end the game if they can't move
    fn next_turn(&mut self) {
        let previous = self.active_player;
        let next_idx = self
            .players
            .iter()
            .position(|&player| player == previous)
            .map_or(0, |idx| (idx + 1) % self.players.len());
        self.active_player = self.players[next_idx];
        if self.player_has_legal_moves(self.active_player) {
            return;
        }
        if self.important_pieces_threatened(self.active_player) > 0 {
            info!(winner = %previous, "checkmate");
            self.state = GameState::Victory(previous);
        } else {
            info!(player = %self.active_player, "stalemate");
            self.state = GameState::Draw;
        }
    }
}
