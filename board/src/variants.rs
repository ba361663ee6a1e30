//! Variants of the game: the board, archetype roster and layout a game starts from

use std::collections::HashMap;

use crate::{
    ArchetypeRef, Board, Mover, Pattern, PatternKind, Piece, PieceId, Player, Position,
    SetupPosition,
};

/// Everything needed to start a game of some variant
pub trait Variant {
    fn name(&self) -> &str;

    /// The empty board the game is played on
    fn board(&self) -> Board;

    /// The templates that pieces are copied from, owned by [`Player::Either`]
    fn archetypes(&self) -> Vec<Piece>;

    /// Where each archetype starts
    fn setup(&self) -> SetupPosition;

    /// The players, in turn order
    fn players(&self) -> Vec<Player> {
        Player::SIDES.to_vec()
    }
}

pub const PAWN: PieceId = PieceId(1);
pub const KNIGHT: PieceId = PieceId(2);
pub const BISHOP: PieceId = PieceId(3);
pub const ROOK: PieceId = PieceId(4);
pub const QUEEN: PieceId = PieceId(5);
pub const KING: PieceId = PieceId(6);

/// The standard starting position, drawn with the symbols of [`Standard::legend`]
pub const STANDARD_LAYOUT: [&str; 8] = [
    "rnbqkbnr",
    "pppppppp",
    "........",
    "........",
    "........",
    "........",
    "PPPPPPPP",
    "RNBQKBNR",
];

const BACK_RANK: [PieceId; 8] = [ROOK, KNIGHT, BISHOP, QUEEN, KING, BISHOP, KNIGHT, ROOK];

/// Chess on an 8x8 board, without castling or en passant
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Standard;
impl Standard {
    /// Letters for the standard pieces: uppercase for white, lowercase for black
    pub fn legend() -> HashMap<char, ArchetypeRef> {
        [
            ('p', PAWN),
            ('n', KNIGHT),
            ('b', BISHOP),
            ('r', ROOK),
            ('q', QUEEN),
            ('k', KING),
        ]
        .into_iter()
        .flat_map(|(symbol, archetype)| {
            [
                (symbol.to_ascii_uppercase(), ArchetypeRef::new(archetype, Player::White)),
                (symbol, ArchetypeRef::new(archetype, Player::Black)),
            ]
        })
        .collect()
    }

    pub fn pawn() -> Piece {
        let promotion_zone = (0..8)
            .flat_map(|file| [Position::new(0, file), Position::new(7, file)])
            .collect();
        Piece::new(
            PAWN,
            "Pawn",
            Mover::new(
                vec![Pattern::new(PatternKind::Pawn)],
                vec![Pattern::new(PatternKind::PawnCapture)],
            ),
        )
        .with_first_move(Mover::new(
            vec![
                Pattern::new(PatternKind::Pawn),
                Pattern::new(PatternKind::PawnFirstMove),
            ],
            vec![Pattern::new(PatternKind::PawnCapture)],
        ))
        .promoting(promotion_zone, vec![ROOK, KNIGHT, BISHOP, QUEEN])
    }

    pub fn knight() -> Piece {
        Piece::new(KNIGHT, "Knight", Mover::symmetric(vec![PatternKind::Knight.into()]))
    }

    pub fn bishop() -> Piece {
        Piece::new(BISHOP, "Bishop", Mover::symmetric(vec![PatternKind::Bishop.into()]))
    }

    pub fn rook() -> Piece {
        Piece::new(ROOK, "Rook", Mover::symmetric(vec![PatternKind::Rook.into()]))
    }

    pub fn queen() -> Piece {
        Piece::new(QUEEN, "Queen", Mover::symmetric(vec![PatternKind::Queen.into()]))
    }

    pub fn king() -> Piece {
        Piece::new(KING, "King", Mover::symmetric(vec![PatternKind::King.into()])).important()
    }
}
impl Variant for Standard {
    fn name(&self) -> &str {
        "standard"
    }

    fn board(&self) -> Board {
        Board::new(8, 8)
    }

    fn archetypes(&self) -> Vec<Piece> {
        vec![
            Self::pawn(),
            Self::knight(),
            Self::bishop(),
            Self::rook(),
            Self::queen(),
            Self::king(),
        ]
    }

    fn setup(&self) -> SetupPosition {
        let mut setup = SetupPosition::new();
        for (file, archetype) in BACK_RANK.into_iter().enumerate() {
            let file = file as i32;
            setup.add_piece(archetype, Position::new(0, file), Player::White);
            setup.add_piece(PAWN, Position::new(1, file), Player::White);
            setup.add_piece(PAWN, Position::new(6, file), Player::Black);
            setup.add_piece(archetype, Position::new(7, file), Player::Black);
        }
        setup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_setup() {
        let from_text = SetupPosition::from_text(&STANDARD_LAYOUT, &Standard::legend()).unwrap();
        assert_eq!(from_text, Standard.setup());
        assert_eq!(
            from_text.get(Position::new(0, 4)),
            Some(ArchetypeRef::new(KING, Player::White)),
        );
        assert_eq!(
            from_text.get(Position::new(7, 3)),
            Some(ArchetypeRef::new(QUEEN, Player::Black)),
        );
    }

    #[test]
    fn test_archetypes_are_distinct_and_unowned() {
        let archetypes = Standard.archetypes();
        for (idx, archetype) in archetypes.iter().enumerate() {
            assert_eq!(archetype.owner, Player::Either);
            assert!(archetypes[idx + 1..].iter().all(|other| other.id != archetype.id));
        }
        let important: Vec<_> = archetypes.iter().filter(|piece| piece.is_important).collect();
        assert_eq!(important.len(), 1);
        assert_eq!(important[0].id, KING);
    }

    #[test]
    fn test_pawn_promotes_on_back_ranks() {
        let pawn = Standard::pawn();
        assert_eq!(pawn.promotion_zone.len(), 16);
        assert!(pawn.clone().at(Position::new(7, 3)).can_promote());
        assert!(pawn.clone().at(Position::new(0, 3)).can_promote());
        assert!(!pawn.at(Position::new(5, 3)).can_promote());
    }
}
