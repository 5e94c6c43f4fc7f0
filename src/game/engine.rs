use chess::{ChessMove, Color, Piece, Rank};

use crate::game::error::MoveRejection;
use crate::game::utils::{format_square, parse_promotion, parse_square, promotion_code};
use crate::models::{GamePosition, MoveRequest};

/// Result of applying a legal move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub position: GamePosition,
    /// The move as resolved by the engine, promotion filled in when implied.
    pub normalized: MoveRequest,
}

/// Move legality and position transition.
///
/// Implementations must be deterministic: the same position and request
/// always produce the same outcome.
pub trait RulesEngine {
    fn apply(&self, position: &GamePosition, request: &MoveRequest) -> Result<Transition, MoveRejection>;
}

/// Standard chess rules backed by the `chess` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChessRules;

impl RulesEngine for ChessRules {
    fn apply(&self, position: &GamePosition, request: &MoveRequest) -> Result<Transition, MoveRejection> {
        let source = parse_square(&request.from)
            .ok_or_else(|| MoveRejection::MalformedMove(format!("bad source square {:?}", request.from)))?;
        let dest = parse_square(&request.to)
            .ok_or_else(|| MoveRejection::MalformedMove(format!("bad target square {:?}", request.to)))?;
        let board = position.board();
        let last_rank = match board.side_to_move() {
            Color::White => Rank::Eighth,
            Color::Black => Rank::First,
        };
        let promotes = board.piece_on(source) == Some(Piece::Pawn) && dest.get_rank() == last_rank;

        // A promotion without a piece defaults to a queen. On any other move
        // the promotion field is ignored, whatever it holds.
        let promotion = match (promotes, request.promotion.as_deref()) {
            (false, _) => None,
            (true, None) => Some(Piece::Queen),
            (true, Some(text)) => Some(
                parse_promotion(text)
                    .ok_or_else(|| MoveRejection::MalformedMove(format!("bad promotion piece {:?}", text)))?,
            ),
        };

        let chess_move = ChessMove::new(source, dest, promotion);
        if !board.legal(chess_move) {
            return Err(MoveRejection::IllegalMove);
        }

        Ok(Transition {
            position: position.advance(chess_move),
            normalized: MoveRequest {
                from: format_square(source),
                to: format_square(dest),
                promotion: promotion.map(|piece| promotion_code(piece).to_string()),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(position: &GamePosition, request: MoveRequest) -> Result<Transition, MoveRejection> {
        ChessRules.apply(position, &request)
    }

    #[test]
    fn pawn_advance_is_accepted() {
        let transition = apply(&GamePosition::default(), MoveRequest::new("e2", "e4")).unwrap();
        assert_eq!(transition.normalized, MoveRequest::new("e2", "e4"));
        assert_eq!(
            transition.position.fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
        assert_eq!(transition.position.side_to_move(), Color::Black);
    }

    #[test]
    fn blocked_rook_is_illegal() {
        let result = apply(&GamePosition::default(), MoveRequest::new("a1", "a3"));
        assert_eq!(result, Err(MoveRejection::IllegalMove));
    }

    #[test]
    fn moving_the_opponents_piece_is_illegal() {
        let result = apply(&GamePosition::default(), MoveRequest::new("e7", "e5"));
        assert_eq!(result, Err(MoveRejection::IllegalMove));
    }

    #[test]
    fn unparseable_input_is_malformed() {
        let start = GamePosition::default();
        assert!(matches!(
            apply(&start, MoveRequest::new("z9", "e4")),
            Err(MoveRejection::MalformedMove(_))
        ));
        assert!(matches!(
            apply(&start, MoveRequest::new("e2", "")),
            Err(MoveRejection::MalformedMove(_))
        ));
    }

    #[test]
    fn unknown_promotion_piece_is_malformed_only_when_promoting() {
        let position = GamePosition::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(matches!(
            apply(&position, MoveRequest::new("a7", "a8").with_promotion("king")),
            Err(MoveRejection::MalformedMove(_))
        ));

        // Ignored on an ordinary move, same as a valid piece would be.
        for piece in ["king", "q"] {
            let transition = apply(&GamePosition::default(), MoveRequest::new("e2", "e4").with_promotion(piece)).unwrap();
            assert_eq!(transition.normalized, MoveRequest::new("e2", "e4"));
        }
    }

    #[test]
    fn promotion_defaults_to_queen() {
        let position = GamePosition::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let transition = apply(&position, MoveRequest::new("a7", "a8")).unwrap();
        assert_eq!(transition.normalized, MoveRequest::new("a7", "a8").with_promotion("q"));
        assert!(transition.position.fen().starts_with("Q3k3/"));
    }

    #[test]
    fn promotion_honours_requested_piece() {
        let position = GamePosition::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let transition = apply(&position, MoveRequest::new("a7", "a8").with_promotion("Knight")).unwrap();
        assert_eq!(transition.normalized.promotion.as_deref(), Some("n"));
        assert!(transition.position.fen().starts_with("N3k3/"));
    }

    #[test]
    fn promotion_is_dropped_from_ordinary_moves() {
        let transition = apply(&GamePosition::default(), MoveRequest::new("b1", "c3").with_promotion("q")).unwrap();
        assert_eq!(transition.normalized, MoveRequest::new("b1", "c3"));
    }

    #[test]
    fn castling_is_a_king_move() {
        let position = GamePosition::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let transition = apply(&position, MoveRequest::new("e1", "g1")).unwrap();
        assert_eq!(transition.position.fen(), "4k3/8/8/8/8/8/8/5RK1 b - - 1 1");
    }
}
