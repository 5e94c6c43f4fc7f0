use chess::{Board, ChessMove, Color, Piece};
use std::str::FromStr;

use crate::game::error::PositionError;

/// The single canonical position held by the session authority.
///
/// `chess::Board` carries placement, side to move, castling and en passant
/// state; the move counters it lacks are tracked here so the FEN we publish is
/// complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GamePosition {
    board: Board,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Default for GamePosition {
    fn default() -> Self {
        GamePosition {
            board: Board::default(),
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

impl GamePosition {
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let board = Board::from_str(fen).map_err(|_| PositionError::InvalidFen(fen.to_string()))?;
        let mut counters = fen.split_whitespace().skip(4);
        let halfmove_clock = match counters.next() {
            Some(field) => field.parse().map_err(|_| PositionError::InvalidFen(fen.to_string()))?,
            None => 0,
        };
        let fullmove_number = match counters.next() {
            Some(field) => field.parse().map_err(|_| PositionError::InvalidFen(fen.to_string()))?,
            None => 1,
        };
        if fullmove_number == 0 {
            return Err(PositionError::InvalidFen(fen.to_string()));
        }

        Ok(GamePosition {
            board,
            halfmove_clock,
            fullmove_number,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Whose move it is. This is the only turn indicator in the server.
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Play an already-legal move and return the resulting position.
    pub fn advance(&self, chess_move: ChessMove) -> GamePosition {
        let mover = self.board.side_to_move();
        let is_pawn_move = self.board.piece_on(chess_move.get_source()) == Some(Piece::Pawn);
        let is_capture = self.board.piece_on(chess_move.get_dest()).is_some();

        GamePosition {
            board: self.board.make_move_new(chess_move),
            halfmove_clock: if is_pawn_move || is_capture {
                0
            } else {
                self.halfmove_clock + 1
            },
            fullmove_number: if mover == Color::Black {
                self.fullmove_number + 1
            } else {
                self.fullmove_number
            },
        }
    }

    /// Full six-field FEN.
    pub fn fen(&self) -> String {
        // The board's own rendering always ends in "0 1"; keep its first four
        // fields and append our counters.
        let rendered = self.board.to_string();
        let fields: Vec<&str> = rendered.split_whitespace().take(4).collect();
        format!("{} {} {}", fields.join(" "), self.halfmove_clock, self.fullmove_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::Square;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn default_position_is_the_standard_start() {
        let position = GamePosition::default();
        assert_eq!(position.fen(), START_FEN);
        assert_eq!(position.side_to_move(), Color::White);
    }

    #[test]
    fn counters_follow_pawn_moves_and_black_replies() {
        let start = GamePosition::default();
        let knight = start.advance(ChessMove::new(Square::G1, Square::F3, None));
        assert_eq!(knight.halfmove_clock(), 1);
        assert_eq!(knight.fullmove_number(), 1);
        assert_eq!(knight.fen(), "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1");

        let reply = knight.advance(ChessMove::new(Square::E7, Square::E5, None));
        assert_eq!(reply.halfmove_clock(), 0);
        assert_eq!(reply.fullmove_number(), 2);
        assert_eq!(reply.side_to_move(), Color::White);
    }

    #[test]
    fn from_fen_reads_counters() {
        let fen = "4k3/8/8/8/8/8/8/4K2R w K - 12 40";
        let position = GamePosition::from_fen(fen).unwrap();
        assert_eq!(position.halfmove_clock(), 12);
        assert_eq!(position.fullmove_number(), 40);
        assert_eq!(position.fen(), fen);
    }

    #[test]
    fn from_fen_rejects_garbage() {
        assert!(GamePosition::from_fen("not a position").is_err());
        assert!(GamePosition::from_fen("4k3/8/8/8/8/8/8/4K3 w - - x 1").is_err());
    }
}
