use chess::{Board, BoardStatus, Color, File, Piece, Rank, Square};

use crate::models::GamePosition;

/// Convert a chess color to its wire code (`"w"` / `"b"`)
pub fn color_code(color: Color) -> &'static str {
    match color {
        Color::White => "w",
        Color::Black => "b",
    }
}

/// Convert a chess color to a string
pub fn color_to_string(color: Color) -> String {
    match color {
        Color::White => "white".to_string(),
        Color::Black => "black".to_string(),
    }
}

/// Name of the square drawn at `row_index`, `col` in a grid whose row 0 is rank 8.
pub fn square_name(row_index: usize, col: usize) -> Option<String> {
    if row_index > 7 || col > 7 {
        return None;
    }
    let file = (b'a' + col as u8) as char;
    Some(format!("{}{}", file, 8 - row_index))
}

/// Grid coordinates (`row_index`, `col`) of an algebraic square name.
pub fn grid_position(name: &str) -> Option<(usize, usize)> {
    let bytes = name.trim().as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = bytes[0].to_ascii_lowercase();
    let rank = bytes[1];
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }
    Some((8 - (rank - b'0') as usize, (file - b'a') as usize))
}

/// Parse an algebraic square name into a board square
pub fn parse_square(name: &str) -> Option<Square> {
    let (row_index, col) = grid_position(name)?;
    Some(Square::make_square(
        Rank::from_index(7 - row_index),
        File::from_index(col),
    ))
}

/// Algebraic name of a board square
pub fn format_square(square: Square) -> String {
    let row_index = 7 - square.get_rank().to_index();
    let col = square.get_file().to_index();
    // make_square never yields an out-of-range index
    square_name(row_index, col).unwrap_or_default()
}

/// Parse a promotion piece: a letter (`q`) or a name (`queen`), any case.
pub fn parse_promotion(text: &str) -> Option<Piece> {
    match text.trim().to_ascii_lowercase().as_str() {
        "q" | "queen" => Some(Piece::Queen),
        "r" | "rook" => Some(Piece::Rook),
        "b" | "bishop" => Some(Piece::Bishop),
        "n" | "knight" => Some(Piece::Knight),
        _ => None,
    }
}

pub fn promotion_code(piece: Piece) -> &'static str {
    match piece {
        Piece::Queen => "q",
        Piece::Rook => "r",
        Piece::Bishop => "b",
        Piece::Knight => "n",
        Piece::King => "k",
        Piece::Pawn => "p",
    }
}

/// Get the game status as a string
pub fn get_game_status(position: &GamePosition) -> String {
    let board = position.board();
    match board.status() {
        BoardStatus::Checkmate => match board.side_to_move() {
            Color::White => "black_wins".to_string(),
            Color::Black => "white_wins".to_string(),
        },
        BoardStatus::Stalemate => "stalemate".to_string(),
        BoardStatus::Ongoing => {
            if has_insufficient_material(board) {
                "draw".to_string()
            } else if position.halfmove_clock() >= 100 {
                "fifty_move_rule".to_string()
            } else if board.checkers().popcnt() > 0 {
                "check".to_string()
            } else {
                format!("{}_turn", color_to_string(board.side_to_move()))
            }
        }
    }
}

/// Checkmate or stalemate: no legal moves remain.
pub fn is_game_over(position: &GamePosition) -> bool {
    matches!(
        position.board().status(),
        BoardStatus::Checkmate | BoardStatus::Stalemate
    )
}

/// A draw could be claimed or is inevitable, but moves are still legal.
pub fn is_drawish(position: &GamePosition) -> bool {
    !is_game_over(position)
        && (position.halfmove_clock() >= 100 || has_insufficient_material(position.board()))
}

/// Check if the board has insufficient material for checkmate
pub fn has_insufficient_material(board: &Board) -> bool {
    let mut minors = [0u32; 2];
    // Square colour of each side's bishops: [light, dark]
    let mut bishop_shades = [[false; 2]; 2];

    for square in chess::ALL_SQUARES {
        let (Some(piece), Some(color)) = (board.piece_on(square), board.color_on(square)) else {
            continue;
        };
        let side = color.to_index();
        match piece {
            Piece::Pawn | Piece::Rook | Piece::Queen => return false,
            Piece::Knight => minors[side] += 1,
            Piece::Bishop => {
                minors[side] += 1;
                let shade = (square.get_rank().to_index() + square.get_file().to_index()) % 2;
                bishop_shades[side][shade] = true;
            }
            Piece::King => {}
        }
    }

    match (minors[0], minors[1]) {
        // King vs king, or a lone minor piece against a bare king
        (0, 0) | (1, 0) | (0, 1) => true,
        // Bishop against bishop on the same square colour
        (1, 1) => bishop_shades[0] == bishop_shades[1] && bishop_shades[0].iter().any(|b| *b),
        _ => false,
    }
}
