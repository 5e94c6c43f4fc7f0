use thiserror::Error;

/// Why a proposed move was not admitted.
///
/// All variants are local to the offending connection: the position is left
/// untouched and the request is echoed back as `invalidMove`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveRejection {
    /// The sender does not hold the seat for the side to move. Spectators
    /// always land here.
    #[error("not your turn")]
    NotYourTurn,

    #[error("illegal move")]
    IllegalMove,

    #[error("malformed move: {0}")]
    MalformedMove(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("invalid FEN `{0}`")]
    InvalidFen(String),
}
