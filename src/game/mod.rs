pub mod authority;
pub mod engine;
pub mod error;
pub mod utils;

pub use authority::{Role, SessionAuthority};
pub use engine::{ChessRules, RulesEngine};
pub use error::{MoveRejection, PositionError};
