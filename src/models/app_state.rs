use crate::websocket::{ActorChannel, GameHub};

/// Application state shared between connections
pub type AppState = GameHub<ActorChannel>;
