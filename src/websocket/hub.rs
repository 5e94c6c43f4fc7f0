use log::{debug, info, warn};
use serde_json::Value;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::game::utils::{color_code, get_game_status, is_game_over, is_drawish};
use crate::game::{ChessRules, MoveRejection, Role, RulesEngine, SessionAuthority};
use crate::models::{ClientMessage, ConnectionId, MoveRequest, ServerMessage};
use crate::websocket::channel::Channel;

/// Connects the session authority to a channel.
///
/// Each handler takes the authority lock once and issues its sends before
/// releasing it, so every receiver sees events in admission order.
pub struct GameHub<C, E = ChessRules> {
    authority: Mutex<SessionAuthority<E>>,
    channel: C,
}

impl<C: Channel, E: RulesEngine> GameHub<C, E> {
    pub fn new(authority: SessionAuthority<E>, channel: C) -> Self {
        GameHub {
            authority: Mutex::new(authority),
            channel,
        }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Engine panics are caught inside the authority, so a poisoned lock
    /// still guards consistent state.
    pub fn authority(&self) -> MutexGuard<'_, SessionAuthority<E>> {
        self.authority.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seat a new connection and tell it where it stands.
    pub fn on_connect(&self, conn: ConnectionId) -> Role {
        let mut authority = self.authority();
        let role = authority.assign_role(conn);
        let announcement = match role.color() {
            Some(color) => ServerMessage::PlayerRole(color_code(color).to_string()),
            None => ServerMessage::SpectatorRole,
        };
        self.channel.unicast(conn, &announcement);
        self.channel
            .unicast(conn, &ServerMessage::BoardState(authority.position().fen()));
        role
    }

    pub fn on_disconnect(&self, conn: ConnectionId) {
        if self.authority().release_role(conn).is_none() {
            info!("Spectator {} left", conn);
        }
    }

    /// Handle one text frame from `conn`.
    pub fn on_message(&self, conn: ConnectionId, text: &str) {
        let msg = match serde_json::from_str::<ClientMessage>(text) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("Ignoring message from {}: {} ({})", conn, text, e);
                return;
            }
        };
        match msg.message_type.as_str() {
            "move" => self.handle_move(conn, msg.payload),
            other => warn!("Unknown message type from {}: {}", conn, other),
        }
    }

    fn handle_move(&self, conn: ConnectionId, payload: Value) {
        let request = match serde_json::from_value::<MoveRequest>(payload.clone()) {
            Ok(request) => request,
            Err(e) => {
                info!("Malformed move from {}: {}", conn, e);
                self.channel.unicast(conn, &ServerMessage::InvalidMove(payload));
                return;
            }
        };

        let mut authority = self.authority();
        match authority.submit_move(conn, &request) {
            Ok(accepted) => {
                let fen = accepted.position.fen();
                info!("Move {} -> {} by {}; position {}", accepted.normalized.from, accepted.normalized.to, conn, fen);
                let status = get_game_status(&accepted.position);
                if is_game_over(&accepted.position) {
                    info!("Game over: {}", status);
                } else if is_drawish(&accepted.position) {
                    info!("Draw claimable, play continues: {}", status);
                } else {
                    debug!("Game status: {}", status);
                }
                self.channel.broadcast(&ServerMessage::Move(accepted.normalized));
                self.channel.broadcast(&ServerMessage::BoardState(fen));
            }
            Err(rejection) => {
                log_rejection(conn, &request, &rejection);
                self.channel.unicast(conn, &ServerMessage::InvalidMove(payload));
            }
        }
    }
}

fn log_rejection(conn: ConnectionId, request: &MoveRequest, rejection: &MoveRejection) {
    match rejection {
        MoveRejection::NotYourTurn => info!("Rejected {:?} from {}: {}", request, conn, rejection),
        MoveRejection::IllegalMove | MoveRejection::MalformedMove(_) => {
            info!("Invalid move from {}: {:?} ({})", conn, request, rejection)
        }
    }
}
