use actix::Recipient;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::{ChessWebSocketMessage, ConnectionId, ServerMessage};

/// Outbound half of the realtime channel layer.
///
/// Sends are fire-and-forget. A unicast to a connection that is already gone
/// is dropped; a broadcast reaches every connection registered at the time of
/// the call, the sender included.
pub trait Channel {
    fn unicast(&self, conn: ConnectionId, message: &ServerMessage);
    fn broadcast(&self, message: &ServerMessage);
}

/// Channel over the per-connection WebSocket actors' mailboxes.
#[derive(Default)]
pub struct ActorChannel {
    sessions: Mutex<HashMap<ConnectionId, Recipient<ChessWebSocketMessage>>>,
}

impl ActorChannel {
    fn sessions(&self) -> MutexGuard<'_, HashMap<ConnectionId, Recipient<ChessWebSocketMessage>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, conn: ConnectionId, recipient: Recipient<ChessWebSocketMessage>) {
        let mut sessions = self.sessions();
        sessions.insert(conn, recipient);
        info!("WebSocket connection started: {}", conn);
        info!("Total active sessions: {}", sessions.len());
    }

    pub fn unregister(&self, conn: ConnectionId) {
        let mut sessions = self.sessions();
        sessions.remove(&conn);
        info!("WebSocket connection closed: {}", conn);
        info!("Total active sessions: {}", sessions.len());
    }
}

fn encode(message: &ServerMessage) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("Error serializing message: {}", e);
            None
        }
    }
}

impl Channel for ActorChannel {
    fn unicast(&self, conn: ConnectionId, message: &ServerMessage) {
        let Some(text) = encode(message) else {
            return;
        };
        match self.sessions().get(&conn) {
            Some(recipient) => {
                recipient.do_send(ChessWebSocketMessage(text));
            }
            None => debug!("Dropping message for departed connection {}", conn),
        }
    }

    fn broadcast(&self, message: &ServerMessage) {
        let Some(text) = encode(message) else {
            return;
        };
        let sessions = self.sessions();
        debug!("Broadcasting to {} connections: {}", sessions.len(), text);
        for recipient in sessions.values() {
            recipient.do_send(ChessWebSocketMessage(text.clone()));
        }
    }
}
