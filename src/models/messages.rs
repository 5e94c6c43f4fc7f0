use actix::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A move as it travels over the wire, in both directions.
///
/// Squares are algebraic names (`"e2"`). Inbound requests keep whatever the
/// client sent so a rejection can echo it back verbatim; outbound moves are
/// normalized by the rules engine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
}

impl MoveRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        MoveRequest {
            from: from.into(),
            to: to.into(),
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, promotion: impl Into<String>) -> Self {
        self.promotion = Some(promotion.into());
        self
    }
}

/// Message sent from client to server
///
/// The payload is kept untyped so that a `move` whose payload is not a move
/// object, or is missing altogether, can still be echoed back in
/// `invalidMove`. A missing payload reads as `null`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClientMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub payload: Value,
}

/// Message sent from server to client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ServerMessage {
    /// `"w"` or `"b"`.
    PlayerRole(String),
    SpectatorRole,
    Move(MoveRequest),
    /// Canonical FEN of the authority's position.
    BoardState(String),
    InvalidMove(Value),
}

/// Message type for WebSocket communication
#[derive(Message)]
#[rtype(result = "()")]
pub struct ChessWebSocketMessage(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_messages_use_event_envelope() {
        let role = serde_json::to_value(ServerMessage::PlayerRole("w".to_string())).unwrap();
        assert_eq!(role, json!({"type": "playerRole", "payload": "w"}));

        let spectator = serde_json::to_value(ServerMessage::SpectatorRole).unwrap();
        assert_eq!(spectator, json!({"type": "spectatorRole"}));

        let board = serde_json::to_value(ServerMessage::BoardState("8/8/8/8/8/8/8/8 w - - 0 1".into())).unwrap();
        assert_eq!(board["type"], "boardState");
        assert_eq!(board["payload"], "8/8/8/8/8/8/8/8 w - - 0 1");
    }

    #[test]
    fn promotion_is_omitted_when_absent() {
        let msg = serde_json::to_value(ServerMessage::Move(MoveRequest::new("e2", "e4"))).unwrap();
        assert_eq!(msg, json!({"type": "move", "payload": {"from": "e2", "to": "e4"}}));

        let promo = serde_json::to_value(MoveRequest::new("a7", "a8").with_promotion("q")).unwrap();
        assert_eq!(promo, json!({"from": "a7", "to": "a8", "promotion": "q"}));
    }

    #[test]
    fn client_move_payload_is_kept_raw() {
        let parsed: ClientMessage =
            serde_json::from_str(r#"{"type":"move","payload":{"from":"e2","to":"e4"}}"#).unwrap();
        assert_eq!(parsed.message_type, "move");
        let request: MoveRequest = serde_json::from_value(parsed.payload).unwrap();
        assert_eq!(request, MoveRequest::new("e2", "e4"));

        let odd: ClientMessage = serde_json::from_str(r#"{"type":"move","payload":42}"#).unwrap();
        assert_eq!(odd.payload, json!(42));
    }

    #[test]
    fn missing_payload_reads_as_null() {
        let bare: ClientMessage = serde_json::from_str(r#"{"type":"move"}"#).unwrap();
        assert_eq!(bare.message_type, "move");
        assert_eq!(bare.payload, Value::Null);
    }

    #[test]
    fn envelope_requires_a_type() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"payload":"hi"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
    }
}
