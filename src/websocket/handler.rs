use actix::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{info, warn};
use std::time::{Duration, Instant};

use crate::config::ServerConfig;
use crate::models::{AppState, ChessWebSocketMessage, ConnectionId};

/// WebSocket handler for one chess connection
pub struct ChessWebSocket {
    pub id: ConnectionId,
    pub app_state: web::Data<AppState>,
    pub heartbeat_interval: Duration,
    pub client_timeout: Duration,
    last_heartbeat: Instant,
}

impl ChessWebSocket {
    pub fn new(app_state: web::Data<AppState>, config: &ServerConfig) -> Self {
        ChessWebSocket {
            id: ConnectionId::new(),
            app_state,
            heartbeat_interval: config.heartbeat_interval(),
            client_timeout: config.client_timeout(),
            last_heartbeat: Instant::now(),
        }
    }

    /// Ping the client periodically and drop it once it goes quiet.
    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(self.heartbeat_interval, |act, ctx| {
            if Instant::now().duration_since(act.last_heartbeat) > act.client_timeout {
                warn!("Heartbeat timed out for {}, disconnecting", act.id);
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }
}

impl Actor for ChessWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        // Register before seating so the role message has somewhere to go
        self.app_state.channel().register(self.id, ctx.address().recipient());
        self.start_heartbeat(ctx);
        let role = self.app_state.on_connect(self.id);
        info!("Connection {} joined as {:?}", self.id, role);
    }

    // Runs on every exit path: close frame, protocol error, heartbeat timeout.
    fn stopped(&mut self, _: &mut Self::Context) {
        self.app_state.on_disconnect(self.id);
        self.app_state.channel().unregister(self.id);
    }
}

impl Handler<ChessWebSocketMessage> for ChessWebSocket {
    type Result = ();

    fn handle(&mut self, msg: ChessWebSocketMessage, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ChessWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                self.app_state.on_message(self.id, &text);
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Connection closed: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) => {
                warn!("Fragmented frames are not supported; closing {}", self.id);
                ctx.stop();
            }
            Ok(ws::Message::Nop) => {}
            Err(e) => {
                warn!("WebSocket protocol error on {}: {}", self.id, e);
                ctx.stop();
            }
        }
    }
}

/// WebSocket connection handler
pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, Error> {
    let ws = ChessWebSocket::new(app_state, &config);
    info!("New WebSocket connection: {}", ws.id);
    ws::start(ws, &req, stream)
}
