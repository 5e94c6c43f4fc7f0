use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use log::info;
use std::io;

mod config;
mod game;
mod models;
mod routes;
mod websocket;

use config::ServerConfig;
use game::{ChessRules, SessionAuthority};
use models::AppState;
use websocket::ActorChannel;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::parse();
    let position = config
        .initial_position()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let (host, port) = config.bind_address();
    info!("Starting chess arena at http://{}:{}", host, port);
    info!("Initial position: {}", position.fen());

    // One game, shared by every connection
    let app_state = web::Data::new(AppState::new(
        SessionAuthority::new(ChessRules, position),
        ActorChannel::default(),
    ));
    let static_dir = config.static_dir.clone();
    let config = web::Data::new(config);

    HttpServer::new(move || {
        let static_dir = static_dir.clone();
        App::new()
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .app_data(config.clone())
            .configure(move |cfg| routes::configure_routes(cfg, &static_dir))
    })
    .bind((host, port))?
    .run()
    .await
}
