use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::game::PositionError;
use crate::models::GamePosition;

#[derive(Parser, Debug, Clone)]
#[command(name = "chess-arena")]
#[command(about = "Two-player live chess server with spectators")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000)]
    pub port: u16,

    /// Directory holding index.html and client assets
    #[arg(long, default_value = "./static")]
    pub static_dir: PathBuf,

    /// Seconds between server pings
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub heartbeat_interval_secs: u64,

    /// Seconds without client traffic before a connection is dropped
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub client_timeout_secs: u64,

    /// Start from this FEN instead of the standard opening position
    #[arg(long)]
    pub start_fen: Option<String>,
}

impl ServerConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn client_timeout(&self) -> Duration {
        Duration::from_secs(self.client_timeout_secs)
    }

    pub fn initial_position(&self) -> Result<GamePosition, PositionError> {
        match &self.start_fen {
            Some(fen) => GamePosition::from_fen(fen),
            None => Ok(GamePosition::default()),
        }
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ServerConfig::parse_from(["chess-arena"]);
        assert_eq!(config.bind_address(), ("127.0.0.1".to_string(), 3000));
        assert_eq!(config.heartbeat_interval(), Duration::from_secs(5));
        assert_eq!(config.client_timeout(), Duration::from_secs(10));
        assert_eq!(config.initial_position().unwrap(), GamePosition::default());
    }

    #[test]
    fn start_fen_is_validated() {
        let config = ServerConfig::parse_from(["chess-arena", "--start-fen", "4k3/8/8/8/8/8/8/4K3 b - - 3 20"]);
        assert_eq!(config.initial_position().unwrap().fullmove_number(), 20);

        let bad = ServerConfig::parse_from(["chess-arena", "--start-fen", "nonsense"]);
        assert!(bad.initial_position().is_err());
    }

    #[test]
    fn zero_heartbeat_is_refused() {
        assert!(ServerConfig::try_parse_from(["chess-arena", "--heartbeat-interval-secs", "0"]).is_err());
    }
}
