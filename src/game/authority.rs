use chess::Color;
use log::{error, info, warn};
use std::panic::{self, AssertUnwindSafe};

use crate::game::engine::{ChessRules, RulesEngine, Transition};
use crate::game::error::MoveRejection;
use crate::game::utils::color_to_string;
use crate::models::{ConnectionId, GamePosition, MoveRequest};

/// What a connection may do in the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    White,
    Black,
    Spectator,
}

impl Role {
    /// The colour this role moves for; spectators have none.
    pub fn color(self) -> Option<Color> {
        match self {
            Role::White => Some(Color::White),
            Role::Black => Some(Color::Black),
            Role::Spectator => None,
        }
    }

    fn seated(color: Color) -> Self {
        match color {
            Color::White => Role::White,
            Color::Black => Role::Black,
        }
    }
}

/// The two privileged seats. Each slot is either empty or held by exactly one
/// connection, and no connection holds both.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Seats {
    white: Option<ConnectionId>,
    black: Option<ConnectionId>,
}

impl Seats {
    pub fn holder(&self, color: Color) -> Option<ConnectionId> {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    fn slot_mut(&mut self, color: Color) -> &mut Option<ConnectionId> {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// Seat colour held by `conn`, if any.
    pub fn seat_of(&self, conn: ConnectionId) -> Option<Color> {
        [Color::White, Color::Black]
            .into_iter()
            .find(|color| self.holder(*color) == Some(conn))
    }
}

/// Successful admission of a move.
pub type Accepted = Transition;

/// Single source of truth for one game: the position and who sits where.
///
/// Only `assign_role`, `release_role` and `submit_move` change state. The
/// authority does no locking of its own; callers sharing it across threads
/// wrap it in one mutex so each operation is atomic.
pub struct SessionAuthority<E = ChessRules> {
    engine: E,
    position: GamePosition,
    seats: Seats,
}

impl Default for SessionAuthority<ChessRules> {
    fn default() -> Self {
        SessionAuthority::new(ChessRules, GamePosition::default())
    }
}

impl<E: RulesEngine> SessionAuthority<E> {
    pub fn new(engine: E, position: GamePosition) -> Self {
        SessionAuthority {
            engine,
            position,
            seats: Seats::default(),
        }
    }

    pub fn position(&self) -> &GamePosition {
        &self.position
    }

    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }

    pub fn seats(&self) -> &Seats {
        &self.seats
    }

    pub fn role_of(&self, conn: ConnectionId) -> Role {
        self.seats.seat_of(conn).map_or(Role::Spectator, Role::seated)
    }

    /// First free seat, White before Black, otherwise Spectator.
    pub fn assign_role(&mut self, conn: ConnectionId) -> Role {
        if let Some(color) = self.seats.seat_of(conn) {
            warn!("Connection {} already holds {}", conn, color_to_string(color));
            return Role::seated(color);
        }

        for color in [Color::White, Color::Black] {
            let slot = self.seats.slot_mut(color);
            if slot.is_none() {
                *slot = Some(conn);
                info!("Assigning connection {} as {}", conn, color_to_string(color));
                return Role::seated(color);
            }
        }

        info!("Both seats taken; connection {} joins as spectator", conn);
        Role::Spectator
    }

    /// Free whatever seat `conn` holds. Returns the role that was released.
    pub fn release_role(&mut self, conn: ConnectionId) -> Option<Role> {
        let mut released = None;
        for color in [Color::White, Color::Black] {
            let slot = self.seats.slot_mut(color);
            if *slot == Some(conn) {
                *slot = None;
                debug_assert!(released.is_none(), "connection {} held both seats", conn);
                info!("Released {} seat held by {}", color_to_string(color), conn);
                released = Some(Role::seated(color));
            }
        }
        released
    }

    /// Admit or reject a move proposed by `conn`.
    pub fn submit_move(&mut self, conn: ConnectionId, request: &MoveRequest) -> Result<Accepted, MoveRejection> {
        let mover = self.position.side_to_move();
        if self.seats.holder(mover) != Some(conn) {
            return Err(MoveRejection::NotYourTurn);
        }

        let engine = &self.engine;
        let position = &self.position;
        let transition = match panic::catch_unwind(AssertUnwindSafe(|| engine.apply(position, request))) {
            Ok(outcome) => outcome?,
            Err(_) => {
                error!("Rules engine panicked on {:?} at {}", request, self.position.fen());
                return Err(MoveRejection::IllegalMove);
            }
        };

        self.position = transition.position;
        Ok(transition)
    }
}
