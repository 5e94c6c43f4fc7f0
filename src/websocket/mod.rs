pub mod channel;
pub mod handler;
pub mod hub;

pub use channel::ActorChannel;
pub use handler::ws_index;
pub use hub::GameHub;
