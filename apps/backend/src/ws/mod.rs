pub mod hub;
pub mod session;

pub use hub::{ConnectionHub, Outbound};
pub use session::{upgrade, Shutdown, WsSession};
