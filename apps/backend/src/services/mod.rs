pub mod notifier;
pub mod registry;
pub mod room;
pub mod room_flow;
pub mod scheduler;

pub use notifier::{ConnId, Notifier};
pub use room::{Membership, Room, RoomId, RoomSummary};
pub use room_flow::RoomService;
