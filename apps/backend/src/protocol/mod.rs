pub mod messages;

pub use messages::{ClientMsg, ServerMsg};
