pub mod server;
pub mod timing;

pub use server::ServerConfig;
pub use timing::GameTiming;
