use std::sync::Arc;

use crate::config::{GameTiming, ServerConfig};
use crate::services::RoomService;
use crate::ws::hub::ConnectionHub;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Room store and command handling
    pub rooms: RoomService,
    /// Live WebSocket connections; also the room service's notifier
    pub hub: Arc<ConnectionHub>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let timing = GameTiming::from_config(&config);
        Self::with_timing(config, timing)
    }

    /// Custom pacing, e.g. zero delays in tests.
    pub fn with_timing(config: ServerConfig, timing: GameTiming) -> Self {
        let hub = Arc::new(ConnectionHub::new());
        let rooms = RoomService::new(hub.clone(), timing);
        Self { rooms, hub, config }
    }

    /// Create a test AppState with default config and no pacing delays
    pub fn for_tests() -> Self {
        Self::with_timing(ServerConfig::default(), GameTiming::immediate())
    }

    pub fn websocket_hub(&self) -> Arc<ConnectionHub> {
        self.hub.clone()
    }
}
