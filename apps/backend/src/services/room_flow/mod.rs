//! Room service: serializes commands per room, runs the game rules and fans
//! the resulting events out through the [`Notifier`].
//!
//! Every public method locks exactly one room for its whole duration and
//! never awaits while holding it. Delayed broadcasts and room timers go
//! through the [`Scheduler`] and re-read the room when they fire.

mod dispatch;
mod membership;
mod play;

use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::GameTiming;
use crate::error::AppError;
use crate::services::notifier::Notifier;
use crate::services::registry::RoomRegistry;
use crate::services::room::{RoomId, RoomSummary};
use crate::services::scheduler::{Scheduler, TimerKind};

struct Inner {
    registry: RoomRegistry,
    scheduler: Scheduler,
    notifier: Arc<dyn Notifier>,
    timing: GameTiming,
    rng: Mutex<StdRng>,
}

#[derive(Clone)]
pub struct RoomService {
    inner: Arc<Inner>,
}

impl RoomService {
    pub fn new(notifier: Arc<dyn Notifier>, timing: GameTiming) -> Self {
        Self::with_rng(notifier, timing, StdRng::from_os_rng())
    }

    /// Deterministic role deals and leader picks.
    pub fn with_seed(notifier: Arc<dyn Notifier>, timing: GameTiming, seed: u64) -> Self {
        Self::with_rng(notifier, timing, StdRng::seed_from_u64(seed))
    }

    fn with_rng(notifier: Arc<dyn Notifier>, timing: GameTiming, rng: StdRng) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: RoomRegistry::new(),
                scheduler: Scheduler::new(),
                notifier,
                timing,
                rng: Mutex::new(rng),
            }),
        }
    }

    pub fn timing(&self) -> &GameTiming {
        &self.inner.timing
    }

    /// Allocate an empty room. It is dropped again if nobody joins within the
    /// host grace period.
    pub fn create_room(&self) -> RoomId {
        let (room_id, _) = self.inner.registry.create();
        info!(room_id = %room_id, rooms = self.inner.registry.len(), "Room created");

        let service = self.clone();
        let id = room_id.clone();
        self.inner.scheduler.schedule(
            &room_id,
            TimerKind::Cleanup,
            self.inner.timing.host_grace,
            async move { service.cleanup_if_idle(&id) },
        );
        room_id
    }

    pub fn room_count(&self) -> usize {
        self.inner.registry.len()
    }

    pub fn room_exists(&self, room_id: &str) -> bool {
        self.inner.registry.contains(room_id)
    }

    pub fn room_summary(&self, room_id: &str) -> Result<RoomSummary, AppError> {
        let handle = self.inner.registry.get(room_id)?;
        let room = self.inner.registry.lock_live(&handle)?;
        Ok(room.summary())
    }

    /// Pending timers for a room.
    pub fn pending_timers(&self, room_id: &str) -> usize {
        self.inner.scheduler.pending(room_id)
    }

    pub fn host_timer_pending(&self, room_id: &str) -> bool {
        self.inner.scheduler.has_pending(room_id, TimerKind::HostGrace)
    }
}
