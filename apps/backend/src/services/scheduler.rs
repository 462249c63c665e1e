//! Cancellable delayed tasks keyed by room.
//!
//! Every timer belongs to exactly one room and is aborted when that room is
//! torn down. Tasks always run on a spawned task, never inline, so callers may
//! schedule while holding a room lock.

use std::future::Future;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::services::room::RoomId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Delayed state broadcast; several may be pending at once.
    Pacing,
    /// Host-disconnect grace period.
    HostGrace,
    /// Deletion of a finished or never-joined room.
    Cleanup,
}

#[derive(Default)]
struct RoomTimers {
    pacing: Vec<JoinHandle<()>>,
    host_grace: Option<JoinHandle<()>>,
    cleanup: Option<JoinHandle<()>>,
}

impl RoomTimers {
    fn abort_all(self) {
        for handle in self.pacing {
            handle.abort();
        }
        if let Some(handle) = self.host_grace {
            handle.abort();
        }
        if let Some(handle) = self.cleanup {
            handle.abort();
        }
    }
}

#[derive(Default)]
pub struct Scheduler {
    timers: DashMap<RoomId, RoomTimers>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            timers: DashMap::new(),
        }
    }

    /// Run `task` after `delay`. A new `HostGrace` or `Cleanup` timer replaces
    /// the pending one of the same kind.
    pub fn schedule<F>(&self, room_id: &str, kind: TimerKind, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            task.await;
        });

        trace!(room_id, ?kind, delay_ms = delay.as_millis() as u64, "timer scheduled");

        let mut timers = self.timers.entry(room_id.to_string()).or_default();
        match kind {
            TimerKind::Pacing => {
                timers.pacing.retain(|h| !h.is_finished());
                timers.pacing.push(handle);
            }
            TimerKind::HostGrace => {
                if let Some(old) = timers.host_grace.replace(handle) {
                    old.abort();
                }
            }
            TimerKind::Cleanup => {
                if let Some(old) = timers.cleanup.replace(handle) {
                    old.abort();
                }
            }
        }
    }

    pub fn cancel(&self, room_id: &str, kind: TimerKind) {
        let Some(mut timers) = self.timers.get_mut(room_id) else {
            return;
        };
        match kind {
            TimerKind::Pacing => {
                for handle in timers.pacing.drain(..) {
                    handle.abort();
                }
            }
            TimerKind::HostGrace => {
                if let Some(handle) = timers.host_grace.take() {
                    handle.abort();
                }
            }
            TimerKind::Cleanup => {
                if let Some(handle) = timers.cleanup.take() {
                    handle.abort();
                }
            }
        }
    }

    /// Abort everything pending for the room and forget it.
    pub fn cancel_all(&self, room_id: &str) {
        if let Some((_, timers)) = self.timers.remove(room_id) {
            timers.abort_all();
        }
    }

    /// Timers for the room that have not yet run to completion.
    pub fn pending(&self, room_id: &str) -> usize {
        self.timers.get(room_id).map_or(0, |timers| {
            let live = |h: &JoinHandle<()>| !h.is_finished();
            timers.pacing.iter().filter(|h| live(h)).count()
                + timers.host_grace.iter().filter(|h| live(h)).count()
                + timers.cleanup.iter().filter(|h| live(h)).count()
        })
    }

    pub fn has_pending(&self, room_id: &str, kind: TimerKind) -> bool {
        self.timers.get(room_id).is_some_and(|timers| match kind {
            TimerKind::Pacing => timers.pacing.iter().any(|h| !h.is_finished()),
            TimerKind::HostGrace => timers.host_grace.as_ref().is_some_and(|h| !h.is_finished()),
            TimerKind::Cleanup => timers.cleanup.as_ref().is_some_and(|h| !h.is_finished()),
        })
    }
}
