//! Event fan-out, delayed broadcasts and room teardown.

use tracing::{debug, info, warn};

use super::RoomService;
use crate::domain::events::{GameEvent, Pacing};
use crate::domain::lobby::abort;
use crate::domain::player_view::{private_view, role_reveal};
use crate::domain::snapshot::{seats_public, snapshot};
use crate::domain::state::{GameResult, Phase};
use crate::protocol::ServerMsg;
use crate::services::room::Room;
use crate::services::scheduler::TimerKind;

impl RoomService {
    /// Deliver domain events in order. Called with the room locked.
    pub(super) fn dispatch(&self, room: &Room, events: Vec<GameEvent>) {
        let notifier = &self.inner.notifier;
        for event in events {
            match event {
                GameEvent::GameStarted => {
                    info!(
                        room_id = %room.id,
                        players = room.table.roster.len(),
                        "Game started"
                    );
                    notifier.broadcast(&room.id, ServerMsg::GameStarted);
                }
                GameEvent::RolesAssigned => {
                    for p in room.table.roster.iter() {
                        match private_view(&room.table, p.id) {
                            Ok(Some(view)) => notifier.send_to_player(
                                &room.id,
                                p.id,
                                ServerMsg::RoleAssigned { view },
                            ),
                            Ok(None) => {}
                            Err(err) => warn!(
                                room_id = %room.id,
                                player_id = %p.id,
                                error = %err,
                                "Failed to build private view"
                            ),
                        }
                    }
                }
                GameEvent::VoteResolved { votes, approved } => {
                    info!(
                        room_id = %room.id,
                        approved,
                        vote_track = room.table.state.vote_track,
                        "Proposal resolved"
                    );
                    notifier.broadcast(&room.id, ServerMsg::VoteResult { votes, approved });
                }
                GameEvent::MissionResolved { outcome, fails } => {
                    info!(
                        room_id = %room.id,
                        ?outcome,
                        fails,
                        successes = room.table.state.successes(),
                        failures = room.table.state.failures(),
                        "Mission resolved"
                    );
                    notifier.broadcast(
                        &room.id,
                        ServerMsg::MissionResult {
                            result: outcome,
                            fails,
                        },
                    );
                }
                GameEvent::Investigated {
                    investigator,
                    target,
                    target_name,
                    alignment,
                } => {
                    info!(room_id = %room.id, %investigator, %target, "Lady of the Lake used");
                    debug!(room_id = %room.id, %target, ?alignment, "Investigation result");
                    notifier.send_to_player(
                        &room.id,
                        investigator,
                        ServerMsg::LadyResult {
                            target_id: target,
                            target_name,
                            alignment,
                        },
                    );
                }
                GameEvent::GameOver(GameResult::Victory { winner, reason }) => {
                    info!(room_id = %room.id, ?winner, ?reason, "Game over");
                    notifier.broadcast(
                        &room.id,
                        ServerMsg::GameOver {
                            winner,
                            reason,
                            message: reason.describe(),
                            roles: role_reveal(&room.table),
                        },
                    );
                    self.inner.scheduler.cancel(&room.id, TimerKind::HostGrace);
                    self.schedule_cleanup(&room.id);
                }
                GameEvent::GameOver(GameResult::ForciblyEnded { reason }) => {
                    info!(room_id = %room.id, reason = %reason, "Game forcibly ended");
                    notifier.broadcast(
                        &room.id,
                        ServerMsg::GameForciblyEnded {
                            room_id: room.id.clone(),
                            reason,
                        },
                    );
                    self.teardown(&room.id);
                    // Nothing else is observable once the room is gone.
                    return;
                }
                GameEvent::StateChanged(pacing) => self.broadcast_state_after(room, pacing),
            }
        }
    }

    fn broadcast_state_after(&self, room: &Room, pacing: Pacing) {
        let delay = self.inner.timing.delay_for(pacing);
        if delay.is_zero() {
            self.inner.notifier.broadcast(
                &room.id,
                ServerMsg::GameState {
                    game: snapshot(&room.table),
                },
            );
            return;
        }

        let service = self.clone();
        let room_id = room.id.clone();
        self.inner
            .scheduler
            .schedule(&room.id, TimerKind::Pacing, delay, async move {
                service.broadcast_current_state(&room_id);
            });
    }

    /// Latest state at fire time; a room torn down in the meantime is skipped.
    pub(super) fn broadcast_current_state(&self, room_id: &str) {
        let Ok(handle) = self.inner.registry.get(room_id) else {
            debug!(room_id, "Skipping state broadcast for removed room");
            return;
        };
        let Ok(room) = self.inner.registry.lock_live(&handle) else {
            return;
        };
        self.inner.notifier.broadcast(
            &room.id,
            ServerMsg::GameState {
                game: snapshot(&room.table),
            },
        );
    }

    pub(super) fn broadcast_roster(&self, room: &Room) {
        self.inner.notifier.broadcast(
            &room.id,
            ServerMsg::RosterUpdate {
                players: seats_public(&room.table.roster),
            },
        );
    }

    pub(super) fn schedule_cleanup(&self, room_id: &str) {
        let service = self.clone();
        let id = room_id.to_string();
        self.inner.scheduler.schedule(
            room_id,
            TimerKind::Cleanup,
            self.inner.timing.finished_room_ttl,
            async move { service.cleanup_if_idle(&id) },
        );
    }

    pub(super) fn schedule_host_grace(&self, room_id: &str) {
        let service = self.clone();
        let id = room_id.to_string();
        info!(
            room_id,
            grace_secs = self.inner.timing.host_grace.as_secs(),
            "Host disconnected, grace timer started"
        );
        self.inner.scheduler.schedule(
            room_id,
            TimerKind::HostGrace,
            self.inner.timing.host_grace,
            async move { service.expire_host(&id) },
        );
    }

    /// Remove a room that finished or never got a participant.
    pub(super) fn cleanup_if_idle(&self, room_id: &str) {
        let Ok(handle) = self.inner.registry.get(room_id) else {
            return;
        };
        let Ok(room) = self.inner.registry.lock_live(&handle) else {
            return;
        };
        let finished = room.table.phase() == Phase::Finished;
        if !finished && !room.table.roster.is_empty() {
            return;
        }
        if finished {
            self.inner.notifier.broadcast(
                &room.id,
                ServerMsg::RoomClosed {
                    room_id: room.id.clone(),
                    reason: "game over".to_string(),
                },
            );
        }
        self.teardown(&room.id);
    }

    /// Host did not come back in time: close the lobby or end the game.
    pub(super) fn expire_host(&self, room_id: &str) {
        let Ok(handle) = self.inner.registry.get(room_id) else {
            return;
        };
        let Ok(mut room) = self.inner.registry.lock_live(&handle) else {
            return;
        };
        if room.table.roster.host().is_some_and(|h| h.connected) {
            return;
        }

        match room.table.phase() {
            Phase::Finished => {}
            Phase::Lobby => {
                info!(room_id = %room.id, "Host grace expired, closing lobby");
                self.inner.notifier.broadcast(
                    &room.id,
                    ServerMsg::RoomClosed {
                        room_id: room.id.clone(),
                        reason: "host disconnected".to_string(),
                    },
                );
                self.teardown(&room.id);
            }
            _ => match abort(&mut room.table, "host disconnected") {
                Ok(events) => self.dispatch(&room, events),
                Err(err) => warn!(room_id = %room.id, error = %err, "Host expiry abort failed"),
            },
        }
    }

    /// Cancel timers, drop the room and its connection bindings.
    pub(super) fn teardown(&self, room_id: &str) {
        self.inner.scheduler.cancel_all(room_id);
        self.inner.registry.remove(room_id);
        self.inner.notifier.release_room(room_id);
        info!(room_id, rooms = self.inner.registry.len(), "Room removed");
    }
}
