//! Joining, reconnecting, leaving and disconnect handling.
//!
//! Disconnect policy: losing a connection never ends the game. The
//! participant keeps their seat and role and is marked disconnected; pending
//! approval votes are re-checked against the smaller connected count, while
//! mission teams stay as proposed. Only the host's absence is timed.

use tracing::{debug, info};
use uuid::Uuid;

use super::RoomService;
use crate::domain::player_view::private_view;
use crate::domain::proposals::settle_team_vote;
use crate::domain::snapshot::{seats_public, snapshot};
use crate::domain::state::Phase;
use crate::domain::PlayerId;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind, PreconditionKind};
use crate::protocol::ServerMsg;
use crate::services::notifier::ConnId;
use crate::services::room::{Membership, Room};
use crate::services::scheduler::TimerKind;

impl RoomService {
    /// Seat a new participant in a lobby and bind it to `conn`.
    pub fn join_room(
        &self,
        conn: ConnId,
        room_id: &str,
        name: &str,
    ) -> Result<Membership, AppError> {
        let handle = self.inner.registry.get(room_id)?;
        let mut room = self.inner.registry.lock_live(&handle)?;
        if room.table.phase() != Phase::Lobby {
            return Err(DomainError::phase_mismatch("game already started").into());
        }

        let player_id = Uuid::new_v4();
        let is_host = room.table.roster.join(player_id, name)?.is_host;
        let reconnect_token = room.issue_token(player_id);

        self.inner.notifier.bind(&room.id, player_id, conn);
        info!(
            room_id = %room.id,
            player_id = %player_id,
            is_host,
            players = room.table.roster.len(),
            "Player joined"
        );

        self.inner.notifier.send_to_conn(
            conn,
            ServerMsg::JoinSuccess {
                room_id: room.id.clone(),
                player_id,
                reconnect_token,
                is_host,
            },
        );
        self.broadcast_roster(&room);

        Ok(Membership {
            room_id: room.id.clone(),
            player_id,
        })
    }

    /// Restore a disconnected participant from its reconnection token.
    ///
    /// On success the caller gets roster, current snapshot and, once roles are
    /// dealt, its private role view again.
    pub fn reconnect(
        &self,
        conn: ConnId,
        room_id: &str,
        token: Uuid,
    ) -> Result<Membership, AppError> {
        let handle = self.inner.registry.get(room_id)?;
        let mut room = self.inner.registry.lock_live(&handle)?;

        let player_id = room.player_for_token(token).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Player, "unknown reconnection token")
        })?;
        let participant = room.table.roster.get_mut(player_id)?;
        if participant.connected {
            return Err(DomainError::precondition(
                PreconditionKind::AlreadyConnected,
                "player is still connected",
            )
            .into());
        }
        participant.connected = true;
        let is_host = participant.is_host;

        self.inner.notifier.bind(&room.id, player_id, conn);
        if is_host {
            self.inner.scheduler.cancel(&room.id, TimerKind::HostGrace);
        }
        info!(room_id = %room.id, player_id = %player_id, is_host, "Player reconnected");

        self.inner.notifier.send_to_conn(
            conn,
            ServerMsg::ReconnectSuccess {
                room_id: room.id.clone(),
                player_id,
                players: seats_public(&room.table.roster),
                game: snapshot(&room.table),
                private: private_view(&room.table, player_id)?,
            },
        );
        self.inner.notifier.broadcast(
            &room.id,
            ServerMsg::PlayerConnection {
                player_id,
                connected: true,
            },
        );
        self.broadcast_roster(&room);

        Ok(Membership {
            room_id: room.id.clone(),
            player_id,
        })
    }

    /// Explicit leave. In the lobby the seat is given up (the host leaving
    /// closes the room); during a game it is handled like a disconnect.
    pub fn leave_room(&self, conn: ConnId, membership: &Membership) -> Result<(), AppError> {
        let handle = self.inner.registry.get(&membership.room_id)?;
        let mut room = self.inner.registry.lock_live(&handle)?;
        let player_id = membership.player_id;
        let is_host = room.table.roster.get(player_id)?.is_host;

        if room.table.phase() == Phase::Lobby {
            if is_host {
                info!(room_id = %room.id, "Host left the lobby");
                self.close(&room, "host left the room");
                return Ok(());
            }
            room.table.roster.remove(player_id)?;
            room.revoke_tokens(player_id);
            self.inner.notifier.unbind(&room.id, player_id, conn);
            info!(room_id = %room.id, player_id = %player_id, "Player left the lobby");
            self.broadcast_roster(&room);
            return Ok(());
        }

        self.inner.notifier.unbind(&room.id, player_id, conn);
        info!(room_id = %room.id, player_id = %player_id, "Player left mid-game");
        self.mark_disconnected(&mut room, player_id);
        Ok(())
    }

    /// Transport lost. Stale connections (already replaced by a reconnect)
    /// are ignored.
    pub fn disconnect(&self, conn: ConnId, membership: &Membership) {
        if !self
            .inner
            .notifier
            .unbind(&membership.room_id, membership.player_id, conn)
        {
            debug!(
                room_id = %membership.room_id,
                conn_id = %conn,
                "Ignoring disconnect of stale connection"
            );
            return;
        }
        let Ok(handle) = self.inner.registry.get(&membership.room_id) else {
            return;
        };
        let Ok(mut room) = self.inner.registry.lock_live(&handle) else {
            return;
        };
        self.mark_disconnected(&mut room, membership.player_id);
    }

    /// Host closes its lobby.
    pub fn close_room(&self, membership: &Membership) -> Result<(), AppError> {
        let handle = self.inner.registry.get(&membership.room_id)?;
        let room = self.inner.registry.lock_live(&handle)?;
        room.table.require_host(membership.player_id)?;
        room.table.require_phase(Phase::Lobby)?;
        info!(room_id = %room.id, "Room closed by host");
        self.close(&room, "closed by host");
        Ok(())
    }

    fn close(&self, room: &Room, reason: &str) {
        self.inner.notifier.broadcast(
            &room.id,
            ServerMsg::RoomClosed {
                room_id: room.id.clone(),
                reason: reason.to_string(),
            },
        );
        self.teardown(&room.id);
    }

    fn mark_disconnected(&self, room: &mut Room, player_id: PlayerId) {
        let Ok(participant) = room.table.roster.get_mut(player_id) else {
            return;
        };
        if !participant.connected {
            return;
        }
        participant.connected = false;
        let is_host = participant.is_host;
        info!(
            room_id = %room.id,
            player_id = %player_id,
            is_host,
            phase = room.table.phase().as_str(),
            "Player disconnected"
        );

        self.inner.notifier.broadcast(
            &room.id,
            ServerMsg::PlayerConnection {
                player_id,
                connected: false,
            },
        );
        self.broadcast_roster(room);

        let events = settle_team_vote(&mut room.table);
        self.dispatch(room, events);

        if is_host && room.table.phase() != Phase::Finished && self.room_exists(&room.id) {
            self.schedule_host_grace(&room.id);
        }
    }
}
