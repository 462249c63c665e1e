//! Live WebSocket connections and the participant -> connection side table.

use actix::prelude::*;
use dashmap::DashMap;
use tracing::{debug, info};

use crate::domain::PlayerId;
use crate::protocol::ServerMsg;
use crate::services::notifier::{ConnId, Notifier};
use crate::services::room::RoomId;
use crate::ws::session::Shutdown;

/// A frame queued for one session.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct Outbound(pub ServerMsg);

struct Connection {
    outbound: Recipient<Outbound>,
    shutdown: Recipient<Shutdown>,
}

#[derive(Default)]
pub struct ConnectionHub {
    connections: DashMap<ConnId, Connection>,
    bindings: DashMap<RoomId, DashMap<PlayerId, ConnId>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            bindings: DashMap::new(),
        }
    }

    pub fn register_connection(
        &self,
        conn: ConnId,
        outbound: Recipient<Outbound>,
        shutdown: Recipient<Shutdown>,
    ) {
        self.connections
            .insert(conn, Connection { outbound, shutdown });
        debug!(conn_id = %conn, active = self.connections.len(), "[WS HUB] connection registered");
    }

    pub fn unregister_connection(&self, conn: ConnId) {
        if self.connections.remove(&conn).is_some() {
            debug!(conn_id = %conn, active = self.connections.len(), "[WS HUB] connection unregistered");
        }
    }

    pub fn active_connections_count(&self) -> usize {
        self.connections.len()
    }

    /// Participants of the room that currently have a live connection.
    pub fn bound_players(&self, room_id: &str) -> usize {
        self.bindings.get(room_id).map_or(0, |room| room.len())
    }

    /// Ask every session to stop. Returns the connections that were asked.
    pub fn close_all_connections(&self) -> Vec<ConnId> {
        let targets: Vec<(ConnId, Recipient<Shutdown>)> = self
            .connections
            .iter()
            .map(|entry| (*entry.key(), entry.value().shutdown.clone()))
            .collect();
        for (_, shutdown) in &targets {
            shutdown.do_send(Shutdown);
        }
        info!(count = targets.len(), "[WS HUB] shutdown requested for all connections");
        targets.into_iter().map(|(conn, _)| conn).collect()
    }

    fn room_connections(&self, room_id: &str) -> Vec<ConnId> {
        self.bindings
            .get(room_id)
            .map(|room| room.iter().map(|entry| *entry.value()).collect())
            .unwrap_or_default()
    }
}

impl Notifier for ConnectionHub {
    fn bind(&self, room_id: &str, player_id: PlayerId, conn: ConnId) {
        self.bindings
            .entry(room_id.to_string())
            .or_default()
            .insert(player_id, conn);
    }

    fn unbind(&self, room_id: &str, player_id: PlayerId, conn: ConnId) -> bool {
        let Some(room) = self.bindings.get(room_id) else {
            return false;
        };
        room.remove_if(&player_id, |_, bound| *bound == conn).is_some()
    }

    fn send_to_conn(&self, conn: ConnId, msg: ServerMsg) {
        match self.connections.get(&conn) {
            Some(entry) => entry.outbound.do_send(Outbound(msg)),
            None => debug!(conn_id = %conn, "[WS HUB] dropping message for closed connection"),
        }
    }

    fn send_to_player(&self, room_id: &str, player_id: PlayerId, msg: ServerMsg) {
        let conn = self
            .bindings
            .get(room_id)
            .and_then(|room| room.get(&player_id).map(|c| *c));
        if let Some(conn) = conn {
            self.send_to_conn(conn, msg);
        }
    }

    fn broadcast(&self, room_id: &str, msg: ServerMsg) {
        for conn in self.room_connections(room_id) {
            self.send_to_conn(conn, msg.clone());
        }
    }

    fn release_room(&self, room_id: &str) {
        self.bindings.remove(room_id);
    }
}
