//! Outbound seam between room handling and the transport.
//!
//! Room code only ever addresses stable participant identities. The
//! implementation owns the identity -> connection side table.

use uuid::Uuid;

use crate::domain::PlayerId;
use crate::protocol::ServerMsg;

/// Transient handle of one live transport connection.
pub type ConnId = Uuid;

pub trait Notifier: Send + Sync {
    /// Route messages for `player_id` in `room_id` to `conn`, replacing any older binding.
    fn bind(&self, room_id: &str, player_id: PlayerId, conn: ConnId);

    /// Drop the binding if it still points at `conn`.
    ///
    /// Returns `false` when the binding is gone or belongs to a newer connection.
    fn unbind(&self, room_id: &str, player_id: PlayerId, conn: ConnId) -> bool;

    fn send_to_conn(&self, conn: ConnId, msg: ServerMsg);

    /// No-op when the participant has no live connection.
    fn send_to_player(&self, room_id: &str, player_id: PlayerId, msg: ServerMsg);

    /// Every connected participant of the room.
    fn broadcast(&self, room_id: &str, msg: ServerMsg);

    /// Forget all bindings of a torn-down room.
    fn release_room(&self, room_id: &str);
}
