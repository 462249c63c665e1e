//! Injectable store of live rooms keyed by room code.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};

use crate::errors::domain::{DomainError, NotFoundKind};
use crate::services::room::{Room, RoomId};
use crate::utils::room_code::{generate_room_code, normalize_room_code};

pub type RoomHandle = Arc<Mutex<Room>>;

/// Each room sits behind its own mutex; holding it serializes every command
/// for that room.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<RoomId, RoomHandle>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Allocate a room under a fresh, unused code.
    pub fn create(&self) -> (RoomId, RoomHandle) {
        loop {
            let code = generate_room_code();
            if let Entry::Vacant(slot) = self.rooms.entry(code.clone()) {
                let handle = Arc::new(Mutex::new(Room::new(code.clone())));
                slot.insert(handle.clone());
                return (code, handle);
            }
        }
    }

    pub fn get(&self, room_id: &str) -> Result<RoomHandle, DomainError> {
        let key = normalize_room_code(room_id);
        self.rooms
            .get(&key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Room, format!("room {key} does not exist")))
    }

    /// Lock a room fetched with [`get`](Self::get).
    ///
    /// Teardown removes a room while holding its lock, so a caller that was
    /// queued on the lock may wake up holding a room that no longer exists.
    /// Such a room is reported as not found.
    pub fn lock_live<'a>(&self, handle: &'a RoomHandle) -> Result<MutexGuard<'a, Room>, DomainError> {
        let room = handle.lock();
        let live = self
            .rooms
            .get(&room.id)
            .is_some_and(|entry| Arc::ptr_eq(entry.value(), handle));
        if !live {
            return Err(DomainError::not_found(
                NotFoundKind::Room,
                format!("room {} was closed", room.id),
            ));
        }
        Ok(room)
    }

    pub fn remove(&self, room_id: &str) -> Option<RoomHandle> {
        self.rooms
            .remove(&normalize_room_code(room_id))
            .map(|(_, handle)| handle)
    }

    pub fn contains(&self, room_id: &str) -> bool {
        self.rooms.contains_key(&normalize_room_code(room_id))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
