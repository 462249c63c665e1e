//! Participants and the seat-ordered roster of a room.

use uuid::Uuid;

use crate::domain::catalog::MAX_PLAYERS;
use crate::domain::roles::{Alignment, Role};
use crate::errors::domain::{DomainError, NotFoundKind, PreconditionKind};

/// Stable participant identity, independent of any transport connection.
pub type PlayerId = Uuid;

/// Position in join order. Assigned once at join time and never reused.
pub type Seat = u32;

pub const MAX_NAME_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: PlayerId,
    pub name: String,
    pub seat: Seat,
    pub is_host: bool,
    pub connected: bool,
    /// Set exactly once per game at start.
    pub role: Option<Role>,
}

impl Participant {
    pub fn alignment(&self) -> Option<Alignment> {
        self.role.map(Role::alignment)
    }
}

/// Seat-ordered participants. Vector order is seat order and fixes the leader
/// sequence once a game has started.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<Participant>,
    next_seat: Seat,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.players.iter()
    }

    pub fn ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    /// Seat a new participant. The first participant ever seated is the host.
    pub fn join(&mut self, id: PlayerId, name: &str) -> Result<&Participant, DomainError> {
        let name = normalize_name(name)?;
        if self.players.len() >= MAX_PLAYERS {
            return Err(DomainError::precondition(
                PreconditionKind::RoomFull,
                format!("room already has {MAX_PLAYERS} players"),
            ));
        }
        if self.players.iter().any(|p| p.id == id) {
            return Err(DomainError::precondition(
                PreconditionKind::AlreadyInRoom,
                "participant already seated",
            ));
        }
        if self
            .players
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(&name))
        {
            return Err(DomainError::precondition(
                PreconditionKind::InvalidName,
                format!("name '{name}' is already taken"),
            ));
        }

        let seat = self.next_seat;
        self.next_seat = seat.checked_add(1).ok_or_else(|| {
            DomainError::precondition(PreconditionKind::RoomFull, "room has run out of seats")
        })?;
        let is_host = seat == 0;
        self.players.push(Participant {
            id,
            name,
            seat,
            is_host,
            connected: true,
            role: None,
        });
        let idx = self.players.len() - 1;
        Ok(&self.players[idx])
    }

    /// Remove a participant, keeping the relative seat order of the rest.
    pub fn remove(&mut self, id: PlayerId) -> Result<Participant, DomainError> {
        let idx = self.index_of(id)?;
        Ok(self.players.remove(idx))
    }

    pub fn index_of(&self, id: PlayerId) -> Result<usize, DomainError> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, id.to_string()))
    }

    pub fn get(&self, id: PlayerId) -> Result<&Participant, DomainError> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, id.to_string()))
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Result<&mut Participant, DomainError> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, id.to_string()))
    }

    pub fn at(&self, index: usize) -> Option<&Participant> {
        self.players.get(index)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    pub fn host(&self) -> Option<&Participant> {
        self.players.iter().find(|p| p.is_host)
    }

    pub fn is_host(&self, id: PlayerId) -> bool {
        self.host().is_some_and(|h| h.id == id)
    }

    pub fn connected_count(&self) -> usize {
        self.players.iter().filter(|p| p.connected).count()
    }

    pub fn name_of(&self, id: PlayerId) -> String {
        self.get(id).map(|p| p.name.clone()).unwrap_or_default()
    }

    pub fn names_of(&self, ids: &[PlayerId]) -> Vec<String> {
        ids.iter().map(|id| self.name_of(*id)).collect()
    }

    pub(crate) fn set_roles(&mut self, roles: impl IntoIterator<Item = (PlayerId, Role)>) {
        for (id, role) in roles {
            if let Some(p) = self.players.iter_mut().find(|p| p.id == id) {
                p.role = Some(role);
            }
        }
    }

    pub(crate) fn clear_roles(&mut self) {
        for p in &mut self.players {
            p.role = None;
        }
    }
}

fn normalize_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::precondition(
            PreconditionKind::InvalidName,
            "name must not be empty",
        ));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(DomainError::precondition(
            PreconditionKind::InvalidName,
            format!("name must be at most {MAX_NAME_CHARS} characters"),
        ));
    }
    Ok(name.to_string())
}
