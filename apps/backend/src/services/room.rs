use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::snapshot::{seats_public, SeatPublic};
use crate::domain::state::{Phase, Table};
use crate::domain::PlayerId;

pub type RoomId = String;

/// Which room and seat a connection acts for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub room_id: RoomId,
    pub player_id: PlayerId,
}

/// One room: its table plus the reconnection credentials issued on join.
#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    pub table: Table,
    tokens: HashMap<Uuid, PlayerId>,
}

impl Room {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            table: Table::new(),
            tokens: HashMap::new(),
        }
    }

    pub fn issue_token(&mut self, player_id: PlayerId) -> Uuid {
        let token = Uuid::new_v4();
        self.tokens.insert(token, player_id);
        token
    }

    pub fn player_for_token(&self, token: Uuid) -> Option<PlayerId> {
        self.tokens.get(&token).copied()
    }

    pub fn revoke_tokens(&mut self, player_id: PlayerId) {
        self.tokens.retain(|_, p| *p != player_id);
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            room_id: self.id.clone(),
            phase: self.table.phase(),
            players: seats_public(&self.table.roster),
        }
    }
}

/// Public description served over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub phase: Phase,
    pub players: Vec<SeatPublic>,
}
