//! WebSocket wire types.
//!
//! Every frame is a JSON object tagged by `type` (snake_case); payload fields
//! are camelCase.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::player_view::{PrivateView, RoleReveal};
use crate::domain::roles::Alignment;
use crate::domain::snapshot::{GameSnapshot, SeatPublic};
use crate::domain::state::{EndReason, MissionOutcome, MissionVote, TeamVote};
use crate::domain::PlayerId;
use crate::errors::ErrorCode;

/// Commands a client can send. The acting participant is always the one bound
/// to the sending connection; payloads never name the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientMsg {
    CreateRoom,
    JoinRoom { room_id: String, name: String },
    AttemptReconnect { room_id: String, token: Uuid },
    LeaveRoom,
    StartGame,
    ProposeTeam { team: Vec<PlayerId> },
    VoteTeam { vote: TeamVote },
    VoteMission { vote: MissionVote },
    UseLadyOfTheLake { target: PlayerId },
    Assassinate { target: PlayerId },
    CloseRoom,
    ForceEnd,
}

impl ClientMsg {
    pub const fn kind(&self) -> &'static str {
        match self {
            ClientMsg::CreateRoom => "create_room",
            ClientMsg::JoinRoom { .. } => "join_room",
            ClientMsg::AttemptReconnect { .. } => "attempt_reconnect",
            ClientMsg::LeaveRoom => "leave_room",
            ClientMsg::StartGame => "start_game",
            ClientMsg::ProposeTeam { .. } => "propose_team",
            ClientMsg::VoteTeam { .. } => "vote_team",
            ClientMsg::VoteMission { .. } => "vote_mission",
            ClientMsg::UseLadyOfTheLake { .. } => "use_lady_of_the_lake",
            ClientMsg::Assassinate { .. } => "assassinate",
            ClientMsg::CloseRoom => "close_room",
            ClientMsg::ForceEnd => "force_end",
        }
    }
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerMsg {
    RoomCreated {
        room_id: String,
    },

    JoinSuccess {
        room_id: String,
        player_id: PlayerId,
        /// Secret presented on `attempt_reconnect`.
        reconnect_token: Uuid,
        is_host: bool,
    },

    ReconnectSuccess {
        room_id: String,
        player_id: PlayerId,
        players: Vec<SeatPublic>,
        game: GameSnapshot,
        #[serde(skip_serializing_if = "Option::is_none")]
        private: Option<PrivateView>,
    },

    ReconnectFailed {
        reason: String,
    },

    RosterUpdate {
        players: Vec<SeatPublic>,
    },

    PlayerConnection {
        player_id: PlayerId,
        connected: bool,
    },

    GameStarted,

    RoleAssigned {
        #[serde(flatten)]
        view: PrivateView,
    },

    GameState {
        game: GameSnapshot,
    },

    VoteResult {
        votes: BTreeMap<PlayerId, TeamVote>,
        approved: bool,
    },

    MissionResult {
        result: MissionOutcome,
        fails: usize,
    },

    /// Private to the investigator.
    LadyResult {
        target_id: PlayerId,
        target_name: String,
        alignment: Alignment,
    },

    GameOver {
        winner: Alignment,
        reason: EndReason,
        message: &'static str,
        roles: Vec<RoleReveal>,
    },

    GameForciblyEnded {
        room_id: String,
        reason: String,
    },

    RoomClosed {
        room_id: String,
        reason: String,
    },

    RoomLeft,

    Error {
        code: ErrorCode,
        message: String,
    },
}

impl ServerMsg {
    /// The room this notice tears down, if any.
    pub fn closed_room(&self) -> Option<&str> {
        match self {
            ServerMsg::GameForciblyEnded { room_id, .. } | ServerMsg::RoomClosed { room_id, .. } => {
                Some(room_id)
            }
            _ => None,
        }
    }
}
