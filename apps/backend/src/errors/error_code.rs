//! Error codes for the Avalon backend.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP problem details and WebSocket error messages.

use core::fmt;

use serde::{Serialize, Serializer};

use crate::errors::domain::{DomainError, NotFoundKind, PreconditionKind};

/// Centralized error codes for the Avalon backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Configuration of a game
    /// Roster size has no catalog entry
    InvalidPlayerCount,

    // Command preconditions
    /// Command is not valid in the current phase
    PhaseMismatch,
    /// Only the host may do this
    NotHost,
    /// Only the current leader may propose
    NotLeader,
    /// Only the Lady of the Lake holder may investigate
    NotLadyHolder,
    /// Only the Assassin may assassinate
    NotAssassin,
    /// Only team members vote on a mission
    NotOnTeam,
    /// Participant already voted
    AlreadyVoted,
    /// Proposed team is malformed
    InvalidTeam,
    /// Target is not allowed
    InvalidTarget,
    /// Participant is still connected
    AlreadyConnected,
    /// Connection is not seated in a room
    NotInRoom,
    /// Connection is already seated in a room
    AlreadyInRoom,
    /// Room has no free seat
    RoomFull,
    /// Display name rejected
    InvalidName,

    // Resource Not Found
    /// Room not found
    RoomNotFound,
    /// Player not found
    PlayerNotFound,

    // Request handling
    /// Malformed or unsupported request
    BadRequest,

    // System Errors
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidPlayerCount => "INVALID_PLAYER_COUNT",

            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::NotHost => "NOT_HOST",
            Self::NotLeader => "NOT_LEADER",
            Self::NotLadyHolder => "NOT_LADY_HOLDER",
            Self::NotAssassin => "NOT_ASSASSIN",
            Self::NotOnTeam => "NOT_ON_TEAM",
            Self::AlreadyVoted => "ALREADY_VOTED",
            Self::InvalidTeam => "INVALID_TEAM",
            Self::InvalidTarget => "INVALID_TARGET",
            Self::AlreadyConnected => "ALREADY_CONNECTED",
            Self::NotInRoom => "NOT_IN_ROOM",
            Self::AlreadyInRoom => "ALREADY_IN_ROOM",
            Self::RoomFull => "ROOM_FULL",
            Self::InvalidName => "INVALID_NAME",

            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",

            Self::BadRequest => "BAD_REQUEST",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Maps a domain error onto its canonical code.
    pub fn for_domain(err: &DomainError) -> Self {
        match err {
            DomainError::InvalidConfiguration(_) => Self::InvalidPlayerCount,
            DomainError::Precondition(kind, _) => match kind {
                PreconditionKind::PhaseMismatch => Self::PhaseMismatch,
                PreconditionKind::NotHost => Self::NotHost,
                PreconditionKind::NotLeader => Self::NotLeader,
                PreconditionKind::NotLadyHolder => Self::NotLadyHolder,
                PreconditionKind::NotAssassin => Self::NotAssassin,
                PreconditionKind::NotOnTeam => Self::NotOnTeam,
                PreconditionKind::AlreadyVoted => Self::AlreadyVoted,
                PreconditionKind::InvalidTeam => Self::InvalidTeam,
                PreconditionKind::InvalidTarget => Self::InvalidTarget,
                PreconditionKind::AlreadyConnected => Self::AlreadyConnected,
                PreconditionKind::NotInRoom => Self::NotInRoom,
                PreconditionKind::AlreadyInRoom => Self::AlreadyInRoom,
                PreconditionKind::RoomFull => Self::RoomFull,
                PreconditionKind::InvalidName => Self::InvalidName,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Room => Self::RoomNotFound,
                NotFoundKind::Player => Self::PlayerNotFound,
            },
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
