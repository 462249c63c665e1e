//! Domain-level error type used across the game engine and the room service.
//!
//! This error type is transport-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Why a command was rejected in the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PreconditionKind {
    /// Command is not valid in the current phase.
    PhaseMismatch,
    NotHost,
    NotLeader,
    NotLadyHolder,
    NotAssassin,
    /// Mission vote from someone outside the approved team.
    NotOnTeam,
    AlreadyVoted,
    /// Proposed team has the wrong size, duplicates, or unknown members.
    InvalidTeam,
    /// Investigation or assassination target is not allowed.
    InvalidTarget,
    /// Reconnect attempted for a participant that is still connected.
    AlreadyConnected,
    /// Connection issued a room command without being seated in a room.
    NotInRoom,
    /// Connection tried to join a second room.
    AlreadyInRoom,
    RoomFull,
    InvalidName,
}

/// Domain-level not found entities.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Room,
    Player,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Roster size has no catalog entry.
    InvalidConfiguration(String),
    /// Caller, phase or payload does not satisfy the command's guard.
    Precondition(PreconditionKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::InvalidConfiguration(d) => write!(f, "invalid configuration: {d}"),
            DomainError::Precondition(kind, d) => write!(f, "precondition {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn invalid_configuration(detail: impl Into<String>) -> Self {
        Self::InvalidConfiguration(detail.into())
    }
    pub fn precondition(kind: PreconditionKind, detail: impl Into<String>) -> Self {
        Self::Precondition(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    pub fn phase_mismatch(detail: impl Into<String>) -> Self {
        Self::Precondition(PreconditionKind::PhaseMismatch, detail.into())
    }

    /// Returns the precondition kind, if this is a precondition failure.
    pub fn precondition_kind(&self) -> Option<&PreconditionKind> {
        match self {
            DomainError::Precondition(kind, _) => Some(kind),
            _ => None,
        }
    }
}
