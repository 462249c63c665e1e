//! Per-participant role intelligence.
//!
//! A pure function of the roster's roles and the Percival order stored at
//! assignment time, so a reconnecting participant is shown exactly what they
//! saw at game start.

use serde::Serialize;

use crate::domain::participant::{Participant, PlayerId, Roster};
use crate::domain::roles::Role;
use crate::errors::domain::{DomainError, NotFoundKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntelKind {
    /// Merlin: evil players other than Mordred.
    KnownEvil,
    /// Percival: Merlin and Morgana, indistinguishable.
    MerlinCandidates,
    /// Evil roles other than Oberon: fellow evil players other than Oberon.
    EvilTeammates,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleIntel {
    pub kind: IntelKind,
    pub description: String,
    /// Display names. Roster order, except Percival's stored order.
    pub players: Vec<String>,
}

impl RoleIntel {
    fn nothing() -> Self {
        Self {
            kind: IntelKind::None,
            description: "You have no special knowledge.".to_string(),
            players: Vec::new(),
        }
    }
}

pub fn role_intel(
    roster: &Roster,
    percival_view: &[PlayerId],
    who: PlayerId,
) -> Result<RoleIntel, DomainError> {
    let viewer = roster.get(who)?;
    let role = viewer.role.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Player, format!("{who} has no role yet"))
    })?;

    let evil = || roster.iter().filter(|p| p.role.is_some_and(Role::is_evil));

    let intel = match role {
        Role::Merlin => RoleIntel {
            kind: IntelKind::KnownEvil,
            description: "You know these players are evil:".to_string(),
            players: names(evil().filter(|p| p.role != Some(Role::Mordred))),
        },
        Role::Percival => RoleIntel {
            kind: IntelKind::MerlinCandidates,
            description: "These two players are Merlin and Morgana (order is random):"
                .to_string(),
            players: roster.names_of(percival_view),
        },
        Role::Morgana | Role::Assassin | Role::Minion | Role::Mordred => RoleIntel {
            kind: IntelKind::EvilTeammates,
            description: "Your evil teammates are:".to_string(),
            players: names(evil().filter(|p| p.role != Some(Role::Oberon) && p.id != who)),
        },
        Role::Oberon | Role::LoyalServant => RoleIntel::nothing(),
    };
    Ok(intel)
}

fn names<'a>(players: impl Iterator<Item = &'a Participant>) -> Vec<String> {
    players.map(|p| p.name.clone()).collect()
}
