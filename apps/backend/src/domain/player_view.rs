//! What a single participant is allowed to know beyond the public snapshot.

use serde::Serialize;

use crate::domain::intel::{role_intel, RoleIntel};
use crate::domain::participant::PlayerId;
use crate::domain::roles::{Alignment, Role};
use crate::domain::state::Table;
use crate::errors::domain::DomainError;

/// Private role reveal. Sent at game start and replayed on reconnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateView {
    pub role: Role,
    pub alignment: Alignment,
    pub role_info: RoleIntel,
}

/// `None` until roles have been dealt.
pub fn private_view(table: &Table, who: PlayerId) -> Result<Option<PrivateView>, DomainError> {
    let Some(role) = table.roster.get(who)?.role else {
        return Ok(None);
    };
    let role_info = role_intel(&table.roster, &table.state.percival_view, who)?;
    Ok(Some(PrivateView {
        role,
        alignment: role.alignment(),
        role_info,
    }))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleReveal {
    pub player_id: PlayerId,
    pub name: String,
    pub role: Role,
    pub alignment: Alignment,
}

/// Everyone's role, for the game-over payload.
pub fn role_reveal(table: &Table) -> Vec<RoleReveal> {
    table
        .roster
        .iter()
        .filter_map(|p| {
            p.role.map(|role| RoleReveal {
                player_id: p.id,
                name: p.name.clone(),
                role,
                alignment: role.alignment(),
            })
        })
        .collect()
}
