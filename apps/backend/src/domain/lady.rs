//! Lady of the Lake investigations.

use crate::domain::events::{GameEvent, Pacing};
use crate::domain::participant::PlayerId;
use crate::domain::state::{InvestigationRecord, LogEntry, Phase, Table};
use crate::errors::domain::{DomainError, PreconditionKind};

/// Reveal `target`'s alignment to the holder and pass the token to `target`.
///
/// Nobody can be investigated twice: every holder, past or current, is an
/// invalid target.
pub fn use_lady_of_the_lake(
    table: &mut Table,
    caller: PlayerId,
    target: PlayerId,
) -> Result<Vec<GameEvent>, DomainError> {
    table.require_phase(Phase::LadyOfTheLake)?;
    table.require_seated(caller)?;
    let lady = table
        .state
        .lady
        .as_ref()
        .ok_or_else(|| DomainError::phase_mismatch("Lady of the Lake is not in play"))?;
    if lady.holder != caller {
        return Err(DomainError::precondition(
            PreconditionKind::NotLadyHolder,
            "only the Lady of the Lake holder can investigate",
        ));
    }
    if lady.previous_holders.contains(&target) {
        return Err(DomainError::precondition(
            PreconditionKind::InvalidTarget,
            "that player has already held the Lady of the Lake",
        ));
    }
    let investigated = table.roster.get(target).map_err(|_| {
        DomainError::precondition(PreconditionKind::InvalidTarget, "unknown target")
    })?;
    let alignment = investigated
        .alignment()
        .ok_or_else(|| DomainError::phase_mismatch("roles have not been dealt"))?;
    let target_name = investigated.name.clone();

    let record = InvestigationRecord {
        quest: table.state.mission_round + 1,
        investigator: table.roster.name_of(caller),
        target: target_name.clone(),
    };

    let seats = table.roster.len();
    let state = &mut table.state;
    state.log.push(LogEntry::LadyOfTheLake(record));
    if let Some(lady) = state.lady.as_mut() {
        if !lady.previous_holders.contains(&caller) {
            lady.previous_holders.push(caller);
        }
        lady.previous_holders.push(target);
        lady.holder = target;
    }
    state.advance_round(seats);

    Ok(vec![
        GameEvent::Investigated {
            investigator: caller,
            target,
            target_name,
            alignment,
        },
        GameEvent::StateChanged(Pacing::NextRound),
    ])
}
