use crate::domain::events::{GameEvent, Pacing};
use crate::domain::participant::PlayerId;
use crate::domain::roles::Role;
use crate::domain::state::{EndReason, GameResult, Phase, Table};
use crate::errors::domain::{DomainError, PreconditionKind};

/// The Assassin's final guess. Naming Merlin wins for evil; anyone else wins for good.
pub fn assassinate(
    table: &mut Table,
    caller: PlayerId,
    target: PlayerId,
) -> Result<Vec<GameEvent>, DomainError> {
    table.require_phase(Phase::Assassination)?;
    if table.roster.get(caller)?.role != Some(Role::Assassin) {
        return Err(DomainError::precondition(
            PreconditionKind::NotAssassin,
            "only the Assassin can assassinate",
        ));
    }
    if !table
        .state
        .assassination_targets
        .iter()
        .any(|t| t.player_id == target)
    {
        return Err(DomainError::precondition(
            PreconditionKind::InvalidTarget,
            "target must be one of the good players",
        ));
    }

    let reason = if table.roster.get(target)?.role == Some(Role::Merlin) {
        EndReason::MerlinAssassinated
    } else {
        EndReason::MerlinSurvived
    };
    let result = GameResult::victory(reason);
    table.state.finish(result.clone());
    Ok(vec![
        GameEvent::GameOver(result),
        GameEvent::StateChanged(Pacing::Immediate),
    ])
}
