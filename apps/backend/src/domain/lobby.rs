//! Game start and forced termination.

use rand::Rng;

use crate::domain::assignment::assign_roles;
use crate::domain::catalog::setup_for;
use crate::domain::events::{GameEvent, Pacing};
use crate::domain::participant::PlayerId;
use crate::domain::state::{GameResult, GameState, LadyOfTheLake, Phase, Table};
use crate::errors::domain::DomainError;

/// Deal roles, pick a random leader and open the first proposal.
///
/// With 8 or more players the seat before the leader receives the Lady of the
/// Lake and is recorded as its first holder.
pub fn start_game<R: Rng + ?Sized>(
    table: &mut Table,
    caller: PlayerId,
    rng: &mut R,
) -> Result<Vec<GameEvent>, DomainError> {
    table.require_host(caller)?;
    table.require_phase(Phase::Lobby)?;

    let seats = table.roster.len();
    let setup = setup_for(seats)?;
    let assignment = assign_roles(&table.roster.ids(), rng)?;
    let leader_index = rng.random_range(0..seats);

    let lady = if setup.lady_of_the_lake() {
        let holder_index = (leader_index + seats - 1) % seats;
        table.roster.at(holder_index).map(|p| LadyOfTheLake {
            holder: p.id,
            previous_holders: vec![p.id],
        })
    } else {
        None
    };

    table.roster.clear_roles();
    table.roster.set_roles(assignment.roles);
    table.state = GameState {
        phase: Phase::Proposing,
        setup: Some(setup),
        leader_index,
        lady,
        percival_view: assignment.percival_view,
        ..GameState::lobby()
    };

    Ok(vec![
        GameEvent::GameStarted,
        GameEvent::RolesAssigned,
        GameEvent::StateChanged(Pacing::StartReveal),
    ])
}

/// Host-initiated end of the game (or lobby) with no winner.
pub fn force_end(
    table: &mut Table,
    caller: PlayerId,
    reason: impl Into<String>,
) -> Result<Vec<GameEvent>, DomainError> {
    table.require_host(caller)?;
    abort(table, reason)
}

/// End without a winner. Used by the host command and the host-disconnect timer.
///
/// Allowed in every phase. A game that already finished keeps its recorded
/// result; the forced end only dismisses the room early.
pub fn abort(table: &mut Table, reason: impl Into<String>) -> Result<Vec<GameEvent>, DomainError> {
    let result = GameResult::ForciblyEnded {
        reason: reason.into(),
    };
    if table.state.phase != Phase::Finished {
        table.state.finish(result.clone());
    }
    Ok(vec![GameEvent::GameOver(result)])
}
