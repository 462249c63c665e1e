//! Mission votes and the end-of-mission win checks.

use crate::domain::catalog::{LADY_ROUNDS, MISSIONS_TO_DECIDE};
use crate::domain::events::{GameEvent, Pacing};
use crate::domain::participant::PlayerId;
use crate::domain::roles::Alignment;
use crate::domain::state::{
    AssassinationTarget, EndReason, GameResult, MissionOutcome, MissionVote, Phase, Table,
};
use crate::errors::domain::{DomainError, PreconditionKind};

pub fn vote_on_mission(
    table: &mut Table,
    caller: PlayerId,
    vote: MissionVote,
) -> Result<Vec<GameEvent>, DomainError> {
    table.require_phase(Phase::Mission)?;
    table.require_seated(caller)?;
    if !table.state.proposed_team.contains(&caller) {
        return Err(DomainError::precondition(
            PreconditionKind::NotOnTeam,
            "only team members vote on the mission",
        ));
    }
    if table.state.mission_votes.contains_key(&caller) {
        return Err(DomainError::precondition(
            PreconditionKind::AlreadyVoted,
            "you already played a card on this mission",
        ));
    }
    let setup = table.setup()?;

    table.state.mission_votes.insert(caller, vote);
    if table.state.mission_votes.len() < table.state.proposed_team.len() {
        return Ok(vec![GameEvent::StateChanged(Pacing::Immediate)]);
    }

    let round = table.state.mission_round;
    let fails = table
        .state
        .mission_votes
        .values()
        .filter(|v| **v == MissionVote::Fail)
        .count();
    let outcome = if fails >= setup.fails_to_fail(round) {
        MissionOutcome::Fail
    } else {
        MissionOutcome::Success
    };
    table.state.mission_results.push(outcome);

    let mut events = vec![GameEvent::MissionResolved { outcome, fails }];

    if table.state.failures() >= MISSIONS_TO_DECIDE {
        let result = GameResult::victory(EndReason::MissionsFailed);
        table.state.finish(result.clone());
        events.push(GameEvent::GameOver(result));
        events.push(GameEvent::StateChanged(Pacing::Immediate));
        return Ok(events);
    }

    if table.state.successes() >= MISSIONS_TO_DECIDE {
        table.state.assassination_targets = table
            .roster
            .iter()
            .filter(|p| p.alignment() == Some(Alignment::Good))
            .map(|p| AssassinationTarget {
                player_id: p.id,
                name: p.name.clone(),
            })
            .collect();
        table.state.phase = Phase::Assassination;
        events.push(GameEvent::StateChanged(Pacing::Immediate));
        return Ok(events);
    }

    if table.state.lady.is_some() && LADY_ROUNDS.contains(&round) {
        table.state.phase = Phase::LadyOfTheLake;
        events.push(GameEvent::StateChanged(Pacing::LadyEntry));
    } else {
        let seats = table.roster.len();
        table.state.advance_round(seats);
        events.push(GameEvent::StateChanged(Pacing::NextRound));
    }
    Ok(events)
}
