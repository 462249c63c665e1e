//! Team proposals and the approval vote.

use std::collections::BTreeSet;

use crate::domain::catalog::MAX_REJECTED_PROPOSALS;
use crate::domain::events::{GameEvent, Pacing};
use crate::domain::participant::PlayerId;
use crate::domain::state::{
    EndReason, GameResult, LogEntry, Phase, ProposalRecord, Table, TeamVote,
};
use crate::errors::domain::{DomainError, PreconditionKind};

/// Leader nominates the team for the current mission.
pub fn propose_team(
    table: &mut Table,
    caller: PlayerId,
    team: &[PlayerId],
) -> Result<Vec<GameEvent>, DomainError> {
    table.require_phase(Phase::Proposing)?;
    table.require_seated(caller)?;
    if table.leader() != Some(caller) {
        return Err(DomainError::precondition(
            PreconditionKind::NotLeader,
            "only the leader can propose a team",
        ));
    }

    let required = table
        .setup()?
        .team_size(table.state.mission_round)
        .ok_or_else(|| DomainError::phase_mismatch("no mission left to staff"))?;
    if team.len() != required {
        return Err(DomainError::precondition(
            PreconditionKind::InvalidTeam,
            format!("team must have {required} members, got {}", team.len()),
        ));
    }
    let distinct: BTreeSet<PlayerId> = team.iter().copied().collect();
    if distinct.len() != team.len() {
        return Err(DomainError::precondition(
            PreconditionKind::InvalidTeam,
            "team lists a player twice",
        ));
    }
    if let Some(stranger) = team.iter().find(|id| !table.roster.contains(**id)) {
        return Err(DomainError::precondition(
            PreconditionKind::InvalidTeam,
            format!("{stranger} is not seated in this room"),
        ));
    }

    let state = &mut table.state;
    state.proposed_team = team.to_vec();
    state.votes.clear();
    state.phase = Phase::Voting;
    Ok(vec![GameEvent::StateChanged(Pacing::Immediate)])
}

/// Record one approval vote and resolve once every connected participant has voted.
pub fn vote_on_team(
    table: &mut Table,
    caller: PlayerId,
    vote: TeamVote,
) -> Result<Vec<GameEvent>, DomainError> {
    table.require_phase(Phase::Voting)?;
    table.require_seated(caller)?;
    if table.state.votes.contains_key(&caller) {
        return Err(DomainError::precondition(
            PreconditionKind::AlreadyVoted,
            "you already voted on this team",
        ));
    }

    table.state.votes.insert(caller, vote);
    let events = settle_team_vote(table);
    if events.is_empty() {
        // Still open: publish who has voted so far.
        return Ok(vec![GameEvent::StateChanged(Pacing::Immediate)]);
    }
    Ok(events)
}

/// Resolve the pending approval vote if enough votes are in.
///
/// Also called when a participant disconnects, since the connected count is
/// the denominator. Returns no events when the vote is still open.
pub fn settle_team_vote(table: &mut Table) -> Vec<GameEvent> {
    if table.state.phase != Phase::Voting {
        return Vec::new();
    }
    let connected = table.roster.connected_count();
    if table.state.votes.len() < connected || table.state.votes.is_empty() {
        return Vec::new();
    }

    let approvals = table
        .state
        .votes
        .values()
        .filter(|v| **v == TeamVote::Approve)
        .count();
    let approved = approvals * 2 > connected;

    let leader = table
        .roster
        .at(table.state.leader_index)
        .map(|p| p.name.clone())
        .unwrap_or_default();
    let record = ProposalRecord {
        quest: table.state.mission_round + 1,
        proposal: table.state.vote_track + 1,
        leader,
        team: table.roster.names_of(&table.state.proposed_team),
        votes: table.state.votes.clone(),
        result: approved.into(),
    };

    let seats = table.roster.len();
    let state = &mut table.state;
    state.log.push(LogEntry::Proposal(record));

    let mut events = vec![GameEvent::VoteResolved {
        votes: state.votes.clone(),
        approved,
    }];

    if approved {
        state.vote_track = 0;
        state.mission_votes.clear();
        state.phase = Phase::Mission;
        events.push(GameEvent::StateChanged(Pacing::VoteResult));
        return events;
    }

    state.vote_track += 1;
    if state.vote_track >= MAX_REJECTED_PROPOSALS {
        let result = GameResult::victory(EndReason::ProposalsRejected);
        state.finish(result.clone());
        events.push(GameEvent::GameOver(result));
        events.push(GameEvent::StateChanged(Pacing::Immediate));
        return events;
    }

    state.leader_index = (state.leader_index + 1) % seats.max(1);
    state.phase = Phase::Proposing;
    events.push(GameEvent::StateChanged(Pacing::VoteResult));
    events
}
