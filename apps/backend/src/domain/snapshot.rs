//! Public snapshot API for observing game state without exposing hidden information.
//!
//! Roles, individual approval votes and individual mission cards never appear
//! here. They are revealed only through result payloads.

use serde::Serialize;

use crate::domain::catalog::MISSION_COUNT;
use crate::domain::participant::{PlayerId, Roster, Seat};
use crate::domain::roles::Alignment;
use crate::domain::state::{
    AssassinationTarget, LogEntry, MissionOutcome, Phase, Table,
};

/// Public info about a single seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatPublic {
    pub player_id: PlayerId,
    pub name: String,
    pub seat: Seat,
    pub connected: bool,
    pub is_host: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupPublic {
    pub mission_team_sizes: [u8; MISSION_COUNT],
    pub two_fails_required: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LadyPublic {
    pub holder: PlayerId,
    pub previous_holders: Vec<PlayerId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub phase: Phase,
    pub players: Vec<SeatPublic>,
    pub mission_round: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader: Option<PlayerId>,
    pub vote_track: u8,
    pub proposed_team: Vec<PlayerId>,
    /// Who has voted on the current proposal, not how.
    pub voted: Vec<PlayerId>,
    pub mission_votes_cast: usize,
    pub mission_results: Vec<MissionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lady_of_the_lake: Option<LadyPublic>,
    pub log: Vec<LogEntry>,
    pub assassination_targets: Vec<AssassinationTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup: Option<SetupPublic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Alignment>,
}

pub fn seats_public(roster: &Roster) -> Vec<SeatPublic> {
    roster
        .iter()
        .map(|p| SeatPublic {
            player_id: p.id,
            name: p.name.clone(),
            seat: p.seat,
            connected: p.connected,
            is_host: p.is_host,
        })
        .collect()
}

pub fn snapshot(table: &Table) -> GameSnapshot {
    let state = &table.state;
    let voted = if state.phase == Phase::Voting {
        state.votes.keys().copied().collect()
    } else {
        Vec::new()
    };
    let mission_votes_cast = if state.phase == Phase::Mission {
        state.mission_votes.len()
    } else {
        0
    };

    GameSnapshot {
        phase: state.phase,
        players: seats_public(&table.roster),
        mission_round: state.mission_round,
        leader: table.leader(),
        vote_track: state.vote_track,
        proposed_team: state.proposed_team.clone(),
        voted,
        mission_votes_cast,
        mission_results: state.mission_results.clone(),
        lady_of_the_lake: state.lady.as_ref().map(|l| LadyPublic {
            holder: l.holder,
            previous_holders: l.previous_holders.clone(),
        }),
        log: state.log.clone(),
        assassination_targets: state.assassination_targets.clone(),
        setup: state.setup.map(|s| SetupPublic {
            mission_team_sizes: s.mission_team_sizes,
            two_fails_required: s.two_fails_required,
        }),
        winner: state.result.as_ref().and_then(|r| r.winner()),
    }
}
