use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::catalog::GameSetup;
use crate::domain::participant::{PlayerId, Roster};
use crate::domain::roles::Alignment;
use crate::errors::domain::{DomainError, PreconditionKind};

/// Overall game progression phases.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Players gather; no roles yet.
    Lobby,
    /// Leader picks a team.
    Proposing,
    /// Everyone connected approves or rejects the team.
    Voting,
    /// Team members play success or fail.
    Mission,
    /// Holder investigates one participant's alignment.
    LadyOfTheLake,
    /// Assassin names Merlin.
    Assassination,
    Finished,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Lobby => "lobby",
            Phase::Proposing => "proposing",
            Phase::Voting => "voting",
            Phase::Mission => "mission",
            Phase::LadyOfTheLake => "ladyOfTheLake",
            Phase::Assassination => "assassination",
            Phase::Finished => "finished",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamVote {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionVote {
    Success,
    Fail,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionOutcome {
    Success,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LadyOfTheLake {
    pub holder: PlayerId,
    /// Everyone who has held the token, the current holder included.
    pub previous_holders: Vec<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRecord {
    /// 1-based mission number.
    pub quest: u8,
    /// 1-based attempt within the mission.
    pub proposal: u8,
    pub leader: String,
    pub team: Vec<String>,
    pub votes: BTreeMap<PlayerId, TeamVote>,
    pub result: ProposalResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalResult {
    Passed,
    Failed,
}

impl From<bool> for ProposalResult {
    fn from(approved: bool) -> Self {
        if approved {
            ProposalResult::Passed
        } else {
            ProposalResult::Failed
        }
    }
}

/// Public record of an investigation. The alignment seen is never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestigationRecord {
    pub quest: u8,
    pub investigator: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LogEntry {
    Proposal(ProposalRecord),
    LadyOfTheLake(InvestigationRecord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EndReason {
    ProposalsRejected,
    MissionsFailed,
    MerlinAssassinated,
    MerlinSurvived,
}

impl EndReason {
    pub const fn winner(self) -> Alignment {
        match self {
            EndReason::ProposalsRejected
            | EndReason::MissionsFailed
            | EndReason::MerlinAssassinated => Alignment::Evil,
            EndReason::MerlinSurvived => Alignment::Good,
        }
    }

    pub const fn describe(self) -> &'static str {
        match self {
            EndReason::ProposalsRejected => "Five team proposals in a row were rejected.",
            EndReason::MissionsFailed => "Three missions failed.",
            EndReason::MerlinAssassinated => "The Assassin found Merlin.",
            EndReason::MerlinSurvived => "The Assassin missed Merlin. Good prevails.",
        }
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameResult {
    Victory { winner: Alignment, reason: EndReason },
    /// Ended by the host or the host-disconnect timer; nobody wins.
    ForciblyEnded { reason: String },
}

impl GameResult {
    pub fn victory(reason: EndReason) -> Self {
        GameResult::Victory {
            winner: reason.winner(),
            reason,
        }
    }

    pub fn winner(&self) -> Option<Alignment> {
        match self {
            GameResult::Victory { winner, .. } => Some(*winner),
            GameResult::ForciblyEnded { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssassinationTarget {
    pub player_id: PlayerId,
    pub name: String,
}

/// Authoritative state of one game.
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: Phase,
    /// Catalog entry, fixed at start.
    pub setup: Option<&'static GameSetup>,
    /// 0-based mission index, 0..=4.
    pub mission_round: u8,
    /// Index into the roster.
    pub leader_index: usize,
    /// Rejected proposals in the current round, 0..=4.
    pub vote_track: u8,
    pub proposed_team: Vec<PlayerId>,
    pub votes: BTreeMap<PlayerId, TeamVote>,
    pub mission_votes: BTreeMap<PlayerId, MissionVote>,
    pub mission_results: Vec<MissionOutcome>,
    pub lady: Option<LadyOfTheLake>,
    pub log: Vec<LogEntry>,
    pub assassination_targets: Vec<AssassinationTarget>,
    /// Merlin and Morgana in the order Percival sees them.
    pub percival_view: Vec<PlayerId>,
    pub result: Option<GameResult>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::lobby()
    }
}

impl GameState {
    pub fn lobby() -> Self {
        Self {
            phase: Phase::Lobby,
            setup: None,
            mission_round: 0,
            leader_index: 0,
            vote_track: 0,
            proposed_team: Vec::new(),
            votes: BTreeMap::new(),
            mission_votes: BTreeMap::new(),
            mission_results: Vec::new(),
            lady: None,
            log: Vec::new(),
            assassination_targets: Vec::new(),
            percival_view: Vec::new(),
            result: None,
        }
    }

    pub fn successes(&self) -> usize {
        self.mission_results
            .iter()
            .filter(|r| **r == MissionOutcome::Success)
            .count()
    }

    pub fn failures(&self) -> usize {
        self.mission_results
            .iter()
            .filter(|r| **r == MissionOutcome::Fail)
            .count()
    }

    pub fn in_game(&self) -> bool {
        !matches!(self.phase, Phase::Lobby | Phase::Finished)
    }

    /// Move to the next mission with the next seat as leader.
    pub(crate) fn advance_round(&mut self, seats: usize) {
        self.mission_round += 1;
        self.vote_track = 0;
        self.leader_index = (self.leader_index + 1) % seats.max(1);
        self.proposed_team.clear();
        self.votes.clear();
        self.mission_votes.clear();
        self.phase = Phase::Proposing;
    }

    pub(crate) fn finish(&mut self, result: GameResult) {
        self.phase = Phase::Finished;
        self.result = Some(result);
    }
}

/// A room's roster together with its game. Every game operation takes the
/// table so it can validate callers against seats.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub roster: Roster,
    pub state: GameState,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn leader(&self) -> Option<PlayerId> {
        if self.state.phase == Phase::Lobby {
            return None;
        }
        self.roster.at(self.state.leader_index).map(|p| p.id)
    }

    pub(crate) fn require_phase(&self, expected: Phase) -> Result<(), DomainError> {
        if self.state.phase == expected {
            Ok(())
        } else {
            Err(DomainError::phase_mismatch(format!(
                "expected phase {}, game is in {}",
                expected.as_str(),
                self.state.phase.as_str()
            )))
        }
    }

    pub(crate) fn require_seated(&self, who: PlayerId) -> Result<(), DomainError> {
        self.roster.get(who).map(|_| ())
    }

    pub(crate) fn require_host(&self, who: PlayerId) -> Result<(), DomainError> {
        self.require_seated(who)?;
        if self.roster.is_host(who) {
            Ok(())
        } else {
            Err(DomainError::precondition(
                PreconditionKind::NotHost,
                "only the host can do that",
            ))
        }
    }

    pub(crate) fn setup(&self) -> Result<&'static GameSetup, DomainError> {
        self.state
            .setup
            .ok_or_else(|| DomainError::phase_mismatch("game has not started"))
    }
}
