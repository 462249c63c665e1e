use std::collections::BTreeMap;

use crate::domain::participant::PlayerId;
use crate::domain::roles::Alignment;
use crate::domain::state::{GameResult, MissionOutcome, TeamVote};

/// When the next public state snapshot should go out after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    Immediate,
    /// After the start announcement and private role reveals.
    StartReveal,
    /// After a proposal vote result.
    VoteResult,
    /// After a mission result that leads into the Lady of the Lake.
    LadyEntry,
    /// After a mission result or an investigation that starts the next round.
    NextRound,
}

/// Observable outcome of a game operation, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    GameStarted,
    /// Roles are dealt; every participant gets their private reveal.
    RolesAssigned,
    VoteResolved {
        votes: BTreeMap<PlayerId, TeamVote>,
        approved: bool,
    },
    MissionResolved {
        outcome: MissionOutcome,
        fails: usize,
    },
    /// Private to the investigator.
    Investigated {
        investigator: PlayerId,
        target: PlayerId,
        target_name: String,
        alignment: Alignment,
    },
    GameOver(GameResult),
    StateChanged(Pacing),
}
