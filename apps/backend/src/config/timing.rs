use std::time::Duration;

use crate::config::server::ServerConfig;
use crate::domain::Pacing;

/// Pacing delays between a resolution and the next full-state broadcast,
/// plus the room lifetime timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameTiming {
    pub start_reveal: Duration,
    pub vote_result: Duration,
    pub lady_entry: Duration,
    pub next_round: Duration,
    pub host_grace: Duration,
    pub finished_room_ttl: Duration,
}

impl Default for GameTiming {
    fn default() -> Self {
        Self {
            start_reveal: Duration::from_secs(1),
            vote_result: Duration::from_secs(3),
            lady_entry: Duration::from_secs(4),
            next_round: Duration::from_secs(4),
            host_grace: Duration::from_secs(120),
            finished_room_ttl: Duration::from_secs(60),
        }
    }
}

impl GameTiming {
    /// No pacing delays; room timers keep their defaults.
    pub fn immediate() -> Self {
        Self {
            start_reveal: Duration::ZERO,
            vote_result: Duration::ZERO,
            lady_entry: Duration::ZERO,
            next_round: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            host_grace: config.host_grace,
            finished_room_ttl: config.finished_room_ttl,
            ..Self::default()
        }
    }

    pub fn delay_for(&self, pacing: Pacing) -> Duration {
        match pacing {
            Pacing::Immediate => Duration::ZERO,
            Pacing::StartReveal => self.start_reveal,
            Pacing::VoteResult => self.vote_result,
            Pacing::LadyEntry => self.lady_entry,
            Pacing::NextRound => self.next_round,
        }
    }
}
