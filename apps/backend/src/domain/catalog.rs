//! Static game setups keyed by roster size.

use serde::Serialize;

use crate::domain::roles::Role;
use crate::errors::domain::DomainError;

pub const MIN_PLAYERS: usize = 5;
pub const MAX_PLAYERS: usize = 10;
pub const MISSION_COUNT: usize = 5;
/// Successful or failed missions needed to decide the mission phase.
pub const MISSIONS_TO_DECIDE: usize = 3;
/// Consecutive rejected proposals that hand the game to evil.
pub const MAX_REJECTED_PROPOSALS: u8 = 5;
/// Smallest roster that plays with the Lady of the Lake.
pub const LADY_MIN_PLAYERS: usize = 8;
/// Round indices (0-based) after which the Lady of the Lake is used.
pub const LADY_ROUNDS: [u8; 3] = [1, 2, 3];
/// Round index (0-based) that may require two fails.
pub const TWO_FAIL_ROUND: u8 = 3;

/// Role multiset and mission sizes for one roster size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSetup {
    pub player_count: usize,
    pub roles: &'static [Role],
    pub mission_team_sizes: [u8; MISSION_COUNT],
    /// Whether round index 3 needs two fails to count as failed.
    pub two_fails_required: bool,
}

use Role::{Assassin, LoyalServant, Merlin, Minion, Mordred, Morgana, Oberon, Percival};

static SETUPS: [GameSetup; 6] = [
    GameSetup {
        player_count: 5,
        roles: &[Merlin, Percival, LoyalServant, Morgana, Assassin],
        mission_team_sizes: [2, 3, 2, 3, 3],
        two_fails_required: false,
    },
    GameSetup {
        player_count: 6,
        roles: &[Merlin, Percival, LoyalServant, LoyalServant, Morgana, Assassin],
        mission_team_sizes: [2, 3, 4, 3, 4],
        two_fails_required: false,
    },
    GameSetup {
        player_count: 7,
        roles: &[
            Merlin,
            Percival,
            LoyalServant,
            LoyalServant,
            Morgana,
            Assassin,
            Oberon,
        ],
        mission_team_sizes: [2, 3, 3, 4, 4],
        two_fails_required: true,
    },
    GameSetup {
        player_count: 8,
        roles: &[
            Merlin,
            Percival,
            LoyalServant,
            LoyalServant,
            LoyalServant,
            Morgana,
            Assassin,
            Minion,
        ],
        mission_team_sizes: [3, 4, 4, 5, 5],
        two_fails_required: true,
    },
    GameSetup {
        player_count: 9,
        roles: &[
            Merlin,
            Percival,
            LoyalServant,
            LoyalServant,
            LoyalServant,
            LoyalServant,
            Morgana,
            Assassin,
            Mordred,
        ],
        mission_team_sizes: [3, 4, 4, 5, 5],
        two_fails_required: true,
    },
    GameSetup {
        player_count: 10,
        roles: &[
            Merlin,
            Percival,
            LoyalServant,
            LoyalServant,
            LoyalServant,
            LoyalServant,
            Morgana,
            Assassin,
            Mordred,
            Oberon,
        ],
        mission_team_sizes: [3, 4, 4, 5, 5],
        two_fails_required: true,
    },
];

/// Look up the setup for a roster size.
pub fn setup_for(player_count: usize) -> Result<&'static GameSetup, DomainError> {
    SETUPS
        .iter()
        .find(|setup| setup.player_count == player_count)
        .ok_or_else(|| {
            DomainError::invalid_configuration(format!(
                "{player_count} players is not supported (choose {MIN_PLAYERS}-{MAX_PLAYERS})"
            ))
        })
}

impl GameSetup {
    /// Required team size for a 0-based round index.
    pub fn team_size(&self, round: u8) -> Option<usize> {
        self.mission_team_sizes
            .get(round as usize)
            .map(|size| *size as usize)
    }

    /// Number of fail cards that make the mission in `round` fail.
    pub fn fails_to_fail(&self, round: u8) -> usize {
        if self.two_fails_required && round == TWO_FAIL_ROUND {
            2
        } else {
            1
        }
    }

    pub fn lady_of_the_lake(&self) -> bool {
        self.player_count >= LADY_MIN_PLAYERS
    }
}
