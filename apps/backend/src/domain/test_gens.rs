// Proptest generators for domain types.

use proptest::prelude::*;

use crate::domain::catalog::{MAX_PLAYERS, MIN_PLAYERS};
use crate::domain::state::{MissionVote, TeamVote};

/// A supported roster size.
pub fn player_count() -> impl Strategy<Value = usize> {
    MIN_PLAYERS..=MAX_PLAYERS
}

/// A roster size that plays with the Lady of the Lake.
pub fn lady_player_count() -> impl Strategy<Value = usize> {
    8usize..=MAX_PLAYERS
}

pub fn seed() -> impl Strategy<Value = u64> {
    any::<u64>()
}

pub fn team_vote() -> impl Strategy<Value = TeamVote> {
    prop_oneof![Just(TeamVote::Approve), Just(TeamVote::Reject)]
}

pub fn mission_vote() -> impl Strategy<Value = MissionVote> {
    prop_oneof![Just(MissionVote::Success), Just(MissionVote::Fail)]
}

/// Roster size together with one approval vote per seat.
pub fn roster_with_votes() -> impl Strategy<Value = (usize, Vec<TeamVote>)> {
    player_count().prop_flat_map(|n| (Just(n), prop::collection::vec(team_vote(), n)))
}
