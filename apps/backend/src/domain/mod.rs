//! Domain layer: pure game logic types and helpers.

pub mod assassination;
pub mod assignment;
pub mod catalog;
pub mod events;
pub mod intel;
pub mod lady;
pub mod lobby;
pub mod missions;
pub mod participant;
pub mod player_view;
pub mod proposals;
pub mod roles;
pub mod snapshot;
pub mod state;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod tests_game_flow;

// Re-exports for ergonomics
pub use assassination::assassinate;
pub use catalog::{setup_for, GameSetup};
pub use events::{GameEvent, Pacing};
pub use lady::use_lady_of_the_lake;
pub use lobby::{abort, force_end, start_game};
pub use missions::vote_on_mission;
pub use participant::{Participant, PlayerId, Roster, Seat};
pub use proposals::{propose_team, settle_team_vote, vote_on_team};
pub use roles::{Alignment, Role};
pub use state::{GameResult, GameState, MissionVote, Phase, Table, TeamVote};
