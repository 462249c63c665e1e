//! In-game commands. Each one validates fully inside the domain before
//! anything is mutated, so a rejection leaves the room untouched.

use tracing::debug;

use super::RoomService;
use crate::domain::events::GameEvent;
use crate::domain::state::{MissionVote, Table, TeamVote};
use crate::domain::{
    assassinate, force_end, propose_team, start_game, use_lady_of_the_lake, vote_on_mission,
    vote_on_team, PlayerId,
};
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::services::room::Membership;

impl RoomService {
    pub fn start_game(&self, membership: &Membership) -> Result<(), AppError> {
        self.apply(membership, "start_game", |table, caller| {
            let mut rng = self.inner.rng.lock();
            start_game(table, caller, &mut *rng)
        })
    }

    pub fn propose_team(&self, membership: &Membership, team: &[PlayerId]) -> Result<(), AppError> {
        self.apply(membership, "propose_team", |table, caller| {
            propose_team(table, caller, team)
        })
    }

    pub fn vote_team(&self, membership: &Membership, vote: TeamVote) -> Result<(), AppError> {
        self.apply(membership, "vote_team", |table, caller| {
            vote_on_team(table, caller, vote)
        })
    }

    pub fn vote_mission(&self, membership: &Membership, vote: MissionVote) -> Result<(), AppError> {
        self.apply(membership, "vote_mission", |table, caller| {
            vote_on_mission(table, caller, vote)
        })
    }

    pub fn use_lady(&self, membership: &Membership, target: PlayerId) -> Result<(), AppError> {
        self.apply(membership, "use_lady_of_the_lake", |table, caller| {
            use_lady_of_the_lake(table, caller, target)
        })
    }

    pub fn assassinate(&self, membership: &Membership, target: PlayerId) -> Result<(), AppError> {
        self.apply(membership, "assassinate", |table, caller| {
            assassinate(table, caller, target)
        })
    }

    /// Host ends the game (or lobby) with no winner; the room is removed.
    pub fn force_end(&self, membership: &Membership) -> Result<(), AppError> {
        self.apply(membership, "force_end", |table, caller| {
            force_end(table, caller, "ended by host")
        })
    }

    fn apply<F>(&self, membership: &Membership, command: &'static str, op: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut Table, PlayerId) -> Result<Vec<GameEvent>, DomainError>,
    {
        let handle = self.inner.registry.get(&membership.room_id)?;
        let mut room = self.inner.registry.lock_live(&handle)?;
        let events = op(&mut room.table, membership.player_id).map_err(|err| {
            debug!(
                room_id = %membership.room_id,
                player_id = %membership.player_id,
                command,
                error = %err,
                "Command rejected"
            );
            err
        })?;
        debug!(
            room_id = %room.id,
            player_id = %membership.player_id,
            command,
            phase = room.table.phase().as_str(),
            "Command applied"
        );
        self.dispatch(&room, events);
        Ok(())
    }
}
