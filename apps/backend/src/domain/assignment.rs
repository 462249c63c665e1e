//! Random role assignment.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::catalog::setup_for;
use crate::domain::participant::PlayerId;
use crate::domain::roles::Role;
use crate::errors::domain::DomainError;

/// Outcome of dealing roles to a roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// One entry per participant, in the order the participants were given.
    pub roles: Vec<(PlayerId, Role)>,
    /// Merlin and Morgana as Percival sees them. Shuffled once here and kept,
    /// so every later query shows the same order.
    pub percival_view: Vec<PlayerId>,
}

impl RoleAssignment {
    pub fn role_of(&self, id: PlayerId) -> Option<Role> {
        self.roles
            .iter()
            .find(|(pid, _)| *pid == id)
            .map(|(_, role)| *role)
    }
}

/// Deal the catalog's role multiset to `players` using a uniform permutation.
pub fn assign_roles<R: Rng + ?Sized>(
    players: &[PlayerId],
    rng: &mut R,
) -> Result<RoleAssignment, DomainError> {
    let setup = setup_for(players.len())?;

    let mut deck: Vec<Role> = setup.roles.to_vec();
    deck.shuffle(rng);

    let roles: Vec<(PlayerId, Role)> = players.iter().copied().zip(deck).collect();

    let mut percival_view: Vec<PlayerId> = roles
        .iter()
        .filter(|(_, role)| matches!(role, Role::Merlin | Role::Morgana))
        .map(|(id, _)| *id)
        .collect();
    percival_view.shuffle(rng);

    Ok(RoleAssignment {
        roles,
        percival_view,
    })
}
