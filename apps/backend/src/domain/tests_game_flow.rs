use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::assassination::assassinate;
use crate::domain::events::{GameEvent, Pacing};
use crate::domain::lobby::{abort, force_end, start_game};
use crate::domain::missions::vote_on_mission;
use crate::domain::proposals::{propose_team, settle_team_vote, vote_on_team};
use crate::domain::roles::{Alignment, Role};
use crate::domain::state::{
    EndReason, GameResult, LogEntry, MissionOutcome, MissionVote, Phase, ProposalResult, TeamVote,
};
use crate::domain::test_state_helpers::{
    current_leader, holder_of, pid, play_round, propose_and_vote_all, seated_table,
    started_table, team_from_leader,
};
use crate::errors::domain::{DomainError, PreconditionKind};

fn kind(err: DomainError) -> PreconditionKind {
    err.precondition_kind().cloned().expect("precondition error")
}

// ---- start ----

#[test]
fn start_requires_host() {
    let (mut table, ids) = seated_table(5);
    let mut rng = StdRng::seed_from_u64(1);
    let err = start_game(&mut table, ids[1], &mut rng).unwrap_err();
    assert_eq!(kind(err), PreconditionKind::NotHost);
    assert_eq!(table.phase(), Phase::Lobby);
}

#[test]
fn start_rejects_unsupported_roster_without_mutation() {
    let (mut table, ids) = seated_table(4);
    let mut rng = StdRng::seed_from_u64(1);
    let err = start_game(&mut table, ids[0], &mut rng).unwrap_err();
    assert!(matches!(err, DomainError::InvalidConfiguration(_)));
    assert_eq!(table.phase(), Phase::Lobby);
    assert!(table.roster.iter().all(|p| p.role.is_none()));
}

#[test]
fn start_opens_first_proposal() {
    let (mut table, ids) = seated_table(5);
    let mut rng = StdRng::seed_from_u64(9);
    let events = start_game(&mut table, ids[0], &mut rng).unwrap();

    assert_eq!(
        events,
        vec![
            GameEvent::GameStarted,
            GameEvent::RolesAssigned,
            GameEvent::StateChanged(Pacing::StartReveal),
        ]
    );
    assert_eq!(table.phase(), Phase::Proposing);
    assert_eq!(table.state.mission_round, 0);
    assert_eq!(table.state.vote_track, 0);
    assert!(table.state.leader_index < 5);
    assert!(table.state.lady.is_none(), "no Lady of the Lake below 8 players");
    assert!(table.roster.iter().all(|p| p.role.is_some()));
}

#[test]
fn start_twice_is_a_phase_mismatch() {
    let (mut table, ids) = started_table(5, 2);
    let mut rng = StdRng::seed_from_u64(3);
    let err = start_game(&mut table, ids[0], &mut rng).unwrap_err();
    assert_eq!(kind(err), PreconditionKind::PhaseMismatch);
}

// ---- proposals ----

#[test]
fn only_leader_may_propose() {
    let (mut table, ids) = started_table(5, 4);
    let leader = current_leader(&table);
    let other = *ids.iter().find(|id| **id != leader).unwrap();
    let team = team_from_leader(&table);

    let err = propose_team(&mut table, other, &team).unwrap_err();
    assert_eq!(kind(err), PreconditionKind::NotLeader);
    assert_eq!(table.phase(), Phase::Proposing);
}

#[test]
fn malformed_teams_are_rejected_without_mutation() {
    let (mut table, ids) = started_table(5, 4);
    let leader = current_leader(&table);

    let too_big = vec![ids[0], ids[1], ids[2]];
    let duplicate = vec![ids[0], ids[0]];
    let stranger = vec![ids[0], pid(99)];
    for team in [too_big, duplicate, stranger] {
        let err = propose_team(&mut table, leader, &team).unwrap_err();
        assert_eq!(kind(err), PreconditionKind::InvalidTeam);
        assert_eq!(table.phase(), Phase::Proposing);
        assert!(table.state.proposed_team.is_empty());
    }
}

#[test]
fn proposal_moves_to_voting() {
    let (mut table, _) = started_table(5, 4);
    let leader = current_leader(&table);
    let team = team_from_leader(&table);
    let events = propose_team(&mut table, leader, &team).unwrap();
    assert_eq!(events, vec![GameEvent::StateChanged(Pacing::Immediate)]);
    assert_eq!(table.phase(), Phase::Voting);
    assert_eq!(table.state.proposed_team, team);
}

// ---- team vote ----

#[test]
fn vote_resolves_exactly_when_all_connected_voted() {
    let (mut table, ids) = started_table(5, 6);
    let leader = current_leader(&table);
    let team = team_from_leader(&table);
    propose_team(&mut table, leader, &team).unwrap();

    for id in &ids[..4] {
        let events = vote_on_team(&mut table, *id, TeamVote::Approve).unwrap();
        assert_eq!(events, vec![GameEvent::StateChanged(Pacing::Immediate)]);
        assert_eq!(table.phase(), Phase::Voting);
    }
    let events = vote_on_team(&mut table, ids[4], TeamVote::Reject).unwrap();
    assert!(matches!(
        events.first(),
        Some(GameEvent::VoteResolved { approved: true, .. })
    ));
    assert_eq!(table.phase(), Phase::Mission);
}

#[test]
fn duplicate_team_vote_is_rejected() {
    let (mut table, ids) = started_table(5, 6);
    let leader = current_leader(&table);
    let team = team_from_leader(&table);
    propose_team(&mut table, leader, &team).unwrap();

    vote_on_team(&mut table, ids[0], TeamVote::Approve).unwrap();
    let err = vote_on_team(&mut table, ids[0], TeamVote::Reject).unwrap_err();
    assert_eq!(kind(err), PreconditionKind::AlreadyVoted);
    assert_eq!(table.state.votes.get(&ids[0]), Some(&TeamVote::Approve));
}

#[test]
fn three_of_five_approvals_pass_and_are_logged() {
    let (mut table, ids) = started_table(5, 12);
    let leader = current_leader(&table);
    let team = team_from_leader(&table);
    propose_team(&mut table, leader, &team).unwrap();

    let votes = [
        TeamVote::Approve,
        TeamVote::Approve,
        TeamVote::Approve,
        TeamVote::Reject,
        TeamVote::Reject,
    ];
    for (id, vote) in ids.iter().zip(votes) {
        vote_on_team(&mut table, *id, vote).unwrap();
    }

    assert_eq!(table.phase(), Phase::Mission);
    assert!(table.state.mission_votes.is_empty());
    let Some(LogEntry::Proposal(record)) = table.state.log.last() else {
        panic!("expected a proposal record");
    };
    assert_eq!(record.quest, 1);
    assert_eq!(record.proposal, 1);
    assert_eq!(record.leader, table.roster.name_of(leader));
    assert_eq!(record.team, table.roster.names_of(&team));
    assert_eq!(record.votes.len(), 5);
    assert_eq!(record.result, ProposalResult::Passed);

    let json = serde_json::to_value(LogEntry::Proposal(record.clone())).unwrap();
    assert_eq!(json["type"], "proposal");
    assert_eq!(json["result"], "passed");
}

#[test]
fn rejected_proposal_rotates_leader() {
    let (mut table, _) = started_table(5, 12);
    let before = table.state.leader_index;
    let events = propose_and_vote_all(&mut table, TeamVote::Reject);

    assert!(events.contains(&GameEvent::StateChanged(Pacing::VoteResult)));
    assert_eq!(table.phase(), Phase::Proposing);
    assert_eq!(table.state.vote_track, 1);
    assert_eq!(table.state.leader_index, (before + 1) % 5);
}

#[test]
fn tie_is_not_a_majority() {
    let (mut table, ids) = started_table(6, 3);
    let leader = current_leader(&table);
    let team = team_from_leader(&table);
    propose_team(&mut table, leader, &team).unwrap();
    for (i, id) in ids.iter().enumerate() {
        let vote = if i < 3 { TeamVote::Approve } else { TeamVote::Reject };
        vote_on_team(&mut table, *id, vote).unwrap();
    }
    assert_eq!(table.phase(), Phase::Proposing);
    assert_eq!(table.state.vote_track, 1);
}

#[test]
fn disconnected_participants_shrink_the_denominator() {
    let (mut table, ids) = started_table(5, 13);
    table.roster.get_mut(ids[4]).unwrap().connected = false;
    let leader = current_leader(&table);
    let team = team_from_leader(&table);
    propose_team(&mut table, leader, &team).unwrap();

    for (i, id) in ids[..4].iter().enumerate() {
        let vote = if i < 3 { TeamVote::Approve } else { TeamVote::Reject };
        vote_on_team(&mut table, *id, vote).unwrap();
    }
    assert_eq!(table.phase(), Phase::Mission, "3 of 4 connected approve");
}

#[test]
fn disconnect_of_last_pending_voter_settles_the_vote() {
    let (mut table, ids) = started_table(5, 13);
    let leader = current_leader(&table);
    let team = team_from_leader(&table);
    propose_team(&mut table, leader, &team).unwrap();
    for id in &ids[..4] {
        vote_on_team(&mut table, *id, TeamVote::Approve).unwrap();
    }
    assert!(settle_team_vote(&mut table).is_empty());

    table.roster.get_mut(ids[4]).unwrap().connected = false;
    let events = settle_team_vote(&mut table);
    assert!(matches!(
        events.first(),
        Some(GameEvent::VoteResolved { approved: true, .. })
    ));
    assert_eq!(table.phase(), Phase::Mission);
    assert!(settle_team_vote(&mut table).is_empty(), "never resolves twice");
}

#[test]
fn fifth_rejection_hands_evil_the_win_before_rotation() {
    let (mut table, _) = started_table(5, 14);
    let start = table.state.leader_index;
    for _ in 0..4 {
        propose_and_vote_all(&mut table, TeamVote::Reject);
    }
    assert_eq!(table.state.vote_track, 4);
    assert_eq!(table.state.leader_index, (start + 4) % 5);

    let events = propose_and_vote_all(&mut table, TeamVote::Reject);
    assert_eq!(table.phase(), Phase::Finished);
    assert_eq!(table.state.leader_index, (start + 4) % 5, "no rotation after the 5th");
    assert!(events.contains(&GameEvent::GameOver(GameResult::victory(
        EndReason::ProposalsRejected
    ))));
    assert_eq!(table.state.result.as_ref().and_then(|r| r.winner()), Some(Alignment::Evil));
}

#[test]
fn approval_resets_vote_track() {
    let (mut table, _) = started_table(5, 15);
    propose_and_vote_all(&mut table, TeamVote::Reject);
    propose_and_vote_all(&mut table, TeamVote::Reject);
    assert_eq!(table.state.vote_track, 2);
    propose_and_vote_all(&mut table, TeamVote::Approve);
    assert_eq!(table.state.vote_track, 0);
    let Some(LogEntry::Proposal(record)) = table.state.log.last() else {
        panic!("expected a proposal record");
    };
    assert_eq!(record.proposal, 3);
}

// ---- missions ----

#[test]
fn mission_vote_requires_team_membership_once() {
    let (mut table, ids) = started_table(5, 16);
    propose_and_vote_all(&mut table, TeamVote::Approve);
    let team = table.state.proposed_team.clone();
    let outsider = *ids.iter().find(|id| !team.contains(id)).unwrap();

    let err = vote_on_mission(&mut table, outsider, MissionVote::Fail).unwrap_err();
    assert_eq!(kind(err), PreconditionKind::NotOnTeam);

    vote_on_mission(&mut table, team[0], MissionVote::Success).unwrap();
    let err = vote_on_mission(&mut table, team[0], MissionVote::Fail).unwrap_err();
    assert_eq!(kind(err), PreconditionKind::AlreadyVoted);
    assert_eq!(table.state.mission_votes.len(), 1);
}

#[test]
fn one_fail_fails_an_ordinary_mission() {
    let (mut table, _) = started_table(5, 17);
    let events = play_round(&mut table, 1);
    assert!(events.contains(&GameEvent::MissionResolved {
        outcome: MissionOutcome::Fail,
        fails: 1
    }));
    assert!(events.contains(&GameEvent::StateChanged(Pacing::NextRound)));
    assert_eq!(table.state.mission_results, vec![MissionOutcome::Fail]);
    assert_eq!(table.state.mission_round, 1);
    assert_eq!(table.phase(), Phase::Proposing);
}

#[test]
fn round_advance_rotates_leader_and_clears_votes() {
    let (mut table, _) = started_table(6, 18);
    let before = table.state.leader_index;
    play_round(&mut table, 0);
    assert_eq!(table.state.leader_index, (before + 1) % 6);
    assert!(table.state.votes.is_empty());
    assert!(table.state.mission_votes.is_empty());
    assert!(table.state.proposed_team.is_empty());
}

#[test]
fn fourth_mission_needs_two_fails_with_seven_players() {
    let (mut table, _) = started_table(7, 19);
    play_round(&mut table, 1);
    play_round(&mut table, 1);
    play_round(&mut table, 0);
    assert_eq!(table.state.mission_round, 3);

    let events = play_round(&mut table, 1);
    assert!(events.contains(&GameEvent::MissionResolved {
        outcome: MissionOutcome::Success,
        fails: 1
    }));

    let events = play_round(&mut table, 2);
    assert!(events.contains(&GameEvent::MissionResolved {
        outcome: MissionOutcome::Fail,
        fails: 2
    }));
    assert_eq!(table.phase(), Phase::Finished);
}

#[test]
fn five_player_scenario_three_failed_missions() {
    let (mut table, _) = started_table(5, 20);
    assert_eq!(team_from_leader(&table).len(), 2);

    play_round(&mut table, 1);
    play_round(&mut table, 1);
    let events = play_round(&mut table, 1);

    assert_eq!(table.phase(), Phase::Finished);
    assert_eq!(
        table.state.result,
        Some(GameResult::Victory {
            winner: Alignment::Evil,
            reason: EndReason::MissionsFailed
        })
    );
    assert!(matches!(events.last(), Some(GameEvent::StateChanged(Pacing::Immediate))));
}

#[test]
fn three_successes_open_assassination_of_good_players() {
    let (mut table, _) = started_table(6, 21);
    play_round(&mut table, 0);
    play_round(&mut table, 0);
    let events = play_round(&mut table, 0);

    assert_eq!(table.phase(), Phase::Assassination);
    assert!(events.contains(&GameEvent::StateChanged(Pacing::Immediate)));
    let good: Vec<_> = table
        .roster
        .iter()
        .filter(|p| p.alignment() == Some(Alignment::Good))
        .map(|p| p.id)
        .collect();
    let targets: Vec<_> = table
        .state
        .assassination_targets
        .iter()
        .map(|t| t.player_id)
        .collect();
    assert_eq!(targets, good);
}

// ---- assassination ----

fn table_at_assassination(seed: u64) -> crate::domain::state::Table {
    let (mut table, _) = started_table(5, seed);
    for _ in 0..3 {
        play_round(&mut table, 0);
    }
    assert_eq!(table.phase(), Phase::Assassination);
    table
}

#[test]
fn only_the_assassin_may_strike() {
    let mut table = table_at_assassination(22);
    let morgana = holder_of(&table, Role::Morgana);
    let merlin = holder_of(&table, Role::Merlin);
    let err = assassinate(&mut table, morgana, merlin).unwrap_err();
    assert_eq!(kind(err), PreconditionKind::NotAssassin);
    assert_eq!(table.phase(), Phase::Assassination);
}

#[test]
fn evil_players_are_not_valid_targets() {
    let mut table = table_at_assassination(22);
    let assassin = holder_of(&table, Role::Assassin);
    let morgana = holder_of(&table, Role::Morgana);
    let err = assassinate(&mut table, assassin, morgana).unwrap_err();
    assert_eq!(kind(err), PreconditionKind::InvalidTarget);
    assert_eq!(table.phase(), Phase::Assassination);
}

#[test]
fn assassinating_merlin_wins_for_evil() {
    let mut table = table_at_assassination(23);
    let assassin = holder_of(&table, Role::Assassin);
    let merlin = holder_of(&table, Role::Merlin);
    assassinate(&mut table, assassin, merlin).unwrap();
    assert_eq!(table.phase(), Phase::Finished);
    assert_eq!(
        table.state.result,
        Some(GameResult::victory(EndReason::MerlinAssassinated))
    );
}

#[test]
fn missing_merlin_wins_for_good() {
    let mut table = table_at_assassination(24);
    let assassin = holder_of(&table, Role::Assassin);
    let percival = holder_of(&table, Role::Percival);
    let events = assassinate(&mut table, assassin, percival).unwrap();
    assert_eq!(table.phase(), Phase::Finished);
    assert_eq!(
        events[0],
        GameEvent::GameOver(GameResult::Victory {
            winner: Alignment::Good,
            reason: EndReason::MerlinSurvived
        })
    );
}

// ---- forced end ----

#[test]
fn only_host_can_force_end() {
    let (mut table, ids) = started_table(5, 25);
    let err = force_end(&mut table, ids[2], "bored").unwrap_err();
    assert_eq!(kind(err), PreconditionKind::NotHost);
    assert_eq!(table.phase(), Phase::Proposing);
}

#[test]
fn forced_end_has_no_winner() {
    let (mut table, ids) = started_table(5, 25);
    propose_and_vote_all(&mut table, TeamVote::Approve);
    let events = force_end(&mut table, ids[0], "host ended the game").unwrap();

    assert_eq!(table.phase(), Phase::Finished);
    assert_eq!(
        events,
        vec![GameEvent::GameOver(GameResult::ForciblyEnded {
            reason: "host ended the game".to_string()
        })]
    );
    assert_eq!(table.state.result.as_ref().and_then(|r| r.winner()), None);
}

#[test]
fn host_can_dismiss_a_finished_game() {
    let (mut table, ids) = started_table(5, 27);
    for _ in 0..5 {
        propose_and_vote_all(&mut table, TeamVote::Reject);
    }
    assert_eq!(table.phase(), Phase::Finished);

    let err = force_end(&mut table, ids[1], "bored").unwrap_err();
    assert_eq!(kind(err), PreconditionKind::NotHost);

    let events = force_end(&mut table, ids[0], "ended by host").unwrap();
    assert_eq!(
        events,
        vec![GameEvent::GameOver(GameResult::ForciblyEnded {
            reason: "ended by host".to_string()
        })]
    );
    // The earned result stands.
    assert_eq!(
        table.state.result,
        Some(GameResult::victory(EndReason::ProposalsRejected))
    );

    // Repeated aborts stay harmless.
    assert!(abort(&mut table, "host disconnected").is_ok());
    assert_eq!(table.phase(), Phase::Finished);
}

#[test]
fn pending_votes_publish_progress() {
    let (mut table, _) = started_table(5, 28);
    propose_and_vote_all(&mut table, TeamVote::Approve);
    let team = table.state.proposed_team.clone();

    let events = vote_on_mission(&mut table, team[0], MissionVote::Success).unwrap();
    assert_eq!(events, vec![GameEvent::StateChanged(Pacing::Immediate)]);
    assert_eq!(table.phase(), Phase::Mission);
    assert!(table.state.mission_results.is_empty());
}

#[test]
fn commands_in_wrong_phase_are_rejected() {
    let (mut table, ids) = started_table(5, 26);
    let err = vote_on_team(&mut table, ids[0], TeamVote::Approve).unwrap_err();
    assert_eq!(kind(err), PreconditionKind::PhaseMismatch);
    let err = vote_on_mission(&mut table, ids[0], MissionVote::Success).unwrap_err();
    assert_eq!(kind(err), PreconditionKind::PhaseMismatch);
    let err = assassinate(&mut table, ids[0], ids[1]).unwrap_err();
    assert_eq!(kind(err), PreconditionKind::PhaseMismatch);
}
