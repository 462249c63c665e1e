// Room timers on a paused clock: host grace, room cleanup and paced broadcasts.

use std::time::Duration;

use avalon_backend::config::GameTiming;
use avalon_backend::domain::Role;
use avalon_backend::protocol::ServerMsg;

use crate::support::table::{conn, service_with, TestRoom};

const GRACE: Duration = Duration::from_secs(120);
const FINISHED_TTL: Duration = Duration::from_secs(60);

async fn sleep_past(d: Duration) {
    tokio::time::sleep(d + Duration::from_secs(1)).await;
}

#[tokio::test(start_paused = true)]
async fn absent_host_ends_a_running_game_after_the_grace_period() {
    let room = TestRoom::started(5, 31);
    let host = room.host();
    room.service.disconnect(host.conn, &host.membership);
    assert!(room.service.host_timer_pending(&room.room_id));

    tokio::time::sleep(GRACE / 2).await;
    assert!(room.service.room_exists(&room.room_id));

    sleep_past(GRACE / 2).await;
    assert!(!room.service.room_exists(&room.room_id));
    for seat in &room.seats[1..] {
        match room.notifier.messages(seat.conn).last() {
            Some(ServerMsg::GameForciblyEnded { reason, .. }) => {
                assert_eq!(reason, "host disconnected");
            }
            other => panic!("expected game_forcibly_ended, got {other:?}"),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn host_returning_in_time_cancels_the_timer() {
    let room = TestRoom::started(5, 32);
    let host = room.host();
    room.service.disconnect(host.conn, &host.membership);

    tokio::time::sleep(GRACE / 2).await;
    room.service
        .reconnect(conn(90), &room.room_id, host.token)
        .unwrap();
    assert!(!room.service.host_timer_pending(&room.room_id));

    sleep_past(GRACE).await;
    assert!(room.service.room_exists(&room.room_id));
    let ended = room
        .notifier
        .count_where(room.seats[1].conn, |m| {
            matches!(m, ServerMsg::GameForciblyEnded { .. })
        });
    assert_eq!(ended, 0);
}

#[tokio::test(start_paused = true)]
async fn other_players_disconnecting_start_no_timer() {
    let room = TestRoom::started(5, 33);
    for seat in &room.seats[1..] {
        room.service.disconnect(seat.conn, &seat.membership);
    }
    assert!(!room.service.host_timer_pending(&room.room_id));

    sleep_past(GRACE).await;
    assert!(room.service.room_exists(&room.room_id));
}

#[tokio::test(start_paused = true)]
async fn absent_host_closes_the_lobby() {
    let room = TestRoom::lobby(3, 34);
    let host = room.host();
    room.service.disconnect(host.conn, &host.membership);

    sleep_past(GRACE).await;
    assert!(!room.service.room_exists(&room.room_id));
    match room.notifier.messages(room.seats[2].conn).last() {
        Some(ServerMsg::RoomClosed { reason, .. }) => assert_eq!(reason, "host disconnected"),
        other => panic!("expected room_closed, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn rooms_nobody_joins_expire() {
    let (service, _notifier) = service_with(GameTiming::immediate(), 35);
    let empty = service.create_room();
    let occupied = TestRoom::lobby(1, 36);

    sleep_past(GRACE).await;
    assert!(!service.room_exists(&empty));
    assert_eq!(service.room_count(), 0);
    assert!(occupied.service.room_exists(&occupied.room_id));
}

#[tokio::test(start_paused = true)]
async fn finished_rooms_close_after_their_ttl() {
    let room = TestRoom::started(5, 37);
    for _ in 0..3 {
        room.play_round(0);
    }
    let assassin = room.holder_of(Role::Assassin);
    let merlin = room.holder_of(Role::Merlin);
    room.service
        .assassinate(&assassin.membership, merlin.id())
        .unwrap();

    // The host leaving a finished game starts no grace timer.
    room.service
        .disconnect(room.host().conn, &room.host().membership);
    assert!(!room.service.host_timer_pending(&room.room_id));

    tokio::time::sleep(FINISHED_TTL / 2).await;
    assert!(room.service.room_exists(&room.room_id));

    sleep_past(FINISHED_TTL / 2).await;
    assert!(!room.service.room_exists(&room.room_id));
    match room.notifier.messages(room.seats[1].conn).last() {
        Some(ServerMsg::RoomClosed { reason, .. }) => assert_eq!(reason, "game over"),
        other => panic!("expected room_closed, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn state_broadcasts_wait_for_their_pacing_delay() {
    let room = TestRoom::lobby_with(5, 38, GameTiming::default());
    room.service.start_game(&room.host().membership).unwrap();

    let host = room.host().conn;
    assert!(room.notifier.last_state(host).is_none());
    assert!(room
        .notifier
        .messages(host)
        .iter()
        .any(|m| matches!(m, ServerMsg::RoleAssigned { .. })));

    sleep_past(GameTiming::default().start_reveal).await;
    let state = room.notifier.last_state(host).expect("delayed game_state");
    assert!(state.leader.is_some());
}

#[tokio::test(start_paused = true)]
async fn pending_broadcasts_die_with_the_room() {
    let room = TestRoom::lobby_with(5, 39, GameTiming::default());
    room.service.start_game(&room.host().membership).unwrap();
    assert!(room.service.pending_timers(&room.room_id) >= 1);

    room.service.force_end(&room.host().membership).unwrap();
    assert_eq!(room.service.pending_timers(&room.room_id), 0);

    sleep_past(Duration::from_secs(5)).await;
    for seat in &room.seats {
        assert!(room.notifier.last_state(seat.conn).is_none());
        assert!(matches!(
            room.notifier.messages(seat.conn).last(),
            Some(ServerMsg::GameForciblyEnded { .. })
        ));
    }
}
