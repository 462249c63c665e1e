// Handshake, room creation, joining and leaving over a real socket.

use std::time::Duration;

use avalon_backend::state::app_state::AppState;
use serde_json::json;

use crate::support::websocket::{start_test_server, wait_for_connections};
use crate::support::websocket_client::WebSocketClient;

#[actix_web::test]
async fn create_and_join_over_websocket() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::for_tests();
    let hub = state.websocket_hub();
    let rooms = state.rooms.clone();
    let (server_handle, addr, server_join) = start_test_server(state).await?;
    let ws_url = format!("ws://{addr}/ws");

    let mut host = WebSocketClient::connect_retry(&ws_url, Duration::from_secs(1)).await?;
    let mut guest = WebSocketClient::connect_retry(&ws_url, Duration::from_secs(1)).await?;
    wait_for_connections(&hub, 2, Duration::from_secs(2)).await?;

    let room_id = host.create_room().await?;
    assert!(rooms.room_exists(&room_id));

    let joined = host.join(&room_id, "Ann").await?;
    assert_eq!(joined["roomId"], room_id.as_str());
    assert_eq!(joined["isHost"], true);
    assert!(joined["playerId"].is_string());
    assert!(joined["reconnectToken"].is_string());
    let roster = host.recv_type("roster_update").await?;
    assert_eq!(roster["players"].as_array().map(Vec::len), Some(1));

    let joined = guest.join(&room_id, "Bo").await?;
    assert_eq!(joined["isHost"], false);

    let roster = host.recv_type("roster_update").await?;
    let names: Vec<&str> = roster["players"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(names, ["Ann", "Bo"]);

    host.close().await?;
    guest.close().await?;
    wait_for_connections(&hub, 0, Duration::from_secs(2)).await?;
    server_handle.stop(true).await;
    let _ = server_join.await;
    Ok(())
}

#[actix_web::test]
async fn leave_then_join_elsewhere() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::for_tests();
    let hub = state.websocket_hub();
    let (server_handle, addr, server_join) = start_test_server(state).await?;
    let ws_url = format!("ws://{addr}/ws");

    let mut host = WebSocketClient::connect_retry(&ws_url, Duration::from_secs(1)).await?;
    let mut guest = WebSocketClient::connect_retry(&ws_url, Duration::from_secs(1)).await?;

    let first = host.create_room().await?;
    host.join(&first, "Ann").await?;
    guest.join(&first, "Bo").await?;

    guest.send_json(&json!({ "type": "leave_room" })).await?;
    guest.recv_type("room_left").await?;

    // Ann's rosters: herself, then with Bo, then alone again.
    let mut sizes = Vec::new();
    while sizes.len() < 3 {
        let roster = host.recv_type("roster_update").await?;
        sizes.push(roster["players"].as_array().map_or(0, Vec::len));
    }
    assert_eq!(sizes, [1, 2, 1]);

    let second = guest.create_room().await?;
    let joined = guest.join(&second, "Bo").await?;
    assert_eq!(joined["isHost"], true);

    host.close().await?;
    guest.close().await?;
    wait_for_connections(&hub, 0, Duration::from_secs(2)).await?;
    server_handle.stop(true).await;
    let _ = server_join.await;
    Ok(())
}

#[actix_web::test]
async fn host_closing_the_room_releases_guests() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::for_tests();
    let hub = state.websocket_hub();
    let rooms = state.rooms.clone();
    let (server_handle, addr, server_join) = start_test_server(state).await?;
    let ws_url = format!("ws://{addr}/ws");

    let mut host = WebSocketClient::connect_retry(&ws_url, Duration::from_secs(1)).await?;
    let mut guest = WebSocketClient::connect_retry(&ws_url, Duration::from_secs(1)).await?;

    let room_id = host.create_room().await?;
    host.join(&room_id, "Ann").await?;
    guest.join(&room_id, "Bo").await?;

    host.send_json(&json!({ "type": "close_room" })).await?;
    let closed = guest.recv_type("room_closed").await?;
    assert_eq!(closed["roomId"], room_id.as_str());
    assert_eq!(closed["reason"], "closed by host");
    host.recv_type("room_closed").await?;
    assert!(!rooms.room_exists(&room_id));

    // Membership was cleared by the close, so the guest may join again.
    let next = guest.create_room().await?;
    guest.join(&next, "Bo").await?;

    host.close().await?;
    guest.close().await?;
    wait_for_connections(&hub, 0, Duration::from_secs(2)).await?;
    server_handle.stop(true).await;
    let _ = server_join.await;
    Ok(())
}
