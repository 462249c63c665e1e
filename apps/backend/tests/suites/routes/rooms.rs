use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use avalon_backend::middleware::request_trace::RequestTrace;
use avalon_backend::middleware::trace_span::TraceSpan;
use avalon_backend::routes;
use avalon_backend::state::app_state::AppState;
use serde_json::Value;
use uuid::Uuid;

use crate::common::assert_problem_details_structure;

#[actix_web::test]
async fn create_then_fetch_room_summary() {
    let state = AppState::for_tests();
    let rooms = state.rooms.clone();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post().uri("/api/rooms").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let room_id = created["roomId"].as_str().expect("roomId").to_string();
    assert_eq!(room_id.len(), 5);
    assert!(rooms.room_exists(&room_id));

    // Codes are case-insensitive on lookup.
    let req = test::TestRequest::get()
        .uri(&format!("/api/rooms/{}", room_id.to_ascii_lowercase()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let summary: Value = test::read_body_json(resp).await;
    assert_eq!(summary["roomId"], room_id.as_str());
    assert_eq!(summary["phase"], "lobby");
    assert_eq!(summary["players"].as_array().map(Vec::len), Some(0));
}

#[actix_web::test]
async fn summary_lists_seated_players_without_roles() {
    let state = AppState::for_tests();
    let room_id = state.rooms.create_room();
    for (i, name) in ["Ann", "Bo", "Cy", "Di", "Ed"].iter().enumerate() {
        state
            .rooms
            .join_room(Uuid::from_u128(i as u128 + 1), &room_id, name)
            .unwrap();
    }

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(RequestTrace)
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/rooms/{room_id}"))
        .to_request();
    let summary: Value = test::call_and_read_body_json(&app, req).await;
    let players = summary["players"].as_array().unwrap();
    assert_eq!(players.len(), 5);
    assert_eq!(players[0]["name"], "Ann");
    assert_eq!(players[0]["isHost"], true);
    assert!(players.iter().all(|p| p.get("role").is_none()));
}

#[actix_web::test]
async fn unknown_room_is_problem_details_404() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::for_tests()))
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/rooms/ZZZZZ").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(
        resp,
        StatusCode::NOT_FOUND,
        "ROOM_NOT_FOUND",
        Some("ZZZZZ"),
    )
    .await;
}
