use actix_web::{test, web, App};
use avalon_backend::middleware::request_trace::RequestTrace;
use avalon_backend::routes;
use avalon_backend::state::app_state::AppState;
use serde_json::Value;

#[actix_web::test]
async fn test_root_banner() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::for_tests()))
            .wrap(RequestTrace)
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body = test::read_body(resp).await;
    assert_eq!(body, "Avalon game server is running");
}

#[actix_web::test]
async fn test_health_endpoint_reports_counts() {
    let state = AppState::for_tests();
    state.rooms.create_room();
    state.rooms.create_room();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(RequestTrace)
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert!(resp.headers().contains_key("x-request-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["rooms"], 2);
    assert_eq!(body["connections"], 0);
    assert_eq!(body["app_version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_secs"].is_u64());
    assert!(body["time"].as_str().is_some_and(|t| t.contains('T')));
}
