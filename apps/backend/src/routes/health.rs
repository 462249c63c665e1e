use std::time::Instant;

use actix_web::{web, HttpResponse};
use once_cell::sync::Lazy;
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::state::app_state::AppState;

static STARTED: Lazy<Instant> = Lazy::new(Instant::now);

pub async fn root() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().body("Avalon game server is running"))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    app_version: String,
    rooms: usize,
    connections: usize,
    uptime_secs: u64,
    time: String,
}

async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let app_version = env!("CARGO_PKG_VERSION").to_string();

    let now = OffsetDateTime::now_utc();
    let time = now
        .format(&time::format_description::well_known::Rfc3339)
        .map_err(|err| AppError::internal(format!("failed to format server time: {err}")))?;

    let response = HealthResponse {
        status: "ok".to_string(),
        app_version,
        rooms: app_state.rooms.room_count(),
        connections: app_state.hub.active_connections_count(),
        uptime_secs: STARTED.elapsed().as_secs(),
        time,
    };

    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    Lazy::force(&STARTED);
    cfg.route("/health", web::get().to(health));
}
