use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoomCreatedResponse {
    room_id: String,
}

async fn create_room(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let room_id = app_state.rooms.create_room();
    Ok(HttpResponse::Created().json(RoomCreatedResponse { room_id }))
}

async fn get_room(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let summary = app_state.rooms.room_summary(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(summary))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create_room))
        .route("/{room_id}", web::get().to(get_room));
}
