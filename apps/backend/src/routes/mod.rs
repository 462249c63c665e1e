use actix_web::web;

pub mod health;
pub mod realtime;
pub mod rooms;

/// Register every HTTP and WebSocket route. Shared by `main.rs` and the
/// integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Banner: /
    cfg.route("/", web::get().to(health::root));

    // Health check: /health
    cfg.configure(health::configure_routes);

    // Rooms: /api/rooms/**
    cfg.service(web::scope("/api/rooms").configure(rooms::configure_routes));

    // WebSocket upgrade: /ws
    cfg.service(web::scope("/ws").configure(realtime::configure_routes));
}
