use actix_web::{web, App, HttpServer};
use avalon_backend::config::ServerConfig;
use avalon_backend::middleware::cors::cors_middleware;
use avalon_backend::middleware::request_trace::RequestTrace;
use avalon_backend::middleware::structured_logger::StructuredLogger;
use avalon_backend::middleware::trace_span::TraceSpan;
use avalon_backend::routes;
use avalon_backend::state::app_state::AppState;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = telemetry::init_tracing() {
        eprintln!("failed to install tracing subscriber: {e}");
        std::process::exit(1);
    }

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    let (host, port) = config.bind_addr();
    info!(
        host = %host,
        port,
        host_grace_secs = config.host_grace.as_secs(),
        finished_room_ttl_secs = config.finished_room_ttl.as_secs(),
        "Starting Avalon backend"
    );

    let app_state = AppState::new(config);
    let hub = app_state.websocket_hub();
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(data.config.cors_origins.as_deref()))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    let closed = hub.close_all_connections();
    info!(connections = closed.len(), "Server stopped");
    Ok(())
}
