use actix_cors::Cors;
use actix_web::http::header;

const DEV_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];

/// Build CORS middleware with an explicit origin list:
/// - Origins come from `CORS_ALLOWED_ORIGINS` (see `ServerConfig`)
/// - Only allow methods actually used by the API
/// - Lightly validate origins, and ignore empty / \"null\" entries
pub fn cors_middleware(configured: Option<&[String]>) -> Cors {
    let effective_origins = effective_origins(configured);

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(3600);

    for origin in effective_origins {
        cors = cors.allowed_origin(&origin);
    }

    cors
}

/// Valid configured origins, or the localhost development set when none are usable.
fn effective_origins(configured: Option<&[String]>) -> Vec<String> {
    let allowed: Vec<String> = configured
        .unwrap_or_default()
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(|s| s.to_string())
        .collect();

    if allowed.is_empty() {
        DEV_ORIGINS.iter().map(|s| s.to_string()).collect()
    } else {
        allowed
    }
}
