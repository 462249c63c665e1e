//! One `request_completed` event per HTTP request, leveled by status.
//!
//! Every event names the route family (`banner`, `health`, `rooms`, `ws`) so
//! room traffic can be filtered apart from health probes. WebSocket upgrades
//! complete with `101` as soon as the handshake is done and are logged at
//! `debug`; the session logs its own lifecycle.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error, info, warn};

pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

/// Which part of the server a request hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Banner,
    Health,
    Rooms,
    Ws,
    Other,
}

impl Route {
    fn of(path: &str) -> Self {
        match path {
            "/" => Route::Banner,
            "/health" => Route::Health,
            p if p == "/ws" || p.starts_with("/ws/") => Route::Ws,
            p if p == "/api/rooms" || p.starts_with("/api/rooms/") => Route::Rooms,
            _ => Route::Other,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Route::Banner => "banner",
            Route::Health => "health",
            Route::Rooms => "rooms",
            Route::Ws => "ws",
            Route::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Upgraded,
    Ok,
    ClientError,
    ServerError,
}

impl Outcome {
    fn of(status: StatusCode) -> Self {
        if status == StatusCode::SWITCHING_PROTOCOLS {
            Outcome::Upgraded
        } else if status.is_server_error() {
            Outcome::ServerError
        } else if status.is_client_error() {
            Outcome::ClientError
        } else {
            Outcome::Ok
        }
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let route = Route::of(&path).as_str();

        let trace_id = req
            .extensions()
            .get::<String>()
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            let duration_us = start.elapsed().as_micros() as u64;
            let status_code = status.as_u16();

            match Outcome::of(status) {
                Outcome::ServerError => {
                    error!(http.method = %method, url.path = %path, route, http.status_code = status_code, duration_us, trace_id = %trace_id, "request_completed")
                }
                Outcome::ClientError => {
                    warn!(http.method = %method, url.path = %path, route, http.status_code = status_code, duration_us, trace_id = %trace_id, "request_completed")
                }
                Outcome::Upgraded => {
                    debug!(url.path = %path, route, duration_us, trace_id = %trace_id, "websocket_upgraded")
                }
                Outcome::Ok => {
                    info!(http.method = %method, url.path = %path, route, http.status_code = status_code, duration_us, trace_id = %trace_id, "request_completed")
                }
            }

            result
        })
    }
}
