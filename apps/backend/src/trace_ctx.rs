//! Task-local trace id for HTTP requests.
//!
//! `RequestTrace` opens the scope; `AppError` reads it when rendering problem
//! details. WebSocket sessions and timer tasks run outside any scope.

use tokio::task_local;

task_local! {
    static TRACE_ID: String;
}

/// The current request's trace id, if running inside a request scope.
pub fn current() -> Option<String> {
    TRACE_ID.try_with(|id| id.clone()).ok()
}

/// Trace id for responses; `"unknown"` outside a request scope.
pub fn trace_id() -> String {
    current().unwrap_or_else(|| "unknown".to_string())
}

/// Run a future within a trace scope.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
