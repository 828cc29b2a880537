use super::Dispatcher;
use crate::models::{ErrorBody, OperationRequest};
use crate::{Error, ErrorKind, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Body text for any request that does not decode into an operation envelope.
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid request.";

/// Failure returned by the proxy route, always rendered as `{"error": ...}`.
#[derive(Debug)]
enum ProxyError {
    BadRequest(String),
    Operation(Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ProxyError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ProxyError::Operation(err) if err.kind() == ErrorKind::InvalidInput => {
                (StatusCode::BAD_REQUEST, err.user_message())
            }
            ProxyError::Operation(err) => {
                error!("Operation failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.user_message())
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "roleready-proxy"
    }))
}

async fn handle_operation(
    State(dispatcher): State<Dispatcher>,
    request: std::result::Result<Json<OperationRequest>, JsonRejection>,
) -> std::result::Result<Json<Value>, ProxyError> {
    let Json(request) = request.map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        ProxyError::BadRequest(INVALID_REQUEST_MESSAGE.to_string())
    })?;

    let body = dispatcher
        .dispatch(&request)
        .await
        .map_err(ProxyError::Operation)?;
    Ok(Json(body))
}

pub fn router(dispatcher: Dispatcher, path: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(path, post(handle_operation))
        .with_state(dispatcher)
}

/// Serve the proxy on an already-bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, dispatcher: Dispatcher, path: &str) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("Proxy listening on http://{}{}", addr, path);
    axum::serve(listener, router(dispatcher, path)).await?;
    Ok(())
}
