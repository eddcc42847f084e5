use crate::app_state::AppState;
use crate::lifecycle::{self, LifecycleRequest};
use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use tracing::{error, trace, warn};

pub fn router(state: AppState) -> Router {
    Router::new().route("/", post(webhook)).with_state(state)
}

/// Receives every lifecycle request of the SmartThings app. Only PING is accepted unsigned.
async fn webhook(State(state): State<AppState>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    trace!(body = %String::from_utf8_lossy(&body), "Received webhook request");

    let request = match serde_json::from_slice::<LifecycleRequest>(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("⚠️ Unable to parse the lifecycle request: {}", e);
            return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
        }
    };

    if !matches!(request, LifecycleRequest::Ping { .. }) {
        if let Some(verifier) = &state.verifier {
            if let Err(e) = verifier.verify(&method, &uri, &headers, &body) {
                error!(lifecycle = request.name(), "⛔ Unauthorized: {}", e);
                return (StatusCode::UNAUTHORIZED, "Forbidden").into_response();
            }
        }
    }

    Json(lifecycle::handle(&state, request).await).into_response()
}
