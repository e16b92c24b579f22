use super::{handler::get_event_log, state::AppState};
use axum::{
    Router,
    extract::State,
    http::{
        HeaderValue, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, VARY,
        },
    },
    middleware,
    response::Response,
    routing::get,
};

pub const EVENTS_LOG_ROUTE: &str = "/events/log";

/// Build the HTTP router. Every response is tagged with
/// `Access-Control-Allow-Origin: <allowed_origin>` so the browser client
/// served from another origin can read it.
pub fn build_router(state: AppState, allowed_origin: HeaderValue) -> Router {
    Router::new()
        .route(EVENTS_LOG_ROUTE, get(get_event_log).options(preflight))
        .with_state(state)
        .layer(middleware::map_response_with_state(
            allowed_origin,
            allow_origin,
        ))
}

async fn allow_origin(State(origin): State<HeaderValue>, mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(VARY, HeaderValue::from_static("Origin"));
    response
}

// The client sends `Content-Type: application/json` on its GET, which makes
// browsers preflight the request.
async fn preflight() -> (StatusCode, [(axum::http::HeaderName, &'static str); 2]) {
    (
        StatusCode::NO_CONTENT,
        [
            (ACCESS_CONTROL_ALLOW_METHODS, "GET,HEAD,OPTIONS"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}
