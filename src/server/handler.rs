use super::state::AppState;
use crate::{
    events::{ErrorType, EventQuery, EventsError, FilterCriteria},
    types::ApiResponse,
};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

const FILE_NOT_FOUND_MESSAGE: &str = "Log file not found";

/// `GET /events/log`
///
/// Checks that the log file exists, then reads, filters and sorts it.
/// Each parameter is decoded on its own, so a repeated key only drops
/// that filter. A query string that cannot be decoded at all is treated
/// as carrying no filters.
pub async fn get_event_log(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(pairs)) => EventQuery::from_pairs(pairs),
        Err(rejection) => {
            tracing::debug!("Ignoring undecodable query string: {rejection}");
            EventQuery::default()
        }
    };

    let criteria = FilterCriteria::from_query(&query);
    tracing::debug!("GET /events/log with criteria: {criteria:?}");

    if !state.source.exists().await {
        tracing::warn!(
            "Log file not found at {}",
            state.source.path().display()
        );
        return not_found();
    }

    match state.source.query(&criteria).await {
        Ok(entries) => {
            tracing::info!("Returning {} log entries", entries.len());
            (StatusCode::OK, Json(ApiResponse::success(entries))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::failure(
            FILE_NOT_FOUND_MESSAGE,
            ErrorType::FileNotFound,
        )),
    )
        .into_response()
}

impl IntoResponse for EventsError {
    fn into_response(self) -> Response {
        match self.error_type() {
            // The file vanished between the existence check and the open
            ErrorType::FileNotFound => {
                tracing::warn!("{self}");
                not_found()
            }
            ErrorType::InternalError => {
                tracing::error!("Failed to query event log: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::failure(
                        self.to_string(),
                        ErrorType::InternalError,
                    )),
                )
                    .into_response()
            }
        }
    }
}
