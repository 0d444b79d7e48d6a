use crate::errors::IntoErrorResponse;
use crate::metrics::MetricsSnapshot;
use crate::table::{IntentResponse, SessionId, TableError, TableService};
use serde::Serialize;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply;

/// Seats a new session at the table.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/table/sessions`
///
/// # Response Format
/// - **201 Created**: the issued session id, the engine outcome and the new state.
///   When both seats are taken the outcome is `ignored` with reason `table_full`;
///   the session is still issued and may observe.
/// ```json
/// {
///   "session_id": "uuid",
///   "outcome": { "type": "joined", "seat": "second", "dealt": true },
///   "state": { ... }
/// }
/// ```
pub async fn join(table: Arc<TableService>) -> Response {
    intent_response(StatusCode::CREATED, table.join())
}

/// Removes a session, freeing its seat.
///
/// # HTTP Method and Path
/// - **Method**: DELETE
/// - **Path**: `/api/table/sessions/{session_id}`
///
/// # Error Cases
/// - `session_not_found` (404): the id was never issued or already left
pub async fn leave(table: Arc<TableService>, session_id: SessionId) -> Response {
    intent_response(StatusCode::OK, table.leave(&session_id))
}

/// Plays the front card of the session's hand.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/table/sessions/{session_id}/play`
///
/// # Response Format
/// - **202 Accepted** with the outcome. A play out of turn, from an empty hand
///   or from a spectator is not an error: it comes back as an `ignored` outcome
///   and the state is unchanged.
/// - **404 Not Found** for an unknown session id
pub async fn play(table: Arc<TableService>, session_id: SessionId) -> Response {
    intent_response(StatusCode::ACCEPTED, table.play(&session_id))
}

/// Slaps the pile.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/table/sessions/{session_id}/slap`
///
/// # Response Format
/// - **202 Accepted** with `slap_won`, `burned` or `ignored`
/// - **404 Not Found** for an unknown session id
pub async fn slap(table: Arc<TableService>, session_id: SessionId) -> Response {
    intent_response(StatusCode::ACCEPTED, table.slap(&session_id))
}

pub async fn get_state(table: Arc<TableService>) -> Response {
    match table.current_state() {
        Ok(state) => success_response(StatusCode::OK, state),
        Err(err) => err.into_http_response(),
    }
}

pub async fn get_metrics(table: Arc<TableService>) -> Response {
    let snapshot: MetricsSnapshot = table.metrics().snapshot();
    success_response(StatusCode::OK, snapshot)
}

fn intent_response(status: StatusCode, result: Result<IntentResponse, TableError>) -> Response {
    match result {
        Ok(response) => success_response(status, response),
        Err(err) => err.into_http_response(),
    }
}

fn success_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    reply::with_status(reply::json(&body), status).into_response()
}
