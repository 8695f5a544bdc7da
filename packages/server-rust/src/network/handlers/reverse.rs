//! Internal reverse endpoint: `POST /internal/reverse`.
//!
//! The callee half of the remote placement. Bodies are `MsgPack`; see
//! `greeter_core::wire`.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use greeter_core::wire::{self, CALL_TIMEOUT_HEADER, MSGPACK_CONTENT_TYPE};
use greeter_core::{ErrorResponse, ReverseError, ReverseRequest, ReverseResponse};
use serde::Serialize;
use tower::ServiceExt;
use tracing::warn;

use super::{request_id, AppState};
use crate::service::ReverseCall;

/// Runs a forwarded Reverser call through the local pipeline.
///
/// Replies 200 with the reversed text, 400 for an undecodable body, 422 for
/// a rejected input and 503 when the call itself failed here.
pub async fn reverse_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let _guard = state.shutdown.in_flight_guard();

    let request: ReverseRequest = match wire::decode(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "rejecting undecodable reverse request");
            return msgpack(
                StatusCode::BAD_REQUEST,
                &ErrorResponse {
                    message: e.to_string(),
                },
            );
        }
    };

    let forwarded_budget = headers
        .get(CALL_TIMEOUT_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    let ctx = state.calls.make_ctx(request_id(&headers), forwarded_budget);

    match state
        .reverser
        .clone()
        .oneshot(ReverseCall::new(ctx, request.text))
        .await
    {
        Ok(reversed) => msgpack(StatusCode::OK, &ReverseResponse { reversed }),
        Err(ReverseError::InvalidInput(message)) => {
            msgpack(StatusCode::UNPROCESSABLE_ENTITY, &ErrorResponse { message })
        }
        Err(err) => msgpack(
            StatusCode::SERVICE_UNAVAILABLE,
            &ErrorResponse {
                message: err.to_string(),
            },
        ),
    }
}

fn msgpack<T: Serialize>(status: StatusCode, value: &T) -> Response {
    match wire::encode(value) {
        Ok(bytes) => (status, [(CONTENT_TYPE, MSGPACK_CONTENT_TYPE)], bytes).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
