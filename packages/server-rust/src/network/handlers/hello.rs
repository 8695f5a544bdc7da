//! The front door: `GET /hello`.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use greeter_core::ReverseError;
use tower::ServiceExt;
use tracing::info;

use super::{request_id, AppState};
use crate::service::ReverseCall;

/// Name greeted when the `name` parameter is absent or empty.
pub const DEFAULT_NAME: &str = "World";

/// Greets the reversed `name` query parameter.
///
/// A repeated `name` resolves to its first well-formed occurrence rather than
/// rejecting the request.
pub async fn hello_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let _guard = state.shutdown.in_flight_guard();

    let raw_name = uri
        .query()
        .and_then(|query| first_query_value(query, "name"))
        .unwrap_or_default();
    info!(name = %raw_name, "hello hit");

    let name = if raw_name.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        raw_name
    };

    let ctx = state.calls.make_ctx(request_id(&headers), None);
    match state.reverser.clone().oneshot(ReverseCall::new(ctx, name)).await {
        Ok(reversed) => format!("Hello, {reversed}!\n").into_response(),
        Err(err) => error_response(&err),
    }
}

/// Returns the first value of `key` in a raw query string.
///
/// Pairs containing `;` or a malformed `%XX` escape in either half are
/// skipped. `+` decodes to a space and invalid UTF-8 is replaced.
fn first_query_value(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty() && !pair.contains(';'))
        .find_map(|pair| {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let decoded_key = decode_component(raw_key)?;
            let value = decode_component(raw_value)?;
            (decoded_key == key).then_some(value)
        })
}

/// Form-decodes one query component, or `None` if an escape is malformed.
fn decode_component(raw: &str) -> Option<String> {
    let escapes_valid = raw.split('%').skip(1).all(|rest| {
        rest.get(..2)
            .is_some_and(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
    });
    if !escapes_valid {
        return None;
    }
    let spaced = raw.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Maps a Reverser failure to a plain-text HTTP error.
///
/// Infrastructure failures are the server's fault (500); anything else is
/// attributed to the input (400).
fn error_response(err: &ReverseError) -> Response {
    let status = if err.is_remote() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::BAD_REQUEST
    };
    (
        status,
        [(header::X_CONTENT_TYPE_OPTIONS, "nosniff")],
        format!("{err}\n"),
    )
        .into_response()
}
