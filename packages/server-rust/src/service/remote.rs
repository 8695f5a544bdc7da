//! Network Reverser adapter.
//!
//! Calls the internal endpoint of a reverser process with a `MsgPack` body.
//! Transport failures, unexpected statuses and undecodable replies all
//! surface as `ReverseError::Remote`; only a 422 reply carries a
//! callee-declared `InvalidInput`.

use std::time::Duration;

use async_trait::async_trait;
use greeter_core::wire::{
    self, CALL_TIMEOUT_HEADER, MSGPACK_CONTENT_TYPE, REQUEST_ID_HEADER, REVERSE_PATH,
};
use greeter_core::{
    CallContext, ErrorResponse, ReverseError, ReverseRequest, ReverseResponse, Reverser,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::{debug, info};

use super::domain::REVERSER_SERVICE;
use super::registry::{ManagedService, ServiceContext};

/// Reverser that forwards every call to another process.
#[derive(Debug, Clone)]
pub struct RemoteReverser {
    client: reqwest::Client,
    url: String,
}

impl RemoteReverser {
    /// Builds a client for the reverser process at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed (e.g., the
    /// TLS backend fails to initialize).
    pub fn new(endpoint: &str, connect_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self {
            client,
            url: format!("{}{REVERSE_PATH}", endpoint.trim_end_matches('/')),
        })
    }

    /// Full URL of the remote reverse endpoint.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn transport_error(ctx: &CallContext, err: &reqwest::Error) -> ReverseError {
        if err.is_timeout() {
            ReverseError::DeadlineExceeded {
                timeout_ms: ctx.timeout_ms,
            }
        } else {
            ReverseError::Remote(err.to_string())
        }
    }
}

#[async_trait]
impl ManagedService for RemoteReverser {
    fn name(&self) -> &'static str {
        REVERSER_SERVICE
    }

    async fn init(&self, ctx: &ServiceContext) -> anyhow::Result<()> {
        info!(node_id = %ctx.config.node_id, url = %self.url, "reverser component remote");
        Ok(())
    }

    async fn shutdown(&self, _terminate: bool) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl Reverser for RemoteReverser {
    async fn reverse(&self, ctx: &CallContext, text: &str) -> Result<String, ReverseError> {
        let body = wire::encode(&ReverseRequest {
            text: text.to_owned(),
        })
        .map_err(|e| ReverseError::Remote(e.to_string()))?;

        let mut request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, MSGPACK_CONTENT_TYPE)
            .header(CALL_TIMEOUT_HEADER, ctx.timeout_ms.to_string())
            .timeout(Duration::from_millis(ctx.timeout_ms))
            .body(body);
        if let Some(request_id) = &ctx.request_id {
            request = request.header(REQUEST_ID_HEADER, request_id.as_str());
        }

        debug!(call_id = ctx.call_id, url = %self.url, "forwarding reverse call");

        let response = request
            .send()
            .await
            .map_err(|e| Self::transport_error(ctx, &e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::transport_error(ctx, &e))?;

        if status.is_success() {
            return wire::decode::<ReverseResponse>(&bytes)
                .map(|reply| reply.reversed)
                .map_err(|e| ReverseError::Remote(e.to_string()));
        }

        let message = wire::decode::<ErrorResponse>(&bytes)
            .map_or_else(|_| String::from_utf8_lossy(&bytes).into_owned(), |e| e.message);

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            Err(ReverseError::InvalidInput(message))
        } else {
            Err(ReverseError::Remote(format!("callee returned {status}: {message}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::post;
    use axum::Router;
    use bytes::Bytes;
    use greeter_core::reverse_chars;
    use tokio::net::TcpListener;

    use super::*;

    type MsgpackReply = (AxumStatus, [(&'static str, &'static str); 1], Vec<u8>);

    fn msgpack(status: AxumStatus, body: Vec<u8>) -> MsgpackReply {
        (status, [("content-type", MSGPACK_CONTENT_TYPE)], body)
    }

    async fn echo_reverse(headers: HeaderMap, body: Bytes) -> impl axum::response::IntoResponse {
        let request: ReverseRequest = wire::decode(&body).unwrap();
        let reply = ReverseResponse {
            reversed: reverse_chars(&request.text),
        };
        let mut reversed = wire::encode(&reply).unwrap();
        // Tag replies so tests can see the forwarded headers reached the callee.
        if headers.get(REQUEST_ID_HEADER).is_some() && headers.get(CALL_TIMEOUT_HEADER).is_some() {
            reversed = wire::encode(&ReverseResponse {
                reversed: format!("{}|tagged", reply.reversed),
            })
            .unwrap();
        }
        msgpack(AxumStatus::OK, reversed)
    }

    /// Serves `router` on an OS-assigned port and returns its base URL.
    async fn spawn(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(endpoint: &str) -> RemoteReverser {
        RemoteReverser::new(endpoint, Duration::from_millis(500)).unwrap()
    }

    #[test]
    fn url_joins_endpoint_and_path() {
        assert_eq!(
            client("http://10.0.0.7:9000/").url(),
            "http://10.0.0.7:9000/internal/reverse"
        );
        assert_eq!(
            client("http://10.0.0.7:9000").url(),
            "http://10.0.0.7:9000/internal/reverse"
        );
    }

    #[tokio::test]
    async fn successful_call_returns_reversed_text() {
        let endpoint = spawn(Router::new().route(REVERSE_PATH, post(echo_reverse))).await;
        let reverser = client(&endpoint);
        let reversed = reverser
            .reverse(&CallContext::default(), "h\u{e9}llo")
            .await
            .unwrap();
        assert_eq!(reversed, "oll\u{e9}h");
    }

    #[tokio::test]
    async fn forwards_request_id_and_budget() {
        let endpoint = spawn(Router::new().route(REVERSE_PATH, post(echo_reverse))).await;
        let reverser = client(&endpoint);
        let ctx = CallContext::new(9, 1_000).with_request_id("req-42");
        let reversed = reverser.reverse(&ctx, "abc").await.unwrap();
        assert_eq!(reversed, "cba|tagged");
    }

    #[tokio::test]
    async fn unprocessable_reply_is_invalid_input() {
        let router = Router::new().route(
            REVERSE_PATH,
            post(|| async {
                let body = wire::encode(&ErrorResponse {
                    message: "name too long".to_string(),
                })
                .unwrap();
                msgpack(AxumStatus::UNPROCESSABLE_ENTITY, body)
            }),
        );
        let reverser = client(&spawn(router).await);
        let err = reverser
            .reverse(&CallContext::default(), "abc")
            .await
            .unwrap_err();
        assert_eq!(err, ReverseError::InvalidInput("name too long".to_string()));
        assert!(!err.is_remote());
    }

    #[tokio::test]
    async fn server_error_reply_is_remote() {
        let router = Router::new().route(
            REVERSE_PATH,
            post(|| async { (AxumStatus::SERVICE_UNAVAILABLE, "draining") }),
        );
        let reverser = client(&spawn(router).await);
        let err = reverser
            .reverse(&CallContext::default(), "abc")
            .await
            .unwrap_err();
        assert!(err.is_remote());
        assert!(err.to_string().contains("draining"));
    }

    #[tokio::test]
    async fn undecodable_success_reply_is_remote() {
        let router = Router::new().route(
            REVERSE_PATH,
            post(|| async { msgpack(AxumStatus::OK, vec![0xc1]) }),
        );
        let reverser = client(&spawn(router).await);
        let err = reverser
            .reverse(&CallContext::default(), "abc")
            .await
            .unwrap_err();
        assert!(matches!(err, ReverseError::Remote(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_remote() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let reverser = client(&format!("http://{addr}"));
        let err = reverser
            .reverse(&CallContext::default(), "abc")
            .await
            .unwrap_err();
        assert!(err.is_remote());
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn slow_callee_exceeds_deadline() {
        let router = Router::new().route(
            REVERSE_PATH,
            post(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                AxumStatus::OK
            }),
        );
        let reverser = client(&spawn(router).await);
        let err = reverser
            .reverse(&CallContext::new(1, 50), "abc")
            .await
            .unwrap_err();
        assert_eq!(err, ReverseError::DeadlineExceeded { timeout_ms: 50 });
    }
}
