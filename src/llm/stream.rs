// src/llm/stream.rs
// One chat-completion request/stream lifecycle against the SSE endpoint.

use std::time::Duration;

use futures::{Stream, StreamExt};
use reqwest::{header, StatusCode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::Result;
use crate::llm::sse::EventParser;
use crate::llm::types::{ChatMessage, ChatRequest, DeltaChunk};

/// Signals emitted over one round. `Update` carries the full accumulated
/// text, never a diff. Exactly one of `Complete`, `Error`, `Aborted` ends the
/// stream, after all updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSignal {
    Update(String),
    Complete,
    Error(String),
    Aborted,
}

/// HTTP client for the chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
    app_id: String,
}

impl ChatClient {
    pub fn new(endpoint: impl Into<String>, app_id: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.into(),
            app_id: app_id.into(),
        })
    }

    /// Issue one streaming POST and translate the response body into
    /// `StreamSignal`s. Transport and protocol failures never escape as
    /// errors; they surface as a terminal `Error` signal. Cancelling the
    /// token ends the round with `Aborted` and suppresses the resulting read
    /// failure.
    pub fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        cancel: CancellationToken,
    ) -> impl Stream<Item = StreamSignal> + Send + 'static {
        let http = self.http.clone();
        let endpoint = self.endpoint.clone();
        let app_id = self.app_id.clone();

        async_stream::stream! {
            if messages.is_empty() {
                yield StreamSignal::Error("message list is empty".to_string());
                return;
            }

            let body = ChatRequest::new(messages);
            let send = http
                .post(&endpoint)
                .header("X-App-Id", &app_id)
                .header(header::CONTENT_TYPE, "application/json")
                .json(&body)
                .send();

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    yield StreamSignal::Aborted;
                    return;
                }
                r = send => r,
            };

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    if cancel.is_cancelled() {
                        yield StreamSignal::Aborted;
                    } else {
                        yield StreamSignal::Error(transport_message(&e));
                    }
                    return;
                }
            };

            let status = response.status();
            if !status.is_success() {
                yield StreamSignal::Error(status_message(status));
                return;
            }

            let mut bytes = response.bytes_stream();
            let mut parser = EventParser::new();
            let mut accumulated = String::new();

            loop {
                let next = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        yield StreamSignal::Aborted;
                        return;
                    }
                    n = bytes.next() => n,
                };

                match next {
                    Some(Ok(chunk)) => {
                        for line in parser.feed(&chunk) {
                            // End-of-stream sentinel, not JSON.
                            if line == "[DONE]" {
                                continue;
                            }
                            let parsed: DeltaChunk = match serde_json::from_str(&line) {
                                Ok(p) => p,
                                Err(e) => {
                                    warn!(error = %e, data = %line, "skipping unparseable SSE data line");
                                    continue;
                                }
                            };
                            if let Some(err) = parsed.error {
                                let msg = err
                                    .message
                                    .unwrap_or_else(|| "server returned an error".to_string());
                                yield StreamSignal::Error(msg);
                                return;
                            }
                            if let Some(delta) = parsed.content() {
                                accumulated.push_str(delta);
                                yield StreamSignal::Update(accumulated.clone());
                            }
                        }
                    }
                    Some(Err(e)) => {
                        if cancel.is_cancelled() {
                            yield StreamSignal::Aborted;
                        } else {
                            yield StreamSignal::Error(transport_message(&e));
                        }
                        return;
                    }
                    None => {
                        if parser.has_partial() {
                            debug!("discarding incomplete trailing SSE frame");
                        }
                        yield StreamSignal::Complete;
                        return;
                    }
                }
            }
        }
    }
}

/// Normalize a transport failure into a user-facing message.
fn transport_message(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        "network unreachable".to_string()
    } else {
        e.to_string()
    }
}

/// Normalize a non-2xx response status into a user-facing message.
fn status_message(status: StatusCode) -> String {
    match status {
        StatusCode::UNAUTHORIZED => "authentication failed".to_string(),
        StatusCode::FORBIDDEN => "forbidden".to_string(),
        s if s.is_server_error() => "server error, retry later".to_string(),
        s => format!("request failed with status {s}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_mapping() {
        assert_eq!(status_message(StatusCode::UNAUTHORIZED), "authentication failed");
        assert_eq!(status_message(StatusCode::FORBIDDEN), "forbidden");
        assert_eq!(status_message(StatusCode::INTERNAL_SERVER_ERROR), "server error, retry later");
        assert_eq!(status_message(StatusCode::BAD_GATEWAY), "server error, retry later");
        assert!(status_message(StatusCode::TOO_MANY_REQUESTS).contains("429"));
    }
}
