// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-request capture state machine
//!
//! One session exists per logical outbound request. Body taps feed it chunk
//! by chunk; the response lifecycle drives it to exactly one terminal event,
//! `success` XOR `error`. All session callbacks run on the stream's natural
//! arrival order, so the mutex is uncontended in practice.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::SystemTime;

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::Stream;
use parking_lot::Mutex;
use reqwest::Method;

use super::accumulator::{BodyLimit, BoundedAccumulator};
use super::record::{LogRecord, RequestInfo, ResponseInfo};
use crate::error::{Error, Result};
use crate::events::channel::{EventChannel, LogEvent};
use crate::http::request::Request;
use crate::http::transport::ResponseHead;

/// Handle shared between the taps and the response lifecycle
pub(crate) type SharedSession = Arc<Mutex<CaptureSession>>;

/// State for one in-flight request/response exchange
pub(crate) struct CaptureSession {
    channel: EventChannel,
    record: LogRecord,
    method: Method,
    request_body: BoundedAccumulator,
    response_body: BoundedAccumulator,
    finished: bool,
}

impl CaptureSession {
    /// Seed the record from the live request and stamp the send time
    pub(crate) fn start(channel: EventChannel, limit: BodyLimit, request: &Request) -> SharedSession {
        let mut request_info = RequestInfo::seed(&request.target, &request.method, &request.headers);
        request_info.sent_at = Some(SystemTime::now());

        Arc::new(Mutex::new(Self {
            channel,
            record: LogRecord {
                request: request_info,
                response: ResponseInfo::default(),
            },
            method: request.method.clone(),
            request_body: BoundedAccumulator::new(limit),
            response_body: BoundedAccumulator::new(limit),
            finished: false,
        }))
    }

    /// Observe one outgoing body chunk
    pub(crate) fn record_request_chunk(&mut self, chunk: &[u8]) {
        self.request_body.append(chunk);
    }

    /// The transport reported a request-level failure; no response exists
    pub(crate) fn request_failed(&mut self, error: &Error) {
        if self.finished {
            return;
        }
        self.record.request.error = Some(error.to_string());
        self.record.request.error_at = Some(SystemTime::now());
        tracing::debug!(
            url = self.record.request.href.as_deref().unwrap_or(""),
            error = %error,
            "outbound request failed"
        );
        self.emit_error();
    }

    /// A response head arrived; request body capture closes here
    pub(crate) fn response_started(&mut self, head: &ResponseHead) {
        if self.finished {
            return;
        }
        // Raw pass-through notification fires before the record is
        // finalized.
        self.channel.emit(&LogEvent::Response {
            request: self.record.request.clone(),
            head: head.clone(),
        });
        self.record.request.body = Some(self.request_body.finish());
        self.record.response.fill_from_head(head, &self.method);
    }

    /// Observe one incoming body chunk
    pub(crate) fn record_response_chunk(&mut self, chunk: &[u8]) {
        self.response_body.append(chunk);
    }

    /// The response signalled end-of-data
    pub(crate) fn response_finished(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.record.response.body = Some(self.response_body.finish());
        self.record.response.received_at = Some(SystemTime::now());
        tracing::debug!(
            url = self.record.response.url.as_deref().unwrap_or(""),
            status = self.record.response.status_code,
            "outbound request captured"
        );
        self.channel.emit(&LogEvent::Success {
            request: self.record.request.clone(),
            response: self.record.response.clone(),
        });
    }

    /// The response stream errored instead of completing
    pub(crate) fn response_failed(&mut self, error: &Error) {
        if self.finished {
            return;
        }
        self.record.response.error = Some(error.to_string());
        self.record.response.error_at = Some(SystemTime::now());
        tracing::debug!(
            url = self.record.response.url.as_deref().unwrap_or(""),
            error = %error,
            "response stream failed"
        );
        self.emit_error();
    }

    fn emit_error(&mut self) {
        self.finished = true;
        self.channel.emit(&LogEvent::Error {
            request: self.record.request.clone(),
            response: self.record.response.clone(),
        });
    }
}

/// Pass-through tap over an outgoing body stream
///
/// Each chunk is recorded and then forwarded unmodified, so delivery order
/// and backpressure are exactly what the inner stream produces.
pub(crate) struct RequestBodyTap {
    inner: BoxStream<'static, Result<Bytes>>,
    session: SharedSession,
}

impl RequestBodyTap {
    pub(crate) fn new(inner: BoxStream<'static, Result<Bytes>>, session: SharedSession) -> Self {
        Self { inner, session }
    }
}

impl Stream for RequestBodyTap {
    type Item = Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.session.lock().record_request_chunk(&chunk);
                Poll::Ready(Some(Ok(chunk)))
            }
            other => other,
        }
    }
}

/// Pass-through tap over the incoming response stream
///
/// Drives the session to its terminal event: end-of-data emits `success`,
/// a stream error is recorded and re-surfaced to the caller untouched.
pub(crate) struct ResponseBodyTap {
    inner: BoxStream<'static, Result<Bytes>>,
    session: SharedSession,
}

impl ResponseBodyTap {
    pub(crate) fn new(inner: BoxStream<'static, Result<Bytes>>, session: SharedSession) -> Self {
        Self { inner, session }
    }
}

impl Stream for ResponseBodyTap {
    type Item = Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.session.lock().record_response_chunk(&chunk);
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(error))) => {
                this.session.lock().response_failed(&error);
                Poll::Ready(Some(Err(error)))
            }
            Poll::Ready(None) => {
                this.session.lock().response_finished();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::channel::EventKind;
    use futures::StreamExt;
    use reqwest::header::HeaderMap;
    use reqwest::{StatusCode, Version};
    use url::Url;

    fn head() -> ResponseHead {
        ResponseHead {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            version: Version::HTTP_11,
            url: Url::parse("http://example.com/").unwrap(),
        }
    }

    fn session_with_collector(
        limit: BodyLimit,
    ) -> (SharedSession, Arc<Mutex<Vec<LogEvent>>>, EventChannel) {
        let channel = EventChannel::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        for kind in [EventKind::Response, EventKind::Success, EventKind::Error] {
            let sink = Arc::clone(&events);
            channel.on(kind, Arc::new(move |event| sink.lock().push(event.clone())));
        }
        let request = Request::get("http://example.com/").unwrap();
        let session = CaptureSession::start(channel.clone(), limit, &request);
        (session, events, channel)
    }

    #[test]
    fn test_success_path_emits_once() {
        let (session, events, _channel) = session_with_collector(BodyLimit::Unlimited);
        {
            let mut s = session.lock();
            s.record_request_chunk(b"payload");
            s.response_started(&head());
            s.record_response_chunk(b"Example");
            s.response_finished();
            // A second end-of-data signal must not emit again
            s.response_finished();
        }

        let events = events.lock();
        let kinds: Vec<EventKind> = events.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec![EventKind::Response, EventKind::Success]);

        match &events[1] {
            LogEvent::Success { request, response } => {
                assert_eq!(request.body.as_deref(), Some("payload"));
                assert_eq!(response.body.as_deref(), Some("Example"));
                assert_eq!(response.status_code, Some(200));
                assert!(response.received_at.is_some());
            }
            other => panic!("expected success, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_request_failure_leaves_response_empty() {
        let (session, events, _channel) = session_with_collector(BodyLimit::default());
        session
            .lock()
            .request_failed(&Error::Other("connection refused".into()));

        let events = events.lock();
        assert_eq!(events.len(), 1);
        match &events[0] {
            LogEvent::Error { request, response } => {
                assert_eq!(request.error.as_deref(), Some("connection refused"));
                assert!(request.error_at.is_some());
                assert!(response.is_empty());
            }
            other => panic!("expected error, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_response_failure_after_head() {
        let (session, events, _channel) = session_with_collector(BodyLimit::default());
        {
            let mut s = session.lock();
            s.response_started(&head());
            s.record_response_chunk(b"partial");
            s.response_failed(&Error::Other("reset by peer".into()));
            // Terminal already fired; completion must be ignored
            s.response_finished();
        }

        let events = events.lock();
        let kinds: Vec<EventKind> = events.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec![EventKind::Response, EventKind::Error]);
        match &events[1] {
            LogEvent::Error { response, .. } => {
                assert_eq!(response.error.as_deref(), Some("reset by peer"));
                assert_eq!(response.status_code, Some(200));
            }
            other => panic!("expected error, got {:?}", other.kind()),
        }
    }

    #[tokio::test]
    async fn test_request_tap_passes_chunks_through() {
        let (session, _events, _channel) = session_with_collector(BodyLimit::Unlimited);
        let chunks = futures::stream::iter(
            ["Write", "To", "The", "Body"]
                .into_iter()
                .map(|c| Ok(Bytes::from(c))),
        );
        let tap = RequestBodyTap::new(chunks.boxed(), Arc::clone(&session));

        let forwarded: Vec<Bytes> = tap.map(|c| c.unwrap()).collect().await;
        assert_eq!(forwarded.concat(), b"WriteToTheBody");

        session.lock().response_started(&head());
        let body = session.lock().record.request.body.clone();
        assert_eq!(body.as_deref(), Some("WriteToTheBody"));
    }

    #[tokio::test]
    async fn test_response_tap_finalizes_on_end() {
        let (session, events, _channel) = session_with_collector(BodyLimit::Limited(2));
        session.lock().response_started(&head());

        let chunks = futures::stream::iter([Ok(Bytes::from("Example"))]);
        let tap = ResponseBodyTap::new(chunks.boxed(), Arc::clone(&session));
        let forwarded: Vec<Bytes> = tap.map(|c| c.unwrap()).collect().await;

        // The caller still sees the full body; only the record is capped
        assert_eq!(forwarded.concat(), b"Example");

        let events = events.lock();
        match events.last().unwrap() {
            LogEvent::Success { response, .. } => {
                assert_eq!(response.body.as_deref(), Some("Ex"));
            }
            other => panic!("expected success, got {:?}", other.kind()),
        }
    }
}
