// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Observing transport decorator
//!
//! Wraps an inner transport and attaches a capture session to every request
//! passing through it. The wrapped call is delegated untouched: same chunks,
//! same ordering, same errors. Callers cannot tell the difference.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::RwLock;

use super::accumulator::BodyLimit;
use super::session::{CaptureSession, RequestBodyTap, ResponseBodyTap, SharedSession};
use crate::error::Result;
use crate::events::channel::{EventChannel, LogEvent};
use crate::http::request::{Body, Request};
use crate::http::transport::{ResponseStream, Scheme, Transport};

/// Capture settings shared between the logger service and its decorators
pub(crate) struct CaptureSettings {
    max_body_length: RwLock<BodyLimit>,
}

impl CaptureSettings {
    pub(crate) fn new(limit: BodyLimit) -> Self {
        Self {
            max_body_length: RwLock::new(limit),
        }
    }

    pub(crate) fn max_body_length(&self) -> BodyLimit {
        *self.max_body_length.read()
    }

    pub(crate) fn set_max_body_length(&self, limit: BodyLimit) {
        *self.max_body_length.write() = limit;
    }
}

/// Transport decorator that captures everything flowing through it
pub(crate) struct InstrumentedTransport {
    inner: Arc<dyn Transport>,
    channel: EventChannel,
    settings: Arc<CaptureSettings>,
}

impl InstrumentedTransport {
    pub(crate) fn new(
        inner: Arc<dyn Transport>,
        channel: EventChannel,
        settings: Arc<CaptureSettings>,
    ) -> Self {
        Self {
            inner,
            channel,
            settings,
        }
    }

    /// Route outgoing body chunks through the session before they reach the
    /// real transport
    fn tap_request_body(request: &mut Request, session: &SharedSession) {
        let body = std::mem::replace(&mut request.body, Body::Empty);
        request.body = match body {
            Body::Empty => Body::Empty,
            Body::Full(bytes) => {
                session.lock().record_request_chunk(&bytes);
                Body::Full(bytes)
            }
            Body::Stream(stream) => {
                Body::Stream(RequestBodyTap::new(stream, Arc::clone(session)).boxed())
            }
        };
    }
}

#[async_trait]
impl Transport for InstrumentedTransport {
    fn scheme(&self) -> Scheme {
        self.inner.scheme()
    }

    async fn send(&self, mut request: Request) -> Result<ResponseStream> {
        // The before notification fires for every request, opted out or not
        self.channel.emit(&LogEvent::Before {
            scheme: self.inner.scheme(),
            target: request.target.clone(),
        });

        if request.do_not_log {
            return self.inner.send(request).await;
        }

        tracing::trace!(
            method = %request.method,
            url = %request.url,
            "capturing outbound request"
        );

        let session = CaptureSession::start(
            self.channel.clone(),
            self.settings.max_body_length(),
            &request,
        );
        Self::tap_request_body(&mut request, &session);

        match self.inner.send(request).await {
            Ok(stream) => {
                let (head, body) = stream.into_parts();
                session.lock().response_started(&head);
                let body = ResponseBodyTap::new(body, Arc::clone(&session)).boxed();
                Ok(ResponseStream { head, body })
            }
            Err(error) => {
                session.lock().request_failed(&error);
                Err(error)
            }
        }
    }
}
