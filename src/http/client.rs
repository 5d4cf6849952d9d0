// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Thin HTTP client over the transport registry
//!
//! The client resolves its transport from the registry at send time, so
//! enabling or disabling capture takes effect immediately for clients that
//! already exist. A client built over an untouched registry behaves exactly
//! like the raw network transport.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;

use super::request::Request;
use super::response::Response;
use super::target::RequestTarget;
use super::transport::{ResponseStream, Scheme, TransportRegistry};
use crate::error::{Error, Result};

/// HTTP client dispatching through the transport registry
#[derive(Clone)]
pub struct HttpClient {
    registry: Arc<TransportRegistry>,
}

impl HttpClient {
    /// Create a client over the process-wide registry
    pub fn new() -> Self {
        Self {
            registry: crate::logger::global_registry(),
        }
    }

    /// Create a client over an explicit registry
    pub fn with_registry(registry: Arc<TransportRegistry>) -> Self {
        Self { registry }
    }

    /// Execute a GET request
    pub async fn get(&self, target: impl Into<RequestTarget>) -> Result<Response> {
        self.execute(Request::get(target)?).await
    }

    /// Execute a POST request
    pub async fn post(
        &self,
        target: impl Into<RequestTarget>,
        body: impl Into<Bytes>,
    ) -> Result<Response> {
        self.execute(Request::post(target)?.body(body)).await
    }

    /// Execute a request, draining the response body
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let start = Instant::now();
        let stream = self.stream(request).await?;
        let (head, body) = stream.into_bytes().await?;
        let response_time_ms = start.elapsed().as_millis() as u64;

        Ok(Response::new(
            head.status,
            head.headers,
            head.version,
            body,
            head.url,
            response_time_ms,
        ))
    }

    /// Execute a request, returning the streaming response
    pub async fn stream(&self, request: Request) -> Result<ResponseStream> {
        let scheme = Scheme::of(&request.url)?;
        let transport = self
            .registry
            .get(scheme)
            .ok_or_else(|| Error::UnsupportedScheme(scheme.to_string()))?;
        transport.send(request).await
    }

    /// The registry this client dispatches through
    pub fn registry(&self) -> &Arc<TransportRegistry> {
        &self.registry
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
