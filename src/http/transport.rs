// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport seam
//!
//! `Transport` is the injectable entry point for issuing outbound requests.
//! `NetworkTransport` is the real network stack (reqwest); the capture layer
//! wraps any `Transport` in a decorator without the caller noticing. The
//! `TransportRegistry` holds one slot per scheme, so swapping a slot's value
//! and later restoring the saved original is the whole install/uninstall
//! story.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use parking_lot::RwLock;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode, Version};
use serde::{Deserialize, Serialize};
use url::Url;

use super::request::{Body, Request};
use crate::error::{Error, Result};

/// Outbound scheme, one transport slot each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// Both schemes, in install order
    pub const ALL: [Scheme; 2] = [Scheme::Http, Scheme::Https];

    /// Resolve the scheme of a URL
    pub fn of(url: &Url) -> Result<Scheme> {
        match url.scheme() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            other => Err(Error::UnsupportedScheme(other.to_string())),
        }
    }

    /// Scheme name without separator
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response metadata available as soon as the head arrives
#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub version: Version,
    /// Effective URL after redirects
    pub url: Url,
}

/// A response whose body is still streaming in
pub struct ResponseStream {
    pub head: ResponseHead,
    pub body: BoxStream<'static, Result<Bytes>>,
}

impl ResponseStream {
    /// Split into head and body stream
    pub fn into_parts(self) -> (ResponseHead, BoxStream<'static, Result<Bytes>>) {
        (self.head, self.body)
    }

    /// Drain the body into a single buffer
    pub async fn into_bytes(mut self) -> Result<(ResponseHead, Bytes)> {
        let mut buf = Vec::new();
        while let Some(chunk) = self.body.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok((self.head, Bytes::from(buf)))
    }
}

/// Entry point for issuing one outbound request
#[async_trait]
pub trait Transport: Send + Sync {
    /// Which scheme this transport serves
    fn scheme(&self) -> Scheme;

    /// Issue the request and return the streaming response
    async fn send(&self, request: Request) -> Result<ResponseStream>;
}

/// The real network stack, backed by reqwest
pub struct NetworkTransport {
    scheme: Scheme,
    client: Client,
}

impl NetworkTransport {
    /// Build a transport with its own client
    pub fn new(scheme: Scheme) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { scheme, client })
    }

    /// Build a transport sharing an existing client
    pub fn with_client(scheme: Scheme, client: Client) -> Self {
        Self { scheme, client }
    }
}

#[async_trait]
impl Transport for NetworkTransport {
    fn scheme(&self) -> Scheme {
        self.scheme
    }

    async fn send(&self, request: Request) -> Result<ResponseStream> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());

        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        builder = match request.body {
            Body::Empty => builder,
            Body::Full(bytes) => builder.body(bytes),
            Body::Stream(stream) => builder.body(reqwest::Body::wrap_stream(stream)),
        };

        let response = builder.send().await?;
        let head = ResponseHead {
            status: response.status(),
            headers: response.headers().clone(),
            version: response.version(),
            url: response.url().clone(),
        };
        let body = response.bytes_stream().map_err(Error::Http).boxed();

        Ok(ResponseStream { head, body })
    }
}

/// Per-scheme transport slots
pub struct TransportRegistry {
    slots: RwLock<HashMap<Scheme, Arc<dyn Transport>>>,
}

impl TransportRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry with a real network transport in every slot,
    /// sharing one reqwest client
    pub fn with_defaults() -> Result<Self> {
        let client = Client::builder().build()?;
        let registry = Self::new();
        for scheme in Scheme::ALL {
            registry.install(
                scheme,
                Arc::new(NetworkTransport::with_client(scheme, client.clone())),
            );
        }
        Ok(registry)
    }

    /// Current transport for a scheme
    pub fn get(&self, scheme: Scheme) -> Option<Arc<dyn Transport>> {
        self.slots.read().get(&scheme).cloned()
    }

    /// Swap in a transport, returning the previous occupant
    pub fn install(
        &self,
        scheme: Scheme,
        transport: Arc<dyn Transport>,
    ) -> Option<Arc<dyn Transport>> {
        self.slots.write().insert(scheme, transport)
    }
}

impl Default for TransportRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_of_url() {
        let url = Url::parse("https://example.com").unwrap();
        assert_eq!(Scheme::of(&url).unwrap(), Scheme::Https);

        let url = Url::parse("ftp://example.com").unwrap();
        assert!(matches!(
            Scheme::of(&url),
            Err(Error::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_registry_defaults_cover_both_schemes() {
        let registry = TransportRegistry::with_defaults().unwrap();
        for scheme in Scheme::ALL {
            let transport = registry.get(scheme).unwrap();
            assert_eq!(transport.scheme(), scheme);
        }
    }

    #[test]
    fn test_install_returns_previous() {
        let registry = TransportRegistry::with_defaults().unwrap();
        let original = registry.get(Scheme::Http).unwrap();
        let replacement: Arc<dyn Transport> =
            Arc::new(NetworkTransport::new(Scheme::Http).unwrap());

        let previous = registry.install(Scheme::Http, Arc::clone(&replacement)).unwrap();
        assert!(Arc::ptr_eq(&previous, &original));
        assert!(Arc::ptr_eq(&registry.get(Scheme::Http).unwrap(), &replacement));
    }
}
