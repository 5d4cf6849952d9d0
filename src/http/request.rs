// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP request types and builder

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use super::target::RequestTarget;
use crate::error::Result;

/// Outgoing request body
///
/// Chunked bodies stay chunked all the way to the transport; the capture
/// layer observes each chunk in arrival order without re-buffering.
pub enum Body {
    Empty,
    Full(Bytes),
    Stream(BoxStream<'static, Result<Bytes>>),
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => write!(f, "Body::Empty"),
            Body::Full(bytes) => write!(f, "Body::Full({} bytes)", bytes.len()),
            Body::Stream(_) => write!(f, "Body::Stream(..)"),
        }
    }
}

/// HTTP request representation
#[derive(Debug)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// What the caller originally aimed at (URL string or structured options)
    pub target: RequestTarget,
    /// Resolved request URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Body,
    /// Request timeout
    pub timeout: Option<Duration>,
    /// Skip body/metadata capture for this request
    pub do_not_log: bool,
}

impl Request {
    /// Create a request with an arbitrary method
    pub fn new(method: Method, target: impl Into<RequestTarget>) -> Result<Self> {
        let target = target.into();
        let url = target.to_url()?;
        Ok(Self {
            method,
            target,
            url,
            headers: HeaderMap::new(),
            body: Body::Empty,
            timeout: Some(Duration::from_secs(30)),
            do_not_log: false,
        })
    }

    /// Create a GET request
    pub fn get(target: impl Into<RequestTarget>) -> Result<Self> {
        Self::new(Method::GET, target)
    }

    /// Create a POST request
    pub fn post(target: impl Into<RequestTarget>) -> Result<Self> {
        Self::new(Method::POST, target)
    }

    /// Set a header
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Set multiple headers
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        for (name, value) in headers {
            self = self.header(name, value);
        }
        self
    }

    /// Set the request body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Body::Full(body.into());
        self
    }

    /// Set a chunked request body
    pub fn stream_body<S>(mut self, stream: S) -> Self
    where
        S: futures::Stream<Item = Result<Bytes>> + Send + 'static,
    {
        self.body = Body::Stream(stream.boxed());
        self
    }

    /// Set JSON body
    pub fn json<T: Serialize>(mut self, data: &T) -> Result<Self> {
        let json = serde_json::to_vec(data)?;
        self.body = Body::Full(Bytes::from(json));
        self = self.header("content-type", "application/json");
        Ok(self)
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disable timeout
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Skip body/metadata capture for this request; the `before` event
    /// still fires
    pub fn do_not_log(mut self) -> Self {
        self.do_not_log = true;
        self
    }

    /// Get the URL as string
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }

    /// Get the host
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::target::RequestOptions;

    #[test]
    fn test_request_from_url_string() {
        let req = Request::get("https://example.com/path").unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.url.host_str(), Some("example.com"));
        assert!(matches!(req.target, RequestTarget::Url(_)));
    }

    #[test]
    fn test_request_from_options() {
        let opts = RequestOptions {
            hostname: Some("example.com".into()),
            port: Some(8080),
            path: Some("/api".into()),
            ..Default::default()
        };
        let req = Request::new(Method::POST, opts).unwrap();
        assert_eq!(req.url.as_str(), "http://example.com:8080/api");
        assert!(matches!(req.target, RequestTarget::Options(_)));
    }

    #[test]
    fn test_request_headers() {
        let req = Request::get("https://example.com")
            .unwrap()
            .header("x-custom", "value");
        assert_eq!(
            req.headers.get("x-custom").map(|v| v.to_str().unwrap()),
            Some("value")
        );
    }

    #[test]
    fn test_do_not_log_flag() {
        let req = Request::get("https://example.com").unwrap();
        assert!(!req.do_not_log);
        let req = req.do_not_log();
        assert!(req.do_not_log);
    }
}
