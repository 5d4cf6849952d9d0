// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request targets
//!
//! A request can be aimed at a plain URL string or at a structured option
//! set in the style of classic client libraries (protocol/host/port/path as
//! separate fields). Both forms are kept on the request verbatim so
//! subscribers to the `before` event see exactly what the caller passed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// What the caller aimed the request at
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestTarget {
    /// A full URL string
    Url(String),
    /// Structured per-field options
    Options(RequestOptions),
}

impl RequestTarget {
    /// Resolve into a parsed URL
    pub fn to_url(&self) -> Result<Url> {
        match self {
            RequestTarget::Url(s) => Ok(Url::parse(s)?),
            RequestTarget::Options(opts) => opts.to_url(),
        }
    }
}

impl From<&str> for RequestTarget {
    fn from(s: &str) -> Self {
        RequestTarget::Url(s.to_string())
    }
}

impl From<String> for RequestTarget {
    fn from(s: String) -> Self {
        RequestTarget::Url(s)
    }
}

impl From<RequestOptions> for RequestTarget {
    fn from(opts: RequestOptions) -> Self {
        RequestTarget::Options(opts)
    }
}

/// Structured request options
///
/// Only these fields are recognized; absent fields are simply omitted from
/// the captured record rather than copied as empty values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Scheme with trailing colon, e.g. `"https:"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Host, possibly including port, e.g. `"example.com:8080"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Host without port
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Path including query string, e.g. `"/search?q=1"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// `user:password` credentials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
    /// Fragment including `#`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Query string including `?`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Query string without `?`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Path without query string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pathname: Option<String>,
    /// Full reference URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// HTTP method; `None` means GET
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Extra headers to send
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
}

impl RequestOptions {
    /// Assemble the options into a URL
    ///
    /// `href` wins outright when present. Otherwise the URL is built from
    /// parts: scheme defaults to `http`, path to `/`; a host is required.
    pub fn to_url(&self) -> Result<Url> {
        if let Some(href) = non_empty(&self.href) {
            return Ok(Url::parse(href)?);
        }

        let scheme = non_empty(&self.protocol)
            .map(|p| p.trim_end_matches(':'))
            .unwrap_or("http");

        let host = non_empty(&self.hostname)
            .or_else(|| non_empty(&self.host))
            .ok_or_else(|| Error::Target("no host or hostname given".into()))?;

        let mut raw = String::new();
        raw.push_str(scheme);
        raw.push_str("://");
        if let Some(auth) = non_empty(&self.auth) {
            raw.push_str(auth);
            raw.push('@');
        }
        raw.push_str(host);
        // `host` may already carry a port; an explicit `port` field wins
        // only when the host does not.
        if let Some(port) = self.port {
            if !host.contains(':') {
                raw.push(':');
                raw.push_str(&port.to_string());
            }
        }

        let path = non_empty(&self.path)
            .or_else(|| non_empty(&self.pathname))
            .unwrap_or("/");
        if !path.starts_with('/') {
            raw.push('/');
        }
        raw.push_str(path);

        if self.path.is_none() {
            if let Some(search) = non_empty(&self.search) {
                raw.push_str(search);
            } else if let Some(query) = non_empty(&self.query) {
                raw.push('?');
                raw.push_str(query);
            }
        }
        if let Some(hash) = non_empty(&self.hash) {
            raw.push_str(hash);
        }

        Ok(Url::parse(&raw)?)
    }
}

/// Treat empty strings like absent fields
pub(crate) fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
