// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Remora - Transparent Outbound HTTP(S) Capture
//!
//! Observes every request issued through the crate's HTTP client machinery:
//! request/response metadata and bodies are captured up to a configurable
//! size cap and reported through `before`, `response`, `success` and
//! `error` events. Call sites do not change, transfers are never altered,
//! and the original transports are restorable on demand.
//!
//! ## How it works
//!
//! Clients dispatch through a per-scheme transport registry. Enabling the
//! logger saves the registry's real transports and swaps in observing
//! decorators; disabling it puts the saved originals back, reference
//! identical. Bodies are tapped chunk by chunk as they stream, so capture
//! adds no buffering and no reordering to the transfer itself.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use remora::{global, EventKind, HttpClient, LogEvent, LoggerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     global().initialize(LoggerConfig::default())?;
//!     global().on(
//!         EventKind::Success,
//!         Arc::new(|event| {
//!             if let LogEvent::Success { request, response } = event {
//!                 println!("{:?} -> {:?}", request.href, response.status_code);
//!             }
//!         }),
//!     );
//!
//!     let client = HttpClient::new();
//!     client.get("https://example.com").await?;
//!
//!     global().end();
//!     Ok(())
//! }
//! ```

pub mod capture;
pub mod error;
pub mod events;
pub mod http;
pub mod logger;

// Re-exports for convenience

// Logger service
pub use logger::{global, LoggerConfig, RequestLogger};

// Events
pub use events::{EventCallback, EventChannel, EventKind, LogEvent, SubscriptionId};

// Captured records
pub use capture::{BodyLimit, BoundedAccumulator, LogRecord, RequestInfo, ResponseInfo};

// HTTP layer
pub use http::{
    Body, HttpClient, NetworkTransport, Request, RequestOptions, RequestTarget, Response,
    ResponseHead, ResponseStream, Scheme, Transport, TransportRegistry,
};

// Errors
pub use error::{Error, Result};

/// Remora version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
