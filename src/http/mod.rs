// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer: requests, responses, and the transport seam
//!
//! The transport trait is the injection point the capture layer decorates;
//! everything else here is a lightweight client over it.

pub mod client;
pub mod request;
pub mod response;
pub mod target;
pub mod transport;

pub use client::HttpClient;
pub use request::{Body, Request};
pub use response::Response;
pub use target::{RequestOptions, RequestTarget};
pub use transport::{
    NetworkTransport, ResponseHead, ResponseStream, Scheme, Transport, TransportRegistry,
};
