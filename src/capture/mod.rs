// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request/response capture pipeline
//!
//! Builds a faithful log record out of asynchronous, chunked request and
//! response data without blocking or altering the transfer.

pub mod accumulator;
pub(crate) mod instrument;
pub mod record;
pub(crate) mod session;

pub use accumulator::{BodyLimit, BoundedAccumulator, DEFAULT_MAX_BODY_LENGTH};
pub use record::{LogRecord, RequestInfo, ResponseInfo};
