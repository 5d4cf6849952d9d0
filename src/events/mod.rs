// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Capture event broadcasting

pub mod channel;

pub use channel::{EventCallback, EventChannel, EventKind, LogEvent, SubscriptionId};
