// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request logger service
//!
//! The installer side of capture: saves the registry's real transports,
//! swaps in instrumented decorators, and restores the saved originals on
//! `end`. The service owns the event channel (composition, not
//! inheritance) and is freely constructible over any registry; a
//! process-wide instance over the default registry is available through
//! [`global`].
//!
//! Lifecycle discipline is single-writer: `initialize` and `end` are meant
//! to be called from one control-flow context, not raced.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::capture::accumulator::BodyLimit;
use crate::capture::instrument::{CaptureSettings, InstrumentedTransport};
use crate::error::{Error, Result};
use crate::events::channel::{EventCallback, EventChannel, EventKind, SubscriptionId};
use crate::http::client::HttpClient;
use crate::http::transport::{Scheme, Transport, TransportRegistry};

lazy_static! {
    static ref GLOBAL_REGISTRY: Arc<TransportRegistry> = Arc::new(
        TransportRegistry::with_defaults().expect("Failed to create default HTTP transports")
    );
    static ref GLOBAL_LOGGER: RequestLogger = RequestLogger::new(Arc::clone(&GLOBAL_REGISTRY));
}

/// The process-wide logger instance
///
/// Backed by the same registry `HttpClient::new` dispatches through, so
/// enabling it captures every request issued by default-constructed
/// clients, no call-site changes needed.
pub fn global() -> &'static RequestLogger {
    &GLOBAL_LOGGER
}

/// Registry behind default-constructed clients
pub(crate) fn global_registry() -> Arc<TransportRegistry> {
    Arc::clone(&GLOBAL_REGISTRY)
}

/// Capture configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Maximum bytes retained per request body and per response body,
    /// capped independently with the same ceiling
    pub max_body_length: BodyLimit,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            max_body_length: BodyLimit::default(),
        }
    }
}

/// Saved entry points plus the enabled flag
struct InterceptionState {
    enabled: bool,
    originals: Option<HashMap<Scheme, Arc<dyn Transport>>>,
}

/// Installer and event surface for outbound request capture
pub struct RequestLogger {
    registry: Arc<TransportRegistry>,
    channel: EventChannel,
    settings: Arc<CaptureSettings>,
    state: Mutex<InterceptionState>,
}

impl RequestLogger {
    /// Create a logger over an explicit registry
    pub fn new(registry: Arc<TransportRegistry>) -> Self {
        Self {
            registry,
            channel: EventChannel::new(),
            settings: Arc::new(CaptureSettings::new(BodyLimit::default())),
            state: Mutex::new(InterceptionState {
                enabled: false,
                originals: None,
            }),
        }
    }

    /// Enable capture: save both schemes' transports and wrap them
    ///
    /// Idempotent while enabled: a second call returns immediately without
    /// re-saving already-wrapped transports. Every original is resolved
    /// before any slot is touched, so a failure leaves the registry in its
    /// pre-call state.
    pub fn initialize(&self, config: LoggerConfig) -> Result<()> {
        let mut state = self.state.lock();
        if state.enabled {
            return Ok(());
        }

        self.settings.set_max_body_length(config.max_body_length);

        let mut originals: HashMap<Scheme, Arc<dyn Transport>> = HashMap::new();
        for scheme in Scheme::ALL {
            let transport = self.registry.get(scheme).ok_or_else(|| {
                Error::Interception(format!("no transport registered for scheme {}", scheme))
            })?;
            originals.insert(scheme, transport);
        }

        for (scheme, original) in &originals {
            self.registry.install(
                *scheme,
                Arc::new(InstrumentedTransport::new(
                    Arc::clone(original),
                    self.channel.clone(),
                    Arc::clone(&self.settings),
                )),
            );
        }

        state.originals = Some(originals);
        state.enabled = true;
        tracing::info!(
            max_body_length = ?config.max_body_length,
            "outbound request capture enabled"
        );
        Ok(())
    }

    /// Disable capture and restore the saved transports
    ///
    /// Restoration is by reference: afterwards the registry holds exactly
    /// the values it held before `initialize`. Without a prior
    /// `initialize` this is a no-op.
    pub fn end(&self) {
        let mut state = self.state.lock();
        if let Some(originals) = state.originals.take() {
            for (scheme, original) in originals {
                self.registry.install(scheme, original);
            }
        }
        if state.enabled {
            tracing::info!("outbound request capture disabled");
        }
        state.enabled = false;
    }

    /// Whether capture is currently installed
    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    /// Current per-body ceiling
    pub fn max_body_length(&self) -> BodyLimit {
        self.settings.max_body_length()
    }

    /// Change the per-body ceiling; applies to sessions started afterwards
    pub fn set_max_body_length(&self, limit: BodyLimit) {
        self.settings.set_max_body_length(limit);
    }

    /// Subscribe to a capture event
    pub fn on(&self, kind: EventKind, callback: EventCallback) -> SubscriptionId {
        self.channel.on(kind, callback)
    }

    /// Subscribe for a single delivery
    pub fn once(&self, kind: EventKind, callback: EventCallback) -> SubscriptionId {
        self.channel.once(kind, callback)
    }

    /// Remove a subscription
    pub fn off(&self, id: SubscriptionId) -> bool {
        self.channel.off(id)
    }

    /// A client dispatching through this logger's registry
    pub fn client(&self) -> HttpClient {
        HttpClient::with_registry(Arc::clone(&self.registry))
    }

    /// The logger's event channel
    pub fn channel(&self) -> &EventChannel {
        &self.channel
    }
}
