//! Identity Provider Interface
//!
//! The external system that authenticates principals. It reports session
//! changes to subscribers and runs the interactive sign-in and sign-out
//! flows.

use tokio::sync::mpsc;

use crate::domain::value_object::identity::IdentityEvent;
use crate::error::AccessResult;

/// Where a provider delivers session changes
///
/// Backed by the single-consumer channel the resolver reads from, so events
/// arrive in the order the provider emitted them.
#[derive(Debug, Clone)]
pub struct IdentitySink {
    tx: mpsc::UnboundedSender<IdentityEvent>,
}

impl IdentitySink {
    pub fn new(tx: mpsc::UnboundedSender<IdentityEvent>) -> Self {
        Self { tx }
    }

    /// Push an event; returns false once the consumer has gone away
    pub fn deliver(&self, event: IdentityEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Handle to a registered subscription
///
/// Releasing it (explicitly or by drop) detaches the sink from the provider.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Identity provider trait
#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// Register `sink` for session changes
    ///
    /// The provider delivers its current session (signed in or out) to the
    /// new sink first, then every later change, one at a time.
    fn subscribe(&self, sink: IdentitySink) -> Subscription;

    /// Start the provider's interactive sign-in flow
    async fn begin_interactive_sign_in(&self) -> AccessResult<()>;

    /// End the provider-side session
    async fn sign_out(&self) -> AccessResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_subscription_releases_once() {
        let released = Arc::new(AtomicU32::new(0));
        let counter = released.clone();
        let subscription = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        subscription.unsubscribe();
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscription_releases_on_drop() {
        let released = Arc::new(AtomicU32::new(0));
        let counter = released.clone();
        {
            let _subscription = Subscription::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sink_reports_closed_consumer() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = IdentitySink::new(tx);
        assert!(sink.deliver(IdentityEvent::SignedOut));
        drop(rx);
        assert!(sink.is_closed());
        assert!(!sink.deliver(IdentityEvent::SignedOut));
    }
}
