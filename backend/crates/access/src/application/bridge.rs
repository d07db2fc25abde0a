//! Identity Listener Bridge
//!
//! Turns the provider's subscription into a single-consumer channel of
//! typed events for the resolver loop.

use tokio::sync::mpsc;

use crate::domain::provider::{IdentityProvider, IdentitySink, Subscription};
use crate::domain::value_object::identity::IdentityEvent;

/// Owns the one provider subscription of a session context
#[derive(Debug)]
pub struct IdentityListenerBridge {
    subscription: Option<Subscription>,
}

impl IdentityListenerBridge {
    /// Subscribe to `provider` and return the receiving end of the event channel
    pub fn attach<P>(provider: &P) -> (Self, mpsc::UnboundedReceiver<IdentityEvent>)
    where
        P: IdentityProvider,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = provider.subscribe(IdentitySink::new(tx));

        tracing::debug!("Identity listener attached");
        (
            Self {
                subscription: Some(subscription),
            },
            rx,
        )
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Release the subscription. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            tracing::debug!("Identity listener released");
        }
    }
}
