//! Push Identity Provider
//!
//! Identity provider whose session changes are pushed in from outside, by
//! the upstream identity gateway calling back over HTTP. The provider keeps
//! the current identity and replays it to every new subscriber, so a fresh
//! session context settles without waiting for the next change.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::domain::provider::{IdentityProvider, IdentitySink, Subscription};
use crate::domain::value_object::identity::{Identity, IdentityEvent};
use crate::error::{AccessError, AccessResult};

struct Shared {
    current: Option<Identity>,
    subscribers: Vec<(u64, IdentitySink)>,
    next_subscriber: u64,
    available: bool,
    sign_in_requests: u64,
}

impl Shared {
    fn event(&self) -> IdentityEvent {
        IdentityEvent::from(self.current.clone())
    }

    fn ensure_available(&self) -> AccessResult<()> {
        if self.available {
            Ok(())
        } else {
            Err(AccessError::ProviderUnavailable(
                "identity gateway is not reachable".to_string(),
            ))
        }
    }
}

#[derive(Clone)]
pub struct PushIdentityProvider {
    shared: Arc<Mutex<Shared>>,
}

impl PushIdentityProvider {
    /// Provider with nobody signed in
    pub fn new() -> Self {
        Self::with_current(None)
    }

    pub fn with_current(current: Option<Identity>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                current,
                subscribers: Vec::new(),
                next_subscriber: 0,
                available: true,
                sign_in_requests: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a session change and deliver it to every subscriber
    ///
    /// Returns the number of subscribers reached. Subscribers whose consumer
    /// has gone away are dropped.
    pub fn publish(&self, identity: Option<Identity>) -> usize {
        let mut shared = self.lock();
        shared.current = identity;
        let event = shared.event();

        shared
            .subscribers
            .retain(|(_, sink)| sink.deliver(event.clone()));

        let reached = shared.subscribers.len();
        match event.identity() {
            Some(identity) => {
                tracing::info!(identity_id = %identity.id, subscribers = reached, "Identity signed in")
            }
            None => tracing::info!(subscribers = reached, "Identity signed out"),
        }
        reached
    }

    pub fn current(&self) -> Option<Identity> {
        self.lock().current.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Simulate the gateway going away; sign-in and sign-out then fail
    pub fn set_available(&self, available: bool) {
        self.lock().available = available;
    }

    /// Interactive sign-ins requested so far
    pub fn sign_in_requests(&self) -> u64 {
        self.lock().sign_in_requests
    }
}

impl Default for PushIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for PushIdentityProvider {
    fn subscribe(&self, sink: IdentitySink) -> Subscription {
        let mut shared = self.lock();

        // Replay under the lock so no publish can slip in before it
        sink.deliver(shared.event());

        let key = shared.next_subscriber;
        shared.next_subscriber += 1;
        shared.subscribers.push((key, sink));

        let weak: Weak<Mutex<Shared>> = Arc::downgrade(&self.shared);
        Subscription::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .subscribers
                    .retain(|(k, _)| *k != key);
            }
        })
    }

    async fn begin_interactive_sign_in(&self) -> AccessResult<()> {
        let mut shared = self.lock();
        shared.ensure_available()?;
        shared.sign_in_requests += 1;
        tracing::info!("Interactive sign-in requested");
        Ok(())
    }

    async fn sign_out(&self) -> AccessResult<()> {
        self.lock().ensure_available()?;
        self.publish(None);
        Ok(())
    }
}
