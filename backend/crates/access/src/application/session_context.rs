//! Session Context
//!
//! Lifecycle-scoped owner of the process-wide [`Session`]. One resolver task
//! is the writer; any number of readers hold `watch` receivers. The context
//! is passed by `Arc` to whoever needs it; there is no global.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;

use crate::application::bridge::IdentityListenerBridge;
use crate::application::config::AccessConfig;
use crate::application::observer::FailureObserver;
use crate::application::resolver::IdentityResolver;
use crate::domain::entity::session::Session;
use crate::domain::provider::IdentityProvider;
use crate::domain::repository::ProfileStore;
use crate::domain::value_object::identity::IdentityEvent;
use crate::error::{AccessError, AccessResult};

struct Lifecycle {
    bridge: IdentityListenerBridge,
    resolver: Option<JoinHandle<()>>,
}

pub struct SessionContext<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    state: Arc<watch::Sender<Session>>,
    provider: Arc<P>,
    observer: Arc<dyn FailureObserver>,
    lifecycle: Mutex<Lifecycle>,
    closed: AtomicBool,
}

impl<P> SessionContext<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    /// Subscribe to `provider` and start the resolver loop
    ///
    /// Must be called from within a tokio runtime. The session starts as
    /// `{ user: None, loading: true }` and settles once the provider has
    /// replayed its current session.
    pub fn start<S>(
        provider: Arc<P>,
        store: Arc<S>,
        observer: Arc<dyn FailureObserver>,
        config: Arc<AccessConfig>,
    ) -> Self
    where
        S: ProfileStore + Send + Sync + 'static,
    {
        let (state, _) = watch::channel(Session::initial());
        let state = Arc::new(state);

        let (bridge, events) = IdentityListenerBridge::attach(provider.as_ref());
        let resolver = IdentityResolver::new(store, observer.clone(), config);
        let task = tokio::spawn(run_resolver(events, resolver, state.clone()));

        tracing::info!("Session context started");

        Self {
            state,
            provider,
            observer,
            lifecycle: Mutex::new(Lifecycle {
                bridge,
                resolver: Some(task),
            }),
            closed: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current session
    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver that observes every session change
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Wait until the session is not loading
    pub async fn wait_settled(&self) -> Session {
        let mut sessions = self.state.subscribe();
        let settled = sessions
            .wait_for(Session::is_settled)
            .await
            .map(|session| session.clone());
        settled.unwrap_or_else(|_| self.current())
    }

    /// Like [`Self::wait_settled`], giving up after `wait`
    pub async fn wait_settled_for(&self, wait: Duration) -> AccessResult<Session> {
        tokio::time::timeout(wait, self.wait_settled())
            .await
            .map_err(|_| AccessError::ResolutionPending)
    }

    /// Start the provider's interactive sign-in
    ///
    /// The resulting identity arrives through the subscription like any
    /// other session change. Failures are reported to the observer and
    /// returned; the session itself is not touched.
    pub async fn sign_in(&self) -> AccessResult<()> {
        if self.is_closed() {
            return Err(AccessError::ContextClosed);
        }

        self.provider
            .begin_interactive_sign_in()
            .await
            .inspect_err(|e| self.observer.report(None, e))
    }

    /// Sign out
    ///
    /// The local user is cleared when this is called, before the returned
    /// future is first polled, so callers see `user: None` immediately. The
    /// future then performs the provider sign-out.
    pub fn sign_out(&self) -> impl Future<Output = AccessResult<()>> + Send + use<P> {
        if !self.is_closed() {
            self.state.send_modify(|session| {
                session.user = None;
                session.loading = false;
            });
            tracing::info!("Session cleared locally");
        }

        let provider = self.provider.clone();
        let observer = self.observer.clone();
        async move {
            provider
                .sign_out()
                .await
                .inspect_err(|e| observer.report(None, e))
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Release the provider subscription and stop the resolver
    ///
    /// Once this returns the session is never written again.
    pub async fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);

        let mut lifecycle = self.lifecycle.lock().await;
        lifecycle.bridge.release();
        if let Some(task) = lifecycle.resolver.take() {
            task.abort();
            // JoinError here is the cancellation we just asked for
            let _ = task.await;
            tracing::info!("Session context shut down");
        }
    }
}

impl<P> Drop for SessionContext<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    fn drop(&mut self) {
        let lifecycle = self.lifecycle.get_mut();
        lifecycle.bridge.release();
        if let Some(task) = lifecycle.resolver.take() {
            task.abort();
        }
    }
}

/// Resolver loop: one event at a time, in delivery order
async fn run_resolver<S>(
    mut events: mpsc::UnboundedReceiver<IdentityEvent>,
    resolver: IdentityResolver<S>,
    state: Arc<watch::Sender<Session>>,
) where
    S: ProfileStore + Send + Sync + 'static,
{
    while let Some(event) = events.recv().await {
        match event {
            IdentityEvent::SignedOut => {
                state.send_replace(Session::signed_out());
                tracing::debug!("Identity signed out");
            }
            IdentityEvent::SignedIn(identity) => {
                state.send_modify(|session| *session = Session::resolving(session.user.take()));
                let resolved = resolver.resolve(&identity).await;
                state.send_replace(Session::resolved(resolved.user));
            }
        }
    }

    tracing::debug!("Identity event stream closed");
}
