//! Application Layer
//!
//! Use cases wiring the domain to its collaborators: the identity pipeline
//! (bridge, resolver, provisioning), the session context that owns its
//! output, role gates that read it, and roster imports.

pub mod bridge;
pub mod config;
pub mod observer;
pub mod provisioning;
pub mod resolver;
pub mod role_gate;
pub mod roster;
pub mod session_context;

// Re-exports
pub use bridge::IdentityListenerBridge;
pub use config::{AccessConfig, GateRoutes};
pub use observer::{FailureObserver, TracingObserver};
pub use provisioning::FirstLoginProvisioning;
pub use resolver::{IdentityResolver, Resolved, ResolvedFrom};
pub use role_gate::{Denial, GateDecision, GuardedView, Navigator, RoleGate};
pub use roster::{IssuedCredential, RejectedRow, RosterEntry, RosterImport, RosterReport};
pub use session_context::SessionContext;
