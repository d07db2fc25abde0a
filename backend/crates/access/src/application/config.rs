//! Application Configuration
//!
//! Configuration for the access application layer.

use std::time::Duration;

/// Re-export retry policy from platform
pub use platform::retry::RetryConfig;

/// Routes a role gate redirects to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRoutes {
    /// Where unauthenticated callers are sent
    pub unauthenticated_entry: String,
    /// Where callers without an allowed role are sent
    pub permission_denied: String,
    /// Offered on the permission page as the way back
    pub home: String,
}

impl Default for GateRoutes {
    fn default() -> Self {
        Self {
            unauthenticated_entry: "/login".to_string(),
            permission_denied: "/unauthorized".to_string(),
            home: "/".to_string(),
        }
    }
}

/// Access application configuration
#[derive(Debug, Clone)]
pub struct AccessConfig {
    pub routes: GateRoutes,
    /// First name given to provisioned users whose display name is empty
    pub default_first_name: String,
    /// How long a guarded request waits for a loading session to settle
    pub resolve_wait: Duration,
    /// Retry policy of the profile store adapter
    pub store_retry: RetryConfig,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            routes: GateRoutes::default(),
            default_first_name: "User".to_string(),
            resolve_wait: Duration::from_secs(5),
            store_retry: RetryConfig::exponential(
                2,
                Duration::from_millis(100),
                Duration::from_secs(1),
            ),
        }
    }
}

impl AccessConfig {
    /// Config for development (short waits, no store retries)
    pub fn development() -> Self {
        Self {
            resolve_wait: Duration::from_secs(2),
            store_retry: RetryConfig::no_retry(),
            ..Default::default()
        }
    }

    pub fn with_routes(mut self, routes: GateRoutes) -> Self {
        self.routes = routes;
        self
    }

    pub fn with_resolve_wait(mut self, wait: Duration) -> Self {
        self.resolve_wait = wait;
        self
    }

    pub fn with_store_retry(mut self, retry: RetryConfig) -> Self {
        self.store_retry = retry;
        self
    }

    /// Get resolve wait in milliseconds, saturating at `u64::MAX`
    pub fn resolve_wait_ms(&self) -> u64 {
        u64::try_from(self.resolve_wait.as_millis()).unwrap_or(u64::MAX)
    }
}
