use kernel::id::{Id, markers};

/// Provider-issued principal id; also the profile store key
pub type IdentityId = Id<markers::Identity>;
