//! Value Object Module

pub mod identity;
pub mod identity_id;
pub mod person_name;
pub mod role;
