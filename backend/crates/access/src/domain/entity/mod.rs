//! Entity Module

pub mod app_user;
pub mod profile;
pub mod session;
