//! HTTP route handlers

pub mod auth;
pub mod srs;
pub mod users;
