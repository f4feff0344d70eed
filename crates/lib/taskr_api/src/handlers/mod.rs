//! Request handlers.

pub mod auth;
pub mod tasks;
