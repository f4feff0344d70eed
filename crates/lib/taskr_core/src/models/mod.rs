//! Domain models.

pub mod auth;
pub mod task;
