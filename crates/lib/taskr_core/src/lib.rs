//! # taskr_core
//!
//! Core domain logic for taskr: password hashing, token issuance, refresh
//! token rotation, and the user/task stores the API layer is built on.

pub mod auth;
pub mod migrate;
pub mod models;
pub mod store;
pub mod tasks;
