//! Middleware module
//!
//! Contains authentication and request logging

pub mod auth;
pub mod logging;
