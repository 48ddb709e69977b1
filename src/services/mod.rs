//! Service layer module
//!
//! Contains the request validator

pub mod validator;

pub use validator::RequestValidator;
