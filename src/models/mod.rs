//! Data models module
//!
//! Defines the client-facing caption structures and the upstream provider API structures

pub mod anthropic;
pub mod caption;
pub mod openai;

pub use caption::{
    CaptionData, CaptionRequest, CaptionResponse, Confidence, ProviderResult, ResponseMetadata,
    TokenUsage, ValidationResult,
};
