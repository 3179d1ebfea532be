//! Request and Response models for the request cache
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::ApiRequest;
pub use responses::{
    CacheValueResponse, ErrorResponse, HealthResponse, MessageResponse, RequestResponse,
    StatsResponse,
};
