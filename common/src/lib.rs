//! Shared building blocks for the document gateway.
//!
//! Holds everything that is not specific to one HTTP surface: configuration,
//! error types and their HTTP mapping, request/response DTOs, middleware and
//! small helpers.

pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod response;
pub mod utils;
