//! Utility functions and helpers.

pub mod id_generator;
pub mod presence;

pub use id_generator::IdGenerator;
pub use presence::{is_present, validate_present, value_as_key};
