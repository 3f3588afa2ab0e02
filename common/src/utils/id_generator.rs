//! Unique ID generator.
//!
//! Provides identifiers in the formats the document service uses.

use uuid::Uuid;

/// Generates unique identifiers.
pub struct IdGenerator;

impl IdGenerator {
    /// Generates a unique request ID (hyphenated UUID).
    pub fn request_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Generates a document ID: 32 lowercase hex characters.
    pub fn document_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Generates a revision token for the given generation, e.g. `1-3f2a...`.
    pub fn revision(generation: u64) -> String {
        format!("{}-{}", generation, Uuid::new_v4().simple())
    }

    /// Parses the generation prefix of a revision token.
    pub fn revision_generation(revision: &str) -> Option<u64> {
        revision.split_once('-')?.0.parse().ok()
    }
}
