//! Shared request/response models.

pub mod database;
pub mod document;

pub use database::CreateDatabaseRequest;
pub use document::{
    DocumentList, DocumentListQuery, DocumentQuery, DocumentRow, RemoveDocumentRequest,
    WriteDocumentRequest, WriteResult,
};
