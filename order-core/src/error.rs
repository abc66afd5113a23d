//! Error taxonomy for the order composition engine.

use thiserror::Error;

/// Engine-level error.
///
/// Nothing here is fatal: the worst case is a discarded in-progress
/// document, and every failure is retried only on explicit user action.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Bad shape or bounds on an input field; surfaced inline next to the
    /// offending field.
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    /// The ledger already holds a line for this `(product, group)` pair;
    /// the caller should edit the existing line instead.
    #[error("an item for product {product_ref} already exists in this order")]
    DuplicateItem {
        product_ref: String,
        group: Option<String>,
    },

    /// Unresolved product or unknown line item.
    #[error("not found: {0}")]
    NotFound(String),

    /// Attachment pipeline rejection (unsupported type, size ceiling,
    /// compression failure).
    #[error("attachment rejected: {0}")]
    Attachment(String),

    /// Document-service failure; the payload is atomic, so no partial write
    /// occurred and the document stays editable for retry.
    #[error("submission failed: {0}")]
    Submission(#[source] anyhow::Error),

    /// A submission is already outstanding for this document.
    #[error("a submission is already in progress")]
    SubmissionInFlight,

    /// The persisted item array could not be parsed back into a ledger.
    #[error("malformed persisted items: {0}")]
    Hydration(String),
}

impl OrderError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        OrderError::Validation {
            field,
            message: message.into(),
        }
    }
}
