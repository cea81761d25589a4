use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A document failed to decode into its typed model.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A batch update targeted a document that does not exist.
    #[error("Document not found: {collection}/{id}")]
    MissingDocument { collection: String, id: String },

    /// The backing store rejected or failed the call.
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
