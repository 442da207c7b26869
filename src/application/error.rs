use thiserror::Error;

/// The record collections held in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Inventory,
    Expenses,
    Sales,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Inventory => "inventory",
            Collection::Expenses => "expenses",
            Collection::Sales => "sales",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Stored document is corrupt: {0}")]
    CorruptState(#[source] serde_json::Error),

    #[error("Import data is not a valid document: {0}")]
    ImportParse(#[source] serde_json::Error),

    /// Only raised in strict mode; the default is a silent no-op.
    #[error("No {collection} record with id {id}")]
    NotFound { collection: Collection, id: String },

    #[error("Failed to serialize document: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Persistence error: {0}")]
    Persistence(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
