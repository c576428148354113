//! Error types for the persistence layer.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// An operation was attempted before the connection was opened, or after
    /// it was closed
    #[error("Database not initialized. Call initialize() first.")]
    NotInitialized,

    /// One or more entity invariants failed
    #[error("{entity} validation failed: {}", messages.join(", "))]
    Validation {
        entity: &'static str,
        messages: Vec<String>,
    },

    /// An update or delete targeted an id that does not exist
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The storage engine rejected a read statement
    #[error("Query failed: {statement} (params: {params:?})")]
    QueryFailed {
        statement: String,
        params: Vec<String>,
        #[source]
        source: rusqlite::Error,
    },

    /// The storage engine rejected a mutating statement
    #[error("Write failed: {statement} (params: {params:?})")]
    WriteFailed {
        statement: String,
        params: Vec<String>,
        #[source]
        source: rusqlite::Error,
    },

    /// A migration's up or down body failed
    #[error("Migration {version} ({name}) failed to {operation}")]
    MigrationFailed {
        version: u32,
        name: &'static str,
        operation: &'static str,
        #[source]
        source: Box<StoreError>,
    },

    /// Connection-level errors (open, pragmas, close)
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },

    /// The engine is inside a transaction the manager did not start
    #[error("A transaction is already active on this connection")]
    TransactionActive,

    /// A stored value could not be converted back into its domain type
    #[error("Invalid value '{value}' in column '{column}'")]
    InvalidRow { column: &'static str, value: String },

    /// Serialization/deserialization errors for encoded columns
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// Seeding finished with some recipes rejected
    #[error("Seeding completed with {failed} of {total} recipes failing")]
    SeedFailed { failed: usize, total: usize },

    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },

    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> StoreError {
        StoreError::Database {
            message: self.message,
            source,
        }
    }
}

impl StoreError {
    /// Creates a builder for connection-level database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a validation error from a non-empty list of violations.
    pub fn validation(entity: &'static str, messages: Vec<String>) -> Self {
        StoreError::Validation { entity, messages }
    }

    /// Creates a not-found error for the given entity id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Returns the violation messages if this is a validation error.
    pub fn violations(&self) -> Option<&[String]> {
        match self {
            StoreError::Validation { messages, .. } => Some(messages),
            _ => None,
        }
    }

    /// True for failures reported by the storage engine itself.
    ///
    /// The UI layer offers a generic retry for these.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            StoreError::QueryFailed { .. }
                | StoreError::WriteFailed { .. }
                | StoreError::Database { .. }
        )
    }
}

/// Specialized extension trait for connection-level database Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| StoreError::database(message).with_source(e))
    }
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_joins_all_violations() {
        let err = StoreError::validation(
            "Recipe",
            vec![
                "Title is required".to_string(),
                "At least one step is required".to_string(),
            ],
        );
        assert_eq!(
            err.to_string(),
            "Recipe validation failed: Title is required, At least one step is required"
        );
        assert_eq!(err.violations().map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_storage_failure_classification() {
        let err = StoreError::WriteFailed {
            statement: "INSERT INTO recipes".to_string(),
            params: vec!["Text(\"x\")".to_string()],
            source: rusqlite::Error::InvalidQuery,
        };
        assert!(err.is_storage_failure());
        assert!(!StoreError::not_found("Recipe", "abc").is_storage_failure());
        assert!(!StoreError::NotInitialized.is_storage_failure());
    }
}
