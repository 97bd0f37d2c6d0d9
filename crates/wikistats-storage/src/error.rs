//! Storage error types for the corpus lookup layer.

/// Errors that can occur during corpus lookups.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The caller supplied a query the lookup cannot serve.
    #[error("Invalid query: {message}")]
    InvalidQuery {
        /// Description of why the query was rejected.
        message: String,
    },

    /// Failed to reach the storage backend.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// The backend rejected or failed to execute a query.
    #[error("Query error: {message}")]
    Query {
        /// Description of the failure, as reported by the backend.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `InvalidQuery` error.
    #[must_use]
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a new `Query` error.
    #[must_use]
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::invalid_query("empty");
        assert_eq!(err.to_string(), "Invalid query: empty");

        let err = StorageError::connection("refused");
        assert!(err.to_string().contains("Connection error"));

        let err = StorageError::query("relation \"pagina\" does not exist");
        assert!(err.to_string().contains("pagina"));
    }
}
