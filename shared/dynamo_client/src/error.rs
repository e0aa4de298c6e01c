use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::{
    get_item::GetItemError, list_tables::ListTablesError, query::QueryError,
};
use thiserror::Error;

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors returned by the client, the key condition builder and query cursors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Sort key condition outside the supported set
    #[error("Unsupported sort key condition: {0}")]
    UnsupportedCondition(String),

    /// Key condition could not be compiled into a valid `DynamoDB` expression
    #[error("Failed to build key condition expression: {0}")]
    ExpressionBuild(String),

    /// Page fetch failed; the cursor did not advance and the call may be retried
    #[error("Failed to fetch query page {page}: {source}")]
    Fetch {
        /// One-based index of the page that was requested
        page: usize,
        /// Underlying fetch failure
        #[source]
        source: FetchError,
    },

    /// Page was fetched but its items could not be decoded; the cursor advanced
    #[error("Failed to decode query page {page}: {source}")]
    Decode {
        /// One-based index of the page that was fetched
        page: usize,
        /// Underlying codec failure
        #[source]
        source: CodecError,
    },

    /// `next` was called on a cursor that already reported no more results
    #[error("Query cursor is exhausted after {pages} pages")]
    ExhaustedCursor {
        /// Number of pages fetched before exhaustion
        pages: usize,
    },

    /// Failed to get an item from `DynamoDB`
    #[error("Failed to get item from DynamoDB: {0}")]
    DynamoDbGetError(#[from] SdkError<GetItemError>),

    /// Failed to list tables in `DynamoDB`
    #[error("Failed to list tables in DynamoDB: {0}")]
    DynamoDbListTablesError(#[from] SdkError<ListTablesError>),

    /// The configured table does not exist
    #[error("Table not found in DynamoDB: {0}")]
    TableNotFound(String),

    /// Failed to convert a single item
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl ClientError {
    /// Whether repeating the failed call can succeed without skipping data
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    /// Whether the query cursor moved past the page that produced this error
    #[must_use]
    pub const fn cursor_advanced(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Whether a page fetch failed on the service side (5xx) or could not reach the store
    #[must_use]
    pub fn is_upstream_error(&self) -> bool {
        match self {
            Self::Fetch { source, .. } => source.is_upstream_error(),
            _ => false,
        }
    }

    /// Page index attached to fetch and decode failures
    #[must_use]
    pub const fn page(&self) -> Option<usize> {
        match self {
            Self::Fetch { page, .. } | Self::Decode { page, .. } => Some(*page),
            _ => None,
        }
    }
}

/// Errors raised by a [`crate::PageFetcher`]
#[derive(Debug, Error)]
pub enum FetchError {
    /// Failed to query `DynamoDB`
    #[error("Failed to query DynamoDB: {0}")]
    DynamoDbQueryError(#[from] SdkError<QueryError>),

    /// The store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl FetchError {
    /// Checks if this error represents an upstream (5xx) or availability error
    #[must_use]
    pub fn is_upstream_error(&self) -> bool {
        match self {
            Self::DynamoDbQueryError(SdkError::ServiceError(err)) => {
                err.raw().status().as_u16() >= 500
            }
            Self::DynamoDbQueryError(_) => false,
            Self::Unavailable(_) => true,
        }
    }
}

/// Errors converting between records and `DynamoDB` items
#[derive(Debug, Error)]
pub enum CodecError {
    /// Item could not be converted into the requested record type
    #[error("Failed to decode item: {0}")]
    Decode(#[source] serde_dynamo::Error),

    /// Record could not be converted into an item
    #[error("Failed to encode record: {0}")]
    Encode(#[source] serde_dynamo::Error),

    /// Record declares a field named like a reserved key attribute
    #[error("Record field `{0}` collides with a reserved key attribute")]
    ReservedAttribute(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_and_advance_flags() {
        let fetch = ClientError::Fetch {
            page: 3,
            source: FetchError::Unavailable("connection reset".to_string()),
        };
        assert!(fetch.is_retryable());
        assert!(!fetch.cursor_advanced());
        assert_eq!(fetch.page(), Some(3));

        let exhausted = ClientError::ExhaustedCursor { pages: 2 };
        assert!(!exhausted.is_retryable());
        assert!(!exhausted.cursor_advanced());
        assert_eq!(exhausted.page(), None);
    }

    #[test]
    fn test_upstream_errors() {
        assert!(FetchError::Unavailable("connection refused".to_string()).is_upstream_error());

        let timeout = FetchError::DynamoDbQueryError(SdkError::timeout_error("deadline exceeded"));
        assert!(!timeout.is_upstream_error());

        let fetch = ClientError::Fetch {
            page: 2,
            source: FetchError::Unavailable("connection refused".to_string()),
        };
        assert!(fetch.is_upstream_error());

        let fetch = ClientError::Fetch {
            page: 2,
            source: timeout,
        };
        assert!(!fetch.is_upstream_error());
        assert!(!ClientError::TableNotFound("records".to_string()).is_upstream_error());
    }

    #[test]
    fn test_error_messages() {
        let err = ClientError::Fetch {
            page: 1,
            source: FetchError::Unavailable("timeout".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch query page 1: Store unavailable: timeout"
        );

        let err = ClientError::UnsupportedCondition("BETWEEN".to_string());
        assert_eq!(err.to_string(), "Unsupported sort key condition: BETWEEN");
    }
}
