use std::collections::HashMap;
use std::env;

use aws_sdk_dynamodb::types::AttributeValue;

use crate::query::QueryOptions;

/// Partition key attribute name used when none is configured
pub const DEFAULT_PARTITION_KEY_ATTRIBUTE: &str = "PK";
/// Sort key attribute name used when none is configured
pub const DEFAULT_SORT_KEY_ATTRIBUTE: &str = "SK";

/// Attribute names reserved for the table's composite primary key
///
/// Record types must not declare fields with these names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttributes {
    partition_key: String,
    sort_key: String,
}

impl KeyAttributes {
    /// Creates the reserved attribute names
    ///
    /// # Arguments
    ///
    /// * `partition_key` - Attribute name of the partition (hash) key
    /// * `sort_key` - Attribute name of the sort (range) key
    #[must_use]
    pub fn new(partition_key: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: sort_key.into(),
        }
    }

    /// Partition key attribute name
    #[must_use]
    pub fn partition_key(&self) -> &str {
        &self.partition_key
    }

    /// Sort key attribute name
    #[must_use]
    pub fn sort_key(&self) -> &str {
        &self.sort_key
    }

    /// Whether `name` is one of the reserved key attributes
    #[must_use]
    pub fn is_reserved(&self, name: &str) -> bool {
        name == self.partition_key || name == self.sort_key
    }

    /// Builds the primary key map for a `PK` + `SK` combination
    #[must_use]
    pub fn key_item(&self, partition_key: &str, sort_key: &str) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (
                self.partition_key.clone(),
                AttributeValue::S(partition_key.to_string()),
            ),
            (self.sort_key.clone(), AttributeValue::S(sort_key.to_string())),
        ])
    }
}

impl Default for KeyAttributes {
    fn default() -> Self {
        Self::new(DEFAULT_PARTITION_KEY_ATTRIBUTE, DEFAULT_SORT_KEY_ATTRIBUTE)
    }
}

/// Configuration for a [`crate::Client`] bound to one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `DynamoDB` table name
    pub table_name: String,
    /// Reserved key attribute names
    pub key_attributes: KeyAttributes,
    /// Options applied to every query unless overridden per call
    pub query_options: QueryOptions,
}

impl ClientConfig {
    /// Creates a configuration with the default key attributes and query options
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            key_attributes: KeyAttributes::default(),
            query_options: QueryOptions::default(),
        }
    }

    /// Replaces the reserved key attribute names
    #[must_use]
    pub fn with_key_attributes(mut self, key_attributes: KeyAttributes) -> Self {
        self.key_attributes = key_attributes;
        self
    }

    /// Replaces the default query options
    #[must_use]
    pub fn with_query_options(mut self, query_options: QueryOptions) -> Self {
        self.query_options = query_options;
        self
    }

    /// Reads the configuration from environment variables
    ///
    /// * `DYNAMODB_TABLE_NAME` - table name, required
    /// * `DYNAMODB_PARTITION_KEY` - partition key attribute (default `PK`)
    /// * `DYNAMODB_SORT_KEY` - sort key attribute (default `SK`)
    /// * `DYNAMODB_QUERY_PAGE_SIZE` - page size limit, ignored when not a positive integer
    ///
    /// Returns `None` when `DYNAMODB_TABLE_NAME` is not set.
    #[must_use]
    pub fn try_from_env() -> Option<Self> {
        let table_name = env::var("DYNAMODB_TABLE_NAME").ok()?;

        let key_attributes = KeyAttributes::new(
            env::var("DYNAMODB_PARTITION_KEY")
                .unwrap_or_else(|_| DEFAULT_PARTITION_KEY_ATTRIBUTE.to_string()),
            env::var("DYNAMODB_SORT_KEY")
                .unwrap_or_else(|_| DEFAULT_SORT_KEY_ATTRIBUTE.to_string()),
        );

        let page_size = env::var("DYNAMODB_QUERY_PAGE_SIZE")
            .ok()
            .and_then(|val| val.parse::<i32>().ok())
            .filter(|size| *size > 0);

        Some(Self {
            table_name,
            key_attributes,
            query_options: QueryOptions {
                page_size,
                ..QueryOptions::default()
            },
        })
    }

    /// Reads the configuration from environment variables
    ///
    /// # Panics
    ///
    /// Panics if the `DYNAMODB_TABLE_NAME` environment variable is not set
    #[must_use]
    pub fn from_env() -> Self {
        Self::try_from_env().expect("DYNAMODB_TABLE_NAME environment variable is not set")
    }
}
