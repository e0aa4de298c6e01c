//! Partition/sort key access to a single `DynamoDB` table
//!
//! Records are plain `serde` types. The library owns the reserved key attributes
//! (`PK` / `SK` by default), builds the key condition expressions and drives
//! query pagination through [`query::QueryCursor`].

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

/// `DynamoDB` client facade
pub mod client;
/// Conversion between records and `DynamoDB` items
pub mod codec;
/// Client configuration and reserved key attributes
pub mod config;
/// Error types
pub mod error;
/// Key conditions and paginated queries
pub mod query;

pub use client::Client;
pub use codec::{AttributeCodec, Item, SerdeDynamoCodec};
pub use config::{ClientConfig, KeyAttributes};
pub use error::{ClientError, ClientResult, CodecError, FetchError};
pub use query::{
    query, query_all, ContinuationCursor, DynamoDbPageFetcher, FilterExpression,
    KeyConditionBuilder, Page, PageFetcher, QueryCursor, QueryOptions, SortKeyCondition,
    SortKeyFilter,
};
