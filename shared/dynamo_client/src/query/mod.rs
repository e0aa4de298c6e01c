//! Key conditions and paginated queries
//!
//! A query is compiled once by [`KeyConditionBuilder`] and then driven page by page
//! through a [`QueryCursor`]. [`query_all`] drains a cursor into a single vector.

mod condition;
mod cursor;
mod expression;
mod fetcher;

use serde::de::DeserializeOwned;

pub use condition::{SortKeyCondition, SortKeyFilter};
pub use cursor::QueryCursor;
pub use expression::{FilterExpression, KeyConditionBuilder};
pub use fetcher::{ContinuationCursor, DynamoDbPageFetcher, Page, PageFetcher, QueryOptions};

use crate::codec::AttributeCodec;
use crate::error::ClientResult;

/// Prepares a cursor over `partition_key_value`, optionally narrowed by a sort key filter
///
/// No request is sent until the cursor is advanced.
///
/// # Errors
///
/// Returns `ClientError::ExpressionBuild` if the key condition cannot be built
pub fn query<F, C>(
    fetcher: F,
    codec: C,
    builder: &KeyConditionBuilder,
    partition_key_value: &str,
    sort_key_filter: Option<&SortKeyFilter>,
) -> ClientResult<QueryCursor<F, C>>
where
    F: PageFetcher,
    C: AttributeCodec,
{
    let expression = builder.build(partition_key_value, sort_key_filter)?;
    Ok(QueryCursor::new(fetcher, codec, expression))
}

/// Fetches every page of a query and returns all records in store order
///
/// # Errors
///
/// Returns the first build, fetch or decode error; nothing is returned for pages
/// fetched before the failure
pub async fn query_all<T, F, C>(
    fetcher: F,
    codec: C,
    builder: &KeyConditionBuilder,
    partition_key_value: &str,
    sort_key_filter: Option<&SortKeyFilter>,
) -> ClientResult<Vec<T>>
where
    T: DeserializeOwned,
    F: PageFetcher,
    C: AttributeCodec,
{
    query(fetcher, codec, builder, partition_key_value, sort_key_filter)?
        .collect_all()
        .await
}
