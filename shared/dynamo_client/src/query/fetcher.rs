use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoDbClient;

use super::expression::FilterExpression;
use crate::codec::Item;
use crate::error::FetchError;

/// Position after which a query resumes (`LastEvaluatedKey` of the previous page)
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationCursor(Item);

impl ContinuationCursor {
    /// Wraps a `LastEvaluatedKey`; a missing or empty key means no more pages
    #[must_use]
    pub fn from_last_evaluated_key(key: Option<Item>) -> Option<Self> {
        key.filter(|key| !key.is_empty()).map(Self)
    }

    /// Key to pass as `ExclusiveStartKey`
    #[must_use]
    pub const fn as_item(&self) -> &Item {
        &self.0
    }

    /// Consumes the cursor, returning the raw key
    #[must_use]
    pub fn into_item(self) -> Item {
        self.0
    }
}

/// One bounded batch of query results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Raw items in store order
    pub items: Vec<Item>,
    /// Where the next page starts; `None` once the result set is exhausted
    pub next_cursor: Option<ContinuationCursor>,
}

impl Page {
    /// Creates a page
    #[must_use]
    pub const fn new(items: Vec<Item>, next_cursor: Option<ContinuationCursor>) -> Self {
        Self { items, next_cursor }
    }
}

/// Options applied to each page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Maximum number of items evaluated per page (`Limit`)
    pub page_size: Option<i32>,
    /// Secondary index to query instead of the base table
    pub index_name: Option<String>,
    /// Ascending sort key order when true
    pub scan_forward: bool,
    /// Strongly consistent reads
    pub consistent_read: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            page_size: None,
            index_name: None,
            scan_forward: true,
            consistent_read: false,
        }
    }
}

impl QueryOptions {
    /// Limits the number of items evaluated per page
    #[must_use]
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Queries a secondary index
    #[must_use]
    pub fn with_index(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// Returns items in descending sort key order
    #[must_use]
    pub fn reverse(mut self) -> Self {
        self.scan_forward = false;
        self
    }

    /// Uses strongly consistent reads
    #[must_use]
    pub fn consistent(mut self) -> Self {
        self.consistent_read = true;
        self
    }
}

/// Executes one bounded read for a key condition
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the page starting after `cursor`, or the first page when `cursor` is `None`
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the store could not serve the request
    async fn fetch_page(
        &self,
        expression: &FilterExpression,
        cursor: Option<&ContinuationCursor>,
    ) -> Result<Page, FetchError>;
}

#[async_trait]
impl<P> PageFetcher for Arc<P>
where
    P: PageFetcher + ?Sized,
{
    async fn fetch_page(
        &self,
        expression: &FilterExpression,
        cursor: Option<&ContinuationCursor>,
    ) -> Result<Page, FetchError> {
        (**self).fetch_page(expression, cursor).await
    }
}

/// [`PageFetcher`] issuing `Query` requests against a `DynamoDB` table
pub struct DynamoDbPageFetcher {
    dynamodb_client: Arc<DynamoDbClient>,
    table_name: String,
    options: QueryOptions,
}

impl DynamoDbPageFetcher {
    /// Creates a fetcher
    ///
    /// # Arguments
    ///
    /// * `dynamodb_client` - Pre-configured `DynamoDB` client
    /// * `table_name` - Table to query
    /// * `options` - Page size, index and ordering options
    #[must_use]
    pub const fn new(
        dynamodb_client: Arc<DynamoDbClient>,
        table_name: String,
        options: QueryOptions,
    ) -> Self {
        Self {
            dynamodb_client,
            table_name,
            options,
        }
    }
}

#[async_trait]
impl PageFetcher for DynamoDbPageFetcher {
    async fn fetch_page(
        &self,
        expression: &FilterExpression,
        cursor: Option<&ContinuationCursor>,
    ) -> Result<Page, FetchError> {
        let response = self
            .dynamodb_client
            .query()
            .table_name(&self.table_name)
            .set_index_name(self.options.index_name.clone())
            .key_condition_expression(expression.key_condition())
            .set_expression_attribute_names(Some(expression.names().clone()))
            .set_expression_attribute_values(Some(expression.values().clone()))
            .set_exclusive_start_key(cursor.map(|cursor| cursor.as_item().clone()))
            .set_limit(self.options.page_size)
            .scan_index_forward(self.options.scan_forward)
            .consistent_read(self.options.consistent_read)
            .send()
            .await?;

        let items = response.items.unwrap_or_default();
        let next_cursor = ContinuationCursor::from_last_evaluated_key(response.last_evaluated_key);

        tracing::debug!(
            table = %self.table_name,
            items = items.len(),
            has_more = next_cursor.is_some(),
            "Fetched query page"
        );

        Ok(Page::new(items, next_cursor))
    }
}
