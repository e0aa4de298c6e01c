use std::sync::Arc;

use aws_sdk_dynamodb::Client as DynamoDbClient;
use serde::de::DeserializeOwned;

use crate::codec::{AttributeCodec, SerdeDynamoCodec};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::query::{
    self, DynamoDbPageFetcher, KeyConditionBuilder, QueryCursor, QueryOptions, SortKeyFilter,
};

/// `DynamoDB` client bound to one table with `PK` + `SK` composite keys
pub struct Client {
    dynamodb_client: Arc<DynamoDbClient>,
    config: ClientConfig,
    builder: KeyConditionBuilder,
    codec: SerdeDynamoCodec,
}

impl Client {
    /// Creates a new client
    ///
    /// No request is sent; use [`Client::ping_table`] to check the table exists.
    ///
    /// # Arguments
    ///
    /// * `dynamodb_client` - Pre-configured `DynamoDB` client
    /// * `config` - Table name, reserved key attributes and default query options
    #[must_use]
    pub fn new(dynamodb_client: Arc<DynamoDbClient>, config: ClientConfig) -> Self {
        let builder = KeyConditionBuilder::new(config.key_attributes.clone());
        let codec = SerdeDynamoCodec::new(config.key_attributes.clone());

        Self {
            dynamodb_client,
            config,
            builder,
            codec,
        }
    }

    /// Table this client reads from
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.config.table_name
    }

    /// Checks that the configured table exists
    ///
    /// # Errors
    ///
    /// * `ClientError::TableNotFound` if no table with the configured name is listed
    /// * `ClientError::DynamoDbListTablesError` if the `DynamoDB` operation fails
    pub async fn ping_table(&self) -> ClientResult<()> {
        let mut exclusive_start_table_name = None;

        loop {
            let response = self
                .dynamodb_client
                .list_tables()
                .set_exclusive_start_table_name(exclusive_start_table_name.take())
                .send()
                .await?;

            if response
                .table_names()
                .iter()
                .any(|name| name == &self.config.table_name)
            {
                tracing::info!("Found DynamoDB table {}", self.config.table_name);
                return Ok(());
            }

            match response.last_evaluated_table_name {
                Some(name) => exclusive_start_table_name = Some(name),
                None => break,
            }
        }

        tracing::warn!("DynamoDB table {} not found", self.config.table_name);
        Err(ClientError::TableNotFound(self.config.table_name.clone()))
    }

    /// Gets the item stored under a `PK` + `SK` combination
    ///
    /// # Returns
    ///
    /// `None` if there is no such item
    ///
    /// # Errors
    ///
    /// * `ClientError::DynamoDbGetError` if the `DynamoDB` operation fails
    /// * `ClientError::Codec` if the item does not match `T`
    pub async fn get<T: DeserializeOwned>(
        &self,
        partition_key: &str,
        sort_key: &str,
    ) -> ClientResult<Option<T>> {
        let response = self
            .dynamodb_client
            .get_item()
            .table_name(&self.config.table_name)
            .set_key(Some(
                self.config.key_attributes.key_item(partition_key, sort_key),
            ))
            .send()
            .await?;

        let Some(item) = response.item else {
            tracing::debug!("No item under {partition_key} / {sort_key}");
            return Ok(None);
        };

        Ok(Some(self.codec.decode_item(item)?))
    }

    /// Prepares a query over a partition using the configured query options
    ///
    /// No request is sent until the returned cursor is advanced.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::ExpressionBuild` if the key condition cannot be built
    pub fn query(
        &self,
        partition_key: &str,
        sort_key_filter: Option<&SortKeyFilter>,
    ) -> ClientResult<QueryCursor<DynamoDbPageFetcher>> {
        self.query_with_options(
            partition_key,
            sort_key_filter,
            self.config.query_options.clone(),
        )
    }

    /// Prepares a query over a partition with explicit query options
    ///
    /// # Errors
    ///
    /// Returns `ClientError::ExpressionBuild` if the key condition cannot be built
    pub fn query_with_options(
        &self,
        partition_key: &str,
        sort_key_filter: Option<&SortKeyFilter>,
        options: QueryOptions,
    ) -> ClientResult<QueryCursor<DynamoDbPageFetcher>> {
        let fetcher = DynamoDbPageFetcher::new(
            Arc::clone(&self.dynamodb_client),
            self.config.table_name.clone(),
            options,
        );

        query::query(
            fetcher,
            self.codec.clone(),
            &self.builder,
            partition_key,
            sort_key_filter,
        )
    }

    /// Fetches every record of a partition matching the sort key filter
    ///
    /// # Errors
    ///
    /// Returns the first build, fetch or decode error
    pub async fn query_all<T: DeserializeOwned>(
        &self,
        partition_key: &str,
        sort_key_filter: Option<&SortKeyFilter>,
    ) -> ClientResult<Vec<T>> {
        self.query(partition_key, sort_key_filter)?
            .collect_all()
            .await
    }
}
