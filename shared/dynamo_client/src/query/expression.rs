use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use super::condition::{SortKeyCondition, SortKeyFilter};
use crate::config::KeyAttributes;
use crate::error::{ClientError, ClientResult};

const PARTITION_KEY_NAME: &str = "#pk";
const PARTITION_KEY_VALUE: &str = ":pk";
const SORT_KEY_NAME: &str = "#sk";
const SORT_KEY_VALUE: &str = ":sk";

/// `DynamoDB` limit for a partition key value
const MAX_PARTITION_KEY_BYTES: usize = 2048;
/// `DynamoDB` limit for a sort key value
const MAX_SORT_KEY_BYTES: usize = 1024;

/// Compiled key condition with its attribute name and value placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpression {
    key_condition: String,
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl FilterExpression {
    /// Key condition expression, e.g. `#pk = :pk AND begins_with(#sk, :sk)`
    #[must_use]
    pub fn key_condition(&self) -> &str {
        &self.key_condition
    }

    /// Placeholder to attribute name mapping
    #[must_use]
    pub const fn names(&self) -> &HashMap<String, String> {
        &self.names
    }

    /// Placeholder to attribute value mapping
    #[must_use]
    pub const fn values(&self) -> &HashMap<String, AttributeValue> {
        &self.values
    }
}

/// Builds key condition expressions against the reserved key attributes
#[derive(Debug, Clone, Default)]
pub struct KeyConditionBuilder {
    key_attributes: KeyAttributes,
}

impl KeyConditionBuilder {
    /// Creates a builder for the given reserved key attributes
    #[must_use]
    pub const fn new(key_attributes: KeyAttributes) -> Self {
        Self { key_attributes }
    }

    /// Builds `PK = value`, ANDed with the sort key filter when one is given
    ///
    /// # Arguments
    ///
    /// * `partition_key_value` - Partition to query
    /// * `sort_key_filter` - Optional condition narrowing the sort key range
    ///
    /// # Errors
    ///
    /// Returns `ClientError::ExpressionBuild` if `DynamoDB` would reject the expression:
    /// empty or oversized key values, or unusable reserved attribute names
    pub fn build(
        &self,
        partition_key_value: &str,
        sort_key_filter: Option<&SortKeyFilter>,
    ) -> ClientResult<FilterExpression> {
        self.validate_attributes()?;
        validate_key_value("partition key", partition_key_value, MAX_PARTITION_KEY_BYTES)?;

        let mut key_condition = format!("{PARTITION_KEY_NAME} = {PARTITION_KEY_VALUE}");
        let mut names = HashMap::from([(
            PARTITION_KEY_NAME.to_string(),
            self.key_attributes.partition_key().to_string(),
        )]);
        let mut values = HashMap::from([(
            PARTITION_KEY_VALUE.to_string(),
            AttributeValue::S(partition_key_value.to_string()),
        )]);

        if let Some(filter) = sort_key_filter {
            validate_key_value("sort key comparand", filter.comparand(), MAX_SORT_KEY_BYTES)?;

            key_condition.push_str(" AND ");
            key_condition.push_str(&sort_key_clause(filter.condition()));
            names.insert(
                SORT_KEY_NAME.to_string(),
                self.key_attributes.sort_key().to_string(),
            );
            values.insert(
                SORT_KEY_VALUE.to_string(),
                AttributeValue::S(filter.comparand().to_string()),
            );
        }

        Ok(FilterExpression {
            key_condition,
            names,
            values,
        })
    }

    fn validate_attributes(&self) -> ClientResult<()> {
        let partition_key = self.key_attributes.partition_key();
        let sort_key = self.key_attributes.sort_key();

        if partition_key.is_empty() || sort_key.is_empty() {
            return Err(ClientError::ExpressionBuild(
                "key attribute names must not be empty".to_string(),
            ));
        }
        if partition_key == sort_key {
            return Err(ClientError::ExpressionBuild(format!(
                "partition and sort key share the attribute name `{partition_key}`"
            )));
        }

        Ok(())
    }
}

fn sort_key_clause(condition: SortKeyCondition) -> String {
    let operator = match condition {
        SortKeyCondition::BeginsWith => {
            return format!("begins_with({SORT_KEY_NAME}, {SORT_KEY_VALUE})");
        }
        SortKeyCondition::Equals => "=",
        SortKeyCondition::GreaterThan => ">",
        SortKeyCondition::GreaterThanOrEqual => ">=",
        SortKeyCondition::LessThan => "<",
        SortKeyCondition::LessThanOrEqual => "<=",
    };

    format!("{SORT_KEY_NAME} {operator} {SORT_KEY_VALUE}")
}

fn validate_key_value(label: &str, value: &str, max_bytes: usize) -> ClientResult<()> {
    if value.is_empty() {
        return Err(ClientError::ExpressionBuild(format!(
            "{label} must not be empty"
        )));
    }
    if value.len() > max_bytes {
        return Err(ClientError::ExpressionBuild(format!(
            "{label} is {} bytes, limit is {max_bytes}",
            value.len()
        )));
    }

    Ok(())
}
