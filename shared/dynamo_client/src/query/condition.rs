use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::{ClientError, ClientResult};

/// Comparison applied to the sort key within a partition
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(try_from = "String", into = "String")]
pub enum SortKeyCondition {
    /// Sort key starts with the comparand
    #[strum(serialize = "BEGINS_WITH")]
    BeginsWith,
    /// Sort key equals the comparand
    #[strum(serialize = "EQUALS")]
    Equals,
    /// Sort key orders after the comparand
    #[strum(serialize = "GREATER_THAN")]
    GreaterThan,
    /// Sort key equals or orders after the comparand
    #[strum(serialize = "GREATER_THAN_EQUAL")]
    GreaterThanOrEqual,
    /// Sort key orders before the comparand
    #[strum(serialize = "LESS_THAN")]
    LessThan,
    /// Sort key equals or orders before the comparand
    #[strum(serialize = "LESS_THAN_EQUAL")]
    LessThanOrEqual,
}

impl SortKeyCondition {
    /// Parses a condition name such as `BEGINS_WITH`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnsupportedCondition` for names outside the supported set
    pub fn parse(name: &str) -> ClientResult<Self> {
        name.trim()
            .parse()
            .map_err(|_| ClientError::UnsupportedCondition(name.to_string()))
    }
}

impl TryFrom<String> for SortKeyCondition {
    type Error = ClientError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::parse(&name)
    }
}

impl From<SortKeyCondition> for String {
    fn from(condition: SortKeyCondition) -> Self {
        condition.to_string()
    }
}

/// Sort key condition paired with the value it compares against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKeyFilter {
    condition: SortKeyCondition,
    comparand: String,
}

impl SortKeyFilter {
    /// Creates a filter
    #[must_use]
    pub fn new(condition: SortKeyCondition, comparand: impl Into<String>) -> Self {
        Self {
            condition,
            comparand: comparand.into(),
        }
    }

    /// Creates a filter from a condition name, e.g. one read from configuration
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnsupportedCondition` if `condition` is not a known name
    pub fn parse(condition: &str, comparand: impl Into<String>) -> ClientResult<Self> {
        Ok(Self::new(SortKeyCondition::parse(condition)?, comparand))
    }

    /// Sort key starts with `prefix`
    #[must_use]
    pub fn begins_with(prefix: impl Into<String>) -> Self {
        Self::new(SortKeyCondition::BeginsWith, prefix)
    }

    /// Sort key equals `value`
    #[must_use]
    pub fn equals(value: impl Into<String>) -> Self {
        Self::new(SortKeyCondition::Equals, value)
    }

    /// Sort key is greater than `value`
    #[must_use]
    pub fn greater_than(value: impl Into<String>) -> Self {
        Self::new(SortKeyCondition::GreaterThan, value)
    }

    /// Sort key is greater than or equal to `value`
    #[must_use]
    pub fn greater_than_or_equal(value: impl Into<String>) -> Self {
        Self::new(SortKeyCondition::GreaterThanOrEqual, value)
    }

    /// Sort key is less than `value`
    #[must_use]
    pub fn less_than(value: impl Into<String>) -> Self {
        Self::new(SortKeyCondition::LessThan, value)
    }

    /// Sort key is less than or equal to `value`
    #[must_use]
    pub fn less_than_or_equal(value: impl Into<String>) -> Self {
        Self::new(SortKeyCondition::LessThanOrEqual, value)
    }

    /// Condition applied to the sort key
    #[must_use]
    pub const fn condition(&self) -> SortKeyCondition {
        self.condition
    }

    /// Value the sort key is compared against
    #[must_use]
    pub fn comparand(&self) -> &str {
        &self.comparand
    }
}
