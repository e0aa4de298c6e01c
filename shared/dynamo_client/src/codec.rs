use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde::{de::DeserializeOwned, Serialize};

use crate::config::KeyAttributes;
use crate::error::CodecError;

/// Generic `DynamoDB` item representation
pub type Item = HashMap<String, AttributeValue>;

/// Converts between typed records and `DynamoDB` items
pub trait AttributeCodec: Send + Sync {
    /// Decodes a batch of items, preserving their order
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Decode` if any item does not match `T`
    fn decode_items<T: DeserializeOwned>(&self, items: Vec<Item>) -> Result<Vec<T>, CodecError>;

    /// Decodes a single item
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Decode` if the item does not match `T`
    fn decode_item<T: DeserializeOwned>(&self, item: Item) -> Result<T, CodecError>;

    /// Encodes a record into an item without key attributes
    ///
    /// # Errors
    ///
    /// Returns `CodecError` if the record is not a map or uses a reserved attribute name
    fn encode_item<T: Serialize>(&self, record: &T) -> Result<Item, CodecError>;
}

/// [`AttributeCodec`] backed by `serde_dynamo`
///
/// Reserved key attributes present in stored items are ignored on decode, since
/// record types do not declare them.
#[derive(Debug, Clone, Default)]
pub struct SerdeDynamoCodec {
    key_attributes: KeyAttributes,
}

impl SerdeDynamoCodec {
    /// Creates a codec guarding the given reserved key attributes
    #[must_use]
    pub const fn new(key_attributes: KeyAttributes) -> Self {
        Self { key_attributes }
    }
}

impl AttributeCodec for SerdeDynamoCodec {
    fn decode_items<T: DeserializeOwned>(&self, items: Vec<Item>) -> Result<Vec<T>, CodecError> {
        serde_dynamo::from_items::<_, T>(items).map_err(CodecError::Decode)
    }

    fn decode_item<T: DeserializeOwned>(&self, item: Item) -> Result<T, CodecError> {
        serde_dynamo::from_item(item).map_err(CodecError::Decode)
    }

    fn encode_item<T: Serialize>(&self, record: &T) -> Result<Item, CodecError> {
        let item: Item = serde_dynamo::to_item(record).map_err(CodecError::Encode)?;

        if let Some(reserved) = item.keys().find(|name| self.key_attributes.is_reserved(name)) {
            return Err(CodecError::ReservedAttribute(reserved.clone()));
        }

        Ok(item)
    }
}
