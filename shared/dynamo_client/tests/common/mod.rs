#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use dynamo_client::{ContinuationCursor, FetchError, FilterExpression, Item, Page, PageFetcher};
use serde::Deserialize;

/// Record stored under `user#<id>` / `order#<id>`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub total: i64,
}

/// Request seen by the scripted fetcher
pub type Request = (FilterExpression, Option<ContinuationCursor>);

/// Page fetcher replaying a fixed list of responses and recording every request
pub struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<Page, FetchError>>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedFetcher {
    pub fn new(responses: Vec<Result<Page, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch_page(
        &self,
        expression: &FilterExpression,
        cursor: Option<&ContinuationCursor>,
    ) -> Result<Page, FetchError> {
        self.requests
            .lock()
            .unwrap()
            .push((expression.clone(), cursor.cloned()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Unavailable("no scripted page".to_string())))
    }
}

pub fn order_item(partition: &str, order_id: &str, total: i64) -> Item {
    HashMap::from([
        ("PK".to_string(), AttributeValue::S(partition.to_string())),
        ("SK".to_string(), AttributeValue::S(format!("order#{order_id}"))),
        ("order_id".to_string(), AttributeValue::S(order_id.to_string())),
        ("total".to_string(), AttributeValue::N(total.to_string())),
    ])
}

pub fn cursor_at(partition: &str, sort_key: &str) -> ContinuationCursor {
    ContinuationCursor::from_last_evaluated_key(Some(HashMap::from([
        ("PK".to_string(), AttributeValue::S(partition.to_string())),
        ("SK".to_string(), AttributeValue::S(sort_key.to_string())),
    ])))
    .unwrap()
}

pub fn order(order_id: &str, total: i64) -> Order {
    Order {
        order_id: order_id.to_string(),
        total,
    }
}
