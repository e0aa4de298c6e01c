use serde::de::DeserializeOwned;

use super::expression::FilterExpression;
use super::fetcher::{ContinuationCursor, PageFetcher};
use crate::codec::{AttributeCodec, SerdeDynamoCodec};
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq)]
enum CursorState {
    /// No page requested yet; reported as having more results
    NotStarted,
    HasMore(ContinuationCursor),
    Exhausted,
}

/// Pull-based iterator over the pages of one query
///
/// Nothing is sent until the first [`QueryCursor::next`]. Each call issues exactly one
/// page request and replaces the stored continuation cursor with the one returned by
/// the store. A failed fetch leaves the cursor where it was, so the same call can be
/// retried; a failed decode does not, since the page has already been consumed.
pub struct QueryCursor<F, C = SerdeDynamoCodec> {
    fetcher: F,
    codec: C,
    expression: FilterExpression,
    state: CursorState,
    pages_fetched: usize,
}

impl<F, C> QueryCursor<F, C>
where
    F: PageFetcher,
    C: AttributeCodec,
{
    /// Creates a cursor positioned before the first page
    #[must_use]
    pub const fn new(fetcher: F, codec: C, expression: FilterExpression) -> Self {
        Self {
            fetcher,
            codec,
            expression,
            state: CursorState::NotStarted,
            pages_fetched: 0,
        }
    }

    /// Whether another page may exist
    ///
    /// Always true before the first fetch, even for an empty partition.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        !matches!(self.state, CursorState::Exhausted)
    }

    /// Number of pages fetched successfully so far
    #[must_use]
    pub const fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Key condition this cursor queries
    #[must_use]
    pub const fn expression(&self) -> &FilterExpression {
        &self.expression
    }

    /// Fetches the next page and replaces the contents of `into` with its records
    ///
    /// `into` is left empty when the page has no items.
    ///
    /// # Errors
    ///
    /// * `ClientError::ExhaustedCursor` if [`QueryCursor::has_next`] already returned false;
    ///   nothing is fetched
    /// * `ClientError::Fetch` if the page request failed; the cursor did not advance and
    ///   `into` is untouched
    /// * `ClientError::Decode` if the items do not match `T`; the cursor advanced past the
    ///   page and `into` is left empty
    pub async fn next<T: DeserializeOwned>(&mut self, into: &mut Vec<T>) -> ClientResult<()> {
        let cursor = match &self.state {
            CursorState::Exhausted => {
                return Err(ClientError::ExhaustedCursor {
                    pages: self.pages_fetched,
                })
            }
            CursorState::NotStarted => None,
            CursorState::HasMore(cursor) => Some(cursor),
        };

        let page_index = self.pages_fetched + 1;
        let page = self
            .fetcher
            .fetch_page(&self.expression, cursor)
            .await
            .map_err(|source| ClientError::Fetch {
                page: page_index,
                source,
            })?;

        self.pages_fetched = page_index;
        self.state = page
            .next_cursor
            .map_or(CursorState::Exhausted, CursorState::HasMore);

        into.clear();
        if page.items.is_empty() {
            return Ok(());
        }

        let records = self
            .codec
            .decode_items(page.items)
            .map_err(|source| ClientError::Decode {
                page: page_index,
                source,
            })?;
        into.extend(records);

        Ok(())
    }

    /// Fetches the next page and returns its records
    ///
    /// # Errors
    ///
    /// Same as [`QueryCursor::next`]
    pub async fn next_page<T: DeserializeOwned>(&mut self) -> ClientResult<Vec<T>> {
        let mut records = Vec::new();
        self.next(&mut records).await?;
        Ok(records)
    }

    /// Drains the remaining pages, concatenating records in arrival order
    ///
    /// # Errors
    ///
    /// Returns the first fetch or decode error; records gathered so far are dropped
    pub async fn collect_all<T: DeserializeOwned>(&mut self) -> ClientResult<Vec<T>> {
        let mut records = Vec::new();
        let mut page = Vec::new();

        while self.has_next() {
            self.next(&mut page).await?;
            records.append(&mut page);
        }

        Ok(records)
    }
}
