//! Retrying pagination over a [`PageSource`].
//!
//! One primitive replaces the per-query retry loops the upstream service
//! grew organically: a strategy (offset or last-id cursor), a page size, and
//! a retry policy, applied uniformly to every collection.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::sleep;

use super::client::PageSource;
use super::queries::Query;
use crate::error::FetchError;
use crate::model::Identified;

/// Bounded retry, optionally with a linear `attempt * step` backoff.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_step: Option<Duration>,
}

impl RetryPolicy {
    /// Retry up to `max_attempts` times with no delay between attempts.
    pub fn flat(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff_step: None,
        }
    }

    /// Retry up to `max_attempts` times, sleeping `attempt * step` before
    /// each retry.
    pub fn backoff(max_attempts: u32, step: Duration) -> Self {
        Self {
            max_attempts,
            backoff_step: Some(step),
        }
    }

    async fn wait(&self, attempt: u32) {
        if let Some(step) = self.backoff_step {
            sleep(step * attempt).await;
        }
    }
}

/// Pagination position.
#[derive(Debug, Clone)]
pub enum PageCursor {
    /// Skip/first pagination, advanced by the number of records returned.
    Offset(u64),

    /// Last-seen-id pagination; the upstream must order ascending and filter
    /// with `id_gt`.
    AfterId(String),
}

impl PageCursor {
    /// Offset strategy starting at the first record.
    pub fn offset() -> Self {
        PageCursor::Offset(0)
    }

    /// Cursor strategy starting below every id.
    pub fn after_id() -> Self {
        PageCursor::AfterId(String::new())
    }
}

/// Paginated fetch engine over one source.
pub struct Pager<'a> {
    source: &'a dyn PageSource,
    page_size: usize,
    retry: RetryPolicy,
}

impl<'a> Pager<'a> {
    pub fn new(source: &'a dyn PageSource, page_size: usize, retry: RetryPolicy) -> Self {
        Self {
            source,
            page_size,
            retry,
        }
    }

    /// Fetch every page of `query` starting at `cursor`, concatenating pages
    /// until the first empty one. `extra` carries query-specific variables
    /// (timestamp bound, action allowlist) merged into each page request.
    ///
    /// Pages are fetched strictly in cursor order; parallelizing them would
    /// break last-id pagination.
    pub async fn fetch_all<T>(
        &self,
        query: &Query,
        mut cursor: PageCursor,
        extra: Value,
    ) -> Result<Vec<T>, FetchError>
    where
        T: DeserializeOwned + Identified,
    {
        let mut all: Vec<T> = Vec::new();
        let mut turn = 1u32;

        loop {
            log::debug!("{}: fetching page {} at {:?}", query.name, turn, cursor);
            let variables = page_variables(&cursor, self.page_size, &extra);
            let page: Vec<T> = self.fetch_page_with_retry(query, variables).await?;

            if page.is_empty() {
                break;
            }

            cursor = match &cursor {
                PageCursor::Offset(skip) => PageCursor::Offset(skip + page.len() as u64),
                PageCursor::AfterId(_) => match page.last() {
                    Some(last) => PageCursor::AfterId(last.record_id().to_string()),
                    None => break,
                },
            };

            all.extend(page);
            turn += 1;
        }

        Ok(all)
    }

    /// Fetch and validate one page, retrying per the configured policy.
    /// Validation failures (missing field, field not a list, records that do
    /// not deserialize) are retried like transport failures.
    async fn fetch_page_with_retry<T>(
        &self,
        query: &Query,
        variables: Value,
    ) -> Result<Vec<T>, FetchError>
    where
        T: DeserializeOwned,
    {
        let mut attempt = 0u32;

        loop {
            match self.fetch_page_once(query, variables.clone()).await {
                Ok(records) => return Ok(records),
                Err(err) => {
                    attempt += 1;
                    log::warn!(
                        "{}: attempt {} of {} failed: {}",
                        query.name,
                        attempt,
                        self.retry.max_attempts,
                        err
                    );
                    if attempt >= self.retry.max_attempts {
                        return Err(FetchError::Exhausted {
                            query: query.name,
                            attempts: attempt,
                        });
                    }
                    self.retry.wait(attempt).await;
                }
            }
        }
    }

    async fn fetch_page_once<T>(&self, query: &Query, variables: Value) -> Result<Vec<T>, FetchError>
    where
        T: DeserializeOwned,
    {
        let data = self.source.fetch_page(query, variables).await?;

        let records = data.get(query.field).ok_or_else(|| {
            FetchError::InvalidPage(format!("{}: missing field {}", query.name, query.field))
        })?;

        if !records.is_array() {
            return Err(FetchError::InvalidPage(format!(
                "{}: field {} is not a list",
                query.name, query.field
            )));
        }

        serde_json::from_value(records.clone())
            .map_err(|err| FetchError::InvalidPage(format!("{}: {}", query.name, err)))
    }
}

fn page_variables(cursor: &PageCursor, page_size: usize, extra: &Value) -> Value {
    let mut variables = serde_json::Map::new();
    if let Some(extra) = extra.as_object() {
        variables.extend(extra.clone());
    }
    variables.insert("first".to_string(), json!(page_size));

    match cursor {
        PageCursor::Offset(skip) => {
            variables.insert("skip".to_string(), json!(skip));
        }
        PageCursor::AfterId(id) => {
            variables.insert("id".to_string(), json!(id));
        }
    }

    Value::Object(variables)
}
