//! HTTP client for the queryable source.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::queries::Query;
use crate::error::FetchError;

/// One page fetch against a queryable source. The engine only ever talks to
/// this trait; tests substitute a scripted implementation.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Execute `query` with `variables` and return the response `data`
    /// object. GraphQL-level errors count as upstream failures.
    async fn fetch_page(&self, query: &Query, variables: Value) -> Result<Value, FetchError>;
}

/// GraphQL-over-HTTP client for one subgraph endpoint.
pub struct SubgraphClient {
    http: reqwest::Client,
    url: String,
}

impl SubgraphClient {
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PageSource for SubgraphClient {
    async fn fetch_page(&self, query: &Query, variables: Value) -> Result<Value, FetchError> {
        let envelope = json!({
            "query": query.document,
            "variables": variables,
        });

        let response = self.http.post(&self.url).json(&envelope).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Upstream(format!(
                "{}: http status {} from {}",
                query.name,
                response.status(),
                self.url
            )));
        }

        let payload: Value = response.json().await?;

        if let Some(errors) = payload.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                return Err(FetchError::Upstream(format!(
                    "{}: {}",
                    query.name,
                    Value::Array(errors.clone())
                )));
            }
        }

        payload.get("data").cloned().ok_or_else(|| {
            FetchError::InvalidPage(format!("{}: response has no data object", query.name))
        })
    }
}
