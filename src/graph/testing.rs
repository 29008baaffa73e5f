//! Scripted in-memory page source for tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use super::client::PageSource;
use super::queries::Query;
use crate::error::FetchError;

/// Query used by unit tests that do not care about a real document.
pub(crate) const TEST_QUERY: Query = Query {
    name: "TestQuery",
    document: "query Test($skip: Int!, $first: Int!) { records }",
    field: "records",
};

/// A [`PageSource`] that replays pre-scripted responses per query name and
/// records every request it sees. Once a query's script runs out it serves
/// empty pages, so pagination always terminates.
pub(crate) struct ScriptedSource {
    scripts: Mutex<HashMap<&'static str, VecDeque<Result<Value, FetchError>>>>,
    calls: AtomicU32,
    variables: Mutex<Vec<Value>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            calls: AtomicU32::new(0),
            variables: Mutex::new(Vec::new()),
        }
    }

    /// Script the next raw response for `query`.
    pub fn enqueue(&self, query: &Query, response: Result<Value, FetchError>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(query.name)
            .or_default()
            .push_back(response);
    }

    /// Script the next page of records for `query`, wrapped in its field.
    pub fn enqueue_records(&self, query: &Query, records: Value) {
        self.enqueue(query, Ok(page_for(query, records)));
    }

    /// Total fetch_page calls across all queries.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Variables of every request, in call order.
    pub fn seen_variables(&self) -> Vec<Value> {
        self.variables.lock().unwrap().clone()
    }
}

fn page_for(query: &Query, records: Value) -> Value {
    let mut data = serde_json::Map::new();
    data.insert(query.field.to_string(), records);
    Value::Object(data)
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn fetch_page(&self, query: &Query, variables: Value) -> Result<Value, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.variables.lock().unwrap().push(variables);

        let scripted = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(query.name)
            .and_then(|queue| queue.pop_front());

        scripted.unwrap_or_else(|| Ok(page_for(query, Value::Array(Vec::new()))))
    }
}
