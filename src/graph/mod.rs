//! Queryable source boundary: HTTP client, query documents, and the
//! retrying pagination engine.

pub mod client;
pub mod pager;
pub mod queries;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{PageSource, SubgraphClient};
pub use pager::{PageCursor, Pager, RetryPolicy};
pub use queries::Query;
