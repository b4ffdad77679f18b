//! HTTP plumbing shared by the offline cache and product lookup.
//!
//! This module provides:
//! - `Request` / `Response`: owned request identity and response snapshot
//! - `Fetcher`: the network seam the cache manager fetches through
//! - `HttpFetcher`: the reqwest-backed production fetcher
//!
//! A `Response` owns its body, so cloning it yields an independent copy that
//! can be stored while the original is handed back to the caller.

pub mod error;
pub mod fetcher;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use error::FetchError;
pub use fetcher::{Fetcher, HttpFetcher};
pub use reqwest::{Method, Url};
pub use types::{Request, Response};
