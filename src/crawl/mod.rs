//! Crawl engine: sitemap parsing, fetching, tree traversal, and the worker pool.

pub mod dispatcher;
pub mod fetcher;
pub mod identity;
pub mod sitemap;
pub mod walker;
