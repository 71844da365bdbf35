//! Concurrent sitemap harvester.
//!
//! Walks one or more sitemap trees (indexes pointing at nested sitemaps,
//! terminating in page lists), tolerates transient fetch failures, and
//! exports every collected page URL to a timestamped CSV artifact.

pub mod artifact;
pub mod cli;
pub mod config;
pub mod crawl;
pub mod notify;
