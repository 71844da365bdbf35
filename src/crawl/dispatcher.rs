//! Fixed-size worker pool over root sitemap walks.
//!
//! Every root gets its own walk task; a semaphore caps how many run at
//! once. Results merge in submission order no matter which walks finish
//! first, so output is reproducible for a fixed input list.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::warn;

use super::walker::{CrawlResult, SitemapWalker};

/// Merged outcome of every root walk.
#[derive(Debug, Clone)]
pub struct AggregateResult {
    /// All page URLs, one segment per root, segments in submission order.
    pub page_urls: Vec<String>,
    /// Per-root reporting, same order as the submitted roots.
    pub roots: Vec<RootSummary>,
}

/// What one root contributed.
#[derive(Debug, Clone)]
pub struct RootSummary {
    pub root_url: String,
    pub url_count: usize,
    pub failed_nodes: u32,
    /// The walk task itself died (panic). Counted as zero URLs.
    pub aborted: bool,
}

impl AggregateResult {
    pub fn total_urls(&self) -> usize {
        self.page_urls.len()
    }

    /// Failed sitemap nodes across every root.
    pub fn failed_nodes(&self) -> u32 {
        self.roots.iter().map(|r| r.failed_nodes).sum()
    }
}

/// Runs one walk per root with bounded concurrency.
pub struct Dispatcher {
    walker: Arc<SitemapWalker>,
    worker_count: usize,
}

impl Dispatcher {
    pub fn new(walker: Arc<SitemapWalker>, worker_count: usize) -> Self {
        Self {
            walker,
            worker_count: worker_count.max(1),
        }
    }

    /// Walk every root and merge the results in submission order.
    ///
    /// `on_root_done` fires once per root at merge time (submission order
    /// again), which is what drives the progress display. A walk task that
    /// dies is logged once and contributes nothing; its siblings finish
    /// normally. Blocks until every root is accounted for.
    pub async fn run<F>(&self, roots: &[String], mut on_root_done: F) -> AggregateResult
    where
        F: FnMut(&CrawlResult),
    {
        let semaphore = Arc::new(Semaphore::new(self.worker_count));

        // Spawn everything up front; the semaphore holds surplus walks back.
        let handles: Vec<_> = roots
            .iter()
            .map(|root| {
                let walker = Arc::clone(&self.walker);
                let semaphore = Arc::clone(&semaphore);
                let root = root.clone();
                tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await.unwrap();
                    walker.walk(&root).await
                })
            })
            .collect();

        let mut aggregate = AggregateResult {
            page_urls: Vec::new(),
            roots: Vec::new(),
        };
        for (root, handle) in roots.iter().zip(handles) {
            let (result, aborted) = match handle.await {
                Ok(result) => (result, false),
                Err(e) => {
                    warn!("walk task for {root} died: {e}");
                    (CrawlResult::empty(root), true)
                }
            };
            on_root_done(&result);
            aggregate.roots.push(RootSummary {
                root_url: result.root_url.clone(),
                url_count: result.page_urls.len(),
                failed_nodes: result.failed_nodes,
                aborted,
            });
            aggregate.page_urls.extend(result.page_urls);
        }
        aggregate
    }
}
