//! Depth-first sitemap tree traversal.
//!
//! A walk starts at one root sitemap URL and flattens the whole tree into
//! a single ordered list of page URLs. Node failures never propagate: a
//! subtree that cannot be fetched contributes nothing and the walk carries
//! on with its siblings.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::warn;

use super::fetcher::FetchSitemap;

/// Flattened outcome of one root traversal.
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// The root sitemap URL the walk started from.
    pub root_url: String,
    /// Every page URL under the root, depth-first in document order.
    /// Duplicates stay as listed.
    pub page_urls: Vec<String>,
    /// Sitemap nodes that failed to fetch or parse and were skipped.
    pub failed_nodes: u32,
}

impl CrawlResult {
    pub fn empty(root_url: &str) -> Self {
        Self {
            root_url: root_url.to_string(),
            page_urls: Vec::new(),
            failed_nodes: 0,
        }
    }
}

/// Walks one sitemap tree at a time through the injected fetcher.
pub struct SitemapWalker {
    fetcher: Arc<dyn FetchSitemap>,
}

/// Accumulator for a single walk. The visited set spans the whole walk,
/// so cyclic and diamond-shaped references fetch each sitemap once.
struct WalkState {
    visited: HashSet<String>,
    pages: Vec<String>,
    failed_nodes: u32,
}

impl SitemapWalker {
    pub fn new(fetcher: Arc<dyn FetchSitemap>) -> Self {
        Self { fetcher }
    }

    /// Traverse the tree under `root_url`.
    ///
    /// Never fails: fetch and parse errors are logged with the offending
    /// URL and absorbed as empty subtrees.
    pub async fn walk(&self, root_url: &str) -> CrawlResult {
        let mut state = WalkState {
            visited: HashSet::new(),
            pages: Vec::new(),
            failed_nodes: 0,
        };
        self.visit(root_url.to_string(), &mut state).await;
        CrawlResult {
            root_url: root_url.to_string(),
            page_urls: state.pages,
            failed_nodes: state.failed_nodes,
        }
    }

    /// Visit one node: collect its pages, then descend into each child in
    /// document order. Boxed because the future recurses into itself.
    fn visit<'a>(&'a self, url: String, state: &'a mut WalkState) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            if !state.visited.insert(url.clone()) {
                warn!("sitemap {url} already visited in this walk, skipping");
                return;
            }
            match self.fetcher.fetch(&url).await {
                Ok(node) => {
                    state.pages.extend(node.page_urls);
                    for child in node.child_sitemaps {
                        self.visit(child, state).await;
                    }
                }
                Err(e) => {
                    warn!("failed to fetch {url}: {e}");
                    state.failed_nodes += 1;
                }
            }
        })
    }
}
