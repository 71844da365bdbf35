//! `siteharvest run` — walk sitemap roots and export every page URL.

use crate::artifact::{csv_sink, viewer};
use crate::cli::output::{self, Styled};
use crate::config::HarvestConfig;
use crate::crawl::dispatcher::{AggregateResult, Dispatcher};
use crate::crawl::fetcher::SitemapFetcher;
use crate::crawl::identity::UserAgentPool;
use crate::crawl::walker::SitemapWalker;
use crate::notify::heartbeat::Heartbeat;
use crate::notify::voice;
use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Arguments for `siteharvest run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Root sitemap URLs. Given here, they replace the configured list.
    pub roots: Vec<String>,

    /// Config file to load instead of ~/.siteharvest/config.json.
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    /// Concurrent root walks.
    #[arg(long)]
    pub workers: Option<usize>,

    /// Total fetch attempts per sitemap URL, first try included.
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Delay between fetch attempts in milliseconds.
    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Heartbeat cadence in seconds; 0 disables it.
    #[arg(long)]
    pub heartbeat_secs: Option<u64>,

    /// Directory for the CSV artifact.
    #[arg(long)]
    pub out_dir: Option<std::path::PathBuf>,

    /// Skip opening the artifact when done.
    #[arg(long)]
    pub no_open: bool,

    /// No heartbeat, no spoken cues.
    #[arg(long)]
    pub silent: bool,
}

/// Layer CLI flags over the loaded config file.
fn effective_config(args: &RunArgs) -> Result<HarvestConfig> {
    let mut cfg = match &args.config {
        Some(path) => HarvestConfig::load(path)?,
        None => HarvestConfig::load_default()?,
    };
    apply_overrides(&mut cfg, args);
    Ok(cfg)
}

/// Only flags the operator actually passed override the file.
fn apply_overrides(cfg: &mut HarvestConfig, args: &RunArgs) {
    if !args.roots.is_empty() {
        cfg.roots = args.roots.clone();
    }
    if let Some(workers) = args.workers {
        cfg.workers = workers;
    }
    if let Some(attempts) = args.attempts {
        cfg.attempts = attempts;
    }
    if let Some(delay) = args.retry_delay_ms {
        cfg.retry_delay_ms = delay;
    }
    if let Some(timeout) = args.timeout_secs {
        cfg.timeout_secs = timeout;
    }
    if let Some(heartbeat) = args.heartbeat_secs {
        cfg.heartbeat_secs = heartbeat;
    }
    if let Some(out_dir) = &args.out_dir {
        cfg.out_dir = out_dir.clone();
    }
    if args.no_open {
        cfg.open_artifact = false;
    }
    if args.silent {
        cfg.silent = true;
    }
}

/// Run the harvest command.
pub async fn run(args: RunArgs) -> Result<()> {
    let s = Styled::new();
    let started = Instant::now();
    let cfg = effective_config(&args)?;

    if !output::is_quiet() && !output::is_json() {
        eprintln!(
            "  {} {}",
            s.bold("Siteharvest"),
            s.dim(&format!("v{}", env!("CARGO_PKG_VERSION")))
        );
        eprintln!();
        eprintln!(
            "  Harvesting {} sitemap root(s) with {} workers",
            cfg.roots.len(),
            cfg.workers
        );
    }
    info!(
        "harvest starting: {} roots, {} workers",
        cfg.roots.len(),
        cfg.workers
    );

    let fetcher = SitemapFetcher::new(
        Arc::new(UserAgentPool::builtin()),
        cfg.attempts,
        Duration::from_millis(cfg.retry_delay_ms),
        Duration::from_secs(cfg.timeout_secs),
    )?;
    let walker = Arc::new(SitemapWalker::new(Arc::new(fetcher)));
    let dispatcher = Dispatcher::new(walker, cfg.workers);

    let heartbeat = if !cfg.silent && cfg.heartbeat_secs > 0 {
        Some(Heartbeat::start(
            Duration::from_secs(cfg.heartbeat_secs),
            || {
                // Speech can outlast an interval; keep it off the ticker.
                tokio::spawn(async {
                    voice::announce("harvest still running").await;
                });
            },
        ))
    } else {
        None
    };

    let bar = progress_bar(cfg.roots.len());
    let verbose = output::is_verbose();
    let aggregate = dispatcher
        .run(&cfg.roots, |result| {
            if verbose {
                let sym = if result.failed_nodes > 0 {
                    s.warn_sym()
                } else {
                    s.ok_sym()
                };
                bar.println(format!(
                    "  {sym} {}: {} urls, {} failed nodes",
                    result.root_url,
                    result.page_urls.len(),
                    result.failed_nodes
                ));
            }
            bar.inc(1);
        })
        .await;
    bar.finish_and_clear();

    if let Some(heartbeat) = heartbeat {
        heartbeat.stop().await;
    }

    info!(
        "harvest finished: {} urls from {} roots in {:.1}s",
        aggregate.total_urls(),
        cfg.roots.len(),
        started.elapsed().as_secs_f64()
    );

    if aggregate.page_urls.is_empty() {
        // Nothing to save; an empty harvest produces no artifact file.
        if output::is_json() {
            print_summary_json(&aggregate, None, started.elapsed());
        } else if !output::is_quiet() {
            eprintln!();
            eprintln!(
                "  {} No URLs extracted. Check your sitemap URLs and network connection.",
                s.warn_sym()
            );
        }
        return Ok(());
    }

    let domain = domain_hint(&aggregate.page_urls);
    let artifact = match csv_sink::save_urls(&aggregate.page_urls, &domain, &cfg.out_dir) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!("failed to save artifact: {e:#}");
            if !output::is_quiet() && !output::is_json() {
                eprintln!("  {} Could not write the CSV artifact: {e:#}", s.fail_sym());
            }
            None
        }
    };

    if output::is_json() {
        print_summary_json(&aggregate, artifact.as_deref(), started.elapsed());
    } else if !output::is_quiet() {
        print_summary(&s, &aggregate, artifact.as_deref(), started.elapsed());
    }

    if let Some(path) = &artifact {
        if cfg.open_artifact {
            if let Err(e) = viewer::open_default(path) {
                warn!("could not open artifact: {e:#}");
            }
        }
    }

    if !cfg.silent {
        voice::announce("harvest complete").await;
    }

    Ok(())
}

/// Bounded bar over the root list; hidden in quiet and json modes.
fn progress_bar(roots: usize) -> ProgressBar {
    if output::is_quiet() || output::is_json() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(roots as u64);
    bar.set_style(
        ProgressStyle::with_template("  {bar:24.cyan/blue} {pos}/{len} roots")
            .unwrap()
            .progress_chars("\u{2588}\u{2588}\u{2591}"),
    );
    bar
}

/// Host of the first collected URL.
///
/// Arbitrary when the roots span several domains; the first URL wins. Falls
/// back to a naive scheme strip, then a fixed label, so an odd first URL
/// cannot fail the save step.
fn domain_hint(urls: &[String]) -> String {
    let Some(first) = urls.first() else {
        return "sitemap".to_string();
    };
    if let Ok(parsed) = url::Url::parse(first) {
        if let Some(host) = parsed.host_str() {
            return host.to_string();
        }
    }
    let rest = first
        .strip_prefix("https://")
        .or_else(|| first.strip_prefix("http://"))
        .unwrap_or(first);
    let host = rest.split('/').next().unwrap_or("").trim();
    if host.is_empty() {
        "sitemap".to_string()
    } else {
        host.to_string()
    }
}

/// Print the harvest summary in branded format.
fn print_summary(
    s: &Styled,
    aggregate: &AggregateResult,
    artifact: Option<&Path>,
    elapsed: Duration,
) {
    eprintln!();
    eprintln!("  Harvest complete in {:.1}s", elapsed.as_secs_f64());
    eprintln!();
    eprintln!(
        "  {}",
        s.bold(&format!("Total URLs: {}", aggregate.total_urls()))
    );
    for root in &aggregate.roots {
        let sym = if root.aborted {
            s.fail_sym()
        } else if root.failed_nodes > 0 {
            s.warn_sym()
        } else {
            s.ok_sym()
        };
        let mut line = format!("    {sym} {:<50} {:>7}", root.root_url, root.url_count);
        if root.failed_nodes > 0 {
            line.push_str(&format!("  ({} nodes failed)", root.failed_nodes));
        }
        if root.aborted {
            line.push_str("  (walk aborted)");
        }
        eprintln!("{line}");
    }
    eprintln!();
    match artifact {
        Some(path) => eprintln!(
            "  {} Saved to {}",
            s.ok_sym(),
            s.cyan(&path.display().to_string())
        ),
        None => eprintln!("  {} CSV not written; see warning above.", s.fail_sym()),
    }
}

/// Print the harvest summary as JSON.
fn print_summary_json(aggregate: &AggregateResult, artifact: Option<&Path>, elapsed: Duration) {
    output::print_json(&serde_json::json!({
        "total_urls": aggregate.total_urls(),
        "failed_nodes": aggregate.failed_nodes(),
        "roots": aggregate
            .roots
            .iter()
            .map(|r| {
                serde_json::json!({
                    "root_url": r.root_url,
                    "url_count": r.url_count,
                    "failed_nodes": r.failed_nodes,
                    "aborted": r.aborted,
                })
            })
            .collect::<Vec<_>>(),
        "artifact": artifact.map(|p| p.display().to_string()),
        "duration_ms": elapsed.as_millis(),
    }));
}
