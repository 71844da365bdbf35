//! Client identity rotation.
//!
//! Every fetch attempt goes out with a freshly picked browser User-Agent,
//! so retries of the same URL do not present an identical client.

use rand::seq::SliceRandom;

/// Source of `User-Agent` values for outgoing requests.
///
/// Implementations are stateless and cheap; the fetcher calls [`pick`]
/// once per attempt. Tests pin a single known value.
///
/// [`pick`]: UserAgentSource::pick
pub trait UserAgentSource: Send + Sync {
    fn pick(&self) -> String;
}

/// Picks randomly from a pool of current desktop browser identities.
pub struct UserAgentPool {
    agents: Vec<String>,
}

const BUILTIN_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:131.0) Gecko/20100101 Firefox/131.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:131.0) Gecko/20100101 Firefox/131.0",
    "Mozilla/5.0 (X11; Linux x86_64; rv:130.0) Gecko/20100101 Firefox/130.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.6 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36 Edg/130.0.0.0",
];

impl UserAgentPool {
    /// Pool with a custom agent list. An empty list falls back to the
    /// builtin identities at pick time.
    pub fn new(agents: Vec<String>) -> Self {
        Self { agents }
    }

    /// Pool of builtin desktop browser identities.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_AGENTS.iter().map(|a| a.to_string()).collect())
    }
}

impl UserAgentSource for UserAgentPool {
    fn pick(&self) -> String {
        let mut rng = rand::thread_rng();
        self.agents
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| BUILTIN_AGENTS[0].to_string())
    }
}
