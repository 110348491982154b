use crate::config::ProxyEndpoint;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Ordered pool of outbound proxies. Immutable after load; assignment is a
/// pure modulo lookup so a wallet keeps the same proxy for the process
/// lifetime.
pub struct ProxyPool {
    endpoints: Vec<ProxyEndpoint>,
}

impl ProxyPool {
    /// Loads proxies from `path`, one URI per line
    /// (`http://`, `socks4://` or `socks5://`).
    /// A missing file degrades to an empty pool (direct connections).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("{} not found. Running without proxy support.", path.display());
            return Ok(Self {
                endpoints: Vec::new(),
            });
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let pool = Self::from_lines(content.lines());

        info!("Loaded {} proxies from {}", pool.len(), path.display());
        Ok(pool)
    }

    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let endpoints = lines
            .into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(ProxyEndpoint::parse)
            .collect();

        Self { endpoints }
    }

    /// Wallet `index` always maps to `endpoints[index % len]`;
    /// `None` when the pool is empty.
    pub fn assign(&self, index: usize) -> Option<&ProxyEndpoint> {
        if self.endpoints.is_empty() {
            None
        } else {
            Some(&self.endpoints[index % self.endpoints.len()])
        }
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
