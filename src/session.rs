use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::extractor::Extractor;
use crate::record::ResultSet;

/// One completed refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub url: String,
    pub records: ResultSet,
    pub fetched_at: DateTime<Local>,
    pub skipped: usize,
}

/// What the presentation layer should draw.
#[derive(Debug, PartialEq)]
pub enum View<'a> {
    Ready(&'a Snapshot),
    NoData { error: Option<&'a str> },
}

/// Where a refresh got its data from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSource {
    Network,
    Cache,
    Failed,
}

/// Per-session state: the current snapshot, the last error and a short-lived
/// memo of successful fetches keyed by URL.
#[derive(Debug)]
pub struct Session {
    current: Option<Snapshot>,
    last_error: Option<String>,
    memo: HashMap<String, (Instant, Snapshot)>,
    ttl: Duration,
}

impl Session {
    pub fn new(ttl: Duration) -> Self {
        Session {
            current: None,
            last_error: None,
            memo: HashMap::new(),
            ttl,
        }
    }

    /// Replace the current snapshot wholesale. On transport failure the
    /// snapshot becomes empty and the error is kept for display.
    pub async fn refresh(&mut self, extractor: &Extractor, url: &str) -> RefreshSource {
        self.evict_expired();
        if let Some((at, snap)) = self.memo.get(url) {
            if at.elapsed() < self.ttl {
                info!("Using cached snapshot for {}", url);
                self.current = Some(snap.clone());
                self.last_error = None;
                return RefreshSource::Cache;
            }
        }

        match extractor.extract(url).await {
            Ok(report) => {
                let snap = Snapshot {
                    url: url.to_string(),
                    records: report.records,
                    fetched_at: Local::now(),
                    skipped: report.skipped,
                };
                self.memo.insert(url.to_string(), (Instant::now(), snap.clone()));
                self.current = Some(snap);
                self.last_error = None;
                RefreshSource::Network
            }
            Err(e) => {
                warn!("Refresh failed: {}", e);
                self.current = Some(Snapshot {
                    url: url.to_string(),
                    records: ResultSet::new(),
                    fetched_at: Local::now(),
                    skipped: 0,
                });
                self.last_error = Some(format!("Error scraping data: {}", e));
                RefreshSource::Failed
            }
        }
    }

    pub fn view(&self) -> View<'_> {
        match &self.current {
            Some(snap) if !snap.records.is_empty() => View::Ready(snap),
            _ => View::NoData {
                error: self.last_error.as_deref(),
            },
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.current.as_ref().map(|s| s.fetched_at)
    }

    pub fn clear_cache(&mut self) {
        self.memo.clear();
    }

    /// Number of memoized URLs.
    pub fn cached_urls(&self) -> usize {
        self.memo.len()
    }

    fn evict_expired(&mut self) {
        let ttl = self.ttl;
        self.memo.retain(|_, (at, _)| at.elapsed() < ttl);
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(Duration::from_secs(crate::config::DEFAULT_CACHE_TTL_SECS))
    }
}
