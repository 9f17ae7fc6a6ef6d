//! Acquisition tiers: one ranked place to fetch a metrics payload from.

use crate::payload::RawMetrics;
use futures::future::{BoxFuture, FutureExt};
use resonance_core::{ResonanceError, Result, TierKind};
use std::path::PathBuf;
use std::time::Duration;

/// One ranked data-acquisition attempt.
///
/// Implementations report every failure as
/// [`ResonanceError::SourceUnavailable`]; the caller falls through to the
/// next tier.
pub trait Tier: Send + Sync + std::fmt::Debug {
    /// Short name used in logs and in [`resonance_core::Acquired::tier`].
    fn name(&self) -> &str;

    fn kind(&self) -> TierKind;

    fn fetch(&self) -> BoxFuture<'_, Result<RawMetrics>>;
}

/// Where a tier reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Url(String),
    File(PathBuf),
}

impl Location {
    /// `http://` and `https://` locations are URLs; anything else is a path.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::File(PathBuf::from(raw))
        }
    }
}

/// Build the tier for `location`.
pub fn for_location(
    name: &str,
    location: Location,
    kind: TierKind,
    timeout: Duration,
) -> Result<Box<dyn Tier>> {
    Ok(match location {
        Location::Url(url) => Box::new(HttpTier::new(name, url, kind, timeout)?),
        Location::File(path) => Box::new(FileTier::new(name, path, timeout)),
    })
}

// ── HTTP ──────────────────────────────────────────────────────────────────────

/// Fetches the payload with a GET request; any non-2xx status is a failure.
#[derive(Debug)]
pub struct HttpTier {
    name:   String,
    url:    String,
    kind:   TierKind,
    client: reqwest::Client,
}

impl HttpTier {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        kind: TierKind,
        timeout: Duration,
    ) -> Result<Self> {
        let name = name.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ResonanceError::unavailable(&name, format!("client setup: {e}")))?;

        Ok(Self {
            name,
            url: url.into(),
            kind,
            client,
        })
    }

    async fn get(&self) -> Result<RawMetrics> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ResonanceError::unavailable(&self.name, format!("GET {}: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResonanceError::unavailable(
                &self.name,
                format!("GET {} returned {status}", self.url),
            ));
        }

        response
            .json::<RawMetrics>()
            .await
            .map_err(|e| ResonanceError::unavailable(&self.name, format!("decode: {e}")))
    }
}

impl Tier for HttpTier {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TierKind {
        self.kind
    }

    fn fetch(&self) -> BoxFuture<'_, Result<RawMetrics>> {
        self.get().boxed()
    }
}

// ── File ──────────────────────────────────────────────────────────────────────

/// Reads a static JSON snapshot from disk.  Always a [`TierKind::Static`] tier.
#[derive(Debug)]
pub struct FileTier {
    name:    String,
    path:    PathBuf,
    timeout: Duration,
}

impl FileTier {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            timeout,
        }
    }

    async fn read(&self) -> Result<RawMetrics> {
        let raw = tokio::time::timeout(self.timeout, tokio::fs::read_to_string(&self.path))
            .await
            .map_err(|_| ResonanceError::unavailable(&self.name, "read timed out"))?
            .map_err(|e| {
                ResonanceError::unavailable(&self.name, format!("read '{}': {e}", self.path.display()))
            })?;

        serde_json::from_str(&raw)
            .map_err(|e| ResonanceError::unavailable(&self.name, format!("decode: {e}")))
    }
}

impl Tier for FileTier {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TierKind {
        TierKind::Static
    }

    fn fetch(&self) -> BoxFuture<'_, Result<RawMetrics>> {
        self.read().boxed()
    }
}
