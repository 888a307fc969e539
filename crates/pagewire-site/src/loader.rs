//! The site's module loader.
//!
//! Stands in for fetching a page's code over the network: every load waits
//! out a configurable latency and then hands back the page implementation.

use std::time::Duration;

use async_trait::async_trait;

use pagewire_core::Settings;
use pagewire_router::{LoadError, SharedView, ViewId, ViewLoader};

use crate::views::view_for;

/// Loads site pages after a simulated network latency.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiteLoader {
    latency: Duration,
}

impl SiteLoader {
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub const fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.load_latency())
    }

    pub const fn latency(&self) -> Duration {
        self.latency
    }
}

#[async_trait]
impl ViewLoader for SiteLoader {
    async fn load(&self, view_id: &ViewId) -> Result<SharedView, LoadError> {
        tracing::debug!(view_id = %view_id, latency_ms = self.latency.as_millis(), "fetching page module");
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        view_for(view_id.as_str()).ok_or_else(|| LoadError::UnknownView(view_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_load_waits_out_latency() {
        let loader = SiteLoader::new(Duration::from_millis(250));
        let start = tokio::time::Instant::now();
        assert!(loader.load(&ViewId::from("about")).await.is_ok());
        assert!(start.elapsed() >= Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_unknown_view() {
        let err = SiteLoader::default()
            .load(&ViewId::from("pricing"))
            .await
            .err()
            .unwrap();
        assert_eq!(err, LoadError::UnknownView("pricing".into()));
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            load_latency_ms: 75,
            ..Settings::default()
        };
        assert_eq!(SiteLoader::from_settings(&settings).latency(), Duration::from_millis(75));
    }
}
