// SPDX-License-Identifier: MPL-2.0
//! Periodic reachability check of a side's local source.
//!
//! The probe only reports. Recovery happens in the owner, which feeds each
//! [`ProbeReport`] to [`PlayerAdapter::apply_probe`](super::PlayerAdapter::apply_probe).

use crate::domain::video::Side;
use crate::infrastructure::player::blob::{resolve_local, SharedBlobRegistry};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Reachability of a side's source at one probe tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub side: Side,
    /// URL that was probed; reports for a replaced source are stale.
    pub url: String,
    pub reachable: bool,
}

/// Background task probing one local source.
///
/// Reports are sent only when reachability changes, starting from the
/// assumption that the freshly loaded source is reachable.
#[derive(Debug)]
pub struct SourceProbe {
    side: Side,
    url: String,
    handle: JoinHandle<()>,
}

impl SourceProbe {
    /// Spawns the probe on the current tokio runtime.
    #[must_use]
    pub fn spawn(
        side: Side,
        url: String,
        registry: SharedBlobRegistry,
        every: Duration,
        tx: UnboundedSender<ProbeReport>,
    ) -> Self {
        let probed_url = url.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut last = true;
            loop {
                ticker.tick().await;
                let reachable = match resolve_local(&registry, &probed_url) {
                    Some(path) => tokio::fs::metadata(&path)
                        .await
                        .map(|meta| meta.is_file())
                        .unwrap_or(false),
                    None => false,
                };
                if reachable == last {
                    continue;
                }
                last = reachable;
                tracing::debug!(%side, reachable, "source reachability changed");
                let report = ProbeReport {
                    side,
                    url: probed_url.clone(),
                    reachable,
                };
                if tx.send(report).is_err() {
                    break;
                }
            }
        });
        Self { side, url, handle }
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for SourceProbe {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::player::shared_registry;
    use tokio::sync::mpsc::unbounded_channel;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn reports_when_source_is_revoked() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let file = dir.path().join("lap.mp4");
        std::fs::write(&file, b"x").unwrap();
        let registry = shared_registry();
        let url = registry.lock().unwrap().create_object_url(&file);
        let (tx, mut rx) = unbounded_channel();

        let _probe = SourceProbe::spawn(
            Side::Left,
            url.clone(),
            registry.clone(),
            Duration::from_secs(5),
            tx,
        );

        sleep(Duration::from_secs(6)).await;
        assert!(rx.try_recv().is_err(), "reachable source is not reported");

        registry.lock().unwrap().revoke(&url);
        sleep(Duration::from_secs(5)).await;
        let report = rx.recv().await.expect("report");
        assert_eq!(report.side, Side::Left);
        assert_eq!(report.url, url);
        assert!(!report.reachable);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_probe_stops_reports() {
        let registry = shared_registry();
        let (tx, mut rx) = unbounded_channel();
        let probe = SourceProbe::spawn(
            Side::Right,
            "blob:race-ana/404".to_string(),
            registry,
            Duration::from_secs(1),
            tx,
        );
        drop(probe);

        sleep(Duration::from_secs(3)).await;
        assert!(rx.recv().await.is_none());
    }
}
