//! Simulated presence indicator.
//!
//! A coarse online/offline badge on its own randomized timer, fully
//! decoupled from reply timing: a fixed delay after start the persona
//! "just went offline", stays away for a randomized duration, then comes
//! back. Purely cosmetic.

use rand::Rng;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Timing knobs for the presence cycle.
#[derive(Debug, Clone)]
pub struct PresenceConfig {
    /// Fixed delay after start before going offline.
    pub delay_until_offline: Duration,
    /// Lower bound of the randomized offline duration.
    pub offline_min: Duration,
    /// Upper bound of the randomized offline duration.
    pub offline_max: Duration,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            delay_until_offline: Duration::from_secs(45),
            offline_min: Duration::from_secs(60),
            offline_max: Duration::from_secs(180),
        }
    }
}

/// Drives the online/offline badge.
pub struct PresenceTracker {
    online_tx: watch::Sender<bool>,
    cancel: CancellationToken,
}

impl PresenceTracker {
    /// Starts the presence cycle. The badge begins online.
    pub fn start(config: PresenceConfig) -> Self {
        let (online_tx, _) = watch::channel(true);
        let cancel = CancellationToken::new();

        let tx = online_tx.clone();
        let token = cancel.clone();
        let offline_for = sample_offline_duration(&config);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(config.delay_until_offline) => {}
            }
            debug!("presence: went offline");
            let _ = tx.send(false);

            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(offline_for) => {}
            }
            debug!("presence: back online");
            let _ = tx.send(true);
        });

        Self { online_tx, cancel }
    }

    /// Subscribes to the online flag.
    pub fn online(&self) -> watch::Receiver<bool> {
        self.online_tx.subscribe()
    }

    /// Stops the cycle; the badge keeps its last value.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for PresenceTracker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn sample_offline_duration(config: &PresenceConfig) -> Duration {
    let lo = config.offline_min.min(config.offline_max);
    let hi = config.offline_min.max(config.offline_max);
    if lo == hi {
        return lo;
    }
    Duration::from_millis(rand::thread_rng().gen_range(lo.as_millis() as u64..=hi.as_millis() as u64))
}
