// src/infra/sweeper.rs - Periodic session expiry

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::core::session::SessionStore;
use crate::infra::clock::Clock;

/// Run one expiry pass. Returns how many sessions were removed.
pub fn sweep_once(store: &SessionStore, clock: &dyn Clock, retention: chrono::Duration) -> usize {
    let removed = store.sweep_expired(clock.now(), retention);
    if removed > 0 {
        tracing::info!(
            removed,
            remaining = store.len(),
            "Expired sessions swept"
        );
    } else {
        tracing::debug!(remaining = store.len(), "Session sweep: nothing expired");
    }
    removed
}

/// Sweep expired sessions every `every` until `shutdown` resolves.
pub async fn run_sweeper(
    store: Arc<SessionStore>,
    clock: Arc<dyn Clock>,
    retention: chrono::Duration,
    every: Duration,
    shutdown: impl Future<Output = ()>,
) {
    let mut interval = tokio::time::interval(every);
    // The first tick completes immediately; skip it.
    interval.tick().await;

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::debug!("Session sweeper stopped");
                break;
            }
            _ = interval.tick() => {
                sweep_once(&store, clock.as_ref(), retention);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::clock::FixedClock;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_sweep_once_removes_expired() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let store = SessionStore::with_clock(Arc::new(FixedClock(created)));
        store.get_or_create(Some("a"));
        store.get_or_create(Some("b"));

        let later = FixedClock(created + chrono::Duration::minutes(90));
        assert_eq!(sweep_once(&store, &later, chrono::Duration::hours(1)), 2);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_run_sweeper_sweeps_and_stops() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let store = Arc::new(SessionStore::with_clock(Arc::new(FixedClock(created))));
        store.get_or_create(Some("stale"));

        let clock: Arc<dyn Clock> = Arc::new(FixedClock(created + chrono::Duration::hours(2)));
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let task = tokio::spawn(run_sweeper(
            store.clone(),
            clock,
            chrono::Duration::hours(1),
            Duration::from_millis(10),
            async move {
                let _ = rx.await;
            },
        ));

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(store.is_empty());

        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("sweeper did not stop")
            .unwrap();
    }
}
