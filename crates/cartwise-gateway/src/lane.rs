//! Single-file admission lane.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Admits callers one at a time, in arrival order, enforcing a quiet period
/// after each admission.
///
/// The lock is only held while waiting for the quiet period to end, never for
/// the backend round trip: the next caller may be admitted while the previous
/// call is still in flight, as long as the gap has elapsed.
#[derive(Debug, Default)]
pub(crate) struct Lane {
    next_free: Mutex<Option<Instant>>,
}

impl Lane {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Waits for the lane, then reserves `gap` of quiet time after this
    /// admission. Returns how long the caller waited.
    pub(crate) async fn admit(&self, gap: Duration) -> Duration {
        let arrived = Instant::now();
        // tokio's Mutex queues waiters fairly, which gives FIFO admission.
        let mut next_free = self.next_free.lock().await;
        if let Some(at) = *next_free {
            tokio::time::sleep_until(at).await;
        }
        let admitted = Instant::now();
        *next_free = Some(admitted + gap);
        admitted - arrived
    }
}
