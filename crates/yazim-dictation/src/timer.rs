//! The single inactivity timer of a dictation session.
//!
//! Arming always aborts the previous instance first, so at most one timer
//! task is ever pending. Each arm bumps a generation counter that travels
//! with the expiry signal; an expiry whose generation is not the latest is
//! stale and must be ignored by the receiver.

use std::time::Duration;

use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::recognizer::{DictationSignal, SignalSender};

#[derive(Debug, Default)]
pub struct InactivityTimer {
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl InactivityTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any pending instance and start a new one. Returns its generation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self, session_id: Uuid, timeout: Duration, signals: SignalSender) -> u64 {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;

        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let _ = signals.send(DictationSignal::InactivityTimeout {
                session_id,
                generation,
            });
        }));
        tracing::debug!(%session_id, generation, timeout_ms = timeout.as_millis() as u64, "Inactivity timer armed");
        generation
    }

    /// Abort the pending instance. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Whether an instance is armed and has not yet fired.
    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether an expiry tagged `generation` comes from the live instance.
    pub fn is_current(&self, generation: u64) -> bool {
        self.handle.is_some() && generation == self.generation
    }
}

impl Drop for InactivityTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_timeout() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = InactivityTimer::new();
        let id = Uuid::new_v4();
        let generation = timer.arm(id, Duration::from_secs(5), tx);

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(
            rx.try_recv().unwrap(),
            DictationSignal::InactivityTimeout {
                session_id: id,
                generation
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_leaves_exactly_one_pending_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = InactivityTimer::new();
        let id = Uuid::new_v4();
        timer.arm(id, Duration::from_secs(5), tx.clone());

        tokio::time::sleep(Duration::from_secs(3)).await;
        let second = timer.arm(id, Duration::from_secs(5), tx);
        assert_eq!(second, 2);

        // The first instance would have fired at t=5.
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(
            rx.try_recv().unwrap(),
            DictationSignal::InactivityTimeout {
                session_id: id,
                generation: 2
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_expiry() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = InactivityTimer::new();
        timer.arm(Uuid::new_v4(), Duration::from_secs(1), tx);
        assert!(timer.cancel());
        assert!(!timer.cancel());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
        assert!(!timer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_is_current_tracks_latest_generation() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut timer = InactivityTimer::new();
        let id = Uuid::new_v4();
        let first = timer.arm(id, Duration::from_secs(5), tx.clone());
        let second = timer.arm(id, Duration::from_secs(5), tx);

        assert!(!timer.is_current(first));
        assert!(timer.is_current(second));
        timer.cancel();
        assert!(!timer.is_current(second));
    }
}
