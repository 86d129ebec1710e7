// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cancellable quiet-period timer.
//!
//! Each `schedule` replaces the pending value and restarts the delay. When the
//! delay elapses the value is posted to the owner's command channel, tagged
//! with a generation. The owner passes it back through [`Debouncer::accept`],
//! which rejects anything superseded after it was posted.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Value whose quiet period elapsed.
#[derive(Debug)]
pub struct Debounced<T> {
    generation: u64,
    value: T,
}

pub struct Debouncer<T, M> {
    commands: mpsc::UnboundedSender<M>,
    wrap: fn(Debounced<T>) -> M,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl<T, M> Debouncer<T, M>
where
    T: Send + 'static,
    M: Send + 'static,
{
    /// `wrap` turns an elapsed value into a message for `commands`.
    pub fn new(commands: mpsc::UnboundedSender<M>, wrap: fn(Debounced<T>) -> M) -> Self {
        Self {
            commands,
            wrap,
            generation: 0,
            pending: None,
        }
    }

    /// Post `value` after `delay` unless another schedule or a cancel comes first.
    pub fn schedule(&mut self, value: T, delay: Duration) {
        self.cancel();

        let generation = self.generation;
        let commands = self.commands.clone();
        let wrap = self.wrap;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = commands.send(wrap(Debounced { generation, value }));
        }));
    }

    /// Drop the pending value, including one already posted but not accepted.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        self.generation += 1;
    }

    /// Unwrap a posted value if it is still the latest scheduled one.
    pub fn accept(&mut self, fired: Debounced<T>) -> Option<T> {
        if fired.generation != self.generation || self.pending.is_none() {
            return None;
        }
        self.pending = None;
        self.generation += 1;
        Some(fired.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T, M> Drop for Debouncer<T, M> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(1000);

    fn debouncer() -> (
        Debouncer<&'static str, Debounced<&'static str>>,
        mpsc::UnboundedReceiver<Debounced<&'static str>>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Debouncer::new(tx, |fired| fired), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_value_of_burst_is_posted() {
        let (mut debouncer, mut rx) = debouncer();
        let start = tokio::time::Instant::now();

        for text in ["b", "ba", "bat", "batm", "batma", "batman"] {
            debouncer.schedule(text, QUIET);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        let fired = rx.recv().await.unwrap();
        assert_eq!(debouncer.accept(fired), Some("batman"));
        // Measured from the last keystroke at 250ms.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1250), "fired early: {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(1300), "fired late: {:?}", elapsed);
        assert!(rx.try_recv().is_err());
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_value_posted_before_reschedule_is_rejected() {
        let (mut debouncer, mut rx) = debouncer();

        debouncer.schedule("old", QUIET);
        tokio::time::sleep(QUIET + Duration::from_millis(1)).await;
        // "old" is sitting in the channel; a new keystroke arrives first.
        debouncer.schedule("new", QUIET);

        let stale = rx.recv().await.unwrap();
        assert_eq!(debouncer.accept(stale), None);

        let fresh = rx.recv().await.unwrap();
        assert_eq!(debouncer.accept(fresh), Some("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop_stop_pending_value() {
        let (mut debouncer, mut rx) = debouncer();

        debouncer.schedule("cancelled", QUIET);
        debouncer.cancel();
        tokio::time::sleep(QUIET * 2).await;
        assert!(rx.try_recv().is_err());

        debouncer.schedule("dropped", QUIET);
        drop(debouncer);
        tokio::time::sleep(QUIET * 2).await;
        assert!(rx.try_recv().is_err());
    }
}
