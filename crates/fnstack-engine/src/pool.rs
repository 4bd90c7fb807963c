//! Bounded worker pool with cooperative cancellation.
//!
//! Items are claimed in order from a shared cursor. Once the cancel flag is
//! raised, workers stop starting new items and record them through the
//! cancellation callback instead, so every item still yields one result.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;

/// Shared interrupt signal, typically raised from a Ctrl+C handler.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a flag in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Items already running are not interrupted.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs `work` over `items` on at most `workers` threads and returns the
/// results in item order.
///
/// With a single worker everything runs inline on the calling thread.
pub fn run_bounded<T, R, W, C>(
    items: &[T],
    workers: usize,
    cancel: &CancelFlag,
    work: W,
    cancelled: C,
) -> Vec<R>
where
    T: Sync,
    R: Send,
    W: Fn(&T) -> R + Sync,
    C: Fn(&T) -> R + Sync,
{
    let workers = workers.clamp(1, items.len().max(1));
    let run_one = |item: &T| {
        if cancel.is_cancelled() {
            cancelled(item)
        } else {
            work(item)
        }
    };

    if workers == 1 {
        return items.iter().map(run_one).collect();
    }

    tracing::debug!(workers, items = items.len(), "starting worker pool");
    let cursor = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel();

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let cursor = &cursor;
            let run_one = &run_one;
            let _ = scope.spawn(move || {
                loop {
                    let index = cursor.fetch_add(1, Ordering::SeqCst);
                    let Some(item) = items.get(index) else {
                        break;
                    };
                    if tx.send((index, run_one(item))).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(tx);

    let mut results: Vec<(usize, R)> = rx.into_iter().collect();
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, result)| result).collect()
}
