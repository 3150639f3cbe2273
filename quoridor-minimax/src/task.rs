use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc, Arc,
    },
    thread,
    time::{Duration, Instant},
};

use quoridor_game_types::GameState;
use tracing::{debug, info_span, warn};

use crate::{
    score::Scorable,
    search::{AbortedEarly, QuoridorSearch, SearchOutcome},
};

/// How often a sleeping task checks whether it was cancelled
const CANCELLATION_POLL: Duration = Duration::from_millis(5);

/// A shared flag that tells a running search to stop
///
/// Clones share the flag, cancelling any of them cancels them all
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// A token that hasn't been cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every search holding this token to stop
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether [CancellationToken::cancel] has been called
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A search running on its own worker thread
///
/// The worker waits out a 'thinking' delay, runs the search and sends the result back over a
/// channel. Dropping the task cancels it.
#[derive(Debug)]
pub struct SearchTask {
    from_worker_thread: mpsc::Receiver<Result<SearchOutcome, AbortedEarly>>,
    cancellation: CancellationToken,
}

impl SearchTask {
    /// Start `search` on a new thread once `delay` has passed
    pub fn spawn<ScorableType>(search: QuoridorSearch<ScorableType>, delay: Duration) -> Self
    where
        ScorableType: Scorable<GameState, i64> + Send + Sync + 'static,
    {
        let cancellation = search.cancellation_token();
        let worker_cancellation = cancellation.clone();
        let (to_main_thread, from_worker_thread) = mpsc::channel();
        let span = info_span!("search_task", name = search.name, delay_ms = delay.as_millis() as u64);

        thread::spawn(move || {
            let _entered = span.enter();

            let started_at = Instant::now();
            while started_at.elapsed() < delay {
                if worker_cancellation.is_cancelled() {
                    debug!("Cancelled while thinking");
                    let _ = to_main_thread.send(Err(AbortedEarly));
                    return;
                }
                thread::sleep(CANCELLATION_POLL.min(delay.saturating_sub(started_at.elapsed())));
            }

            // The receiver is gone if the task was dropped, nobody is left to tell
            let _ = to_main_thread.send(search.search());
        });

        Self {
            from_worker_thread,
            cancellation,
        }
    }

    /// Stop the search, its result will come back as [AbortedEarly]
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Whether this task was cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// The result if the worker is done, without blocking
    ///
    /// The result is handed out once, later calls see a finished worker and get [AbortedEarly]
    pub fn try_result(&self) -> Option<Result<SearchOutcome, AbortedEarly>> {
        match self.from_worker_thread.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                warn!("Search worker went away without a result");
                Some(Err(AbortedEarly))
            }
        }
    }

    /// Block until the worker is done
    pub fn wait(self) -> Result<SearchOutcome, AbortedEarly> {
        self.from_worker_thread.recv().unwrap_or_else(|_| {
            warn!("Search worker went away without a result");
            Err(AbortedEarly)
        })
    }
}

impl Drop for SearchTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
