//! "Copied" confirmation state with a self-resetting timer
//!
//! After a successful copy the block shows a confirmation for a fixed delay and
//! then returns to idle. At most one reset timer is pending per block: copying
//! again cancels the pending timer and arms a fresh one, and disposing the block
//! cancels it outright. The timer task holds only a weak reference to the state
//! and checks an arming epoch before writing, so a reset can never land on a
//! disposed block or undo a newer copy.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How long the confirmation stays visible
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(1800);

/// Whether the "copied" confirmation is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyState {
    #[default]
    Idle,
    Copied,
}

struct Inner {
    state: watch::Sender<CopyState>,
    pending_reset: Option<JoinHandle<()>>,
    /// Incremented on every arm; a timer only resets the epoch it was armed for
    epoch: u64,
    disposed: bool,
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Arm (or re-arm) the confirmation. Returns false if nothing was armed.
fn arm(inner: &Arc<Mutex<Inner>>, reset_after: Duration) -> bool {
    let runtime = match tokio::runtime::Handle::try_current() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::warn!("Cannot arm copy confirmation outside a Tokio runtime: {}", e);
            return false;
        }
    };

    let mut guard = lock(inner);
    if guard.disposed {
        return false;
    }

    if let Some(pending) = guard.pending_reset.take() {
        pending.abort();
    }
    guard.epoch += 1;
    let epoch = guard.epoch;
    guard.state.send_replace(CopyState::Copied);

    // Deadline is fixed now, not when the task first gets polled
    let deadline = Instant::now() + reset_after;
    let weak = Arc::downgrade(inner);
    guard.pending_reset = Some(runtime.spawn(async move {
        tokio::time::sleep_until(deadline).await;

        let Some(inner) = weak.upgrade() else {
            return;
        };
        let mut guard = lock(&inner);
        if guard.disposed || guard.epoch != epoch {
            return;
        }
        guard.pending_reset = None;
        guard.state.send_replace(CopyState::Idle);
    }));

    true
}

/// Per-block copy confirmation state.
///
/// Dropping the value disposes it.
pub struct CopyFeedback {
    inner: Arc<Mutex<Inner>>,
    reset_after: Duration,
}

impl CopyFeedback {
    pub fn new(reset_after: Duration) -> Self {
        let (state, _) = watch::channel(CopyState::Idle);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state,
                pending_reset: None,
                epoch: 0,
                disposed: false,
            })),
            reset_after,
        }
    }

    pub fn state(&self) -> CopyState {
        *lock(&self.inner).state.borrow()
    }

    /// Receive every state transition, e.g. to schedule a redraw
    pub fn subscribe(&self) -> watch::Receiver<CopyState> {
        lock(&self.inner).state.subscribe()
    }

    pub fn reset_after(&self) -> Duration {
        self.reset_after
    }

    pub fn is_disposed(&self) -> bool {
        lock(&self.inner).disposed
    }

    /// Show the confirmation and (re)start the reset timer.
    ///
    /// Must be called from within a Tokio runtime. Returns false, leaving the
    /// state untouched, when disposed or when no runtime is available.
    pub fn mark_copied(&self) -> bool {
        arm(&self.inner, self.reset_after)
    }

    /// Weak handle for work that may outlive the block, such as a pending
    /// clipboard write.
    pub fn handle(&self) -> CopyFeedbackHandle {
        CopyFeedbackHandle {
            inner: Arc::downgrade(&self.inner),
            reset_after: self.reset_after,
        }
    }

    /// Cancel any pending reset and refuse further state changes.
    pub fn dispose(&self) {
        let mut guard = lock(&self.inner);
        guard.disposed = true;
        if let Some(pending) = guard.pending_reset.take() {
            pending.abort();
        }
    }
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self::new(DEFAULT_RESET_DELAY)
    }
}

impl Drop for CopyFeedback {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for CopyFeedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = lock(&self.inner);
        let state = *guard.state.borrow();
        f.debug_struct("CopyFeedback")
            .field("state", &state)
            .field("pending_reset", &guard.pending_reset.is_some())
            .field("disposed", &guard.disposed)
            .field("reset_after", &self.reset_after)
            .finish()
    }
}

/// Weak reference to a [`CopyFeedback`]
#[derive(Debug, Clone)]
pub struct CopyFeedbackHandle {
    inner: Weak<Mutex<Inner>>,
    reset_after: Duration,
}

impl CopyFeedbackHandle {
    /// Like [`CopyFeedback::mark_copied`]; also false once the block is gone.
    pub fn mark_copied(&self) -> bool {
        match self.inner.upgrade() {
            Some(inner) => arm(&inner, self.reset_after),
            None => false,
        }
    }
}
