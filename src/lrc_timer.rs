use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use log::debug;
use parking_lot::RwLock;
use tokio::sync::Notify;
use tokio::time::{self, Instant};
use crate::lrc_parser::LrcDocument;

// @module: Real-time lyrics playback scheduling

/// Callback invoked for each fired fragment with
/// `(start_time_ms, text, is_last)`
pub type LrcListener = Arc<dyn Fn(u64, String, bool) + Send + Sync>;

/// Replays an [`LrcDocument`] in real time, notifying listeners at each
/// fragment's start offset.
///
/// One playback loop runs per timer at a time. The loop alone advances
/// through the document; the only state shared with other tasks is the
/// listener list and the cancellation flag, so a concurrent [`stop`]
/// takes effect at the next armed wait and listeners may be added while
/// playback is running (they only see fragments fired after
/// registration).
///
/// [`stop`]: LrcTimer::stop
pub struct LrcTimer {
    document: Arc<LrcDocument>,
    listeners: RwLock<Vec<LrcListener>>,
    cancelled: AtomicBool,
    running: AtomicBool,
    wake: Notify,
}

impl LrcTimer {
    /// Create a timer over a shared document
    pub fn new(document: Arc<LrcDocument>) -> Self {
        LrcTimer {
            document,
            listeners: RwLock::new(Vec::new()),
            cancelled: AtomicBool::new(false),
            running: AtomicBool::new(false),
            wake: Notify::new(),
        }
    }

    /// Register a listener. Allowed before or during playback; a
    /// listener added mid-playback only receives future fragments.
    pub fn add_listener(&self, listener: LrcListener) {
        self.listeners.write().push(listener);
    }

    /// Whether a playback loop is currently running
    pub fn is_started(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Request cancellation of a running playback loop.
    ///
    /// Sets the cancellation flag and wakes the armed wait so the loop
    /// exits promptly instead of sleeping out the remaining delay. Safe
    /// to call from any task, including from inside a listener.
    /// Idempotent, and a no-op when nothing is running.
    pub fn stop(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        // notify_one stores a permit, so a stop issued between waits
        // still wakes the next armed wait instantly
        self.wake.notify_one();
    }

    /// Play the document to completion or cancellation.
    ///
    /// Returns immediately for an empty document. Each fragment is
    /// broadcast to every registered listener on its own spawned task,
    /// so listeners never block the loop or each other. Waits are
    /// armed against the session start instant, not the previous
    /// fragment, so scheduling error does not accumulate; a fragment
    /// whose deadline has already passed fires immediately.
    pub async fn start(&self) {
        let fragments = self.document.fragments();
        if fragments.is_empty() {
            return;
        }

        self.cancelled.store(false, Ordering::SeqCst);
        self.running.store(true, Ordering::SeqCst);
        let session_start = Instant::now();

        'playback: for (idx, fragment) in fragments.iter().enumerate() {
            let deadline = session_start + Duration::from_millis(fragment.start_time_ms);
            loop {
                tokio::select! {
                    _ = time::sleep_until(deadline) => break,
                    _ = self.wake.notified() => {
                        if self.cancelled.load(Ordering::SeqCst) {
                            debug!("Playback cancelled before {} ms", fragment.start_time_ms);
                            break 'playback;
                        }
                        // Spurious wake: fall through and re-arm the wait
                    }
                }
            }
            if self.cancelled.load(Ordering::SeqCst) {
                break 'playback;
            }

            let last = idx + 1 == fragments.len();
            for listener in self.listeners.read().iter() {
                let listener = Arc::clone(listener);
                let start_time_ms = fragment.start_time_ms;
                let text = fragment.text.clone();
                tokio::spawn(async move {
                    listener(start_time_ms, text, last);
                });
            }
        }

        self.running.store(false, Ordering::SeqCst);
    }
}
