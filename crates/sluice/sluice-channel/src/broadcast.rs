//! Single-writer, multi-reader broadcast queue with independent reader cursors.
//!
//! One [`BroadcastQueue`] owns the buffered elements; any number of [`View`]s
//! read from it, each at its own pace. An element stays buffered until every
//! view that was registered when it was pushed has consumed it.
//!
//! # Design
//! - **Queue**: the sole strong owner of the shared state. Dropping it closes
//!   the channel; views observe that as [`ViewError::Dangling`].
//! - **Views**: hold a weak, liveness-checked handle plus a sequence-number
//!   cursor. A view never keeps the queue alive.
//! - **No reader, no buffering**: pushing while no view is registered drops the
//!   value on the floor. This is the only back-pressure policy.
//!
//! # Thread Safety
//! All state lives behind one mutex per queue, paired with a condition variable
//! that wakes blocked readers on every push. Locks of two different queues are
//! never held at the same time.

use crate::error::ViewError;
use crate::slots::SlotBuffer;
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

struct State<T> {
    buffer: SlotBuffer<T>,
    /// Set once the owning queue is dropped.
    closed: bool,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    notifier: Condvar,
}

/// The owning side of a broadcast channel.
///
/// Producers keep exactly one `BroadcastQueue` per output and hand out
/// [`View`]s to whoever wants to observe it. The queue is not `Clone`: its
/// lifetime is the lifetime of the channel.
pub struct BroadcastQueue<T> {
    shared: Arc<Shared<T>>,
}

/// An independent read cursor into a [`BroadcastQueue`].
///
/// A freshly created view covers nothing: it only sees elements pushed after
/// it was created. Cloning a view yields a second cursor covering the same
/// range; both have to consume every covered element before it is evicted.
///
/// `View::default()` is not attached to any queue and fails every operation
/// with [`ViewError::Dangling`].
pub struct View<T> {
    queue: Weak<Shared<T>>,
    /// Sequence number of the next element this view will consume.
    read_seq: u64,
}

impl<T> BroadcastQueue<T> {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    buffer: SlotBuffer::new(),
                    closed: false,
                }),
                notifier: Condvar::new(),
            }),
        }
    }

    /// Creates a new view positioned at the current end of the queue.
    pub fn view(&self) -> View<T> {
        let read_seq = self.shared.state.lock().buffer.register();
        View {
            queue: Arc::downgrade(&self.shared),
            read_seq,
        }
    }

    /// Appends `value`, owed to every currently registered view.
    ///
    /// With no registered view the value is discarded. Never blocks beyond the
    /// queue's own lock.
    pub fn push(&self, value: T) {
        let buffered = self.shared.state.lock().buffer.push(value);
        if buffered {
            self.shared.notifier.notify_all();
        } else {
            trace!("no registered view, value discarded");
        }
    }

    /// Number of elements currently buffered (owed to at least one view).
    pub fn len(&self) -> usize {
        self.shared.state.lock().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of views currently registered against this queue.
    pub fn reader_count(&self) -> usize {
        self.shared.state.lock().buffer.readers()
    }
}

impl<T> Default for BroadcastQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for BroadcastQueue<T> {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        state.closed = true;
        let dropped = state.buffer.drain();
        drop(state);

        if dropped > 0 {
            debug!(dropped, "broadcast queue closed with unconsumed elements");
        }
        // Wake blocked readers so they observe the closure.
        self.shared.notifier.notify_all();
    }
}

impl<T> fmt::Debug for BroadcastQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("BroadcastQueue")
            .field("len", &state.buffer.len())
            .field("readers", &state.buffer.readers())
            .finish()
    }
}

impl<T> View<T> {
    /// Upgrades the weak handle, failing if the queue is gone.
    #[inline]
    fn shared(&self) -> Result<Arc<Shared<T>>, ViewError> {
        self.queue.upgrade().ok_or(ViewError::Dangling)
    }

    /// Returns `true` if the queue this view reads from no longer exists.
    pub fn is_dangling(&self) -> bool {
        match self.queue.upgrade() {
            Some(shared) => shared.state.lock().closed,
            None => true,
        }
    }

    /// Number of elements between this view's cursor and the end of the queue.
    ///
    /// May differ from view to view.
    pub fn size(&self) -> Result<usize, ViewError> {
        let shared = self.shared()?;
        let state = shared.state.lock();
        if state.closed {
            return Err(ViewError::Dangling);
        }
        Ok(state.buffer.available(self.read_seq))
    }

    /// Resets the view to cover nothing, releasing every element it skips.
    pub fn clear(&mut self) -> Result<(), ViewError> {
        let shared = self.shared()?;
        let mut state = shared.state.lock();
        if state.closed {
            return Err(ViewError::Dangling);
        }
        state.buffer.release(self.read_seq);
        self.read_seq = state.buffer.write_seq();
        Ok(())
    }

    /// Blocks until the view covers at least one element or `timeout` elapses.
    ///
    /// Returns whether data is available.
    pub fn wait_for(&self, timeout: Duration) -> Result<bool, ViewError> {
        let shared = self.shared()?;
        let deadline = Instant::now().checked_add(timeout);
        let mut state = shared.state.lock();
        let mut timed_out = false;

        loop {
            if state.closed {
                return Err(ViewError::Dangling);
            }
            if state.buffer.available(self.read_seq) > 0 {
                return Ok(true);
            }
            if timed_out {
                return Ok(false);
            }
            match deadline {
                Some(deadline) => {
                    timed_out = shared.notifier.wait_until(&mut state, deadline).timed_out();
                }
                None => shared.notifier.wait(&mut state),
            }
        }
    }
}

impl<T: Clone> View<T> {
    /// Takes the next element, blocking until one is available.
    pub fn pop(&mut self) -> Result<T, ViewError> {
        let shared = self.shared()?;
        let mut state = shared.state.lock();

        loop {
            if state.closed {
                return Err(ViewError::Dangling);
            }
            if let Some(value) = state.buffer.take(self.read_seq) {
                self.read_seq += 1;
                return Ok(value);
            }
            shared.notifier.wait(&mut state);
        }
    }

    /// Takes the next element if there is one, without blocking.
    pub fn try_pop(&mut self) -> Result<Option<T>, ViewError> {
        let shared = self.shared()?;
        let mut state = shared.state.lock();
        if state.closed {
            return Err(ViewError::Dangling);
        }

        let value = state.buffer.take(self.read_seq);
        if value.is_some() {
            self.read_seq += 1;
        }
        Ok(value)
    }

    /// Copies the elements this view still covers, oldest first, without
    /// consuming them.
    pub fn snapshot(&self) -> Result<Vec<T>, ViewError> {
        let shared = self.shared()?;
        let state = shared.state.lock();
        if state.closed {
            return Err(ViewError::Dangling);
        }
        Ok(state.buffer.covered(self.read_seq).cloned().collect())
    }
}

impl<T> Default for View<T> {
    fn default() -> Self {
        Self {
            queue: Weak::new(),
            read_seq: 0,
        }
    }
}

impl<T> Clone for View<T> {
    fn clone(&self) -> Self {
        if let Some(shared) = self.queue.upgrade() {
            shared.state.lock().buffer.register_at(self.read_seq);
        }
        Self {
            queue: self.queue.clone(),
            read_seq: self.read_seq,
        }
    }
}

impl<T> Drop for View<T> {
    fn drop(&mut self) {
        if let Some(shared) = self.queue.upgrade() {
            shared.state.lock().buffer.unregister(self.read_seq);
        }
    }
}

impl<T> fmt::Debug for View<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("read_seq", &self.read_seq)
            .field("dangling", &self.is_dangling())
            .finish()
    }
}
