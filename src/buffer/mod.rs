//! Pooled buffer allocation.
//!
//! # Responsibilities
//! - Hand out reusable byte buffers for transcript and archive staging
//! - Guarantee buffers return to the pool on every exit path
//! - Cap the number of idle buffers retained between requests
//!
//! # Design Decisions
//! - Checkout returns an RAII lease; release happens in `Drop`, so
//!   cancellation (future drop) releases too
//! - Buffers are cleared before reuse; one request's bytes are never
//!   visible to another
//! - Excess buffers beyond `max_idle` are simply freed

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};

/// Process-wide pool of reusable byte buffers.
///
/// The only state shared across transactions. Thread-safe; the lock is held
/// only for push/pop of the free list.
pub struct BufferPool {
    idle: Mutex<Vec<Vec<u8>>>,
    /// Capacity given to freshly allocated buffers.
    initial_capacity: usize,
    /// Maximum number of idle buffers kept for reuse.
    max_idle: usize,
}

impl BufferPool {
    pub fn new(initial_capacity: usize, max_idle: usize) -> Arc<Self> {
        Arc::new(Self {
            idle: Mutex::new(Vec::new()),
            initial_capacity,
            max_idle,
        })
    }

    /// Check out a buffer. The lease returns it to the pool when dropped.
    pub fn checkout(self: &Arc<Self>) -> BufferLease {
        let buf = self
            .idle
            .lock()
            .expect("buffer pool lock poisoned")
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(self.initial_capacity));
        BufferLease {
            buf: Some(buf),
            pool: Arc::clone(self),
        }
    }

    /// Wrap an already-detached buffer back into a lease.
    pub(crate) fn wrap(self: &Arc<Self>, buf: Vec<u8>) -> BufferLease {
        BufferLease {
            buf: Some(buf),
            pool: Arc::clone(self),
        }
    }

    /// Return a buffer to the pool, clearing it first.
    pub(crate) fn release(&self, mut buf: Vec<u8>) {
        buf.clear();
        let mut idle = self.idle.lock().expect("buffer pool lock poisoned");
        if idle.len() < self.max_idle {
            idle.push(buf);
        }
    }

    #[cfg(test)]
    fn idle_count(&self) -> usize {
        self.idle.lock().unwrap().len()
    }
}

/// Scoped checkout of a pooled buffer.
///
/// Derefs to `Vec<u8>`. On drop the buffer goes back to the pool, cleared.
pub struct BufferLease {
    buf: Option<Vec<u8>>,
    pool: Arc<BufferPool>,
}

impl BufferLease {
    /// Detach the buffer from the lease, escaping pool tracking.
    ///
    /// The caller becomes responsible for handing the buffer back via
    /// [`BufferPool::wrap`] or letting it drop.
    pub(crate) fn detach(mut self) -> Vec<u8> {
        self.buf.take().expect("lease already detached")
    }
}

impl Deref for BufferLease {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        self.buf.as_ref().expect("lease already detached")
    }
}

impl DerefMut for BufferLease {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        self.buf.as_mut().expect("lease already detached")
    }
}

impl Drop for BufferLease {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.release(buf);
        }
    }
}
