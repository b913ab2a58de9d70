//! Recycling of parameter sinks across dispatches.
//!
//! A dispatch acquires a [`Params`] from the free list, the search fills
//! it, and the guard handed to the caller returns it (reset, buffers
//! intact) when dropped. Steady-state dispatch therefore captures
//! parameters without touching the allocator.

use std::mem;
use std::ops::Deref;

use parking_lot::Mutex;
use pathmux_trie::Params;

/// A free list of parameter sinks, shared by every dispatch on the same
/// multiplexer. Acquire and release are safe from any number of threads.
#[derive(Debug, Default)]
pub(crate) struct ParamsPool {
    free: Mutex<Vec<Params>>,
}

impl ParamsPool {
    pub(crate) fn acquire(&self) -> Params {
        self.free.lock().pop().unwrap_or_default()
    }

    pub(crate) fn release(&self, mut params: Params) {
        params.reset();
        self.free.lock().push(params);
    }

    pub(crate) fn guard(&self, params: Params) -> PooledParams<'_> {
        PooledParams { pool: self, params }
    }

    #[cfg(test)]
    pub(crate) fn idle(&self) -> usize {
        self.free.lock().len()
    }
}

/// The captures of a successful dispatch.
///
/// Dereferences to [`Params`]; dropping it hands the sink back to the
/// multiplexer's pool.
#[derive(Debug)]
pub struct PooledParams<'a> {
    pool: &'a ParamsPool,
    params: Params,
}

impl Deref for PooledParams<'_> {
    type Target = Params;

    fn deref(&self) -> &Params {
        &self.params
    }
}

impl Drop for PooledParams<'_> {
    fn drop(&mut self) {
        self.pool.release(mem::take(&mut self.params));
    }
}
