use std::cell::{Cell, RefCell};
use std::mem;
use std::ops::{Deref, DerefMut};

/// Source of temporary record-sized buffers.
///
/// `acquire` hands out an empty vector with room for at least `len`
/// elements; `release` takes it back. Pools are single-threaded.
pub trait BufferPool<T> {
    fn acquire(&self, len: usize) -> Vec<T>;
    fn release(&self, buffer: Vec<T>);
}

/// Allocates on every acquire and frees on release.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeapPool;

impl<T> BufferPool<T> for HeapPool {
    fn acquire(&self, len: usize) -> Vec<T> {
        Vec::with_capacity(len)
    }

    fn release(&self, _buffer: Vec<T>) {}
}

/// Keeps released buffers in power-of-two size classes for reuse.
#[derive(Debug)]
pub struct ReusePool<T> {
    classes: RefCell<Vec<Vec<Vec<T>>>>,
    outstanding: Cell<usize>,
}

impl<T> Default for ReusePool<T> {
    fn default() -> Self {
        Self {
            classes: RefCell::new(Vec::new()),
            outstanding: Cell::new(0),
        }
    }
}

impl<T> ReusePool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers handed out and not yet released.
    pub fn outstanding(&self) -> usize {
        self.outstanding.get()
    }

    /// Idle buffers waiting for reuse.
    pub fn cached(&self) -> usize {
        self.classes.borrow().iter().map(Vec::len).sum()
    }

    pub fn clear(&self) {
        self.classes.borrow_mut().clear();
    }
}

/// Smallest class whose buffers hold `len` elements.
#[inline]
fn class_for_len(len: usize) -> usize {
    len.max(1).next_power_of_two().trailing_zeros() as usize
}

/// Largest class a buffer of `capacity` elements can serve.
#[inline]
fn class_for_capacity(capacity: usize) -> usize {
    (usize::BITS - 1 - capacity.leading_zeros()) as usize
}

impl<T> BufferPool<T> for ReusePool<T> {
    fn acquire(&self, len: usize) -> Vec<T> {
        self.outstanding.set(self.outstanding.get() + 1);
        let class = class_for_len(len);
        if let Some(buffer) = self
            .classes
            .borrow_mut()
            .get_mut(class)
            .and_then(Vec::pop)
        {
            return buffer;
        }
        Vec::with_capacity(1 << class)
    }

    fn release(&self, mut buffer: Vec<T>) {
        let outstanding = self.outstanding.get();
        debug_assert!(outstanding > 0, "buffer released to a pool with none outstanding");
        self.outstanding.set(outstanding.saturating_sub(1));
        if buffer.capacity() == 0 {
            return;
        }
        buffer.clear();
        let class = class_for_capacity(buffer.capacity());
        let mut classes = self.classes.borrow_mut();
        if classes.len() <= class {
            classes.resize_with(class + 1, Vec::new);
        }
        classes[class].push(buffer);
    }
}

/// Buffer borrowed from a pool for one algorithm step.
///
/// Dropping the guard returns the buffer, so every exit path releases it,
/// unwinding included.
pub struct ScratchBuffer<'p, T, P: BufferPool<T> + ?Sized> {
    buffer: Vec<T>,
    pool: &'p P,
}

impl<'p, T, P: BufferPool<T> + ?Sized> ScratchBuffer<'p, T, P> {
    pub fn acquire(pool: &'p P, len: usize) -> Self {
        Self {
            buffer: pool.acquire(len),
            pool,
        }
    }
}

impl<T, P: BufferPool<T> + ?Sized> Deref for ScratchBuffer<'_, T, P> {
    type Target = Vec<T>;

    fn deref(&self) -> &Vec<T> {
        &self.buffer
    }
}

impl<T, P: BufferPool<T> + ?Sized> DerefMut for ScratchBuffer<'_, T, P> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.buffer
    }
}

impl<T, P: BufferPool<T> + ?Sized> Drop for ScratchBuffer<'_, T, P> {
    fn drop(&mut self) {
        self.pool.release(mem::take(&mut self.buffer));
    }
}
