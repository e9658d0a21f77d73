use std::ops::{Deref, DerefMut};

/// Free list of reusable `Vec` buffers. Buffers come back cleared but keep
/// their capacity, so steady-state acquire/release does not allocate.
pub struct Pool<T> {
    free: Vec<Vec<T>>,
    /// Buffers ever handed out that were not taken from the free list.
    created: usize,
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self {
            free: Vec::new(),
            created: 0,
        }
    }

    /// Pre-fill with `count` empty buffers of `buf_cap` capacity each.
    pub fn with_capacity(count: usize, buf_cap: usize) -> Self {
        let mut free = Vec::with_capacity(count);
        for _ in 0..count {
            free.push(Vec::with_capacity(buf_cap));
        }
        Self {
            free,
            created: count,
        }
    }

    pub fn acquire(&mut self) -> Vec<T> {
        match self.free.pop() {
            Some(buf) => buf,
            None => {
                self.created += 1;
                Vec::new()
            }
        }
    }

    pub fn release(&mut self, mut buf: Vec<T>) {
        buf.clear();
        self.free.push(buf);
    }

    /// Borrow a buffer that goes back to the pool when the guard drops,
    /// on every exit path.
    pub fn scoped(&mut self) -> Pooled<'_, T> {
        let buf = self.acquire();
        Pooled { pool: self, buf }
    }

    /// Buffers sitting in the free list right now.
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Total buffers this pool has ever allocated.
    pub fn created(&self) -> usize {
        self.created
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped loan from a [`Pool`].
pub struct Pooled<'a, T> {
    pool: &'a mut Pool<T>,
    buf: Vec<T>,
}

impl<T> Deref for Pooled<'_, T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Vec<T> {
        &self.buf
    }
}

impl<T> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.buf
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        self.pool.release(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_keeps_capacity() {
        let mut pool: Pool<u32> = Pool::new();
        let mut buf = pool.acquire();
        buf.extend(0..64);
        let cap = buf.capacity();
        pool.release(buf);

        let again = pool.acquire();
        assert!(again.is_empty());
        assert_eq!(again.capacity(), cap);
        assert_eq!(pool.created(), 1);
    }

    #[test]
    fn scoped_returns_on_early_exit() {
        fn fill(pool: &mut Pool<u32>, bail: bool) -> Option<usize> {
            let mut buf = pool.scoped();
            buf.push(7);
            if bail {
                return None;
            }
            Some(buf.len())
        }

        let mut pool = Pool::new();
        assert_eq!(fill(&mut pool, true), None);
        assert_eq!(fill(&mut pool, false), Some(1));
        assert_eq!(pool.available(), 1);
        assert_eq!(pool.created(), 1);
    }

    #[test]
    fn prefilled_pool_does_not_allocate() {
        let mut pool: Pool<u8> = Pool::with_capacity(4, 16);
        let bufs: Vec<_> = (0..4).map(|_| pool.acquire()).collect();
        assert_eq!(pool.created(), 4);
        for b in bufs {
            pool.release(b);
        }
        assert_eq!(pool.available(), 4);
    }
}
