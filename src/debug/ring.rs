/// Rolling window of tick costs. Allocated once; pushing overwrites the
/// oldest sample when full.
pub struct RingBuffer<T> {
    slots: Vec<T>,
    next: usize,
    filled: usize,
}

/// Aggregate over a window of samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowSummary {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

impl<T: Copy + Default> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![T::default(); capacity.max(1)],
            next: 0,
            filled: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn push(&mut self, value: T) {
        self.slots[self.next] = value;
        self.next = (self.next + 1) % self.slots.len();
        self.filled = (self.filled + 1).min(self.slots.len());
    }

    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    pub fn clear(&mut self) {
        self.next = 0;
        self.filled = 0;
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let cap = self.slots.len();
        let oldest = (self.next + cap - self.filled) % cap;
        (0..self.filled).map(move |i| &self.slots[(oldest + i) % cap])
    }
}

impl RingBuffer<f64> {
    /// `None` while empty.
    pub fn summary(&self) -> Option<WindowSummary> {
        if self.is_empty() {
            return None;
        }
        let (sum, min, max) = self
            .iter()
            .fold((0.0, f64::MAX, f64::MIN), |(s, lo, hi), &t| {
                (s + t, lo.min(t), hi.max(t))
            });
        Some(WindowSummary {
            avg: sum / self.filled as f64,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_newest_in_order() {
        let mut ring = RingBuffer::new(3);
        for v in 1..=5u32 {
            ring.push(v);
        }
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn partial_window_iterates_from_start() {
        let mut ring = RingBuffer::new(4);
        ring.push(7u32);
        ring.push(8);
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![7, 8]);
        ring.clear();
        assert!(ring.is_empty());
    }

    #[test]
    fn summary_covers_window_only() {
        let mut ring = RingBuffer::new(2);
        assert_eq!(ring.summary(), None);
        for t in [100.0, 10.0, 30.0] {
            ring.push(t);
        }
        assert_eq!(
            ring.summary(),
            Some(WindowSummary {
                avg: 20.0,
                min: 10.0,
                max: 30.0
            })
        );
    }
}
