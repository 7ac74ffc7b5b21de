//! Indexed binary heap over small integer keys.
//!
//! The heap stores keys only; priorities live with the caller and are
//! compared through a [`HeapOrder`] passed to every mutating call. That keeps
//! the priorities mutable between calls, which is what `fix` is for: change
//! the priority of a key, then restore the heap around it in O(log n).

/// Strict ordering between two keys; the key for which `less` holds against
/// all others is popped first.
pub trait HeapOrder {
    fn less(&self, a: usize, b: usize) -> bool;
}

impl<F: Fn(usize, usize) -> bool> HeapOrder for F {
    fn less(&self, a: usize, b: usize) -> bool {
        self(a, b)
    }
}

#[derive(Clone, Debug, Default)]
pub struct IndexedHeap {
    keys: Vec<usize>,
    /// Heap position of every key, `None` when the key is not queued.
    pos: Vec<Option<usize>>,
}

impl IndexedHeap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heap with room for keys `0..n`.
    pub fn with_capacity(n: usize) -> Self {
        IndexedHeap {
            keys: Vec::with_capacity(n),
            pos: vec![None; n],
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        for key in self.keys.drain(..) {
            self.pos[key] = None;
        }
    }

    /// Heap position of `key`.
    pub fn find(&self, key: usize) -> Option<usize> {
        self.pos.get(key).copied().flatten()
    }

    pub fn contains(&self, key: usize) -> bool {
        self.find(key).is_some()
    }

    /// The key that `pop` would return.
    pub fn peek(&self) -> Option<usize> {
        self.keys.first().copied()
    }

    /// Queue `key`. A key that is already queued is re-positioned instead.
    pub fn push(&mut self, key: usize, order: &impl HeapOrder) {
        if self.contains(key) {
            self.fix(key, order);
            return;
        }
        if self.pos.len() <= key {
            self.pos.resize(key + 1, None);
        }
        self.keys.push(key);
        let i = self.keys.len() - 1;
        self.pos[key] = Some(i);
        self.up(i, order);
    }

    pub fn pop(&mut self, order: &impl HeapOrder) -> Option<usize> {
        let n = self.keys.len().checked_sub(1)?;
        self.swap(0, n);
        let key = self.keys.pop()?;
        self.pos[key] = None;
        self.down(0, order);
        Some(key)
    }

    /// Restore the heap after the priority of `key` changed. Keys that are
    /// not queued are ignored.
    pub fn fix(&mut self, key: usize, order: &impl HeapOrder) {
        if let Some(i) = self.find(key) {
            if !self.down(i, order) {
                self.up(i, order);
            }
        }
    }

    /// Take `key` out of the queue; returns whether it was queued.
    pub fn remove(&mut self, key: usize, order: &impl HeapOrder) -> bool {
        let Some(i) = self.find(key) else {
            return false;
        };
        let n = self.keys.len() - 1;
        self.swap(i, n);
        self.keys.pop();
        self.pos[key] = None;
        if i < n && !self.down(i, order) {
            self.up(i, order);
        }
        true
    }

    fn less(&self, i: usize, j: usize, order: &impl HeapOrder) -> bool {
        order.less(self.keys[i], self.keys[j])
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.keys.swap(i, j);
        self.pos[self.keys[i]] = Some(i);
        self.pos[self.keys[j]] = Some(j);
    }

    fn up(&mut self, mut j: usize, order: &impl HeapOrder) {
        while j > 0 {
            let parent = (j - 1) / 2;
            if !self.less(j, parent, order) {
                break;
            }
            self.swap(parent, j);
            j = parent;
        }
    }

    /// Sift down from `i0`; returns whether the key moved.
    fn down(&mut self, i0: usize, order: &impl HeapOrder) -> bool {
        let n = self.keys.len();
        let mut i = i0;
        loop {
            let left = 2 * i + 1;
            if n <= left {
                break;
            }
            let mut child = left;
            if left + 1 < n && self.less(left + 1, left, order) {
                child = left + 1;
            }
            if !self.less(child, i, order) {
                break;
            }
            self.swap(i, child);
            i = child;
        }
        i0 < i
    }
}
