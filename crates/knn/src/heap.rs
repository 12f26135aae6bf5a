//! Fixed-capacity collector that keeps the smallest keys offered to it.

/// Bounded buffer retaining the `capacity` smallest-key entries offered so far.
///
/// Entries are stored in an array sorted ascending by key. An offer shifts
/// larger entries right and drops whatever falls off the end, so at any time
/// the contents are exactly the best `capacity` offers seen. Equal keys keep
/// their offer order: a new entry is placed after every retained entry whose
/// key is not greater than its own.
///
/// Capacity is expected to be small next to the candidate pool (tens of
/// entries), so the linear shift is cheaper than a heap.
///
/// # Example
///
/// ```
/// use kdmatch_knn::ResultHeap;
///
/// let mut heap = ResultHeap::new(2);
/// heap.offer(3.0, "c");
/// heap.offer(1.0, "a");
/// heap.offer(2.0, "b");
/// assert_eq!(heap.peek_worst(), Some(&2.0));
/// let drained: Vec<_> = heap.drain_descending().into_iter().map(|(_, v)| v).collect();
/// assert_eq!(drained, vec!["b", "a"]);
/// ```
#[derive(Debug, Clone)]
pub struct ResultHeap<K, V> {
    entries: Vec<(K, V)>,
    capacity: usize,
}

impl<K: PartialOrd, V> ResultHeap<K, V> {
    /// Creates an empty collector holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Offers an entry. Returns `true` if it was retained.
    ///
    /// Discarding an entry that does not beat the current worst of a full
    /// collector is normal truncation, not an error.
    pub fn offer(&mut self, key: K, value: V) -> bool {
        let mut pos = self.entries.len();
        while pos > 0 && self.entries[pos - 1].0 > key {
            pos -= 1;
        }
        if pos >= self.capacity {
            return false;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop();
        }
        self.entries.insert(pos, (key, value));
        true
    }

    /// Returns the largest retained key, or `None` when empty.
    pub fn peek_worst(&self) -> Option<&K> {
        self.entries.last().map(|(k, _)| k)
    }

    /// Removes every entry and returns them largest key first.
    pub fn drain_descending(&mut self) -> Vec<(K, V)> {
        self.entries.drain(..).rev().collect()
    }

    /// Consumes the collector and returns its entries smallest key first.
    pub fn into_sorted_vec(self) -> Vec<(K, V)> {
        self.entries
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` once `capacity` entries are retained.
    pub fn is_full(&self) -> bool {
        self.entries.len() == self.capacity
    }

    /// Maximum number of retained entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
