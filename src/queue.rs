//! Carry-over buffer shared by the segment reader and writer

/// Capacity of the backing array, the longest segment of any bit width
const MAX_CAPACITY: usize = 32;

/// Fixed-capacity FIFO of symbols backed by a ring array
///
/// The writer fills it until a full segment is available; the reader keeps the tail
/// of a decoded segment in it until the next read call.
#[derive(Debug, Clone)]
pub(crate) struct SymbolQueue {
    slots: [u8; MAX_CAPACITY],
    capacity: usize,
    head: usize,
    len: usize,
}
impl SymbolQueue {
    /// Creates an empty queue holding at most `capacity` symbols
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or above 32.
    pub fn new(capacity: usize) -> Self {
        assert!(
            (1..=MAX_CAPACITY).contains(&capacity),
            "queue capacity must be within 1..={MAX_CAPACITY}, got {capacity}"
        );
        Self {
            slots: [0; MAX_CAPACITY],
            capacity,
            head: 0,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Free slots left before the queue is full
    pub fn remaining(&self) -> usize {
        self.capacity - self.len
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Appends as many symbols from `symbols` as fit and returns how many were taken
    pub fn push_many(&mut self, symbols: &[u8]) -> usize {
        let taken = symbols.len().min(self.remaining());
        for &s in &symbols[..taken] {
            let tail = (self.head + self.len) % self.capacity;
            self.slots[tail] = s;
            self.len += 1;
        }
        taken
    }

    /// Moves the `n` oldest symbols to the end of `out`
    ///
    /// # Panics
    ///
    /// Panics if fewer than `n` symbols are queued. Asking for more than is buffered is
    /// a bookkeeping bug in the caller, not a data error.
    pub fn pop_many(&mut self, n: usize, out: &mut Vec<u8>) {
        assert!(
            n <= self.len,
            "buffer underflow: requested {n} symbols but only {} are queued",
            self.len
        );
        out.reserve(n);
        for _ in 0..n {
            out.push(self.slots[self.head]);
            self.head = (self.head + 1) % self.capacity;
        }
        self.len -= n;
        if self.len == 0 {
            self.head = 0;
        }
    }

    /// Moves every queued symbol to the end of `out`
    pub fn drain_into(&mut self, out: &mut Vec<u8>) {
        self.pop_many(self.len, out);
    }
}
