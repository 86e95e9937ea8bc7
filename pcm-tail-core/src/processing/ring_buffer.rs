use crate::models::error::RetentionError;

/// Fixed-capacity circular byte store with a single write cursor.
///
/// Once full, every further byte overwrites the logically oldest one, so the
/// buffer always holds the most recent `capacity` bytes of input. After a
/// wrap, `cursor` is both the next write position and the index of the
/// oldest retained byte.
///
/// Unwritten bytes are zero, which is silence for signed PCM.
#[derive(Debug)]
pub struct RingBuffer {
    buffer: Vec<u8>,
    cursor: usize,
    total_written: u64,
}

impl RingBuffer {
    /// Allocate a zeroed buffer of `capacity` bytes.
    ///
    /// Allocation is fallible: a failure is reported as
    /// [`RetentionError::AllocationFailed`] instead of aborting the process.
    pub fn new(capacity: usize) -> Result<Self, RetentionError> {
        Self::with_budget(capacity, None)
    }

    /// Like [`new`](Self::new), but refuses capacities above `budget` bytes.
    pub fn with_budget(capacity: usize, budget: Option<usize>) -> Result<Self, RetentionError> {
        if capacity == 0 || budget.is_some_and(|limit| capacity > limit) {
            return Err(RetentionError::AllocationFailed { capacity });
        }

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(|_| RetentionError::AllocationFailed { capacity })?;
        buffer.resize(capacity, 0);

        Ok(Self {
            buffer,
            cursor: 0,
            total_written: 0,
        })
    }

    /// Append `chunk` at the cursor, wrapping around the end of the store.
    ///
    /// A chunk longer than the capacity keeps only its last `capacity` bytes,
    /// which is what appending it in capacity-sized pieces would leave behind.
    pub fn append(&mut self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }

        let capacity = self.buffer.len();
        self.total_written += chunk.len() as u64;

        let chunk = if chunk.len() > capacity {
            let skipped = chunk.len() - capacity;
            self.cursor = (self.cursor + skipped) % capacity;
            &chunk[skipped..]
        } else {
            chunk
        };

        let n = chunk.len();
        let w = self.cursor;
        if w + n <= capacity {
            self.buffer[w..w + n].copy_from_slice(chunk);
        } else {
            let to_end = capacity - w;
            self.buffer[w..].copy_from_slice(&chunk[..to_end]);
            self.buffer[..n - to_end].copy_from_slice(&chunk[to_end..]);
        }
        self.cursor = (w + n) % capacity;
    }

    /// The two physical segments in chronological order:
    /// `[cursor, capacity)` then `[0, cursor)`.
    ///
    /// With the cursor at 0 the first segment is the whole store and the
    /// second is empty.
    pub fn segments(&self) -> (&[u8], &[u8]) {
        let (newest, oldest) = self.buffer.split_at(self.cursor);
        (oldest, newest)
    }

    /// Next write position, in `[0, capacity)`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total bytes ever appended, including overwritten ones.
    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Number of times writing has run past the end of the store and
    /// started overwriting older input. Filling the store exactly is not
    /// a wrap.
    pub fn wraps(&self) -> u64 {
        self.total_written.saturating_sub(1) / self.buffer.len() as u64
    }

    /// Whether the input has overrun the store at least once.
    pub fn has_wrapped(&self) -> bool {
        self.wraps() > 0
    }

    /// Bytes that hold real input: `min(total_written, capacity)`.
    pub fn retained_len(&self) -> usize {
        self.total_written.min(self.buffer.len() as u64) as usize
    }

    /// Raw backing store, in physical order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 256) as u8).collect()
    }

    #[test]
    fn append_without_wrap() {
        let mut buf = RingBuffer::new(8).unwrap();
        buf.append(&[1, 2, 3]);

        assert_eq!(buf.cursor(), 3);
        assert_eq!(buf.as_bytes(), &[1, 2, 3, 0, 0, 0, 0, 0]);
        assert!(!buf.has_wrapped());
        assert_eq!(buf.retained_len(), 3);
    }

    #[test]
    fn append_exactly_to_end_wraps_cursor_to_zero() {
        let mut buf = RingBuffer::new(4).unwrap();
        buf.append(&[1, 2]);
        buf.append(&[3, 4]); // w + n == C

        assert_eq!(buf.cursor(), 0);
        assert_eq!(buf.as_bytes(), &[1, 2, 3, 4]);
        assert!(!buf.has_wrapped());
        assert_eq!(buf.wraps(), 0);

        let (oldest, newest) = buf.segments();
        assert_eq!(oldest, &[1, 2, 3, 4]);
        assert!(newest.is_empty());

        buf.append(&[5]);
        assert!(buf.has_wrapped());
        assert_eq!(buf.wraps(), 1);
    }

    #[test]
    fn append_splits_across_boundary() {
        let mut buf = RingBuffer::new(5).unwrap();
        buf.append(&[1, 2, 3, 4]);
        buf.append(&[5, 6, 7]); // 1 byte to the end, 2 from the start

        assert_eq!(buf.cursor(), 2);
        assert_eq!(buf.as_bytes(), &[6, 7, 3, 4, 5]);
        assert!(buf.has_wrapped());
        assert_eq!(buf.retained_len(), 5);
    }

    #[test]
    fn segments_are_chronological_after_wrap() {
        let mut buf = RingBuffer::new(5).unwrap();
        buf.append(&[1, 2, 3, 4]);
        buf.append(&[5, 6, 7]);

        let (oldest, newest) = buf.segments();
        assert_eq!(oldest, &[3, 4, 5]);
        assert_eq!(newest, &[6, 7]);
    }

    #[test]
    fn many_small_appends_keep_last_capacity_bytes() {
        let input = markers(1000);
        let mut buf = RingBuffer::new(97).unwrap();
        for chunk in input.chunks(13) {
            buf.append(chunk);
        }

        assert_eq!(buf.cursor(), 1000 % 97);
        assert_eq!(buf.total_written(), 1000);

        let (oldest, newest) = buf.segments();
        let mut ordered = oldest.to_vec();
        ordered.extend_from_slice(newest);
        assert_eq!(ordered, &input[1000 - 97..]);
    }

    #[test]
    fn oversized_chunk_keeps_its_tail() {
        let mut buf = RingBuffer::new(4).unwrap();
        buf.append(&[9]);
        buf.append(&[1, 2, 3, 4, 5, 6, 7]);

        let (oldest, newest) = buf.segments();
        let mut ordered = oldest.to_vec();
        ordered.extend_from_slice(newest);
        assert_eq!(ordered, vec![4, 5, 6, 7]);
        assert_eq!(buf.cursor(), 0);
        assert_eq!(buf.total_written(), 8);
    }

    #[test]
    fn empty_append_is_a_no_op() {
        let mut buf = RingBuffer::new(4).unwrap();
        buf.append(&[]);

        assert_eq!(buf.cursor(), 0);
        assert_eq!(buf.total_written(), 0);
        assert_eq!(buf.as_bytes(), &[0, 0, 0, 0]);
    }

    #[test]
    fn allocation_failure_is_reported() {
        let err = RingBuffer::new(usize::MAX).unwrap_err();
        assert_eq!(err, RetentionError::AllocationFailed { capacity: usize::MAX });

        let err = RingBuffer::new(0).unwrap_err();
        assert_eq!(err, RetentionError::AllocationFailed { capacity: 0 });
    }

    #[test]
    fn budget_limits_allocation() {
        assert!(RingBuffer::with_budget(64, Some(64)).is_ok());
        let err = RingBuffer::with_budget(65, Some(64)).unwrap_err();
        assert_eq!(err, RetentionError::AllocationFailed { capacity: 65 });
    }
}
