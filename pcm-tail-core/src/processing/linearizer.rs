use crate::models::audio_models::PayloadPolicy;
use crate::processing::ring_buffer::RingBuffer;

/// Retained audio as two borrowed segments, oldest first.
///
/// Written back to back, `oldest` then `newest` is the retained window in
/// the order it arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload<'a> {
    pub oldest: &'a [u8],
    pub newest: &'a [u8],
}

impl<'a> Payload<'a> {
    pub fn len(&self) -> usize {
        self.oldest.len() + self.newest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy both segments into one contiguous vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(self.oldest);
        out.extend_from_slice(self.newest);
        out
    }
}

/// Select the payload segments of `ring` under `policy`.
///
/// `FullWindow` always yields `capacity` bytes. `CapturedOnly` trims the
/// never-written tail when the stream was shorter than the window.
pub fn payload(ring: &RingBuffer, policy: PayloadPolicy) -> Payload<'_> {
    let retained = ring.retained_len();
    if policy == PayloadPolicy::CapturedOnly && retained < ring.capacity() {
        // No wrap yet, so the cursor is the captured length.
        return Payload {
            oldest: &[],
            newest: &ring.as_bytes()[..retained],
        };
    }

    let (oldest, newest) = ring.segments();
    Payload { oldest, newest }
}

/// Reorder a circular store into chronological order.
///
/// Returns `store[cursor..]` followed by `store[..cursor]`. A cursor of zero
/// returns the store unchanged.
pub fn linearize(store: &[u8], cursor: usize) -> Vec<u8> {
    let cursor = cursor.min(store.len());
    let mut out = Vec::with_capacity(store.len());
    out.extend_from_slice(&store[cursor..]);
    out.extend_from_slice(&store[..cursor]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 256) as u8).collect()
    }

    fn fill(capacity: usize, input: &[u8], chunk: usize) -> RingBuffer {
        let mut ring = RingBuffer::new(capacity).unwrap();
        for piece in input.chunks(chunk) {
            ring.append(piece);
        }
        ring
    }

    #[test]
    fn linearize_cursor_zero_is_identity() {
        let store = [1u8, 2, 3, 4];
        assert_eq!(linearize(&store, 0), store.to_vec());
    }

    #[test]
    fn linearize_rotates_at_cursor() {
        let store = [6u8, 7, 3, 4, 5];
        assert_eq!(linearize(&store, 2), vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn full_window_without_wrap_leads_with_silence() {
        let input = [10u8, 11, 12];
        let ring = fill(8, &input, 2);

        let payload = payload(&ring, PayloadPolicy::FullWindow);
        assert_eq!(payload.len(), 8);
        // Pre-fill region first, then the input in order.
        assert_eq!(payload.oldest, &[0, 0, 0, 0, 0]);
        assert_eq!(payload.newest, &input);
    }

    #[test]
    fn captured_only_without_wrap_trims_to_input() {
        let input = [10u8, 11, 12];
        let ring = fill(8, &input, 2);

        let payload = payload(&ring, PayloadPolicy::CapturedOnly);
        assert_eq!(payload.len(), 3);
        assert!(payload.oldest.is_empty());
        assert_eq!(payload.to_vec(), input.to_vec());
    }

    #[test]
    fn wrapped_stream_yields_last_capacity_bytes() {
        let capacity = 300;
        let input = markers(capacity + 77);
        let ring = fill(capacity, &input, 64);
        assert_eq!(ring.cursor(), 77);

        let expected = &input[input.len() - capacity..];
        for policy in [PayloadPolicy::FullWindow, PayloadPolicy::CapturedOnly] {
            let payload = payload(&ring, policy);
            assert_eq!(payload.len(), capacity);
            assert_eq!(payload.to_vec(), expected);
        }
        assert_eq!(linearize(ring.as_bytes(), ring.cursor()), expected);
    }

    #[test]
    fn empty_input_full_window_is_all_zero() {
        let ring = RingBuffer::new(16).unwrap();

        let full = payload(&ring, PayloadPolicy::FullWindow);
        assert_eq!(full.oldest.len(), 16);
        assert!(full.newest.is_empty());
        assert!(full.to_vec().iter().all(|&b| b == 0));

        assert!(payload(&ring, PayloadPolicy::CapturedOnly).is_empty());
    }

    #[test]
    fn exact_capacity_input_is_not_doubled() {
        let input = markers(32);
        let ring = fill(32, &input, 8);
        assert_eq!(ring.cursor(), 0);

        for policy in [PayloadPolicy::FullWindow, PayloadPolicy::CapturedOnly] {
            let payload = payload(&ring, policy);
            assert_eq!(payload.to_vec(), input);
            assert!(payload.newest.is_empty());
        }
    }
}
