//! Bounded FIFO of pending block transfers.

use crate::command::Descriptor;

/// Ring buffer of `K` descriptor slots.
///
/// The flush path fills the tail slot in place, the engine consumes from the
/// head inside the hardware-completion context. The queue itself does no
/// locking: every call happens under the critical section that guards the
/// whole [`crate::TransferEngine`], which is what makes producer and
/// consumer mutually exclusive.
///
/// Descriptor payloads are DMA source buffers, so whatever owns this queue
/// must live in memory the DMA controller can reach.
pub struct TransferQueue<const K: usize, const N: usize> {
    slots: [Descriptor<N>; K],
    head: usize,
    tail: usize,
    count: usize,
}

impl<const K: usize, const N: usize> TransferQueue<K, N> {
    pub const fn new() -> Self {
        Self {
            slots: [Descriptor::EMPTY; K],
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Fills the tail slot via `fill` and commits it.
    ///
    /// Returns `false` without calling `fill` when the queue is full;
    /// backpressure is the caller's problem (the flush path retries with a
    /// short delay).
    pub fn enqueue_with(&mut self, fill: impl FnOnce(&mut Descriptor<N>)) -> bool {
        if self.count >= K {
            return false;
        }
        fill(&mut self.slots[self.tail]);
        self.tail = (self.tail + 1) % K;
        self.count += 1;
        true
    }

    /// Retires the front descriptor. Returns whether the queue is now empty.
    ///
    /// Dequeueing an already empty queue changes nothing and reports empty.
    pub fn dequeue(&mut self) -> bool {
        if self.count == 0 {
            return true;
        }
        self.head = (self.head + 1) % K;
        self.count -= 1;
        self.count == 0
    }

    /// The descriptor currently at the front (the one in transmission).
    pub fn front(&self) -> Option<&Descriptor<N>> {
        (self.count > 0).then(|| &self.slots[self.head])
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count >= K
    }
}

impl<const K: usize, const N: usize> Default for TransferQueue<K, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(desc: &mut Descriptor<4>, tag: u8) {
        desc.payload[0] = tag;
        desc.payload_len = 1;
    }

    #[test]
    fn eleventh_enqueue_fails_until_one_dequeue() {
        let mut q: TransferQueue<10, 4> = TransferQueue::new();
        for i in 0..10 {
            assert!(q.enqueue_with(|d| stamp(d, i)), "enqueue {i} should fit");
        }
        assert!(q.is_full());
        assert!(!q.enqueue_with(|d| stamp(d, 10)));
        assert_eq!(q.len(), 10);

        assert!(!q.dequeue());
        assert!(q.enqueue_with(|d| stamp(d, 10)));
        assert_eq!(q.len(), 10);
    }

    #[test]
    fn count_never_exceeds_capacity_or_goes_negative() {
        let mut q: TransferQueue<3, 4> = TransferQueue::new();
        for round in 0..5u8 {
            for i in 0..3 {
                q.enqueue_with(|d| stamp(d, round * 3 + i));
                assert!(q.len() <= 3);
            }
            assert!(!q.enqueue_with(|d| stamp(d, 0xFF)));
            while !q.is_empty() {
                q.dequeue();
            }
            assert_eq!(q.len(), 0);
        }
    }

    #[test]
    fn front_follows_fifo_order_across_wrap() {
        let mut q: TransferQueue<3, 4> = TransferQueue::new();
        for i in 0..3 {
            q.enqueue_with(|d| stamp(d, i));
        }
        assert_eq!(q.front().unwrap().payload(), &[0]);
        q.dequeue();
        q.enqueue_with(|d| stamp(d, 3));

        for expect in 1..=3u8 {
            assert_eq!(q.front().unwrap().payload(), &[expect]);
            q.dequeue();
        }
        assert!(q.front().is_none());
    }

    #[test]
    fn dequeue_on_empty_queue_is_harmless() {
        let mut q: TransferQueue<2, 4> = TransferQueue::new();
        assert!(q.dequeue());
        assert_eq!(q.len(), 0);
        assert!(!q.is_full());

        assert!(q.enqueue_with(|d| stamp(d, 7)));
        assert_eq!(q.len(), 1);
        assert_eq!(q.front().unwrap().payload(), &[7]);
    }

    #[test]
    fn dequeue_reports_emptiness() {
        let mut q: TransferQueue<2, 4> = TransferQueue::new();
        q.enqueue_with(|d| stamp(d, 0));
        q.enqueue_with(|d| stamp(d, 1));
        assert!(!q.dequeue());
        assert!(q.dequeue());
    }
}
