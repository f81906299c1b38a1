//! FIFO worklist of traversal-eligible cells.

use std::collections::VecDeque;

/// Queue of cells whose dependency count has reached zero.
///
/// Coordinates are packed into a row-major linear index so the queue
/// stays a flat ring buffer. Each cell is pushed at most once over a
/// whole pass; the conservation of dependency decrements guarantees
/// that, so the queue does no duplicate tracking of its own.
pub(crate) struct Worklist {
    queue: VecDeque<u32>,
    cols: u32,
}

impl Worklist {
    pub fn new(cols: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            cols,
        }
    }

    /// Queue an owned cell.
    pub fn push(&mut self, r: i32, c: i32) {
        debug_assert!(r >= 0 && c >= 0 && (c as u32) < self.cols);
        self.queue.push_back(r as u32 * self.cols + c as u32);
    }

    /// Next cell in arrival order.
    pub fn pop(&mut self) -> Option<(i32, i32)> {
        self.queue.pop_front().map(|packed| {
            ((packed / self.cols) as i32, (packed % self.cols) as i32)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_push_order() {
        let mut list = Worklist::new(5);
        list.push(0, 3);
        list.push(2, 0);
        list.push(1, 4);
        assert_eq!(list.len(), 3);
        assert_eq!(list.pop(), Some((0, 3)));
        assert_eq!(list.pop(), Some((2, 0)));
        assert_eq!(list.pop(), Some((1, 4)));
        assert_eq!(list.pop(), None);
        assert!(list.is_empty());
    }
}
