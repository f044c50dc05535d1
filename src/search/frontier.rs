//! Priority frontier with insertion-order tie-breaking

use std::{cmp::Ordering, collections::BinaryHeap, rc::Rc};

use super::Node;

struct Entry<S, A> {
    priority: u32,
    seq: u64,
    node: Rc<Node<S, A>>,
}

impl<S, A> PartialEq for Entry<S, A> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl<S, A> Eq for Entry<S, A> {}

impl<S, A> PartialOrd for Entry<S, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S, A> Ord for Entry<S, A> {
    // Reversed so the max-heap pops the lowest priority, oldest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-priority queue of search nodes. Equal priorities pop in insertion order.
pub(crate) struct PriorityFrontier<S, A> {
    heap: BinaryHeap<Entry<S, A>>,
    next_seq: u64,
    max_len: usize,
}

impl<S, A> PriorityFrontier<S, A> {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
            max_len: 0,
        }
    }

    pub(crate) fn push(&mut self, priority: u32, node: Rc<Node<S, A>>) {
        self.heap.push(Entry {
            priority,
            seq: self.next_seq,
            node,
        });
        self.next_seq += 1;
        self.max_len = self.max_len.max(self.heap.len());
    }

    pub(crate) fn pop(&mut self) -> Option<Rc<Node<S, A>>> {
        self.heap.pop().map(|entry| entry.node)
    }

    pub(crate) fn max_len(&self) -> usize {
        self.max_len
    }
}
