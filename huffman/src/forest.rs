use std::{cmp::Ordering, cmp::Reverse, collections::BinaryHeap};

use crate::{
    frequency::FrequencyTable,
    tree::{Node, Symbol},
};

/// A tree waiting in the forest, ranked by root frequency then by insertion order.
#[derive(Debug)]
struct Planted {
    frequency: u64,
    sequence: u64,
    node: Node,
}

impl PartialEq for Planted {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Planted {}

impl PartialOrd for Planted {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Planted {
    fn cmp(&self, other: &Self) -> Ordering {
        self.frequency
            .cmp(&other.frequency)
            .then(self.sequence.cmp(&other.sequence))
    }
}

/// The working set of not yet merged trees.
///
/// Trees come out in ascending order of root frequency. Ties go to the tree inserted first,
/// which makes the resulting codes reproducible from one run to the next.
#[derive(Debug, Default)]
pub struct Forest {
    heap: BinaryHeap<Reverse<Planted>>,
    next_sequence: u64,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plants one singleton tree per observed symbol, in ascending byte order.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Self {
        let mut forest = Self::new();
        for (value, frequency) in frequencies.iter() {
            forest.insert(Node::Leaf(Symbol::new(value, frequency)));
        }
        forest
    }

    pub fn insert(&mut self, node: Node) {
        let planted = Planted {
            frequency: node.frequency(),
            sequence: self.next_sequence,
            node,
        };
        self.next_sequence += 1;
        self.heap.push(Reverse(planted));
    }

    /// Removes the tree with the lowest root frequency.
    pub fn pop_min(&mut self) -> Option<Node> {
        self.heap.pop().map(|Reverse(planted)| planted.node)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
