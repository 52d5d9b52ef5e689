//! The Huffman tree and its construction.
//!
//! Construction is greedy: every observed symbol starts as a singleton tree in a [Forest], then
//! the two lightest trees are merged again and again until a single one remains.

use log::debug;

use crate::{forest::Forest, frequency::FrequencyTable};

/// A byte value and the number of times it occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol {
    value: u8,
    frequency: u64,
}

impl Symbol {
    pub fn new(value: u8, frequency: u64) -> Self {
        Self { value, frequency }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn frequency(&self) -> u64 {
        self.frequency
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(Symbol),
    /// `left` is only ever absent on the root of a tree holding a single symbol,
    /// so that this symbol gets the one bit code `1`.
    Internal {
        frequency: u64,
        left: Option<Box<Node>>,
        right: Box<Node>,
    },
}

impl Node {
    /// Merges two trees under a new internal node weighing their sum.
    pub fn merge(left: Node, right: Node) -> Self {
        Node::Internal {
            frequency: left.frequency() + right.frequency(),
            left: Some(Box::new(left)),
            right: Box::new(right),
        }
    }

    pub fn frequency(&self) -> u64 {
        match self {
            Node::Leaf(symbol) => symbol.frequency(),
            Node::Internal { frequency, .. } => *frequency,
        }
    }

    /// The symbol of a leaf, `None` for internal nodes.
    pub fn symbol(&self) -> Option<u8> {
        match self {
            Node::Leaf(symbol) => Some(symbol.value()),
            Node::Internal { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// The child reached by following `bit`: `false` goes left, `true` goes right.
    #[inline]
    pub fn child(&self, bit: bool) -> Option<&Node> {
        match self {
            Node::Leaf(_) => None,
            Node::Internal { left, right, .. } => {
                if bit {
                    Some(&**right)
                } else {
                    left.as_deref()
                }
            }
        }
    }
}

/// A Huffman tree. Its root is always an internal node, so every symbol has a code
/// at least one bit long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Builds the tree for the given symbol counts. `None` if no symbol was counted.
    ///
    /// # Examples
    ///
    /// ```
    /// use huffweg::{FrequencyTable, HuffmanTree};
    ///
    /// let frequencies = FrequencyTable::from(&b"aaabbc"[..]);
    /// let tree = HuffmanTree::from_frequencies(&frequencies).unwrap();
    ///
    /// assert_eq!(tree.size(), 3);
    /// assert_eq!(tree.frequency(), 6);
    /// assert_eq!(tree.weighted_path_length(), 9);
    /// ```
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Option<Self> {
        HuffmanTree::from_forest(Forest::from_frequencies(frequencies))
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        HuffmanTree::from_frequencies(&FrequencyTable::from(bytes))
    }

    /// Condenses the forest into a single tree.
    ///
    /// The first tree taken out of the forest becomes the left child of the merge,
    /// the second one the right child.
    pub fn from_forest(mut forest: Forest) -> Option<Self> {
        let last = loop {
            let first = forest.pop_min()?;
            match forest.pop_min() {
                Some(second) => forest.insert(Node::merge(first, second)),
                None => break first,
            }
        };

        let root = match last {
            leaf @ Node::Leaf(_) => HuffmanTree::wrap_single(leaf),
            root => root,
        };

        let tree = HuffmanTree { root };
        debug!(
            "Built a tree of {} symbols, {} bits deep",
            tree.size(),
            tree.depth()
        );
        Some(tree)
    }

    /// Hangs a lone leaf on the right of an otherwise empty root.
    pub(crate) fn wrap_single(leaf: Node) -> Node {
        Node::Internal {
            frequency: leaf.frequency(),
            left: None,
            right: Box::new(leaf),
        }
    }

    /// Wraps a root read back from a serialized tree.
    pub(crate) fn from_root(root: Node) -> Self {
        let root = if root.is_leaf() {
            HuffmanTree::wrap_single(root)
        } else {
            root
        };
        HuffmanTree { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Frequency of the root, the number of symbols the tree was built from.
    pub fn frequency(&self) -> u64 {
        self.root.frequency()
    }

    /// Number of leaves.
    pub fn size(&self) -> usize {
        self.leaves().count()
    }

    /// Length of the longest code.
    pub fn depth(&self) -> usize {
        self.leaves().map(|(_, depth)| depth).max().unwrap_or(0)
    }

    /// Sum over the leaves of frequency times depth: the number of bits needed to encode
    /// the input the tree was built from.
    pub fn weighted_path_length(&self) -> u64 {
        self.leaves()
            .map(|(symbol, depth)| symbol.frequency() * depth as u64)
            .sum()
    }

    /// Leaves with their depth, depth first, left before right.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            stack: vec![(&self.root, 0)],
        }
    }
}

pub struct Leaves<'a> {
    stack: Vec<(&'a Node, usize)>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = (&'a Symbol, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, depth)) = self.stack.pop() {
            match node {
                Node::Leaf(symbol) => return Some((symbol, depth)),
                Node::Internal { left, right, .. } => {
                    self.stack.push((&**right, depth + 1));
                    if let Some(left) = left {
                        self.stack.push((&**left, depth + 1));
                    }
                }
            }
        }
        None
    }
}
