//! A straightforward Huffman coder: codes as strings, an arena for the tree, and bitstream-io
//! for the packing. Slow, but easy to check by eye.

use std::{cmp::Reverse, collections::BinaryHeap};

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use indexmap::IndexMap;

use crate::HuffmanCodec;

/// Counts of each byte, in the order they first show up.
pub fn count(bytes: &[u8]) -> IndexMap<u8, u64> {
    let mut counts = IndexMap::new();
    for &byte in bytes {
        *counts.entry(byte).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone)]
struct ArenaNode {
    frequency: u64,
    symbol: Option<u8>,
    left: Option<usize>,
    right: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<ArenaNode>,
    root: usize,
}

impl Tree {
    pub fn new(counts: &IndexMap<u8, u64>) -> Option<Self> {
        let mut nodes: Vec<ArenaNode> = counts
            .iter()
            .map(|(&symbol, &frequency)| ArenaNode {
                frequency,
                symbol: Some(symbol),
                left: None,
                right: None,
            })
            .collect();

        // The arena index doubles as a tie-breaker.
        let mut heap: BinaryHeap<_> = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| Reverse((node.frequency, index)))
            .collect();

        while heap.len() > 1 {
            let Reverse((left_frequency, left)) = heap.pop().unwrap();
            let Reverse((right_frequency, right)) = heap.pop().unwrap();

            let frequency = left_frequency + right_frequency;
            nodes.push(ArenaNode {
                frequency,
                symbol: None,
                left: Some(left),
                right: Some(right),
            });
            heap.push(Reverse((frequency, nodes.len() - 1)));
        }

        let Reverse((_, root)) = heap.pop()?;
        Some(Self { nodes, root })
    }

    /// Codes as strings of '0' and '1'. A lone symbol gets "0".
    pub fn codes(&self) -> IndexMap<u8, String> {
        let mut codes = IndexMap::new();
        self.collect_codes(self.root, String::new(), &mut codes);
        codes
    }

    fn collect_codes(&self, index: usize, prefix: String, codes: &mut IndexMap<u8, String>) {
        let node = &self.nodes[index];
        if let Some(symbol) = node.symbol {
            let code = if prefix.is_empty() {
                "0".to_string()
            } else {
                prefix
            };
            codes.insert(symbol, code);
            return;
        }

        if let Some(left) = node.left {
            self.collect_codes(left, format!("{prefix}0"), codes);
        }
        if let Some(right) = node.right {
            self.collect_codes(right, format!("{prefix}1"), codes);
        }
    }

    fn is_single(&self) -> bool {
        self.nodes[self.root].symbol.is_some()
    }
}

/// Everything needed to get the data back.
#[derive(Debug, Clone)]
pub struct Packed {
    pub tree: Option<Tree>,
    pub bit_len: u64,
    pub bytes: Vec<u8>,
}

pub struct WithStrings;

impl HuffmanCodec for WithStrings {
    type Compressed = Packed;

    fn compress(bytes: &[u8]) -> Packed {
        let tree = Tree::new(&count(bytes));
        let codes = tree.as_ref().map(Tree::codes).unwrap_or_default();

        let mut packed = vec![];
        let mut writer = BitWriter::endian(&mut packed, BigEndian);
        let mut bit_len = 0;
        for byte in bytes {
            for bit in codes[byte].chars() {
                writer.write_bit(bit == '1').unwrap();
                bit_len += 1;
            }
        }
        writer.byte_align().unwrap();
        drop(writer);

        Packed {
            tree,
            bit_len,
            bytes: packed,
        }
    }

    fn decompress(data: &Packed) -> Vec<u8> {
        let tree = match &data.tree {
            Some(tree) => tree,
            None => return vec![],
        };

        let mut reader = BitReader::endian(&data.bytes[..], BigEndian);
        let mut output = vec![];
        let mut index = tree.root;

        for _ in 0..data.bit_len {
            let bit = reader.read_bit().unwrap();
            if !tree.is_single() {
                let node = &tree.nodes[index];
                index = if bit { node.right } else { node.left }.unwrap();
            }

            let node = &tree.nodes[index];
            if let Some(symbol) = node.symbol {
                output.push(symbol);
                index = tree.root;
            }
        }

        output
    }
}
