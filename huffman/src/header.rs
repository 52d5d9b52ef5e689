//! What goes in front of the compressed bits so that a decoder can work on its own.
//!
//! ```text
//! +-------+-----------------------+------------------+----------------+---------+
//! | flags | symbol count (u64 LE) | tree (preorder)  | payload        | filler  |
//! | 1 B   | 8 B                   | bits             | bits           | 0..7 b  |
//! +-------+-----------------------+------------------+----------------+---------+
//! ```
//!
//! The tree is written depth first: a `0` bit for an internal node, followed by its left then
//! its right subtree, a `1` bit for a leaf, followed by the 8 bits of its symbol. A tree holding
//! a single symbol is written as that lone leaf.
//!
//! An empty input is compressed to nothing at all, there is no header for it.

use std::io::{ErrorKind, Read, Write};

use crate::{
    decoder::DecodingError,
    io::{BitReader, BitWriter},
    tree::{HuffmanTree, Node, Symbol},
    Endianness,
};

const LITTLE_ENDIAN_FLAG: u8 = 0b0000_0001;
const KNOWN_FLAGS: u8 = LITTLE_ENDIAN_FLAG;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub endianness: Endianness,
    /// Number of symbols encoded in the payload.
    pub symbol_count: u64,
}

impl FrameHeader {
    pub fn write<W: Write>(&self, into: &mut W) -> Result<(), std::io::Error> {
        let flags = match self.endianness {
            Endianness::BigEndian => 0,
            Endianness::LittleEndian => LITTLE_ENDIAN_FLAG,
        };
        into.write_all(&[flags])?;
        into.write_all(&self.symbol_count.to_le_bytes())?;
        Ok(())
    }

    /// Reads a header. `Ok(None)` if the data is empty, which is how an empty input compresses.
    pub fn read<R: Read>(data: &mut R) -> Result<Option<Self>, DecodingError> {
        let mut flags = [0; 1];
        loop {
            match data.read(&mut flags) {
                Ok(0) => return Ok(None),
                Ok(_) => break,
                Err(error) if error.kind() == ErrorKind::Interrupted => continue,
                Err(error) => return Err(error.into()),
            }
        }

        let flags = flags[0];
        if flags & !KNOWN_FLAGS != 0 {
            return Err(DecodingError::MalformedStream("Unknown header flags"));
        }
        let endianness = if flags & LITTLE_ENDIAN_FLAG != 0 {
            Endianness::LittleEndian
        } else {
            Endianness::BigEndian
        };

        let mut count = [0; 8];
        data.read_exact(&mut count).map_err(truncated("Truncated header"))?;
        let symbol_count = u64::from_le_bytes(count);
        if symbol_count == 0 {
            return Err(DecodingError::MalformedStream("Header announces no symbol"));
        }

        Ok(Some(Self {
            endianness,
            symbol_count,
        }))
    }
}

/// Maps running out of data to a malformed stream error, other I/O errors are kept.
fn truncated(message: &'static str) -> impl Fn(std::io::Error) -> DecodingError {
    move |error| {
        if error.kind() == ErrorKind::UnexpectedEof {
            DecodingError::MalformedStream(message)
        } else {
            DecodingError::Io(error)
        }
    }
}

impl HuffmanTree {
    /// Writes the shape of the tree and its symbols. Frequencies are not persisted.
    pub fn write_to<B: BitWriter>(&self, bit_writer: &mut B) -> Result<(), std::io::Error> {
        let mut stack = match self.root() {
            Node::Internal {
                left: None, right, ..
            } => vec![&**right],
            root => vec![root],
        };

        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf(symbol) => {
                    bit_writer.write_bit(true)?;
                    bit_writer.write(symbol.value() as u16, 8)?;
                }
                Node::Internal { left, right, .. } => {
                    bit_writer.write_bit(false)?;
                    stack.push(&**right);
                    if let Some(left) = left {
                        stack.push(&**left);
                    }
                }
            }
        }

        Ok(())
    }

    /// Reads back a tree written by [HuffmanTree::write_to].
    ///
    /// The tree has the same shape and symbols as the one written, with all frequencies at zero.
    ///
    /// # Errors
    ///
    /// [DecodingError::MalformedStream] if the data ends before the tree does, or if the tree
    /// holds a symbol twice.
    pub fn read_from<B: BitReader>(bit_reader: &mut B) -> Result<Self, DecodingError> {
        // Internal nodes whose left subtree is complete, waiting for their right one.
        let mut pending: Vec<Option<Node>> = vec![];
        let mut seen = [false; 256];

        loop {
            let is_leaf = bit_reader
                .read_bit()?
                .ok_or(DecodingError::MalformedStream("Truncated tree"))?;

            if !is_leaf {
                if pending.len() >= 255 {
                    return Err(DecodingError::MalformedStream("Tree is too deep"));
                }
                pending.push(None);
                continue;
            }

            let value = bit_reader
                .read_one(8)
                .map_err(truncated("Truncated tree"))? as u8;
            if seen[value as usize] {
                return Err(DecodingError::MalformedStream("Symbol appears twice in tree"));
            }
            seen[value as usize] = true;

            let mut node = Node::Leaf(Symbol::new(value, 0));
            loop {
                match pending.pop() {
                    None => return Ok(HuffmanTree::from_root(node)),
                    Some(None) => {
                        pending.push(Some(node));
                        break;
                    }
                    Some(Some(left)) => node = Node::merge(left, node),
                }
            }
        }
    }
}
