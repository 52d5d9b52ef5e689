//! Huffman encoder and decoder.
//!
//! This crate builds an optimal prefix-free code for the bytes of some data, and uses it to
//! compress and decompress that data. It works with any [std::io::Read] and [std::io::Write].
//!
//! The building blocks are exposed as well: count symbols with a [FrequencyTable], grow a
//! [HuffmanTree] out of a [Forest], derive codes with a [CodeTable].
//!
//! # Examples
//!
//! ```
//! use huffweg::{
//!     decoder::HuffmanDecoder,
//!     encoder::HuffmanEncoder,
//!     Endianness,
//! };
//!
//! let data = b"aaabbc";
//! let mut compressed = vec![];
//! let mut decompressed = vec![];
//!
//! HuffmanEncoder::encode(&data[..], &mut compressed, Endianness::BigEndian).unwrap();
//!
//! assert_eq!(
//!     compressed,
//!     [0x00, 6, 0, 0, 0, 0, 0, 0, 0, 0x58, 0x56, 0x3B, 0x10, 0xF8]
//! );
//!
//! HuffmanDecoder::decode(&compressed[..], &mut decompressed).unwrap();
//!
//! assert_eq!(decompressed, data);
//! ```

pub mod decoder;
pub mod encoder;
pub mod forest;
pub mod frequency;
pub mod header;
pub mod io;
pub mod table;
pub mod tree;

pub use decoder::DecodingError;
pub use encoder::EncodingError;
pub use forest::Forest;
pub use frequency::FrequencyTable;
pub use table::{Code, CodeTable};
pub use tree::{HuffmanTree, Node, Symbol};

/// The bit ordering when packing codes into bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    /// Most significant order.
    #[default]
    BigEndian,
    /// Least significant order.
    LittleEndian,
}

/// Compresses `data` in big endian order.
///
/// ```
/// let compressed = huffweg::compress(b"hello, world");
///
/// assert_eq!(huffweg::decompress(&compressed).unwrap(), b"hello, world");
/// assert!(huffweg::compress(&[]).is_empty());
/// ```
pub fn compress(data: &[u8]) -> Vec<u8> {
    // Writing to a Vec can't fail, and every byte of the data gets a code.
    encoder::HuffmanEncoder::encode_to_vec(data, Endianness::BigEndian).unwrap_or_default()
}

/// Decompresses data produced by [compress] or [encoder::HuffmanEncoder].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, DecodingError> {
    decoder::HuffmanDecoder::decode_to_vec(data)
}
