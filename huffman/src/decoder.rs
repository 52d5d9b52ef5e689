use std::io::{BufReader, BufWriter, Read, Write};

use log::debug;

use crate::{
    header::FrameHeader,
    io::{BigEndianReader, BitReader, LittleEndianReader},
    tree::{HuffmanTree, Node},
    Endianness,
};

const WRITE_BUFFER_SIZE: usize = 4096;

#[derive(Debug, thiserror::Error)]
pub enum DecodingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Malformed stream: {0}")]
    MalformedStream(&'static str),
}

/// Walks `tree` one bit at a time, writing a symbol each time a leaf is reached.
///
/// Stops when the bits run out, or once `symbol_limit` symbols are written. Without a limit, the
/// filler bits of the last byte are decoded like any other bits. Returns the number of symbols
/// written.
///
/// # Errors
///
/// [DecodingError::MalformedStream] if a bit leads nowhere, if the bits end in the middle of a
/// code, or if they end before `symbol_limit` symbols are written.
pub fn decode_symbols<B: BitReader, W: Write>(
    tree: Option<&HuffmanTree>,
    bit_reader: &mut B,
    mut into: W,
    symbol_limit: Option<u64>,
) -> Result<u64, DecodingError> {
    let root = match tree {
        Some(tree) => tree.root(),
        None => return Ok(0),
    };

    let mut buffer = Vec::with_capacity(WRITE_BUFFER_SIZE);
    let mut symbol_count = 0;
    let mut node = root;

    while symbol_limit.map_or(true, |limit| symbol_count < limit) {
        let bit = match bit_reader.read_bit()? {
            Some(bit) => bit,
            None if symbol_limit.is_some() => {
                return Err(DecodingError::MalformedStream("Missing symbols"));
            }
            // Filler bits may stop mid code.
            None => break,
        };

        node = node
            .child(bit)
            .ok_or(DecodingError::MalformedStream("Code leads to no symbol"))?;

        if let Node::Leaf(symbol) = node {
            buffer.push(symbol.value());
            symbol_count += 1;
            node = root;

            if buffer.len() == WRITE_BUFFER_SIZE {
                into.write_all(&buffer)?;
                buffer.clear();
            }
        }
    }

    into.write_all(&buffer)?;
    into.flush()?;

    Ok(symbol_count)
}

/// Decoder of the bare payload written by [crate::encoder::BitEncoder].
pub struct BitDecoder;

impl BitDecoder {
    /// Decodes `data` with `tree`.
    ///
    /// # Arguments
    ///
    /// * `tree` - The tree the data was encoded with, `None` for an empty input.
    /// * `data` - The compressed payload.
    /// * `into` - The output where decompressed data should be written.
    /// * `endianness` - Bit ordering the payload was written with.
    /// * `symbol_limit` - Number of symbols to decode. Without it, the zero bits filling the last
    ///   byte may come out as extra symbols.
    ///
    /// # Examples
    ///
    /// ```
    /// use huffweg::{
    ///     decoder::{BitDecoder, DecodingError},
    ///     Endianness, HuffmanTree,
    /// };
    ///
    /// fn main() -> Result<(), DecodingError> {
    ///     let tree = HuffmanTree::from_bytes(b"aaabbc");
    ///     let mut output = vec![];
    ///
    ///     BitDecoder::decode(
    ///         tree.as_ref(),
    ///         &[0x1F, 0x00][..],
    ///         &mut output,
    ///         Endianness::BigEndian,
    ///         Some(6),
    ///     )?;
    ///
    ///     assert_eq!(output, b"aaabbc");
    ///     Ok(())
    /// }
    /// ```
    pub fn decode<R: Read, W: Write>(
        tree: Option<&HuffmanTree>,
        data: R,
        into: W,
        endianness: Endianness,
        symbol_limit: Option<u64>,
    ) -> Result<u64, DecodingError> {
        match endianness {
            Endianness::BigEndian => decode_symbols(
                tree,
                &mut BigEndianReader::new(data),
                into,
                symbol_limit,
            ),
            Endianness::LittleEndian => decode_symbols(
                tree,
                &mut LittleEndianReader::new(data),
                into,
                symbol_limit,
            ),
        }
    }
}

/// Decoder of the streams written by [crate::encoder::HuffmanEncoder].
///
/// Everything needed is in the stream itself: bit order, symbol count and tree.
pub struct HuffmanDecoder;

impl HuffmanDecoder {
    /// Decompresses `data`.
    ///
    /// # Errors
    ///
    /// This function can fail on an [std::io::Error], or with
    /// [DecodingError::MalformedStream] when `data` wasn't produced by the encoder.
    ///
    /// # Examples
    ///
    /// ```
    /// use huffweg::decoder::{DecodingError, HuffmanDecoder};
    ///
    /// fn main() -> Result<(), DecodingError> {
    ///     let data = [0x00, 6, 0, 0, 0, 0, 0, 0, 0, 0x58, 0x56, 0x3B, 0x10, 0xF8];
    ///     let mut output = vec![];
    ///
    ///     HuffmanDecoder::decode(&data[..], &mut output)?;
    ///
    ///     assert_eq!(output, b"aaabbc");
    ///     Ok(())
    /// }
    /// ```
    pub fn decode<R: Read, W: Write>(data: R, into: W) -> Result<(), DecodingError> {
        let mut data = BufReader::new(data);
        let header = match FrameHeader::read(&mut data)? {
            Some(header) => header,
            None => return Ok(()),
        };

        let into = BufWriter::new(into);
        let symbol_count = match header.endianness {
            Endianness::BigEndian => {
                HuffmanDecoder::read_body(&mut BigEndianReader::new(data), into, header)?
            }
            Endianness::LittleEndian => {
                HuffmanDecoder::read_body(&mut LittleEndianReader::new(data), into, header)?
            }
        };

        debug!("Decoded {} symbols", symbol_count);
        Ok(())
    }

    /// Decompresses `data` into a new [Vec<u8>].
    ///
    /// # Errors
    ///
    /// This function can fail on an [std::io::Error], or with
    /// [DecodingError::MalformedStream] when `data` wasn't produced by the encoder.
    pub fn decode_to_vec<R: Read>(data: R) -> Result<Vec<u8>, DecodingError> {
        let mut output = vec![];
        HuffmanDecoder::decode(data, &mut output)?;
        Ok(output)
    }

    fn read_body<B: BitReader, W: Write>(
        bit_reader: &mut B,
        into: W,
        header: FrameHeader,
    ) -> Result<u64, DecodingError> {
        let tree = HuffmanTree::read_from(bit_reader)?;
        decode_symbols(Some(&tree), bit_reader, into, Some(header.symbol_count))
    }
}
