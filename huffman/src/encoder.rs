//! Contains the raw payload encoder and the self-describing framed encoder.

use std::io::{BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};

use log::debug;

use crate::{
    frequency::FrequencyTable,
    header::FrameHeader,
    io::{BigEndianWriter, BitWriter, LittleEndianWriter},
    table::CodeTable,
    tree::HuffmanTree,
    Endianness,
};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// The error type for encoding operations.
///
/// Encapsulate [std::io::Error] and expose symbols the code table can't encode.
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    /// An I/O error happened when reading or writing data.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The data holds a byte that has no code in the table it is encoded with.
    #[error("Symbol {0:#04x} has no code in the table")]
    UnencodableSymbol(u8),
}

/// Writes the code of every byte of `data` to `bit_writer`, in order.
///
/// Returns the number of bits written. The writer is neither filled nor flushed.
///
/// # Errors
///
/// [EncodingError::UnencodableSymbol] on the first byte without a code, or any I/O error.
pub fn encode_symbols<R: Read, B: BitWriter>(
    table: &CodeTable,
    mut data: R,
    bit_writer: &mut B,
) -> Result<u64, EncodingError> {
    let mut buffer = [0; READ_CHUNK_SIZE];
    let mut bit_count = 0;

    loop {
        let read = match data.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(error) if error.kind() == ErrorKind::Interrupted => continue,
            Err(error) => return Err(error.into()),
        };

        for &symbol in &buffer[..read] {
            let code = table
                .get(symbol)
                .ok_or(EncodingError::UnencodableSymbol(symbol))?;
            for bit in code.iter() {
                bit_writer.write_bit(bit)?;
            }
            bit_count += code.len() as u64;
        }
    }

    Ok(bit_count)
}

/// Encoder of the bare payload: the codes of the data, with no header.
///
/// The decoder needs the same tree and, to skip the filler bits of the last byte, the number of
/// symbols. Prefer [HuffmanEncoder] unless both are stored elsewhere.
pub struct BitEncoder;

impl BitEncoder {
    /// Encodes `data` with the codes of `table`.
    ///
    /// # Arguments
    ///
    /// * `table` - Codes to use, typically built from a tree of the same data.
    /// * `data` - The source data to be compressed.
    /// * `into` - The output where compressed data should be written.
    /// * `endianness` - Bit ordering when writing compressed data.
    ///
    /// # Errors
    ///
    /// This function can fail on an [std::io::Error] or on a byte missing from the table.
    ///
    /// # Examples
    ///
    /// ```
    /// use huffweg::{
    ///     encoder::{BitEncoder, EncodingError},
    ///     CodeTable, Endianness, HuffmanTree,
    /// };
    ///
    /// fn main() -> Result<(), EncodingError> {
    ///     let data = b"aaabbc";
    ///     let table = CodeTable::new(&HuffmanTree::from_bytes(data).unwrap());
    ///     let mut output = vec![];
    ///
    ///     let bits = BitEncoder::encode(&table, &data[..], &mut output, Endianness::BigEndian)?;
    ///
    ///     assert_eq!(bits, 9);
    ///     assert_eq!(output, [0x1F, 0x00]);
    ///     Ok(())
    /// }
    /// ```
    pub fn encode<R: Read, W: Write>(
        table: &CodeTable,
        data: R,
        into: W,
        endianness: Endianness,
    ) -> Result<u64, EncodingError> {
        match endianness {
            Endianness::BigEndian => {
                BitEncoder::inner_encode(table, data, BigEndianWriter::new(into))
            }
            Endianness::LittleEndian => {
                BitEncoder::inner_encode(table, data, LittleEndianWriter::new(into))
            }
        }
    }

    fn inner_encode<R: Read, B: BitWriter>(
        table: &CodeTable,
        data: R,
        mut bit_writer: B,
    ) -> Result<u64, EncodingError> {
        let bit_count = encode_symbols(table, data, &mut bit_writer)?;

        bit_writer.fill()?;
        bit_writer.flush()?;

        Ok(bit_count)
    }
}

/// Huffman encoder producing a self-describing stream: a header with the bit order, the symbol
/// count and the tree, followed by the codes of the data.
///
/// The data has to be read twice, once to count its symbols and once to encode them.
pub struct HuffmanEncoder;

impl HuffmanEncoder {
    /// Compresses `data`, keeping it in memory between the two passes.
    ///
    /// Use [HuffmanEncoder::encode_seekable] to read a file twice instead.
    ///
    /// # Arguments
    ///
    /// * `data` - The source data to be compressed.
    /// * `into` - The output where compressed data should be written.
    /// * `endianness` - Bit ordering when writing compressed data.
    ///
    /// # Errors
    ///
    /// This function can fail on an [std::io::Error].
    ///
    /// # Examples
    ///
    /// ```
    /// use huffweg::{
    ///     encoder::{EncodingError, HuffmanEncoder},
    ///     Endianness,
    /// };
    ///
    /// fn main() -> Result<(), EncodingError> {
    ///     let mut output = vec![];
    ///
    ///     HuffmanEncoder::encode(&b"aaabbc"[..], &mut output, Endianness::BigEndian)?;
    ///
    ///     assert_eq!(
    ///         output,
    ///         [0x00, 6, 0, 0, 0, 0, 0, 0, 0, 0x58, 0x56, 0x3B, 0x10, 0xF8]
    ///     );
    ///     Ok(())
    /// }
    /// ```
    pub fn encode<R: Read, W: Write>(
        mut data: R,
        into: W,
        endianness: Endianness,
    ) -> Result<(), EncodingError> {
        let mut bytes = vec![];
        data.read_to_end(&mut bytes)?;

        let frequencies = FrequencyTable::from(&bytes[..]);
        HuffmanEncoder::encode_counted(&frequencies, &bytes[..], into, endianness)
    }

    /// Compresses `data`, seeking back to where it started after counting its symbols.
    ///
    /// # Errors
    ///
    /// This function can fail on an [std::io::Error].
    pub fn encode_seekable<R: Read + Seek, W: Write>(
        mut data: R,
        into: W,
        endianness: Endianness,
    ) -> Result<(), EncodingError> {
        let start = data.stream_position()?;
        let frequencies = FrequencyTable::count(&mut data)?;
        data.seek(SeekFrom::Start(start))?;

        HuffmanEncoder::encode_counted(&frequencies, data, into, endianness)
    }

    /// Compresses `data` into a new [Vec<u8>].
    ///
    /// # Errors
    ///
    /// This function can fail on an [std::io::Error].
    ///
    /// # Examples
    ///
    /// ```
    /// use huffweg::{
    ///     encoder::{EncodingError, HuffmanEncoder},
    ///     Endianness,
    /// };
    ///
    /// fn main() -> Result<(), EncodingError> {
    ///     let output = HuffmanEncoder::encode_to_vec(&b"aaabbc"[..], Endianness::LittleEndian)?;
    ///
    ///     assert_eq!(output[0], 0x01);
    ///     assert_eq!(output[1..9], [6, 0, 0, 0, 0, 0, 0, 0]);
    ///     Ok(())
    /// }
    /// ```
    pub fn encode_to_vec<R: Read>(data: R, endianness: Endianness) -> Result<Vec<u8>, EncodingError> {
        let mut output = vec![];
        HuffmanEncoder::encode(data, &mut output, endianness)?;
        Ok(output)
    }

    /// Writes the header then the codes, `data` must hold exactly the counted symbols.
    fn encode_counted<R: Read, W: Write>(
        frequencies: &FrequencyTable,
        data: R,
        into: W,
        endianness: Endianness,
    ) -> Result<(), EncodingError> {
        let tree = match HuffmanTree::from_frequencies(frequencies) {
            Some(tree) => tree,
            None => return Ok(()),
        };
        let table = CodeTable::new(&tree);

        let mut into = BufWriter::new(into);
        let header = FrameHeader {
            endianness,
            symbol_count: frequencies.total(),
        };
        header.write(&mut into)?;

        let bit_count = match endianness {
            Endianness::BigEndian => {
                HuffmanEncoder::write_body(&tree, &table, data, BigEndianWriter::new(&mut into))?
            }
            Endianness::LittleEndian => {
                HuffmanEncoder::write_body(&tree, &table, data, LittleEndianWriter::new(&mut into))?
            }
        };
        into.flush()?;

        debug!(
            "Encoded {} symbols into {} bits",
            header.symbol_count, bit_count
        );
        Ok(())
    }

    fn write_body<R: Read, B: BitWriter>(
        tree: &HuffmanTree,
        table: &CodeTable,
        data: R,
        mut bit_writer: B,
    ) -> Result<u64, EncodingError> {
        tree.write_to(&mut bit_writer)?;
        let bit_count = encode_symbols(table, data, &mut bit_writer)?;

        bit_writer.fill()?;
        bit_writer.flush()?;

        Ok(bit_count)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn encode_example_payload() -> Result<(), EncodingError> {
        let data = b"aaabbc";
        let table = CodeTable::new(&HuffmanTree::from_bytes(data).unwrap());

        let mut big_endian = vec![];
        let bits = BitEncoder::encode(&table, &data[..], &mut big_endian, Endianness::BigEndian)?;
        assert_eq!(bits, 9);
        assert_eq!(big_endian, [0x1F, 0x00]);

        let mut little_endian = vec![];
        BitEncoder::encode(
            &table,
            &data[..],
            &mut little_endian,
            Endianness::LittleEndian,
        )?;
        assert_eq!(little_endian, [0xF8, 0x00]);

        Ok(())
    }

    #[test]
    fn encode_example_framed() -> Result<(), EncodingError> {
        let compressed = HuffmanEncoder::encode_to_vec(&b"aaabbc"[..], Endianness::BigEndian)?;

        assert_eq!(
            compressed,
            [0x00, 6, 0, 0, 0, 0, 0, 0, 0, 0x58, 0x56, 0x3B, 0x10, 0xF8]
        );

        Ok(())
    }

    #[test]
    fn encode_nothing() -> Result<(), EncodingError> {
        assert!(HuffmanEncoder::encode_to_vec(std::io::empty(), Endianness::BigEndian)?.is_empty());

        let mut output = vec![];
        let bits = BitEncoder::encode(
            &CodeTable::default(),
            std::io::empty(),
            &mut output,
            Endianness::BigEndian,
        )?;
        assert_eq!(bits, 0);
        assert!(output.is_empty());

        Ok(())
    }

    #[test]
    fn encode_single_symbol() -> Result<(), EncodingError> {
        let data = [b'a'; 1000];

        let compressed = HuffmanEncoder::encode_to_vec(&data[..], Endianness::BigEndian)?;

        // Flags, count, a 9 bit tree and 1000 one bits.
        assert_eq!(compressed.len(), 1 + 8 + (9 + 1000 + 7) / 8);
        assert_eq!(compressed[1..9], 1000u64.to_le_bytes());

        Ok(())
    }

    #[test]
    fn unencodable_symbol() {
        let table = CodeTable::new(&HuffmanTree::from_bytes(b"ab").unwrap());

        let result = BitEncoder::encode(&table, &b"abc"[..], vec![], Endianness::BigEndian);

        assert!(matches!(result, Err(EncodingError::UnencodableSymbol(b'c'))));
    }

    #[test]
    fn bits_match_the_tree() -> Result<(), EncodingError> {
        let data = include_bytes!("../../test-assets/lorem_ipsum.txt");
        let tree = HuffmanTree::from_bytes(data).unwrap();
        let table = CodeTable::new(&tree);

        let mut output = vec![];
        let bits = BitEncoder::encode(&table, &data[..], &mut output, Endianness::BigEndian)?;

        assert_eq!(bits, tree.weighted_path_length());
        assert_eq!(output.len() as u64, (bits + 7) / 8);

        Ok(())
    }

    #[test]
    fn seekable_matches_buffered() -> Result<(), EncodingError> {
        let data = include_bytes!("../../test-assets/lorem_ipsum.txt");
        let buffered = HuffmanEncoder::encode_to_vec(&data[..], Endianness::LittleEndian)?;

        // Start past a prefix that is not part of the data.
        let mut source = b"skipped".to_vec();
        source.extend_from_slice(data);
        let mut cursor = Cursor::new(source);
        cursor.seek(SeekFrom::Start(7))?;

        let mut seekable = vec![];
        HuffmanEncoder::encode_seekable(cursor, &mut seekable, Endianness::LittleEndian)?;

        assert_eq!(seekable, buffered);

        Ok(())
    }

    #[test]
    fn encode_twice_same_output() -> Result<(), EncodingError> {
        let data = b"abracadabra, abracadabra";

        let first = HuffmanEncoder::encode_to_vec(&data[..], Endianness::BigEndian)?;
        let second = HuffmanEncoder::encode_to_vec(&data[..], Endianness::BigEndian)?;

        assert_eq!(first, second);

        Ok(())
    }
}
