use std::io::{ErrorKind, Read, Write};

pub trait BitReader {
    /// Reads a single bit, or `None` once the underlying reader is exhausted.
    fn read_bit(&mut self) -> Result<Option<bool>, std::io::Error>;

    /// Reads exactly `amount` bits, at most 16. Running out of input is an
    /// [ErrorKind::UnexpectedEof] error.
    fn read_one(&mut self, amount: u8) -> Result<u16, std::io::Error>;
}

/// Reads one byte, retrying on interruption. `Ok(None)` means end of input.
fn next_byte<R: Read>(read: &mut R, buffer: &mut [u8; 1]) -> Result<Option<u8>, std::io::Error> {
    loop {
        match read.read(&mut buffer[..]) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buffer[0])),
            Err(error) if error.kind() == ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        }
    }
}

pub struct LittleEndianReader<R>
where
    R: Read,
{
    read: R,
    cursor: u8,
    byte_buffer: u32,
    read_buffer: [u8; 1],
}

impl<R> LittleEndianReader<R>
where
    R: Read,
{
    pub fn new(read: R) -> Self {
        let cursor = 0;
        let byte_buffer = 0;
        let read_buffer = [0; 1];
        Self {
            read,
            cursor,
            byte_buffer,
            read_buffer,
        }
    }
}

impl<R> BitReader for LittleEndianReader<R>
where
    R: Read,
{
    #[inline]
    fn read_bit(&mut self) -> Result<Option<bool>, std::io::Error> {
        if self.cursor == 0 {
            match next_byte(&mut self.read, &mut self.read_buffer)? {
                Some(byte) => {
                    self.byte_buffer = byte as u32;
                    self.cursor = 8;
                }
                None => return Ok(None),
            }
        }

        let bit = self.byte_buffer & 1 == 1;
        self.byte_buffer >>= 1;
        self.cursor -= 1;
        Ok(Some(bit))
    }

    fn read_one(&mut self, amount: u8) -> Result<u16, std::io::Error> {
        while self.cursor < amount {
            self.read.read_exact(&mut self.read_buffer[..])?;
            self.byte_buffer |= (self.read_buffer[0] as u32) << self.cursor;
            self.cursor += 8;
        }

        let mask = (1 << amount) - 1;
        let data = (self.byte_buffer & mask) as u16;
        self.byte_buffer >>= amount;
        self.cursor -= amount;
        Ok(data)
    }
}

pub struct BigEndianReader<R>
where
    R: Read,
{
    read: R,
    cursor: u8,
    byte_buffer: u32,
    read_buffer: [u8; 1],
}

impl<R> BigEndianReader<R>
where
    R: Read,
{
    pub fn new(read: R) -> Self {
        let cursor = 0;
        let byte_buffer = 0;
        let read_buffer = [0; 1];
        Self {
            read,
            cursor,
            byte_buffer,
            read_buffer,
        }
    }
}

impl<R> BitReader for BigEndianReader<R>
where
    R: Read,
{
    #[inline]
    fn read_bit(&mut self) -> Result<Option<bool>, std::io::Error> {
        if self.cursor == 0 {
            match next_byte(&mut self.read, &mut self.read_buffer)? {
                Some(byte) => {
                    self.byte_buffer = (byte as u32) << 24;
                    self.cursor = 8;
                }
                None => return Ok(None),
            }
        }

        let bit = self.byte_buffer >> 31 == 1;
        self.byte_buffer <<= 1;
        self.cursor -= 1;
        Ok(Some(bit))
    }

    fn read_one(&mut self, amount: u8) -> Result<u16, std::io::Error> {
        while self.cursor < amount {
            self.read.read_exact(&mut self.read_buffer[..])?;
            let shift = 24 - self.cursor;
            self.byte_buffer |= (self.read_buffer[0] as u32) << shift;
            self.cursor += 8;
        }

        let mask = (1 << amount) - 1;
        let shift = 32 - amount;
        let data = ((self.byte_buffer >> shift) & mask) as u16;
        self.byte_buffer <<= amount;
        self.cursor -= amount;

        Ok(data)
    }
}

pub trait BitWriter {
    /// Writes the `amount` low bits of `data`, at most 16.
    fn write(&mut self, data: u16, amount: u8) -> Result<(), std::io::Error>;

    #[inline]
    fn write_bit(&mut self, bit: bool) -> Result<(), std::io::Error> {
        self.write(bit as u16, 1)
    }

    /// Pads the pending partial byte with zero bits and writes it out.
    fn fill(&mut self) -> Result<(), std::io::Error>;

    fn flush(&mut self) -> Result<(), std::io::Error>;
}

pub struct LittleEndianWriter<W>
where
    W: Write,
{
    write: W,
    cursor: u8,
    byte_buffer: u32,
}

impl<W> LittleEndianWriter<W>
where
    W: Write,
{
    pub fn new(write: W) -> Self {
        let byte_buffer = 0;
        let cursor = 0;
        Self {
            write,
            byte_buffer,
            cursor,
        }
    }
}

impl<W> BitWriter for LittleEndianWriter<W>
where
    W: Write,
{
    #[inline]
    fn write(&mut self, data: u16, amount: u8) -> Result<(), std::io::Error> {
        let mask = (1 << amount) - 1;
        self.byte_buffer |= (data as u32 & mask) << self.cursor;
        self.cursor += amount;

        while self.cursor >= 8 {
            let byte = self.byte_buffer as u8;
            self.byte_buffer >>= 8;
            self.cursor -= 8;

            self.write.write_all(&[byte])?;
        }

        Ok(())
    }

    #[inline]
    fn fill(&mut self) -> Result<(), std::io::Error> {
        if self.cursor > 0 {
            self.write.write_all(&[self.byte_buffer as u8])?;
            self.byte_buffer = 0;
            self.cursor = 0;
        }

        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> Result<(), std::io::Error> {
        self.write.flush()
    }
}

pub struct BigEndianWriter<W>
where
    W: Write,
{
    write: W,
    cursor: u8,
    byte_buffer: u32,
}

impl<W> BigEndianWriter<W>
where
    W: Write,
{
    pub fn new(write: W) -> Self {
        let byte_buffer = 0;
        let cursor = 0;
        Self {
            write,
            byte_buffer,
            cursor,
        }
    }
}

impl<W> BitWriter for BigEndianWriter<W>
where
    W: Write,
{
    #[inline]
    fn write(&mut self, data: u16, amount: u8) -> Result<(), std::io::Error> {
        let mask = (1 << amount) - 1;
        let shift = 32 - amount - self.cursor;
        self.byte_buffer |= (data as u32 & mask) << shift;
        self.cursor += amount;

        while self.cursor >= 8 {
            let byte = (self.byte_buffer >> 24) as u8;
            self.byte_buffer <<= 8;
            self.cursor -= 8;

            self.write.write_all(&[byte])?;
        }

        Ok(())
    }

    #[inline]
    fn fill(&mut self) -> Result<(), std::io::Error> {
        if self.cursor > 0 {
            self.write.write_all(&[(self.byte_buffer >> 24) as u8])?;
            self.byte_buffer = 0;
            self.cursor = 0;
        }

        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> Result<(), std::io::Error> {
        self.write.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_bits_little_endian() -> Result<(), std::io::Error> {
        let input = [0b0000_0101];

        let mut reader = LittleEndianReader::new(&input[..]);

        assert_eq!(reader.read_bit()?, Some(true));
        assert_eq!(reader.read_bit()?, Some(false));
        assert_eq!(reader.read_bit()?, Some(true));
        for _ in 3..8 {
            assert_eq!(reader.read_bit()?, Some(false));
        }
        assert_eq!(reader.read_bit()?, None);

        Ok(())
    }

    #[test]
    fn read_bits_big_endian() -> Result<(), std::io::Error> {
        let input = [0b1010_0000, 0x80];

        let mut reader = BigEndianReader::new(&input[..]);

        assert_eq!(reader.read_bit()?, Some(true));
        assert_eq!(reader.read_bit()?, Some(false));
        assert_eq!(reader.read_bit()?, Some(true));
        for _ in 3..8 {
            assert_eq!(reader.read_bit()?, Some(false));
        }
        assert_eq!(reader.read_bit()?, Some(true));

        Ok(())
    }

    #[test]
    fn read_bit_on_empty_input() -> Result<(), std::io::Error> {
        let input: [u8; 0] = [];

        assert_eq!(LittleEndianReader::new(&input[..]).read_bit()?, None);
        assert_eq!(BigEndianReader::new(&input[..]).read_bit()?, None);

        Ok(())
    }

    #[test]
    fn read_colors_little_endian() {
        let input = [0x8C, 0x2D];

        let mut reader = LittleEndianReader::new(&input[..]);
        let mut output = vec![];

        output.push(reader.read_one(3).unwrap());
        output.push(reader.read_one(3).unwrap());
        output.push(reader.read_one(3).unwrap());
        output.push(reader.read_one(3).unwrap());
        output.push(reader.read_one(4).unwrap());

        assert_eq!(output, [4, 1, 6, 6, 2]);
    }

    #[test]
    fn read_colors_big_endian() {
        let input = [0x87, 0x62];

        let mut reader = BigEndianReader::new(&input[..]);
        let mut output = vec![];

        output.push(reader.read_one(3).unwrap());
        output.push(reader.read_one(3).unwrap());
        output.push(reader.read_one(3).unwrap());
        output.push(reader.read_one(3).unwrap());
        output.push(reader.read_one(4).unwrap());

        assert_eq!(output, [4, 1, 6, 6, 2]);
    }

    #[test]
    fn read_one_past_the_end() {
        let input = [0xff];

        let mut reader = BigEndianReader::new(&input[..]);

        let error = reader.read_one(9).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn mixed_bit_and_byte_reads_big_endian() -> Result<(), std::io::Error> {
        // 1 | 01100001 | 0...
        let input = [0b1011_0000, 0b1000_0000];

        let mut reader = BigEndianReader::new(&input[..]);

        assert_eq!(reader.read_bit()?, Some(true));
        assert_eq!(reader.read_one(8)?, b'a' as u16);
        assert_eq!(reader.read_bit()?, Some(false));

        Ok(())
    }

    #[test]
    fn mixed_bit_and_byte_reads_little_endian() -> Result<(), std::io::Error> {
        let mut output = vec![];
        let mut writer = LittleEndianWriter::new(&mut output);
        writer.write_bit(true)?;
        writer.write(b'a' as u16, 8)?;
        writer.write_bit(false)?;
        writer.fill()?;
        drop(writer);

        let mut reader = LittleEndianReader::new(&output[..]);

        assert_eq!(reader.read_bit()?, Some(true));
        assert_eq!(reader.read_one(8)?, b'a' as u16);
        assert_eq!(reader.read_bit()?, Some(false));

        Ok(())
    }

    #[test]
    fn write_bits_big_endian() -> Result<(), std::io::Error> {
        let mut output = vec![];

        let mut writer = BigEndianWriter::new(&mut output);
        for bit in [false, false, false, true, true, true, true, true, false] {
            writer.write_bit(bit)?;
        }
        writer.fill()?;

        assert_eq!(output, [0x1F, 0x00]);

        Ok(())
    }

    #[test]
    fn write_bits_little_endian() -> Result<(), std::io::Error> {
        let mut output = vec![];

        let mut writer = LittleEndianWriter::new(&mut output);
        for bit in [false, false, false, true, true, true, true, true, false] {
            writer.write_bit(bit)?;
        }
        writer.fill()?;

        assert_eq!(output, [0xF8, 0x00]);

        Ok(())
    }

    #[test]
    fn write_colors_little_endian() -> Result<(), std::io::Error> {
        let mut output = vec![];

        let mut writer = LittleEndianWriter::new(&mut output);
        writer.write(4, 3)?;
        writer.write(1, 3)?;
        writer.write(6, 3)?;
        writer.write(6, 3)?;
        writer.write(2, 4)?;
        writer.fill()?;

        assert_eq!(output, [0x8C, 0x2D]);

        Ok(())
    }

    #[test]
    fn write_colors_big_endian() -> Result<(), std::io::Error> {
        let mut output = vec![];

        let mut writer = BigEndianWriter::new(&mut output);
        writer.write(4, 3)?;
        writer.write(1, 3)?;
        writer.write(6, 3)?;
        writer.write(6, 3)?;
        writer.write(2, 4)?;
        writer.fill()?;

        assert_eq!(output, [0x87, 0x62]);

        Ok(())
    }

    #[test]
    fn fill_on_byte_boundary_writes_nothing() -> Result<(), std::io::Error> {
        let mut output = vec![];

        let mut writer = BigEndianWriter::new(&mut output);
        writer.write(0xab, 8)?;
        writer.fill()?;
        writer.fill()?;

        assert_eq!(output, [0xab]);

        Ok(())
    }
}
