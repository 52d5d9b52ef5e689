//! Byte frequency analysis.

use std::{
    io::{ErrorKind, Read},
    ops::{Add, AddAssign},
};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Occurrence count of every byte value seen in a stream.
///
/// Iteration goes over the observed symbols only, in ascending byte order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    /// An empty table, as produced by an empty stream.
    pub fn new() -> Self {
        Self { counts: [0; 256] }
    }

    /// Counts every byte of `data`, reading it once up to its end.
    ///
    /// # Errors
    ///
    /// Any [std::io::Error] but [ErrorKind::Interrupted] is returned as is.
    ///
    /// # Examples
    ///
    /// ```
    /// use huffweg::FrequencyTable;
    ///
    /// let table = FrequencyTable::count(&b"aaabbc"[..]).unwrap();
    ///
    /// assert_eq!(table.get(b'a'), 3);
    /// assert_eq!(table.get(b'b'), 2);
    /// assert_eq!(table.get(b'c'), 1);
    /// assert_eq!(table.distinct(), 3);
    /// ```
    pub fn count<R: Read>(mut data: R) -> Result<Self, std::io::Error> {
        let mut table = Self::new();
        let mut buffer = [0; READ_CHUNK_SIZE];

        loop {
            match data.read(&mut buffer) {
                Ok(0) => break,
                Ok(read) => table.add_bytes(&buffer[..read]),
                Err(error) if error.kind() == ErrorKind::Interrupted => continue,
                Err(error) => return Err(error),
            }
        }

        Ok(table)
    }

    fn add_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.counts[byte as usize] += 1;
        }
    }

    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Number of distinct symbols observed.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    /// Number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(symbol, count)| (symbol as u8, *count))
    }

    /// Adds the counts of `other`, typically a table computed over another chunk of the same input.
    pub fn merge(&mut self, other: &FrequencyTable) {
        for (count, other) in self.counts.iter_mut().zip(other.counts.iter()) {
            *count += other;
        }
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&[u8]> for FrequencyTable {
    fn from(bytes: &[u8]) -> Self {
        let mut table = Self::new();
        table.add_bytes(bytes);
        table
    }
}

impl AddAssign<&FrequencyTable> for FrequencyTable {
    fn add_assign(&mut self, other: &FrequencyTable) {
        self.merge(other);
    }
}

impl Add for FrequencyTable {
    type Output = FrequencyTable;

    fn add(mut self, other: FrequencyTable) -> FrequencyTable {
        self.merge(&other);
        self
    }
}
