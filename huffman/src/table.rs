use std::fmt::{Display, Write as _};

use log::trace;

use crate::{
    frequency::FrequencyTable,
    tree::{HuffmanTree, Node},
};

/// The path from the root to a leaf: `false` for left, `true` for right.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    fn with(&self, bit: bool) -> Self {
        let mut bits = Vec::with_capacity(self.bits.len() + 1);
        bits.extend_from_slice(&self.bits);
        bits.push(bit);
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &bit in &self.bits {
            f.write_char(if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Code of every symbol of a [HuffmanTree].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Walks the tree, recording the code of each leaf.
    ///
    /// # Examples
    ///
    /// ```
    /// use huffweg::{CodeTable, HuffmanTree};
    ///
    /// let tree = HuffmanTree::from_bytes(b"aaabbc").unwrap();
    /// let table = CodeTable::new(&tree);
    ///
    /// assert_eq!(table.get(b'a').unwrap().to_string(), "0");
    /// assert_eq!(table.get(b'c').unwrap().to_string(), "10");
    /// assert_eq!(table.get(b'b').unwrap().to_string(), "11");
    /// ```
    pub fn new(tree: &HuffmanTree) -> Self {
        let mut codes = vec![None; 256];

        // Explicit stack, degenerate trees can be as deep as they have leaves.
        let mut stack = vec![(tree.root(), Code::default())];
        while let Some((node, code)) = stack.pop() {
            match node {
                Node::Leaf(symbol) => {
                    trace!("Symbol {:#04x} gets code {}", symbol.value(), code);
                    codes[symbol.value() as usize] = Some(code);
                }
                Node::Internal { left, right, .. } => {
                    stack.push((&**right, code.with(true)));
                    if let Some(left) = left {
                        stack.push((&**left, code.with(false)));
                    }
                }
            }
        }

        Self { codes }
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes[symbol as usize].as_ref()
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(Option::is_none)
    }

    /// Symbols and their codes, in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|code| (symbol as u8, code)))
    }

    /// Number of bits needed to encode data with the given symbol counts.
    ///
    /// Symbols without a code are not accounted for.
    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .iter()
            .filter_map(|(symbol, count)| self.get(symbol).map(|code| count * code.len() as u64))
            .sum()
    }
}

impl Default for CodeTable {
    /// The table of an empty input: no symbol has a code.
    fn default() -> Self {
        Self {
            codes: vec![None; 256],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_for(data: &[u8]) -> CodeTable {
        CodeTable::new(&HuffmanTree::from_bytes(data).unwrap())
    }

    fn assert_prefix_free(table: &CodeTable) {
        for (symbol, code) in table.iter() {
            for (other_symbol, other) in table.iter() {
                if symbol != other_symbol {
                    assert!(
                        !code.is_prefix_of(other),
                        "{code} for {symbol} is a prefix of {other} for {other_symbol}"
                    );
                }
            }
        }
    }

    #[test]
    fn example_codes() {
        let table = table_for(b"aaabbc");

        let codes: Vec<_> = table
            .iter()
            .map(|(symbol, code)| (symbol, code.to_string()))
            .collect();
        assert_eq!(
            codes,
            [
                (b'a', "0".to_string()),
                (b'b', "11".to_string()),
                (b'c', "10".to_string())
            ]
        );
        assert_eq!(table.encoded_bits(&FrequencyTable::from(&b"aaabbc"[..])), 9);
    }

    #[test]
    fn single_symbol_code_is_one() {
        let table = table_for(&[b'a'; 1000]);

        assert_eq!(table.len(), 1);
        let code = table.get(b'a').unwrap();
        assert_eq!(code.len(), 1);
        assert_eq!(code.to_string(), "1");
    }

    #[test]
    fn empty_table() {
        let table = CodeTable::default();

        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert!(table.get(0).is_none());
        assert_eq!(table.encoded_bits(&FrequencyTable::from(&b"abc"[..])), 0);
    }

    #[test]
    fn codes_are_prefix_free() {
        assert_prefix_free(&table_for(b"ab"));
        assert_prefix_free(&table_for(b"abracadabra"));
        assert_prefix_free(&table_for(include_bytes!("../../test-assets/lorem_ipsum.txt")));

        let all_bytes: Vec<u8> = (0..=u8::MAX).collect();
        assert_prefix_free(&table_for(&all_bytes));
    }

    #[test]
    fn encoded_bits_match_the_tree() {
        let data = include_bytes!("../../test-assets/lorem_ipsum.txt");
        let frequencies = FrequencyTable::from(&data[..]);
        let tree = HuffmanTree::from_frequencies(&frequencies).unwrap();

        let table = CodeTable::new(&tree);

        assert_eq!(table.len(), tree.size());
        assert_eq!(table.encoded_bits(&frequencies), tree.weighted_path_length());
    }

    #[test]
    fn code_lengths_follow_frequencies() {
        let data = include_bytes!("../../test-assets/lorem_ipsum.txt");
        let frequencies = FrequencyTable::from(&data[..]);
        let table = CodeTable::new(&HuffmanTree::from_frequencies(&frequencies).unwrap());

        for (symbol, count) in frequencies.iter() {
            for (other_symbol, other_count) in frequencies.iter() {
                if count > other_count {
                    assert!(
                        table.get(symbol).unwrap().len() <= table.get(other_symbol).unwrap().len()
                    );
                }
            }
        }
    }
}
