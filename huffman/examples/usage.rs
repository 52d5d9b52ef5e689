use anyhow::Result;
use huffweg::{
    decoder::HuffmanDecoder, encoder::HuffmanEncoder, CodeTable, Endianness, HuffmanTree,
};

const LOREM_IPSUM: &[u8] = include_str!("../../test-assets/lorem_ipsum.txt").as_bytes();

fn main() -> Result<()> {
    env_logger::init();

    let tree = HuffmanTree::from_bytes(LOREM_IPSUM).ok_or_else(|| anyhow::anyhow!("No data"))?;
    for (symbol, code) in CodeTable::new(&tree).iter() {
        println!("{:?}: {}", symbol as char, code);
    }

    let mut compressed = vec![];
    HuffmanEncoder::encode(LOREM_IPSUM, &mut compressed, Endianness::LittleEndian)?;

    println!(
        "{} bytes compressed into {} bytes",
        LOREM_IPSUM.len(),
        compressed.len()
    );

    let mut decompressed = vec![];
    HuffmanDecoder::decode(&compressed[..], &mut decompressed)?;

    assert_eq!(decompressed, LOREM_IPSUM);

    Ok(())
}
