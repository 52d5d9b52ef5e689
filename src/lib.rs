pub mod optimal;
pub mod reference;

pub trait HuffmanCodec {
    type Compressed;

    fn compress(bytes: &[u8]) -> Self::Compressed;
    fn decompress(data: &Self::Compressed) -> Vec<u8>;
}

/// The production codec, for side by side comparisons.
pub struct WithHuffweg;

impl HuffmanCodec for WithHuffweg {
    type Compressed = Vec<u8>;

    fn compress(bytes: &[u8]) -> Vec<u8> {
        huffweg::compress(bytes)
    }

    fn decompress(data: &Vec<u8>) -> Vec<u8> {
        huffweg::decompress(data).expect("Couldn't decompress")
    }
}
