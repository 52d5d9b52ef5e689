use huffman_test::optimal::optimal_cost;
use huffweg::{CodeTable, FrequencyTable, HuffmanTree};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_frequencies(rng: &mut StdRng) -> FrequencyTable {
    let symbol_count = rng.gen_range(1..=7);
    let mut data = vec![];
    for symbol in 0..symbol_count {
        let count = rng.gen_range(1..=40);
        data.extend(std::iter::repeat(symbol as u8).take(count));
    }
    FrequencyTable::from(&data[..])
}

#[test]
fn tree_cost_is_optimal() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..200 {
        let frequencies = random_frequencies(&mut rng);
        let tree = HuffmanTree::from_frequencies(&frequencies).unwrap();

        assert_eq!(
            tree.weighted_path_length(),
            optimal_cost(&frequencies),
            "Not optimal for {frequencies:?}"
        );
    }
}

#[test]
fn encoded_bits_are_optimal() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..50 {
        let frequencies = random_frequencies(&mut rng);
        let table = CodeTable::new(&HuffmanTree::from_frequencies(&frequencies).unwrap());

        assert_eq!(table.encoded_bits(&frequencies), optimal_cost(&frequencies));
    }
}

#[test]
fn fibonacci_counts_are_optimal() {
    let mut data = vec![];
    for (symbol, count) in [1, 1, 2, 3, 5, 8, 13].into_iter().enumerate() {
        data.extend(std::iter::repeat(symbol as u8).take(count));
    }
    let frequencies = FrequencyTable::from(&data[..]);

    let tree = HuffmanTree::from_frequencies(&frequencies).unwrap();

    assert_eq!(tree.weighted_path_length(), optimal_cost(&frequencies));
}
