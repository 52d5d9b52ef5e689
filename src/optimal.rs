use huffweg::FrequencyTable;

/// The smallest number of bits any prefix code can encode these counts with, found by trying
/// every order of merging. Exponential, keep it to a handful of symbols.
pub fn optimal_cost(frequencies: &FrequencyTable) -> u64 {
    let weights: Vec<u64> = frequencies.iter().map(|(_, count)| count).collect();
    match weights.len() {
        0 => 0,
        // A lone symbol still needs one bit per occurrence.
        1 => weights[0],
        _ => merge_cost(&weights),
    }
}

/// Every full binary tree over the weights comes from some sequence of pairwise merges, and its
/// cost is the sum of the merged weights.
fn merge_cost(weights: &[u64]) -> u64 {
    if weights.len() < 2 {
        return 0;
    }

    let mut best = u64::MAX;
    for first in 0..weights.len() {
        for second in first + 1..weights.len() {
            let merged = weights[first] + weights[second];
            let mut rest: Vec<u64> = weights
                .iter()
                .enumerate()
                .filter(|&(index, _)| index != first && index != second)
                .map(|(_, &weight)| weight)
                .collect();
            rest.push(merged);

            best = best.min(merged + merge_cost(&rest));
        }
    }
    best
}
