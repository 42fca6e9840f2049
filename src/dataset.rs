use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::SplitRatios;
use crate::types::SplitData;

/// Shuffle the keys with a seeded RNG and cut them into train, val and test slices.
///
/// Train takes `floor(n * train)` keys, val the next `floor(n * val)`, and test
/// whatever remains, so the test share absorbs any rounding.
pub fn split_keys(mut keys: Vec<String>, ratios: &SplitRatios, seed: u64) -> SplitData<Vec<String>> {
    let mut rng = StdRng::seed_from_u64(seed);
    keys.shuffle(&mut rng);

    let total = keys.len();
    let train_count = ((total as f64 * ratios.train).floor() as usize).min(total);
    let val_count = ((total as f64 * ratios.val).floor() as usize).min(total - train_count);

    let test = keys.split_off(train_count + val_count);
    let val = keys.split_off(train_count);
    let train = keys;

    SplitData { train, val, test }
}
