//! Parallel processing utilities for portfolio valuation.
//!
//! Provides conditional parallel iteration based on configuration
//! and collection size. Uses rayon when the `parallel` feature is enabled.

use crate::types::PolicyConfig;

/// Maps a function over items, conditionally using parallel iteration.
///
/// Uses parallel iteration when:
/// - The `parallel` feature is enabled
/// - `config.parallel` is true
/// - The collection size reaches `config.parallel_threshold`
///
/// Output order always matches input order.
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], config: &PolicyConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}

/// Folds over items with a reduce step, conditionally using parallel iteration.
///
/// `reduce` must be associative and `identity` neutral for it, since the
/// parallel path combines partial folds in arbitrary groupings.
#[allow(unused_variables)]
pub fn maybe_parallel_fold<T, U, F, R>(
    items: &[T],
    config: &PolicyConfig,
    identity: U,
    fold: F,
    reduce: R,
) -> U
where
    T: Sync,
    U: Send + Sync + Clone,
    F: Fn(U, &T) -> U + Sync + Send,
    R: Fn(U, U) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items
                .par_iter()
                .fold(|| identity.clone(), &fold)
                .reduce(|| identity.clone(), reduce);
        }
    }

    items.iter().fold(identity, fold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maybe_parallel_map() {
        let config = PolicyConfig::sequential();
        let items = vec![1, 2, 3, 4, 5];
        let results: Vec<i32> = maybe_parallel_map(&items, &config, |x| x * 2);
        assert_eq!(results, vec![2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_maybe_parallel_fold() {
        let config = PolicyConfig::sequential();
        let items: Vec<i64> = vec![1, 2, 3, 4, 5];
        let sum = maybe_parallel_fold(&items, &config, 0_i64, |acc, x| acc + x, |a, b| a + b);
        assert_eq!(sum, 15);
    }

    #[test]
    fn test_order_preserved_above_threshold() {
        let config = PolicyConfig::default().with_threshold(10);
        let items: Vec<usize> = (0..1_000).collect();
        let results = maybe_parallel_map(&items, &config, |x| x + 1);
        assert_eq!(results, (1..=1_000).collect::<Vec<_>>());
    }
}
