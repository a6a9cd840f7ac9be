//! Load-time repair of the key column.
//!
//! A restarted run rewinds to an earlier checkpoint and re-emits key values
//! it already wrote. Every row whose key is not strictly below all later keys
//! has been superseded and is dropped.

/// Mark stale rows of `keys`.
///
/// Row `k` is stale when `keys[k] >= min(keys[k+1..])`. The decision is made
/// against the original values, not the surviving subsequence. The last row
/// is never stale.
pub fn stale_rows(keys: &[f64]) -> Vec<bool> {
    let mut stale = vec![false; keys.len()];
    let mut suffix_min = f64::INFINITY;
    for (idx, &key) in keys.iter().enumerate().rev() {
        if idx + 1 < keys.len() && key >= suffix_min {
            stale[idx] = true;
        }
        suffix_min = suffix_min.min(key);
    }
    stale
}

/// Drop the marked rows from every column, keeping survivor order.
pub fn retain_rows(columns: Vec<Vec<f64>>, stale: &[bool]) -> Vec<Vec<f64>> {
    columns
        .into_iter()
        .map(|column| {
            column
                .into_iter()
                .zip(stale.iter())
                .filter(|(_, drop)| !**drop)
                .map(|(value, _)| value)
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(keys: &[f64]) -> Vec<bool> {
        (0..keys.len())
            .map(|k| {
                keys[k + 1..]
                    .iter()
                    .copied()
                    .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.min(v))))
                    .map_or(false, |min| keys[k] >= min)
            })
            .collect()
    }

    #[test]
    fn removes_rewound_row() {
        let keys = [1.0, 2.0, 5.0, 3.0, 4.0];
        assert_eq!(stale_rows(&keys), vec![false, false, true, false, false]);
    }

    #[test]
    fn increasing_keys_are_untouched() {
        let keys = [1.0, 2.0, 3.0, 10.0];
        assert!(stale_rows(&keys).iter().all(|&s| !s));
    }

    #[test]
    fn equal_keys_keep_only_last() {
        let keys = [7.0; 5];
        assert_eq!(stale_rows(&keys), vec![true, true, true, true, false]);
    }

    #[test]
    fn restart_overlap_drops_whole_stale_run() {
        // Run reached 6, restarted from 4.
        let keys = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 4.0, 5.0, 6.0, 7.0];
        let stale = stale_rows(&keys);
        assert_eq!(
            stale,
            vec![false, false, false, true, true, true, false, false, false, false]
        );
        assert_eq!(stale, reference(&keys));
    }

    #[test]
    fn matches_quadratic_definition() {
        let cases: [&[f64]; 5] = [
            &[],
            &[3.0],
            &[5.0, 1.0, 4.0, 2.0, 3.0],
            &[1.0, 9.0, 2.0, 8.0, 3.0, 7.0],
            &[2.0, 2.0, 1.0, 3.0, 3.0],
        ];
        for keys in cases {
            assert_eq!(stale_rows(keys), reference(keys), "keys {keys:?}");
        }
    }

    #[test]
    fn retain_applies_mask_to_all_columns() {
        let columns = vec![vec![1.0, 2.0, 5.0, 3.0], vec![10.0, 20.0, 50.0, 30.0]];
        let pruned = retain_rows(columns, &[false, false, true, false]);
        assert_eq!(pruned, vec![vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 30.0]]);
    }
}
