//! Exact integer partition.
//!
//! Splitting a cell count by weights with plain rounding drifts: three
//! children of weight 1 sharing 10 cells round to 3+3+3. The partition here
//! carries the rounding error forward so the parts always sum to the total.

use thiserror::Error;

/// Invalid weights passed to [`partition_int`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionError {
    /// A weight was below zero.
    #[error("weight {weight} at index {index} is negative")]
    NegativeWeight {
        /// Position of the offending weight.
        index: usize,
        /// The weight itself.
        weight: i32,
    },
    /// No weight was positive (including the empty list).
    #[error("weights must have a positive sum")]
    ZeroWeights,
}

/// Split `total` into `weights.len()` integers proportional to `weights`.
///
/// Each share is `round(total * w / Σw)`; the signed rounding error is
/// accumulated and, whenever it leaves `[-½, ½]`, the current share is
/// nudged by one and the carry reduced accordingly. The arithmetic is done
/// in integers scaled by `Σw`, so the result sums to `total` exactly.
///
/// Negative totals are accepted (over-constrained layouts) and partitioned
/// the same way.
pub fn partition_int(total: i32, weights: &[i32]) -> Result<Vec<i32>, PartitionError> {
    if let Some((index, &weight)) = weights.iter().enumerate().find(|(_, w)| **w < 0) {
        return Err(PartitionError::NegativeWeight { index, weight });
    }
    let sum: i64 = weights.iter().map(|w| i64::from(*w)).sum();
    if sum == 0 {
        return Err(PartitionError::ZeroWeights);
    }

    let total = i64::from(total);
    // Rounding error in units of 1/sum.
    let mut carry: i64 = 0;

    let parts = weights
        .iter()
        .map(|&w| {
            let exact = total * i64::from(w);
            let mut share = (2 * exact + sum).div_euclid(2 * sum);
            carry += share * sum - exact;
            if 2 * carry > sum {
                share -= 1;
                carry -= sum;
            } else if 2 * carry < -sum {
                share += 1;
                carry += sum;
            }
            share as i32
        })
        .collect();

    Ok(parts)
}

/// Split `x` into two halves `(a, b)` with `a + b == x` and `a >= b`.
#[inline]
pub const fn halve_integer(x: i32) -> (i32, i32) {
    let b = x.div_euclid(2);
    (x - b, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_equal_weights_sum_exactly() {
        let parts = partition_int(10, &[1, 1, 1]).unwrap();
        assert_eq!(parts.iter().sum::<i32>(), 10);
        assert!(parts.iter().all(|p| *p == 3 || *p == 4));
    }

    #[test]
    fn test_proportional() {
        assert_eq!(partition_int(9, &[1, 2]).unwrap(), vec![3, 6]);
        assert_eq!(partition_int(0, &[5, 5]).unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_zero_weight_gets_nothing() {
        assert_eq!(partition_int(7, &[0, 1]).unwrap(), vec![0, 7]);
    }

    #[test]
    fn test_rejects_invalid_weights() {
        assert_eq!(partition_int(10, &[]), Err(PartitionError::ZeroWeights));
        assert_eq!(partition_int(10, &[0, 0]), Err(PartitionError::ZeroWeights));
        assert_eq!(
            partition_int(10, &[1, -1]),
            Err(PartitionError::NegativeWeight { index: 1, weight: -1 })
        );
    }

    #[test]
    fn test_negative_total() {
        let parts = partition_int(-5, &[1, 1]).unwrap();
        assert_eq!(parts.iter().sum::<i32>(), -5);
    }

    #[test]
    fn test_halve_integer() {
        assert_eq!(halve_integer(5), (3, 2));
        assert_eq!(halve_integer(4), (2, 2));
        assert_eq!(halve_integer(0), (0, 0));
        assert_eq!(halve_integer(-3), (-1, -2));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn partition_sums_to_total(
            total in 0i32..10_000,
            weights in proptest::collection::vec(0i32..50, 1..12)
        ) {
            prop_assume!(weights.iter().any(|w| *w > 0));
            let parts = partition_int(total, &weights).unwrap();
            prop_assert_eq!(parts.len(), weights.len());
            prop_assert_eq!(parts.iter().sum::<i32>(), total);
        }

        #[test]
        fn partition_shares_stay_near_exact(
            total in 0i32..10_000,
            weights in proptest::collection::vec(1i32..50, 1..12)
        ) {
            let sum: i32 = weights.iter().sum();
            let parts = partition_int(total, &weights).unwrap();
            for (part, w) in parts.iter().zip(&weights) {
                let exact = f64::from(total) * f64::from(*w) / f64::from(sum);
                prop_assert!((f64::from(*part) - exact).abs() <= 1.5);
            }
        }

        #[test]
        fn halves_are_left_biased(x in -100_000i32..100_000) {
            let (a, b) = halve_integer(x);
            prop_assert_eq!(a + b, x);
            prop_assert!(a >= b);
            prop_assert!(a - b <= 1);
        }
    }
}
