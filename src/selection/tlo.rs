//! Thresholded lexicographic ordering (TLO) of multi-objective value vectors.
//!
//! Objectives are ranked, most important first. The first `k` objectives each
//! carry a threshold: values are clamped to it, so anything at or above the
//! threshold counts as "good enough" and the comparison falls through to the
//! next objective. Objectives beyond the threshold vector are compared on raw
//! value as the final tie-break.

use std::cmp::Ordering;

/// Clamps a value to its threshold; exceeding the threshold earns nothing.
#[inline]
pub fn clamp(value: f64, threshold: f64) -> f64 {
    value.min(threshold)
}

#[inline]
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Compares two value vectors under the thresholds.
///
/// `a` and `b` must have the same length, at least `thresholds.len()`.
pub fn compare(a: &[f64], b: &[f64], thresholds: &[f64]) -> Ordering {
    debug_assert_eq!(a.len(), b.len());
    debug_assert!(thresholds.len() <= a.len());

    for (i, &t) in thresholds.iter().enumerate() {
        let ord = cmp_f64(clamp(a[i], t), clamp(b[i], t));
        if ord != Ordering::Equal {
            return ord;
        }
    }

    for i in thresholds.len()..a.len() {
        let ord = cmp_f64(a[i], b[i]);
        if ord != Ordering::Equal {
            return ord;
        }
    }

    Ordering::Equal
}

/// Index of the TLO-maximal action.
///
/// Actions are scanned in order and any action that is not worse than the
/// current best replaces it, so the last of several equal actions wins.
pub fn greedy_action(values: &[Vec<f64>], thresholds: &[f64]) -> usize {
    let mut best = 0;
    for i in 1..values.len() {
        if compare(&values[i], &values[best], thresholds) != Ordering::Less {
            best = i;
        }
    }
    best
}

/// Tournament score: for each action, how many other actions it is not worse than.
pub fn dominance_scores(values: &[Vec<f64>], thresholds: &[f64]) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            (0..values.len())
                .filter(|&j| j != i && compare(&values[i], &values[j], thresholds) != Ordering::Less)
                .count() as f64
        })
        .collect()
}

/// Additive-epsilon distance of each action from the best one.
///
/// `ε_i` is the smallest constant which, added uniformly to every objective of
/// action `i`, makes it at least as good as `best` on each objective. The best
/// action itself scores 0; no score is negative.
pub fn additive_epsilon_scores(values: &[Vec<f64>], best: usize) -> Vec<f64> {
    let reference = &values[best];
    values
        .iter()
        .map(|v| {
            v.iter()
                .zip(reference)
                .map(|(x, r)| r - x)
                .fold(0.0_f64, f64::max)
        })
        .collect()
}

/// Negated additive-epsilon scores, so that closer to optimal means higher.
pub fn inverse_additive_epsilon_scores(values: &[Vec<f64>], best: usize) -> Vec<f64> {
    additive_epsilon_scores(values, best)
        .into_iter()
        .map(|e| -e)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_values_above_threshold_tie() {
        let t = [7.0];
        assert_eq!(compare(&[10.0, 1.0], &[5.0, 1.0], &t), Ordering::Greater);
        assert_eq!(compare(&[10.0, 1.0], &[7.5, 1.0], &t), Ordering::Equal);
        assert_eq!(compare(&[10.0, 1.0], &[7.5, 2.0], &t), Ordering::Less);
    }

    #[test]
    fn values_above_threshold_fall_through() {
        // both above threshold on objective 0 → decided by objective 1
        let t = [7.0];
        assert_eq!(compare(&[10.0, 0.0], &[8.0, 3.0], &t), Ordering::Less);
    }

    #[test]
    fn below_threshold_decides_first() {
        let t = [0.0, 0.0];
        assert_eq!(compare(&[-1.0, 5.0, 9.0], &[-2.0, 9.0, 9.0], &t), Ordering::Greater);
    }

    #[test]
    fn unthresholded_objectives_compare_raw() {
        let t = [0.0];
        assert_eq!(compare(&[3.0, 1.0, 2.0], &[1.0, 1.0, 5.0], &t), Ordering::Less);
        assert_eq!(compare(&[3.0, 1.0, 2.0], &[1.0, 1.0, 2.0], &t), Ordering::Equal);
    }

    #[test]
    fn compare_is_antisymmetric_and_reflexive() {
        let vs = [
            vec![1.0, -3.0, 2.0],
            vec![5.0, -3.0, 0.0],
            vec![1.0, 0.0, -1.0],
            vec![9.0, -60.0, 4.0],
        ];
        let t = [2.0, -5.0];
        for a in &vs {
            assert_eq!(compare(a, a, &t), Ordering::Equal);
            for b in &vs {
                assert_eq!(compare(a, b, &t), compare(b, a, &t).reverse());
            }
        }
    }

    #[test]
    fn clamp_is_monotone() {
        let t = 4.0;
        let mut prev = f64::NEG_INFINITY;
        for i in -20..20 {
            let c = clamp(i as f64 * 0.5, t);
            assert!(c >= prev);
            prev = c;
        }
    }

    #[test]
    fn greedy_prefers_last_of_equals() {
        let values = vec![vec![1.0, 2.0], vec![0.0, 0.0], vec![1.0, 2.0]];
        assert_eq!(greedy_action(&values, &[10.0]), 2);
    }

    #[test]
    fn greedy_is_deterministic_and_unique() {
        let values = vec![vec![5.0, 1.0], vec![8.0, 0.0], vec![9.0, 0.5], vec![2.0, 9.0]];
        let t = [7.0];
        let first = greedy_action(&values, &t);
        for _ in 0..10 {
            assert_eq!(greedy_action(&values, &t), first);
        }
        // actions 1 and 2 both exceed the threshold; 2 wins on objective 1
        assert_eq!(first, 2);
    }

    #[test]
    fn greedy_result_is_maximal() {
        let values = vec![vec![3.0, -1.0], vec![-2.0, 4.0], vec![3.0, 0.0], vec![1.0, 1.0]];
        let t = [2.0];
        let best = greedy_action(&values, &t);
        for v in &values {
            assert_ne!(compare(v, &values[best], &t), Ordering::Greater);
        }
    }

    #[test]
    fn dominance_counts_not_worse_than() {
        let values = vec![vec![0.0], vec![1.0], vec![1.0]];
        let scores = dominance_scores(&values, &[]);
        assert_eq!(scores, vec![0.0, 2.0, 2.0]);
    }

    #[test]
    fn additive_epsilon_zero_for_best() {
        let values = vec![vec![1.0, 1.0], vec![3.0, 2.0], vec![0.0, 5.0]];
        let eps = additive_epsilon_scores(&values, 1);
        assert_eq!(eps, vec![2.0, 0.0, 3.0]);
        let inv = inverse_additive_epsilon_scores(&values, 1);
        assert_eq!(inv, vec![-2.0, -0.0, -3.0]);
    }
}
