//! Boltzmann (softmax) draw over per-action scores.

use rand::Rng;

/// Draws an action with probability proportional to `exp(score / temperature)`.
///
/// The greedy action `best` is always a candidate: its score is lifted to the
/// maximum score before weighting. A temperature that is not strictly
/// positive and finite, or weights that collapse numerically, select `best`.
pub fn draw<R: Rng + ?Sized>(scores: &[f64], temperature: f64, best: usize, rng: &mut R) -> usize {
    if scores.is_empty() || !(temperature > 0.0 && temperature.is_finite()) {
        return best;
    }

    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return best;
    }

    let weights: Vec<f64> = scores
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let s = if i == best { max } else { s };
            ((s - max) / temperature).exp()
        })
        .collect();
    let total: f64 = weights.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return best;
    }

    let mut target = rng.gen::<f64>() * total;
    for (i, w) in weights.iter().enumerate() {
        if target < *w {
            return i;
        }
        target -= w;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zero_temperature_is_greedy() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(draw(&[5.0, 1.0, 3.0], 0.0, 0, &mut rng), 0);
        }
    }

    #[test]
    fn tiny_temperature_is_greedy() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            assert_eq!(draw(&[0.0, 3.0, 1.0], 1e-6, 1, &mut rng), 1);
        }
    }

    #[test]
    fn greedy_action_is_lifted_to_max() {
        // even with a low raw score the greedy action stays a top candidate
        let mut rng = StdRng::seed_from_u64(3);
        let picks = (0..400)
            .filter(|_| draw(&[10.0, -10.0], 1e-3, 1, &mut rng) == 1)
            .count();
        assert!(picks > 100);
    }

    #[test]
    fn high_temperature_spreads_choices() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut counts = [0usize; 3];
        for _ in 0..3000 {
            counts[draw(&[2.0, 1.0, 0.0], 1e6, 0, &mut rng)] += 1;
        }
        for c in counts {
            assert!(c > 700, "counts = {:?}", counts);
        }
    }

    #[test]
    fn degenerate_inputs_fall_back_to_best() {
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(draw(&[], 1.0, 0, &mut rng), 0);
        assert_eq!(draw(&[1.0, 2.0], f64::NAN, 1, &mut rng), 1);
        assert_eq!(draw(&[1.0, 2.0], f64::INFINITY, 0, &mut rng), 0);
    }
}
