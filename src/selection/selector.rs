//! Greedy and exploratory action selection over a borrowed value table.

use std::cmp::Ordering;

use rand::Rng;

use super::{softmax, tlo};
use crate::types::ExplorationStrategy;
use crate::value_table::ValueTable;

/// Read-only view that answers action-selection queries.
///
/// The selector sees the first `offsets.len()` objectives of the table, each
/// shifted by its accumulated reward-to-date, and orders them with the TLO
/// comparator under `thresholds`. Objectives past `offsets.len()` are never
/// consulted.
#[derive(Debug, Clone, Copy)]
pub struct ActionSelector<'a> {
    table: &'a ValueTable,
    thresholds: &'a [f64],
    offsets: &'a [f64],
}

impl<'a> ActionSelector<'a> {
    /// Creates a selector.
    ///
    /// # Arguments
    ///
    /// * `table` - Learned action values
    /// * `thresholds` - One threshold per leading selection objective
    /// * `offsets` - Accumulated reward per selection objective
    pub fn new(table: &'a ValueTable, thresholds: &'a [f64], offsets: &'a [f64]) -> Self {
        debug_assert!(offsets.len() <= table.num_objectives());
        debug_assert!(thresholds.len() <= offsets.len());
        Self {
            table,
            thresholds,
            offsets,
        }
    }

    /// Per-action value vectors for `state`: table value plus accumulated offset.
    pub fn action_values(&self, state: usize) -> Vec<Vec<f64>> {
        (0..self.table.num_actions())
            .map(|a| {
                self.offsets
                    .iter()
                    .enumerate()
                    .map(|(o, off)| self.table.get(o, a, state) + off)
                    .collect()
            })
            .collect()
    }

    /// The TLO-maximal action in `state`, later actions winning ties.
    pub fn greedy_action(&self, state: usize) -> usize {
        tlo::greedy_action(&self.action_values(state), self.thresholds)
    }

    /// True if `action` is TLO-equal to the greedy action in `state`.
    pub fn is_greedy(&self, state: usize, action: usize) -> bool {
        let values = self.action_values(state);
        let best = tlo::greedy_action(&values, self.thresholds);
        tlo::compare(&values[action], &values[best], self.thresholds) == Ordering::Equal
    }

    /// Chooses an action using `strategy`, with `parameter` as ε or temperature.
    ///
    /// Every strategy returns the greedy action when its parameter is at the
    /// no-exploration extreme (ε ≤ 0, temperature → 0).
    pub fn choose_possibly_exploratory_action<R: Rng + ?Sized>(
        &self,
        strategy: ExplorationStrategy,
        parameter: f64,
        state: usize,
        rng: &mut R,
    ) -> usize {
        let values = self.action_values(state);
        let best = tlo::greedy_action(&values, self.thresholds);
        match strategy {
            ExplorationStrategy::EGreedy => {
                if rng.gen::<f64>() < parameter {
                    rng.gen_range(0..values.len())
                } else {
                    best
                }
            }
            ExplorationStrategy::SoftmaxTournament => {
                let scores = tlo::dominance_scores(&values, self.thresholds);
                softmax::draw(&scores, parameter, best, rng)
            }
            ExplorationStrategy::SoftmaxAdditiveEpsilon => {
                let scores = tlo::inverse_additive_epsilon_scores(&values, best);
                softmax::draw(&scores, parameter, best, rng)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// 3 actions, 1 state, 3 objectives (last one hidden from selection).
    fn table() -> ValueTable {
        let mut t = ValueTable::new(3, 3, 1, 0.0);
        // action 0: poor primary
        t.set(0, 0, 0, -10.0);
        t.set(1, 0, 0, 0.0);
        // action 1: good primary, impactful
        t.set(0, 1, 0, 5.0);
        t.set(1, 1, 0, -50.0);
        // action 2: good primary, no impact
        t.set(0, 2, 0, 4.0);
        t.set(1, 2, 0, 0.0);
        // hidden objective strongly prefers action 0
        t.set(2, 0, 0, 1000.0);
        t
    }

    #[test]
    fn offsets_shift_action_values() {
        let t = table();
        let sel = ActionSelector::new(&t, &[0.0], &[1.0, -2.0]);
        let vals = sel.action_values(0);
        assert_eq!(vals[1], vec![6.0, -52.0]);
        assert_eq!(vals.len(), 3);
    }

    #[test]
    fn satisficing_picks_low_impact_action() {
        let t = table();
        // primary threshold 3 is met by actions 1 and 2; impact then decides
        let sel = ActionSelector::new(&t, &[3.0], &[0.0, 0.0]);
        assert_eq!(sel.greedy_action(0), 2);
        assert!(sel.is_greedy(0, 2));
        assert!(!sel.is_greedy(0, 1));
    }

    #[test]
    fn high_threshold_becomes_lexicographic() {
        let t = table();
        let sel = ActionSelector::new(&t, &[100.0], &[0.0, 0.0]);
        assert_eq!(sel.greedy_action(0), 1);
    }

    #[test]
    fn accumulated_reward_changes_greedy_choice() {
        let t = table();
        // thresholds on both selection objectives; accumulated impact already -60
        let sel = ActionSelector::new(&t, &[3.0, -55.0], &[0.0, -60.0]);
        // all impact values are below -55, primary decides among those meeting 3
        let vals = sel.action_values(0);
        assert!(vals.iter().all(|v| v[1] < -55.0));
        assert_eq!(sel.greedy_action(0), 2);
    }

    #[test]
    fn equal_actions_are_both_greedy() {
        let mut t = ValueTable::new(1, 2, 1, 0.0);
        t.set(0, 0, 0, 1.0);
        t.set(0, 1, 0, 1.0);
        let sel = ActionSelector::new(&t, &[], &[0.0]);
        assert_eq!(sel.greedy_action(0), 1);
        assert!(sel.is_greedy(0, 0));
    }

    #[test]
    fn exploration_degenerates_to_greedy() {
        let t = table();
        let sel = ActionSelector::new(&t, &[3.0], &[0.0, 0.0]);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            assert_eq!(
                sel.choose_possibly_exploratory_action(ExplorationStrategy::EGreedy, 0.0, 0, &mut rng),
                2
            );
            assert_eq!(
                sel.choose_possibly_exploratory_action(
                    ExplorationStrategy::SoftmaxTournament,
                    1e-9,
                    0,
                    &mut rng
                ),
                2
            );
            assert_eq!(
                sel.choose_possibly_exploratory_action(
                    ExplorationStrategy::SoftmaxAdditiveEpsilon,
                    1e-9,
                    0,
                    &mut rng
                ),
                2
            );
        }
    }

    #[test]
    fn full_epsilon_explores_all_actions() {
        let t = table();
        let sel = ActionSelector::new(&t, &[3.0], &[0.0, 0.0]);
        let mut rng = StdRng::seed_from_u64(12);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let a = sel.choose_possibly_exploratory_action(ExplorationStrategy::EGreedy, 1.0, 0, &mut rng);
            seen[a] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }
}
