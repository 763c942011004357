//! Per-objective tabular action-value storage.
//!
//! A [`ValueTable`] holds one dense `[actions][states]` array per objective.
//! It knows nothing about thresholds or action selection; those live in
//! [`crate::selection`] and borrow the table read-only.

pub mod error;
mod persist;

pub use error::TableError;

/// Shape of a value table: `(objectives, actions, states)`.
pub type TableShape = (usize, usize, usize);

/// Multi-objective Q-table.
///
/// Each objective is stored as a flat vector indexed `action * num_states +
/// state`. All objectives share the same shape, fixed at construction.
///
/// Indices are not bounds-checked beyond the slice indexing itself: callers
/// are expected to hand in states and actions that were validated upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    num_actions: usize,
    num_states: usize,
    values: Vec<Vec<f64>>,
}

impl ValueTable {
    /// Creates a table with every entry of every objective set to `init_value`.
    pub fn new(num_objectives: usize, num_actions: usize, num_states: usize, init_value: f64) -> Self {
        Self::with_initial_values(num_actions, num_states, &vec![init_value; num_objectives])
    }

    /// Creates a table with one initial constant per objective.
    pub fn with_initial_values(num_actions: usize, num_states: usize, init_values: &[f64]) -> Self {
        let values = init_values
            .iter()
            .map(|&v| vec![v; num_actions * num_states])
            .collect();
        Self {
            num_actions,
            num_states,
            values,
        }
    }

    pub fn num_objectives(&self) -> usize {
        self.values.len()
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Returns `(objectives, actions, states)`.
    pub fn shape(&self) -> TableShape {
        (self.num_objectives(), self.num_actions, self.num_states)
    }

    #[inline]
    fn index(&self, action: usize, state: usize) -> usize {
        debug_assert!(action < self.num_actions && state < self.num_states);
        action * self.num_states + state
    }

    #[inline]
    pub fn get(&self, objective: usize, action: usize, state: usize) -> f64 {
        self.values[objective][self.index(action, state)]
    }

    #[inline]
    pub fn set(&mut self, objective: usize, action: usize, state: usize, value: f64) {
        let i = self.index(action, state);
        self.values[objective][i] = value;
    }

    /// Returns the value of `(action, state)` for every objective.
    pub fn q_values(&self, action: usize, state: usize) -> Vec<f64> {
        let i = self.index(action, state);
        self.values.iter().map(|obj| obj[i]).collect()
    }

    /// Fills each objective with its own constant.
    pub fn reset_all(&mut self, init_values: &[f64]) {
        debug_assert_eq!(init_values.len(), self.values.len());
        for (obj, &v) in self.values.iter_mut().zip(init_values) {
            obj.fill(v);
        }
    }

    /// Applies `value[o][action][state] += learning_rate * eligibility * td_errors[o]`
    /// for every objective.
    pub fn update(
        &mut self,
        action: usize,
        state: usize,
        eligibility: f64,
        learning_rate: f64,
        td_errors: &[f64],
    ) {
        let i = self.index(action, state);
        let step = learning_rate * eligibility;
        for (obj, &err) in self.values.iter_mut().zip(td_errors) {
            obj[i] += step * err;
        }
    }

    /// One-step bootstrapped TD errors, one per objective.
    ///
    /// `δ[o] = reward[o] + γ·Q[o][next_action][next_state] − Q[o][action][state]`
    pub fn td_errors(
        &self,
        action: usize,
        state: usize,
        next_action: usize,
        next_state: usize,
        gamma: f64,
        reward: &[f64],
    ) -> Vec<f64> {
        let i = self.index(action, state);
        let j = self.index(next_action, next_state);
        self.values
            .iter()
            .zip(reward)
            .map(|(obj, &r)| r + gamma * obj[j] - obj[i])
            .collect()
    }

    /// TD errors for a transition into a terminal state (no bootstrap term).
    pub fn terminal_td_errors(&self, action: usize, state: usize, reward: &[f64]) -> Vec<f64> {
        let i = self.index(action, state);
        self.values
            .iter()
            .zip(reward)
            .map(|(obj, &r)| r - obj[i])
            .collect()
    }

    /// Element-wise mean of identically shaped tables.
    pub fn average(tables: &[ValueTable]) -> Result<ValueTable, TableError> {
        let first = tables.first().ok_or(TableError::Empty)?;
        let mut sum = first.clone();
        for table in &tables[1..] {
            if table.shape() != sum.shape() {
                return Err(TableError::ShapeMismatch {
                    expected: sum.shape(),
                    found: table.shape(),
                });
            }
            for (acc, obj) in sum.values.iter_mut().zip(&table.values) {
                for (a, v) in acc.iter_mut().zip(obj) {
                    *a += v;
                }
            }
        }
        let n = tables.len() as f64;
        for obj in &mut sum.values {
            for v in obj.iter_mut() {
                *v /= n;
            }
        }
        Ok(sum)
    }

    /// Iterates every stored value in objective → action → state order.
    pub(crate) fn iter_ordered(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().flat_map(|obj| obj.iter().copied())
    }

    /// Overwrites every stored value from an iterator in objective → action →
    /// state order. The iterator must yield exactly one value per entry.
    pub(crate) fn fill_ordered(&mut self, values: impl IntoIterator<Item = f64>) {
        let mut it = values.into_iter();
        for obj in &mut self.values {
            for slot in obj.iter_mut() {
                if let Some(v) = it.next() {
                    *slot = v;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_has_uniform_shape() {
        let t = ValueTable::new(3, 4, 10, 0.0);
        assert_eq!(t.shape(), (3, 4, 10));
        for o in 0..3 {
            for a in 0..4 {
                for s in 0..10 {
                    assert_eq!(t.get(o, a, s), 0.0);
                }
            }
        }
    }

    #[test]
    fn per_objective_initial_values() {
        let t = ValueTable::with_initial_values(2, 2, &[1.0, -2.0]);
        assert_eq!(t.get(0, 1, 1), 1.0);
        assert_eq!(t.get(1, 0, 0), -2.0);
    }

    #[test]
    fn set_and_get_are_independent_per_cell() {
        let mut t = ValueTable::new(2, 3, 5, 0.0);
        t.set(1, 2, 4, 7.5);
        assert_eq!(t.get(1, 2, 4), 7.5);
        assert_eq!(t.get(0, 2, 4), 0.0);
        assert_eq!(t.get(1, 2, 3), 0.0);
        assert_eq!(t.get(1, 1, 4), 0.0);
    }

    #[test]
    fn reset_all_fills_each_objective() {
        let mut t = ValueTable::new(2, 2, 2, 0.0);
        t.set(0, 1, 1, 9.0);
        t.reset_all(&[3.0, 4.0]);
        assert_eq!(t.q_values(1, 1), vec![3.0, 4.0]);
    }

    #[test]
    fn update_scales_by_rate_and_eligibility() {
        let mut t = ValueTable::new(2, 2, 2, 0.0);
        t.update(1, 0, 0.5, 0.2, &[10.0, -4.0]);
        assert!((t.get(0, 1, 0) - 1.0).abs() < 1e-12);
        assert!((t.get(1, 1, 0) + 0.4).abs() < 1e-12);
        assert_eq!(t.get(0, 0, 0), 0.0);
    }

    #[test]
    fn td_errors_bootstrap_from_next_pair() {
        let mut t = ValueTable::new(2, 2, 2, 0.0);
        t.set(0, 1, 1, 2.0);
        t.set(1, 1, 1, -1.0);
        t.set(0, 0, 0, 0.5);
        let errs = t.td_errors(0, 0, 1, 1, 0.9, &[1.0, 0.0]);
        assert!((errs[0] - (1.0 + 0.9 * 2.0 - 0.5)).abs() < 1e-12);
        assert!((errs[1] - (-0.9)).abs() < 1e-12);
    }

    #[test]
    fn terminal_td_errors_ignore_future() {
        let mut t = ValueTable::new(2, 2, 2, 0.0);
        t.set(0, 0, 0, 3.0);
        let errs = t.terminal_td_errors(0, 0, &[5.0, -1.0]);
        assert_eq!(errs, vec![2.0, -1.0]);
    }

    #[test]
    fn average_of_tables() {
        let a = ValueTable::new(1, 2, 2, 1.0);
        let b = ValueTable::new(1, 2, 2, 3.0);
        let avg = ValueTable::average(&[a, b]).unwrap();
        assert_eq!(avg.get(0, 1, 1), 2.0);
    }

    #[test]
    fn average_rejects_mismatched_shapes() {
        let a = ValueTable::new(1, 2, 2, 1.0);
        let b = ValueTable::new(1, 2, 3, 1.0);
        assert!(matches!(
            ValueTable::average(&[a, b]),
            Err(TableError::ShapeMismatch { .. })
        ));
        assert!(matches!(ValueTable::average(&[]), Err(TableError::Empty)));
    }
}
