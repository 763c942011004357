//! Augmented state: environment observation combined with discretised
//! reward-to-date.
//!
//! A satisficing agent must know how much reward it has already collected to
//! judge whether a threshold is still reachable, so the table is indexed by
//! `(bucket, observation)` rather than by the observation alone.

/// Discretisation of one accumulated-reward channel.
///
/// `boundaries` are strictly descending. The bucket of an accumulated value is
/// the index of the first boundary it exceeds, or `boundaries.len()` if it
/// exceeds none. With the default boundaries `[0, -150]`:
///
/// | accumulated       | bucket |
/// |-------------------|--------|
/// | `> 0`             | 0      |
/// | `(-150, 0]`       | 1      |
/// | `<= -150`         | 2      |
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BucketChannel {
    /// Selection objective whose accumulator is discretised.
    pub objective: usize,
    /// Descending bucket boundaries.
    pub boundaries: Vec<f64>,
}

impl BucketChannel {
    pub fn new(objective: usize, boundaries: Vec<f64>) -> Self {
        Self {
            objective,
            boundaries,
        }
    }

    pub fn num_buckets(&self) -> usize {
        self.boundaries.len() + 1
    }

    /// Bucket index of an accumulated value.
    pub fn bucket(&self, accumulated: f64) -> usize {
        self.boundaries
            .iter()
            .position(|&b| accumulated > b)
            .unwrap_or(self.boundaries.len())
    }
}

impl Default for BucketChannel {
    fn default() -> Self {
        Self::new(0, vec![0.0, -150.0])
    }
}

/// Combines a base state with bucket digits into a table state index.
///
/// `digits` holds `(bucket, num_buckets)` per channel; channel 0 is the least
/// significant digit above the base state. For a single channel this is
/// `bucket * num_base_states + base_state`.
pub fn augment(base_state: usize, num_base_states: usize, digits: &[(usize, usize)]) -> usize {
    debug_assert!(base_state < num_base_states);
    let mut index = 0;
    for &(bucket, num_buckets) in digits.iter().rev() {
        debug_assert!(bucket < num_buckets);
        index = index * num_buckets + bucket;
    }
    index * num_base_states + base_state
}

/// Maps observations plus accumulators to augmented state indices.
#[derive(Debug, Clone, PartialEq)]
pub struct StateAugmenter {
    num_base_states: usize,
    channels: Vec<BucketChannel>,
}

impl StateAugmenter {
    pub fn new(num_base_states: usize, channels: Vec<BucketChannel>) -> Self {
        Self {
            num_base_states,
            channels,
        }
    }

    /// Identity augmentation: table states are the environment observations.
    pub fn identity(num_base_states: usize) -> Self {
        Self::new(num_base_states, Vec::new())
    }

    pub fn num_base_states(&self) -> usize {
        self.num_base_states
    }

    pub fn channels(&self) -> &[BucketChannel] {
        &self.channels
    }

    /// Total number of augmented states, i.e. the table's state dimension.
    pub fn num_states(&self) -> usize {
        self.channels
            .iter()
            .map(BucketChannel::num_buckets)
            .product::<usize>()
            * self.num_base_states
    }

    /// Augmented index of `observation` given per-objective accumulators.
    pub fn state_index(&self, observation: usize, accumulators: &[f64]) -> usize {
        let digits: Vec<(usize, usize)> = self
            .channels
            .iter()
            .map(|c| (c.bucket(accumulators[c.objective]), c.num_buckets()))
            .collect();
        augment(observation, self.num_base_states, &digits)
    }
}
