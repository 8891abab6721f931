//! Count-sensitive reduction of samples into one value per bucket.
//!
//! For each bucket, `n` is the number of samples with a usable value:
//!
//! - `n == expected_count`: the values are summed.
//! - `0 < n` otherwise: the mean is scaled by `expected_count`, estimating
//!   the sum a fully populated bucket would have produced.
//! - `n == 0`: handled by [`EmptyBucketPolicy`].
//!
//! Samples with a missing value still belong to their bucket but never
//! count towards `n`.

use crate::buckets::DayBuckets;
use crate::config::{AggregationConfig, EmptyBucketPolicy};
use crate::models::{BucketResult, Sample};

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    count: usize,
    sum: f64,
}

impl Accumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.count += 1;
            self.sum += value;
        }
    }
}

/// Reduce a bucket's values to its output value; `None` when nothing is usable
pub fn reduce(count: usize, sum: f64, expected_count: usize) -> Option<f64> {
    match count {
        0 => None,
        n if n == expected_count => Some(sum),
        n => Some(sum / n as f64 * expected_count as f64),
    }
}

/// Applies the reduction rule over a day partition
#[derive(Debug, Clone)]
pub struct Aggregator {
    config: AggregationConfig,
}

impl Aggregator {
    pub fn new(config: AggregationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// One result per bucket, ascending by time
    pub fn aggregate(&self, samples: &[Sample], buckets: &DayBuckets) -> Vec<BucketResult> {
        let mut accumulators = vec![Accumulator::default(); buckets.len()];
        for sample in samples {
            accumulators[buckets.locate(sample.time)].push(sample.value);
        }

        buckets
            .iter()
            .zip(&accumulators)
            .filter_map(|(bucket, acc)| {
                let output_value = match reduce(acc.count, acc.sum, self.config.expected_count) {
                    Some(value) => value,
                    None => match self.config.empty_buckets {
                        EmptyBucketPolicy::Omit => return None,
                        EmptyBucketPolicy::Zero => 0.0,
                    },
                };

                Some(BucketResult {
                    index: bucket.index,
                    time_label: bucket.start().to_string(),
                    output_value,
                })
            })
            .collect()
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(AggregationConfig::default())
    }
}
