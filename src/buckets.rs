//! Fixed partition of one day into equal-width buckets.
//!
//! Buckets are contiguous half-open intervals starting at 00:00:00. When the
//! width does not divide the day, the last bucket is shortened so that the
//! partition ends exactly at midnight. The partition depends only on the
//! width, so one instance is built per run and shared read-only.

use crate::config::BucketConfig;
use crate::constants::SECONDS_PER_DAY;
use crate::error::{Result, RxError};
use crate::models::{Bucket, TimeOfDay};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBuckets {
    width_secs: u32,
    buckets: Vec<Bucket>,
}

impl DayBuckets {
    /// Generate the partition for `width_secs`
    pub fn generate(width_secs: u32) -> Result<Self> {
        if width_secs == 0 || width_secs > SECONDS_PER_DAY {
            return Err(RxError::configuration(format!(
                "bucket width must be between 1 and {} seconds, got {}",
                SECONDS_PER_DAY, width_secs
            )));
        }

        let buckets = (0..SECONDS_PER_DAY)
            .step_by(width_secs as usize)
            .enumerate()
            .map(|(index, start)| {
                Bucket::new(index, start, (start + width_secs).min(SECONDS_PER_DAY))
            })
            .collect();

        Ok(Self {
            width_secs,
            buckets,
        })
    }

    pub fn from_config(config: &BucketConfig) -> Result<Self> {
        Self::generate(config.width_secs)
    }

    pub fn width_secs(&self) -> u32 {
        self.width_secs
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Bucket> {
        self.buckets.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bucket> {
        self.buckets.iter()
    }

    /// Index of the bucket containing `time`
    pub fn locate(&self, time: TimeOfDay) -> usize {
        (time.seconds() / self.width_secs) as usize
    }
}

impl<'a> IntoIterator for &'a DayBuckets {
    type Item = &'a Bucket;
    type IntoIter = std::slice::Iter<'a, Bucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}
