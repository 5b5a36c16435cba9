//! Bounded rolling sample window with summary statistics.

use std::collections::VecDeque;

use rust_decimal::{Decimal, MathematicalOps};

/// Fixed-capacity FIFO of samples. The oldest sample is evicted first.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    samples: VecDeque<Decimal>,
    capacity: usize,
}

impl RollingWindow {
    /// Create an empty window holding at most `capacity` samples.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a sample, evicting the oldest one when full.
    pub fn push(&mut self, value: Decimal) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Decimal> {
        self.samples.iter()
    }

    /// Arithmetic mean, or `None` when empty.
    #[must_use]
    pub fn mean(&self) -> Option<Decimal> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: Decimal = self.samples.iter().copied().sum();
        Some(sum / Decimal::from(self.samples.len()))
    }

    /// Sample standard deviation (n - 1 denominator), or `None` below two samples.
    #[must_use]
    pub fn sample_std_dev(&self) -> Option<Decimal> {
        let n = self.samples.len();
        if n < 2 {
            return None;
        }
        let mean = self.mean()?;
        let sum_sq: Decimal = self
            .samples
            .iter()
            .map(|value| {
                let diff = *value - mean;
                diff * diff
            })
            .sum();
        let variance = sum_sq / Decimal::from(n - 1);
        variance.sqrt()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
