use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Multiset of outcomes with integer counts.
///
/// # Responsibilities
/// - Accumulate outcome counts during training
/// - Report per-outcome counts and sample/outcome statistics
///
/// # Invariants
/// - No zero-count entries are ever stored
/// - `sample_outcome_count` equals the sum of all recorded counts
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FrequencyDistribution<T: Eq + Hash> {
	counts: HashMap<T, usize>,
	total: usize,
}

impl<T: Eq + Hash> FrequencyDistribution<T> {
	pub fn new() -> Self {
		Self { counts: HashMap::new(), total: 0 }
	}

	/// Records one occurrence of an outcome.
	pub fn increment(&mut self, outcome: T) {
		self.increment_by(outcome, 1);
	}

	/// Records `count` occurrences of an outcome.
	///
	/// A zero `count` is ignored so the no-zero-entries invariant holds.
	pub fn increment_by(&mut self, outcome: T, count: usize) {
		if count == 0 {
			return;
		}
		*self.counts.entry(outcome).or_insert(0) += count;
		self.total += count;
	}

	/// Count recorded for an outcome, 0 when never observed.
	pub fn count(&self, outcome: &T) -> usize {
		self.counts.get(outcome).copied().unwrap_or(0)
	}

	/// Total number of recorded samples.
	pub fn sample_outcome_count(&self) -> usize {
		self.total
	}

	/// Number of distinct outcomes with a count > 0.
	pub fn distinct_outcome_count(&self) -> usize {
		self.counts.len()
	}

	/// Iterates over the outcomes with a count > 0.
	pub fn observed_samples(&self) -> impl Iterator<Item = &T> {
		self.counts.keys()
	}

	/// Iterates over `(outcome, count)` pairs.
	pub fn iter(&self) -> impl Iterator<Item = (&T, usize)> {
		self.counts.iter().map(|(outcome, count)| (outcome, *count))
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}
}

impl<T: Eq + Hash> Default for FrequencyDistribution<T> {
	fn default() -> Self {
		Self::new()
	}
}

/// Mapping from a condition to the frequency distribution observed under
/// that condition.
///
/// The mutation path creates an empty distribution on first access, so
/// training code never handles a missing-condition case. The read path
/// returns `None` for unseen conditions; queries treat that as an empty
/// distribution (count 0, total 0).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ConditionalFrequencyDistribution<C: Eq + Hash, T: Eq + Hash> {
	conditions: HashMap<C, FrequencyDistribution<T>>,
}

impl<C: Eq + Hash, T: Eq + Hash> ConditionalFrequencyDistribution<C, T> {
	pub fn new() -> Self {
		Self { conditions: HashMap::new() }
	}

	/// Distribution under a condition, `None` when never observed.
	pub fn get(&self, condition: &C) -> Option<&FrequencyDistribution<T>> {
		self.conditions.get(condition)
	}

	/// Distribution under a condition, created empty on first access.
	pub fn distribution_mut(&mut self, condition: C) -> &mut FrequencyDistribution<T> {
		self.conditions.entry(condition).or_default()
	}

	/// Iterates over the observed conditions.
	pub fn conditions(&self) -> impl Iterator<Item = &C> {
		self.conditions.keys()
	}

	/// Iterates over `(condition, distribution)` pairs.
	pub fn iter(&self) -> impl Iterator<Item = (&C, &FrequencyDistribution<T>)> {
		self.conditions.iter()
	}

	pub fn len(&self) -> usize {
		self.conditions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.conditions.is_empty()
	}
}

impl<C: Eq + Hash, T: Eq + Hash> Default for ConditionalFrequencyDistribution<C, T> {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn total_equals_sum_of_counts() {
		let mut fd = FrequencyDistribution::new();
		fd.increment("a");
		fd.increment("a");
		fd.increment("b");
		fd.increment_by("c", 3);
		assert_eq!(fd.count(&"a"), 2);
		assert_eq!(fd.count(&"b"), 1);
		assert_eq!(fd.count(&"c"), 3);
		assert_eq!(fd.count(&"z"), 0);
		assert_eq!(fd.sample_outcome_count(), 6);
		assert_eq!(fd.sample_outcome_count(), fd.iter().map(|(_, count)| count).sum());
		assert_eq!(fd.distinct_outcome_count(), 3);
	}

	#[test]
	fn zero_increments_store_nothing() {
		let mut fd = FrequencyDistribution::new();
		fd.increment_by("a", 0);
		assert!(fd.is_empty());
		assert_eq!(fd.distinct_outcome_count(), 0);
		assert_eq!(fd.sample_outcome_count(), 0);
	}

	#[test]
	fn conditions_are_created_on_mutation_only() {
		let mut cfd = ConditionalFrequencyDistribution::new();
		assert!(cfd.get(&"ctx").is_none());
		cfd.distribution_mut("ctx").increment('x');
		cfd.distribution_mut("ctx").increment('x');
		assert_eq!(cfd.len(), 1);
		let fd = cfd.get(&"ctx").unwrap();
		assert_eq!(fd.count(&'x'), 2);
		// Read path still creates nothing.
		assert!(cfd.get(&"other").is_none());
		assert_eq!(cfd.len(), 1);
	}
}
