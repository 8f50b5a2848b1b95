use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::frequencies::ConditionalFrequencyDistribution;
use super::ngram::{Direction, Ngram};
use super::ngram_model::NgramModel;
use super::segment::{Segment, SegmentType};
use super::variety::{Category, Variety};

/// The conditional frequency table a smoother reads its counts from.
pub(crate) type Cfd = ConditionalFrequencyDistribution<(Ngram, Category), Segment>;

/// Which smoothing strategy to train a model chain with.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum SmootherKind {
	MaxLikelihood,
	WittenBell,
	ModifiedKneserNey,
}

/// A trained smoothing strategy.
///
/// Smoothers are constructed fully trained by `NgramModel::train_all`, so
/// a query can never reach an untrained smoother. Witten-Bell and
/// modified Kneser-Ney own the next lower-order model of their backoff
/// chain; maximum likelihood terminates the chain.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) enum Smoother {
	MaxLikelihood,
	WittenBell(WittenBellSmoother),
	ModifiedKneserNey(ModifiedKneserNeySmoother),
}

impl Smoother {
	pub(crate) fn kind(&self) -> SmootherKind {
		match self {
			Smoother::MaxLikelihood => SmootherKind::MaxLikelihood,
			Smoother::WittenBell(_) => SmootherKind::WittenBell,
			Smoother::ModifiedKneserNey(_) => SmootherKind::ModifiedKneserNey,
		}
	}

	pub(crate) fn lower_order_model(&self) -> Option<&NgramModel> {
		match self {
			Smoother::MaxLikelihood => None,
			Smoother::WittenBell(smoother) => smoother.lower_order.as_deref(),
			Smoother::ModifiedKneserNey(smoother) => smoother.lower_order.as_deref(),
		}
	}

	pub(crate) fn probability(
		&self,
		cfd: &Cfd,
		dir: Direction,
		seg: Segment,
		context: &Ngram,
		category: &Category,
	) -> f64 {
		match self {
			Smoother::MaxLikelihood => max_likelihood(cfd, seg, context, category),
			Smoother::WittenBell(smoother) => smoother.probability(cfd, dir, seg, context, category),
			Smoother::ModifiedKneserNey(smoother) => {
				smoother.probability(cfd, dir, seg, context, category)
			}
		}
	}
}

/// Maximum likelihood estimate: the raw conditional relative frequency.
///
/// The base case every other strategy composes with at order 1. An
/// unseen condition (including any unseen category) has an empty
/// distribution and yields 0.
fn max_likelihood(cfd: &Cfd, seg: Segment, context: &Ngram, category: &Category) -> f64 {
	let Some(fd) = cfd.get(&(context.clone(), category.clone())) else {
		return 0.0;
	};
	let total = fd.sample_outcome_count();
	if total == 0 {
		return 0.0;
	}
	fd.count(&seg) as f64 / total as f64
}

/// Witten-Bell smoothing.
///
/// Reserves probability mass for unseen outcomes in proportion to the
/// number of distinct outcomes seen under a context, and backs off to the
/// lower-order model (or to the uniform `1/vocabulary` at order 1).
///
/// # Invariants
/// - A zero-count context returns exactly the backoff probability; this
///   graceful degradation is what distinguishes Witten-Bell from
///   Kneser-Ney at unattested contexts.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct WittenBellSmoother {
	vocabulary_size: usize,
	pub(crate) lower_order: Option<Arc<NgramModel>>,
}

impl WittenBellSmoother {
	/// Trains the smoother over a variety snapshot.
	///
	/// The vocabulary is the set of distinct consonant and vowel segments
	/// observed anywhere in the variety, plus one slot held out for
	/// unseen segments. The anchor sentinel is not vocabulary.
	pub(crate) fn train(variety: &Variety, lower_order: Option<Arc<NgramModel>>) -> Self {
		let mut seen: HashSet<Segment> = HashSet::new();
		for word in variety.words() {
			for node in word.shape() {
				if matches!(node.kind(), SegmentType::Consonant | SegmentType::Vowel) {
					seen.insert(node.segment());
				}
			}
		}
		Self { vocabulary_size: seen.len() + 1, lower_order }
	}

	pub(crate) fn vocabulary_size(&self) -> usize {
		self.vocabulary_size
	}

	fn probability(
		&self,
		cfd: &Cfd,
		dir: Direction,
		seg: Segment,
		context: &Ngram,
		category: &Category,
	) -> f64 {
		let backoff = match &self.lower_order {
			Some(lower) => lower.probability(seg, &context.skip_first(dir), category),
			None => 1.0 / self.vocabulary_size as f64,
		};

		let Some(fd) = cfd.get(&(context.clone(), category.clone())) else {
			return backoff;
		};
		let total = fd.sample_outcome_count();
		if total == 0 {
			return backoff;
		}
		let distinct = fd.distinct_outcome_count();
		(fd.count(&seg) as f64 + distinct as f64 * backoff) / (total + distinct) as f64
	}
}

/// Absolute discounts of one category, derived from count-of-counts.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default)]
struct Discounts {
	d1: f64,
	d2: f64,
	d3: f64,
}

/// Per-condition counts of outcomes seen exactly once, exactly twice and
/// more than twice. The discount mass (gamma) of a context is built from
/// these.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default)]
struct ConditionCounts {
	n1: usize,
	n2: usize,
	n3_plus: usize,
}

/// Modified Kneser-Ney smoothing (Chen & Goodman discounts).
///
/// # Behavior
/// - Per category, the global count-of-counts `N1..N4` (outcomes seen
///   exactly 1, 2, 3 and 4 times across all conditions of the category)
///   derive the three discounts via `Y = N1 / (N1 + 2*N2)`.
/// - Division by zero in the discount derivation yields a discount of 0,
///   never an error.
/// - A context with no recorded samples returns 0 with no backoff; the
///   zero is a deliberate signal for unattested contexts and must not be
///   smoothed away.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct ModifiedKneserNeySmoother {
	discounts: HashMap<Category, Discounts>,
	condition_counts: HashMap<(Ngram, Category), ConditionCounts>,
	pub(crate) lower_order: Option<Arc<NgramModel>>,
}

impl ModifiedKneserNeySmoother {
	/// Derives discounts and per-condition statistics from the trained
	/// frequency table.
	pub(crate) fn train(cfd: &Cfd, lower_order: Option<Arc<NgramModel>>) -> Self {
		let mut aggregates: HashMap<Category, [usize; 4]> = HashMap::new();
		let mut condition_counts = HashMap::new();

		for (condition, fd) in cfd.iter() {
			let mut counts = ConditionCounts::default();
			let mut n3 = 0;
			let mut n4 = 0;
			for (_, count) in fd.iter() {
				match count {
					1 => counts.n1 += 1,
					2 => counts.n2 += 1,
					count if count > 2 => {
						if count == 3 {
							n3 += 1;
						} else if count == 4 {
							n4 += 1;
						}
						counts.n3_plus += 1;
					}
					_ => {}
				}
			}
			let aggregate = aggregates.entry(condition.1.clone()).or_insert([0; 4]);
			aggregate[0] += counts.n1;
			aggregate[1] += counts.n2;
			aggregate[2] += n3;
			aggregate[3] += n4;
			condition_counts.insert(condition.clone(), counts);
		}

		let mut discounts = HashMap::new();
		for (category, [n1, n2, n3, n4]) in aggregates {
			let mut discount = Discounts::default();
			let mut y = 0.0;
			if n1 > 0 {
				y = n1 as f64 / (n1 + 2 * n2) as f64;
				discount.d1 = 1.0 - 2.0 * y * (n2 as f64 / n1 as f64);
			}
			if n2 > 0 {
				discount.d2 = 2.0 - 3.0 * y * (n3 as f64 / n2 as f64);
			}
			if n3 > 0 {
				discount.d3 = 3.0 - 4.0 * y * (n4 as f64 / n3 as f64);
			}
			discounts.insert(category, discount);
		}

		Self { discounts, condition_counts, lower_order }
	}

	fn probability(
		&self,
		cfd: &Cfd,
		dir: Direction,
		seg: Segment,
		context: &Ngram,
		category: &Category,
	) -> f64 {
		let fd = cfd.get(&(context.clone(), category.clone()));

		if context.is_empty() {
			// Unigram base case: the raw maximum likelihood ratio.
			return match fd {
				Some(fd) if fd.sample_outcome_count() > 0 => {
					fd.count(&seg) as f64 / fd.sample_outcome_count() as f64
				}
				_ => 0.0,
			};
		}

		let Some(fd) = fd else {
			return 0.0;
		};
		let total = fd.sample_outcome_count();
		if total == 0 {
			return 0.0;
		}

		let count = fd.count(&seg);
		// Both lookups hit: any condition with samples was seen in training.
		let discount = self.discounts.get(category).copied().unwrap_or_default();
		let counts = self
			.condition_counts
			.get(&(context.clone(), category.clone()))
			.copied()
			.unwrap_or_default();

		let gamma = (discount.d1 * counts.n1 as f64
			+ discount.d2 * counts.n2 as f64
			+ discount.d3 * counts.n3_plus as f64)
			/ total as f64;
		let d = match count {
			0 => 0.0,
			1 => discount.d1,
			2 => discount.d2,
			_ => discount.d3,
		};

		let backoff = match &self.lower_order {
			Some(lower) => lower.probability(seg, &context.skip_first(dir), category),
			None => 0.0,
		};
		(count as f64 - d) / total as f64 + gamma * backoff
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::segment::{SegmentKey, SegmentPool};

	fn segment(pool: &mut SegmentPool, features: &str) -> Segment {
		pool.intern(SegmentKey::new(SegmentType::Consonant, features))
	}

	#[test]
	fn kneser_ney_discount_derivation() {
		// One condition whose outcomes occur 1, 2, 3 and 4 times: the
		// per-category count-of-counts are N1=N2=N3=N4=1.
		let mut pool = SegmentPool::new();
		let context = Ngram::from(segment(&mut pool, "x"));
		let mut cfd = Cfd::new();
		for (features, count) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
			let outcome = segment(&mut pool, features);
			cfd.distribution_mut((context.clone(), Category::None))
				.increment_by(outcome, count);
		}

		let smoother = ModifiedKneserNeySmoother::train(&cfd, None);
		let discount = smoother.discounts.get(&Category::None).copied().unwrap();
		// Y = 1 / (1 + 2) = 1/3
		assert!((discount.d1 - 1.0 / 3.0).abs() < 1e-12);
		assert!((discount.d2 - 1.0).abs() < 1e-12);
		assert!((discount.d3 - 5.0 / 3.0).abs() < 1e-12);

		let counts = smoother
			.condition_counts
			.get(&(context, Category::None))
			.copied()
			.unwrap();
		assert_eq!(counts.n1, 1);
		assert_eq!(counts.n2, 1);
		assert_eq!(counts.n3_plus, 2);
	}

	#[test]
	fn kneser_ney_discounts_survive_missing_count_of_counts() {
		// All outcomes occur exactly twice: N1 = 0, so Y and d1 stay 0 and
		// the derivation must not divide by zero.
		let mut pool = SegmentPool::new();
		let context = Ngram::from(segment(&mut pool, "x"));
		let mut cfd = Cfd::new();
		for features in ["a", "b"] {
			let outcome = segment(&mut pool, features);
			cfd.distribution_mut((context.clone(), Category::None))
				.increment_by(outcome, 2);
		}

		let smoother = ModifiedKneserNeySmoother::train(&cfd, None);
		let discount = smoother.discounts.get(&Category::None).copied().unwrap();
		assert_eq!(discount.d1, 0.0);
		assert_eq!(discount.d2, 2.0);
		assert_eq!(discount.d3, 0.0);
	}

	#[test]
	fn witten_bell_vocabulary_excludes_anchor() {
		let mut pool = SegmentPool::new();
		let mut variety = Variety::new("test");
		crate::testutil::add_word(&mut pool, &mut variety, "call", Category::None);
		// c, a, l plus the held-out slot; anchors do not count.
		let smoother = WittenBellSmoother::train(&variety, None);
		assert_eq!(smoother.vocabulary_size(), 4);
	}
}
