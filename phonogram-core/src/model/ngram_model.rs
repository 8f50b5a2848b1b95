use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;
use rand::prelude::IteratorRandom;
use serde::{Deserialize, Serialize};

use super::ngram::{Direction, Ngram};
use super::segment::Segment;
use super::smoothing::{Cfd, ModifiedKneserNeySmoother, Smoother, SmootherKind, WittenBellSmoother};
use super::variety::{Category, Variety};
use super::windows;

/// A trained n-gram model of one order over one variety snapshot.
///
/// The model owns the conditional frequency table built by window
/// extraction and delegates probability estimation to its smoother.
/// Models of decreasing order form a backoff chain: a smoother that backs
/// off owns the next lower-order model, built bottom-up so the chain has
/// no cyclic ownership.
///
/// # Responsibilities
/// - Hold counts, observed n-grams and observed categories for one order
/// - Validate query contracts (context and n-gram lengths)
/// - Delegate probability estimation to the smoother
/// - Expose raw frequencies independent of smoothing
///
/// # Invariants
/// - Immutable after training; concurrent read-only queries are safe
/// - `order >= 1`; the context of every accepted query has `order - 1`
///   segments
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NgramModel {
	order: usize,
	dir: Direction,
	cfd: Cfd,
	ngrams: HashSet<Ngram>,
	categories: HashSet<String>,
	smoother: Smoother,
}

impl NgramModel {
	/// Trains a single model of the given order.
	///
	/// For smoothers that back off, the lower-order chain down to order 1
	/// is trained along with it and owned by the returned model.
	///
	/// # Errors
	/// Returns an error if `order` is 0.
	pub fn train(
		order: usize,
		variety: &Variety,
		dir: Direction,
		kind: SmootherKind,
	) -> Result<NgramModel, String> {
		let mut chain = Self::train_all(order, variety, dir, kind)?;
		// The top model is only referenced by the chain vector itself.
		match chain.pop() {
			Some(top) => Ok(Arc::try_unwrap(top).unwrap_or_else(|shared| (*shared).clone())),
			None => Err("training produced no model".to_owned()),
		}
	}

	/// Trains the full backoff chain of models from order 1 up to
	/// `max_order`, returned in increasing order.
	///
	/// Models are built bottom-up; each Witten-Bell or Kneser-Ney
	/// smoother holds the previously built model as its backoff target.
	/// Maximum likelihood models do not link and are trained per order.
	///
	/// # Errors
	/// Returns an error if `max_order` is 0.
	pub fn train_all(
		max_order: usize,
		variety: &Variety,
		dir: Direction,
		kind: SmootherKind,
	) -> Result<Vec<Arc<NgramModel>>, String> {
		if max_order == 0 {
			return Err("max_order must be >= 1".to_owned());
		}

		let mut chain: Vec<Arc<NgramModel>> = Vec::with_capacity(max_order);
		for order in 1..=max_order {
			let stats = windows::collect(variety, order, dir);
			let lower_order = if order > 1 { chain.last().cloned() } else { None };
			let smoother = match kind {
				SmootherKind::MaxLikelihood => Smoother::MaxLikelihood,
				SmootherKind::WittenBell => {
					Smoother::WittenBell(WittenBellSmoother::train(variety, lower_order))
				}
				SmootherKind::ModifiedKneserNey => Smoother::ModifiedKneserNey(
					ModifiedKneserNeySmoother::train(&stats.cfd, lower_order),
				),
			};
			chain.push(Arc::new(NgramModel {
				order,
				dir,
				cfd: stats.cfd,
				ngrams: stats.ngrams,
				categories: stats.categories,
				smoother,
			}));
		}
		Ok(chain)
	}

	/// Smoothed conditional probability of a segment after a context.
	///
	/// Pass `Category::None` for the unconditional estimate. Category
	/// conditioned queries read the category's own cells; an unseen
	/// category reads empty distributions and degrades to whatever the
	/// smoothing formula computes from zero counts.
	///
	/// # Errors
	/// Returns an error when the context does not hold exactly
	/// `order - 1` segments. That is a caller contract violation, not a
	/// data condition.
	pub fn get_probability(
		&self,
		seg: Segment,
		context: &Ngram,
		category: &Category,
	) -> Result<f64, String> {
		if context.len() != self.order - 1 {
			return Err(format!(
				"context must hold {} segments for an order {} model, got {}",
				self.order - 1,
				self.order,
				context.len()
			));
		}
		Ok(self.probability(seg, context, category))
	}

	/// Probability without the contract check, for backoff recursion
	/// where the context length is correct by construction.
	pub(crate) fn probability(&self, seg: Segment, context: &Ngram, category: &Category) -> f64 {
		self.smoother.probability(&self.cfd, self.dir, seg, context, category)
	}

	/// Raw recorded count of an exact full n-gram under a category,
	/// independent of the smoothing strategy.
	///
	/// # Errors
	/// Returns an error when the n-gram does not hold exactly `order`
	/// segments.
	pub fn get_frequency(&self, ngram: &Ngram, category: &Category) -> Result<usize, String> {
		if ngram.len() != self.order {
			return Err(format!(
				"ngram must hold {} segments for an order {} model, got {}",
				self.order,
				self.order,
				ngram.len()
			));
		}
		let context = ngram.take_all_except_last(self.dir);
		let Some(outcome) = ngram.get_last(self.dir) else {
			// Unreachable: order >= 1 means the n-gram is non-empty.
			return Ok(0);
		};
		Ok(self
			.cfd
			.get(&(context, category.clone()))
			.map_or(0, |fd| fd.count(&outcome)))
	}

	/// Draws an outcome for a context, weighted by the raw conditional
	/// counts under the given category.
	///
	/// Returns `None` when the condition has no recorded samples; the
	/// sampler never invents vocabulary.
	pub fn sample_next(&self, context: &Ngram, category: &Category) -> Option<Segment> {
		let fd = self.cfd.get(&(context.clone(), category.clone()))?;
		let total = fd.sample_outcome_count();
		if total == 0 {
			return None;
		}

		let mut r = rand::rng().random_range(0..total);
		let mut fallback: Option<Segment> = None;
		for (seg, count) in fd.iter() {
			if r < count {
				return Some(*seg);
			}
			r -= count;
			fallback = Some(*seg);
		}
		// Should not happen, but kept for safety.
		fallback
	}

	/// Picks a uniformly random observed n-gram that starts, along the
	/// model's direction, at the word edge.
	///
	/// Useful for seeding pseudo-word generation. Returns `None` when no
	/// edge n-gram was observed.
	pub fn random_seed(&self) -> Option<Ngram> {
		self.ngrams
			.iter()
			.filter(|ngram| ngram.get_first(self.dir) == Some(Segment::ANCHOR))
			.choose(&mut rand::rng())
			.cloned()
	}

	pub fn order(&self) -> usize {
		self.order
	}

	pub fn direction(&self) -> Direction {
		self.dir
	}

	/// The distinct full n-grams observed at this order.
	pub fn ngrams(&self) -> &HashSet<Ngram> {
		&self.ngrams
	}

	/// The named categories seen on the variety's senses.
	pub fn categories(&self) -> &HashSet<String> {
		&self.categories
	}

	pub fn smoother_kind(&self) -> SmootherKind {
		self.smoother.kind()
	}

	/// The next lower model of the backoff chain, when the smoother
	/// holds one.
	pub fn lower_order_model(&self) -> Option<&NgramModel> {
		self.smoother.lower_order_model()
	}
}
