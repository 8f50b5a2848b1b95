use std::collections::HashSet;

use super::frequencies::ConditionalFrequencyDistribution;
use super::ngram::{Direction, Ngram};
use super::segment::{Segment, SegmentType};
use super::variety::{Category, Variety};

/// Everything one pass of window extraction produces for one order.
pub(crate) struct WindowStats {
	pub(crate) cfd: ConditionalFrequencyDistribution<(Ngram, Category), Segment>,
	pub(crate) ngrams: HashSet<Ngram>,
	pub(crate) categories: HashSet<String>,
}

/// Walks a variety's words and emits every fixed-size n-gram window.
///
/// # Behavior
/// - Only Consonant, Vowel and Anchor nodes take part; every other node
///   type is skipped without breaking contiguity.
/// - From each retained start node the next `order` retained nodes form a
///   window. When fewer remain before the word ends, scanning of that
///   word stops; a short trailing window is discarded, never padded.
/// - Each window is recorded as an observed n-gram and split into a
///   context (all but the outcome end of `dir`) and an outcome segment.
/// - The `Category::None` cell is incremented for every window; windows
///   of a word with a named category additionally increment that
///   category's cell, so category counts are extra counts on top of the
///   unconditional ones, not a partition of them.
pub(crate) fn collect(variety: &Variety, order: usize, dir: Direction) -> WindowStats {
	let mut stats = WindowStats {
		cfd: ConditionalFrequencyDistribution::new(),
		ngrams: HashSet::new(),
		categories: HashSet::new(),
	};

	for word in variety.words() {
		let category = word.sense().category().clone();
		if let Category::Named(name) = &category {
			stats.categories.insert(name.clone());
		}

		let nodes: Vec<Segment> = word
			.shape()
			.iter()
			.filter(|node| {
				matches!(
					node.kind(),
					SegmentType::Consonant | SegmentType::Vowel | SegmentType::Anchor
				)
			})
			.map(|node| node.segment())
			.collect();

		for start in 0..nodes.len() {
			if start + order > nodes.len() {
				// Not enough nodes left for a full window.
				break;
			}
			let window = &nodes[start..start + order];
			stats.ngrams.insert(Ngram::from(window));

			let (context, outcome) = match dir {
				Direction::LeftToRight => (Ngram::from(&window[..order - 1]), window[order - 1]),
				Direction::RightToLeft => (Ngram::from(&window[1..]), window[0]),
			};

			stats
				.cfd
				.distribution_mut((context.clone(), Category::None))
				.increment(outcome);
			if category != Category::None {
				stats
					.cfd
					.distribution_mut((context, category.clone()))
					.increment(outcome);
			}
		}
	}

	stats
}
