use serde::{Deserialize, Serialize};

use super::segment::Segment;

/// Traversal direction of a word's segment sequence.
///
/// Windows are always stored in surface (left-to-right) order; the
/// direction only decides which end of a window is the predicted outcome
/// and which end is dropped when backing off to a lower order.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
	LeftToRight,
	RightToLeft,
}

/// Fixed-length ordered sequence of interned segments.
///
/// Used both as the full observed n-gram and, trimmed by one element,
/// as the conditioning context of a model query.
///
/// # Invariants
/// - Equality and hashing are element-wise over the segment handles,
///   which is identity-based per element since segments are interned.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Ngram(Vec<Segment>);

impl Ngram {
	pub fn new(segments: Vec<Segment>) -> Self {
		Self(segments)
	}

	/// The empty n-gram, the context of a unigram model.
	pub fn empty() -> Self {
		Self(Vec::new())
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = Segment> + '_ {
		self.0.iter().copied()
	}

	pub fn segments(&self) -> &[Segment] {
		&self.0
	}

	/// First element along the given direction, `None` when empty.
	pub fn get_first(&self, dir: Direction) -> Option<Segment> {
		match dir {
			Direction::LeftToRight => self.0.first().copied(),
			Direction::RightToLeft => self.0.last().copied(),
		}
	}

	/// Last element along the given direction, `None` when empty.
	///
	/// This is the outcome position of a training window.
	pub fn get_last(&self, dir: Direction) -> Option<Segment> {
		match dir {
			Direction::LeftToRight => self.0.last().copied(),
			Direction::RightToLeft => self.0.first().copied(),
		}
	}

	/// Everything but the outcome position: the context of a window.
	pub fn take_all_except_last(&self, dir: Direction) -> Ngram {
		if self.0.is_empty() {
			return Ngram::empty();
		}
		match dir {
			Direction::LeftToRight => Ngram(self.0[..self.0.len() - 1].to_vec()),
			Direction::RightToLeft => Ngram(self.0[1..].to_vec()),
		}
	}

	/// Drops the first element along the given direction.
	///
	/// Backing off from an order-N context yields the order-(N-1) context.
	pub fn skip_first(&self, dir: Direction) -> Ngram {
		if self.0.is_empty() {
			return Ngram::empty();
		}
		match dir {
			Direction::LeftToRight => Ngram(self.0[1..].to_vec()),
			Direction::RightToLeft => Ngram(self.0[..self.0.len() - 1].to_vec()),
		}
	}

	/// Appends a segment at the outcome end of the given direction.
	pub fn concat(&self, seg: Segment, dir: Direction) -> Ngram {
		let mut segments = self.0.clone();
		match dir {
			Direction::LeftToRight => segments.push(seg),
			Direction::RightToLeft => segments.insert(0, seg),
		}
		Ngram(segments)
	}
}

impl From<Segment> for Ngram {
	fn from(seg: Segment) -> Self {
		Ngram(vec![seg])
	}
}

impl From<&[Segment]> for Ngram {
	fn from(segments: &[Segment]) -> Self {
		Ngram(segments.to_vec())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::segment::{SegmentKey, SegmentPool, SegmentType};

	fn abc(pool: &mut SegmentPool) -> (Segment, Segment, Segment) {
		(
			pool.intern(SegmentKey::new(SegmentType::Vowel, "a")),
			pool.intern(SegmentKey::new(SegmentType::Consonant, "b")),
			pool.intern(SegmentKey::new(SegmentType::Consonant, "c")),
		)
	}

	#[test]
	fn equality_is_element_wise() {
		let mut pool = SegmentPool::new();
		let (a, b, _) = abc(&mut pool);
		assert_eq!(Ngram::new(vec![a, b]), Ngram::new(vec![a, b]));
		assert_ne!(Ngram::new(vec![a, b]), Ngram::new(vec![b, a]));
		assert_ne!(Ngram::new(vec![a]), Ngram::new(vec![a, b]));
	}

	#[test]
	fn direction_aware_split() {
		let mut pool = SegmentPool::new();
		let (a, b, c) = abc(&mut pool);
		let ngram = Ngram::new(vec![a, b, c]);

		assert_eq!(ngram.get_last(Direction::LeftToRight), Some(c));
		assert_eq!(ngram.get_last(Direction::RightToLeft), Some(a));
		assert_eq!(ngram.get_first(Direction::RightToLeft), Some(c));

		assert_eq!(ngram.take_all_except_last(Direction::LeftToRight), Ngram::new(vec![a, b]));
		assert_eq!(ngram.take_all_except_last(Direction::RightToLeft), Ngram::new(vec![b, c]));

		assert_eq!(ngram.skip_first(Direction::LeftToRight), Ngram::new(vec![b, c]));
		assert_eq!(ngram.skip_first(Direction::RightToLeft), Ngram::new(vec![a, b]));
	}

	#[test]
	fn empty_ngram_edges() {
		let empty = Ngram::empty();
		assert!(empty.is_empty());
		assert_eq!(empty.get_first(Direction::LeftToRight), None);
		assert_eq!(empty.get_last(Direction::RightToLeft), None);
		assert_eq!(empty.take_all_except_last(Direction::LeftToRight), Ngram::empty());
		assert_eq!(empty.skip_first(Direction::RightToLeft), Ngram::empty());
	}

	#[test]
	fn concat_respects_direction() {
		let mut pool = SegmentPool::new();
		let (a, b, _) = abc(&mut pool);
		let ngram = Ngram::from(a);
		assert_eq!(ngram.concat(b, Direction::LeftToRight), Ngram::new(vec![a, b]));
		assert_eq!(ngram.concat(b, Direction::RightToLeft), Ngram::new(vec![b, a]));
	}
}
