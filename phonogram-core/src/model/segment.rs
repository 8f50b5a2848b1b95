use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Type tag of a phonetic unit.
///
/// # Variants
/// - `Consonant` / `Vowel`: regular phonetic segments.
/// - `Boundary`: an intra-word separator (morpheme break, hyphen).
/// - `Anchor`: the word-edge sentinel. It takes part in n-gram windows
///   but is never counted as part of a variety's vocabulary.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SegmentType {
	Consonant,
	Vowel,
	Boundary,
	Anchor,
}

/// Canonical handle for an interned phonetic segment.
///
/// A `Segment` is a stable index into the `SegmentPool` that interned it.
/// Equality and hashing compare the index only, which makes two segments
/// equal exactly when they were interned from the same structural key.
/// This is what lets frequency tables treat phonetically identical
/// segments as one outcome no matter how often they were constructed.
///
/// # Invariants
/// - Index 0 is the anchor sentinel in every pool (`Segment::ANCHOR`).
/// - A handle is only meaningful together with the pool that produced it.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Segment(u32);

impl Segment {
	/// The word-boundary sentinel, pre-interned at index 0 by every pool.
	pub const ANCHOR: Segment = Segment(0);

	/// Returns true if this handle is the anchor sentinel.
	pub fn is_anchor(&self) -> bool {
		self.0 == 0
	}
}

/// Structural key of a segment: type tag plus an opaque feature payload.
///
/// The payload is not interpreted by the model; for orthographic input it
/// is typically the grapheme ("a", "th", ...), for phonetic input an IPA
/// string or a serialized feature bundle.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Debug)]
pub struct SegmentKey {
	pub seg_type: SegmentType,
	pub features: String,
}

impl SegmentKey {
	pub fn new(seg_type: SegmentType, features: &str) -> Self {
		Self { seg_type, features: features.to_owned() }
	}
}

/// Interning arena mapping structural keys to canonical `Segment` handles.
///
/// # Responsibilities
/// - Return the same handle for every intern of the same key
/// - Resolve a handle back to its structural key
/// - Look up existing segments without creating vocabulary
///
/// # Invariants
/// - Grows monotonically; never evicts (bounded by the phonetic inventory)
/// - The anchor sentinel occupies index 0 from construction on
///
/// # Notes
/// - Create one pool per analysis session, or one per variety when
///   training varieties in parallel. Interning is a write; `Segment`
///   lookups on trained models afterward are read-only.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SegmentPool {
	keys: Vec<SegmentKey>,
	index: HashMap<SegmentKey, Segment>,
}

impl SegmentPool {
	/// Creates a pool containing only the anchor sentinel.
	pub fn new() -> Self {
		let anchor = SegmentKey::new(SegmentType::Anchor, "#");
		let mut index = HashMap::new();
		index.insert(anchor.clone(), Segment::ANCHOR);
		Self { keys: vec![anchor], index }
	}

	/// Returns the canonical handle for a structural key, interning it on
	/// first use.
	pub fn intern(&mut self, key: SegmentKey) -> Segment {
		if let Some(seg) = self.index.get(&key) {
			return *seg;
		}
		let seg = Segment(self.keys.len() as u32);
		self.keys.push(key.clone());
		self.index.insert(key, seg);
		seg
	}

	/// Returns an existing handle without creating one.
	///
	/// Query and test code uses this to make sure a lookup never silently
	/// grows the vocabulary.
	pub fn get_existing(&self, key: &SegmentKey) -> Option<Segment> {
		self.index.get(key).copied()
	}

	/// Returns an existing handle by feature payload alone.
	///
	/// Convenient for consumers that key their queries on graphemes.
	/// Linear in the inventory size.
	pub fn get_existing_features(&self, features: &str) -> Option<Segment> {
		self.keys
			.iter()
			.position(|key| key.features == features)
			.map(|position| Segment(position as u32))
	}

	/// Resolves a handle produced by this pool back to its key.
	///
	/// # Notes
	/// - Panics if the handle comes from a different pool with a larger
	///   inventory; handles must not cross pools.
	pub fn data(&self, seg: Segment) -> &SegmentKey {
		&self.keys[seg.0 as usize]
	}

	/// Iterates over every interned handle, anchor included.
	pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
		(0..self.keys.len() as u32).map(Segment)
	}

	/// Number of interned segments, anchor included.
	pub fn len(&self) -> usize {
		self.keys.len()
	}

	pub fn is_empty(&self) -> bool {
		// Never true: the anchor is always present.
		self.keys.is_empty()
	}
}

impl Default for SegmentPool {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn intern_is_canonical() {
		let mut pool = SegmentPool::new();
		let a1 = pool.intern(SegmentKey::new(SegmentType::Vowel, "a"));
		let a2 = pool.intern(SegmentKey::new(SegmentType::Vowel, "a"));
		let b = pool.intern(SegmentKey::new(SegmentType::Consonant, "b"));
		assert_eq!(a1, a2);
		assert_ne!(a1, b);
		assert_eq!(pool.len(), 3);
	}

	#[test]
	fn anchor_is_preinterned() {
		let pool = SegmentPool::new();
		assert_eq!(pool.len(), 1);
		assert!(Segment::ANCHOR.is_anchor());
		assert_eq!(pool.data(Segment::ANCHOR).seg_type, SegmentType::Anchor);
		assert_eq!(
			pool.get_existing(&SegmentKey::new(SegmentType::Anchor, "#")),
			Some(Segment::ANCHOR)
		);
	}

	#[test]
	fn get_existing_never_creates() {
		let mut pool = SegmentPool::new();
		let key = SegmentKey::new(SegmentType::Consonant, "th");
		assert_eq!(pool.get_existing(&key), None);
		assert_eq!(pool.len(), 1);
		let th = pool.intern(key.clone());
		assert_eq!(pool.get_existing(&key), Some(th));
		assert_eq!(pool.get_existing_features("th"), Some(th));
		assert_eq!(pool.get_existing_features("zz"), None);
	}
}
