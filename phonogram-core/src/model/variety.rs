use serde::{Deserialize, Serialize};

use super::segment::{Segment, SegmentType};

/// Optional semantic or part-of-speech tag on a word's sense.
///
/// An explicit sum type instead of an empty-string sentinel: the
/// unconditional frequency tables key on `Category::None`, category
/// conditioned tables on `Category::Named`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Category {
	None,
	Named(String),
}

impl Category {
	pub fn named(name: &str) -> Self {
		Category::Named(name.to_owned())
	}
}

/// Gloss and optional category of a word.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Sense {
	gloss: String,
	category: Category,
}

impl Sense {
	pub fn new(gloss: &str, category: Category) -> Self {
		Self { gloss: gloss.to_owned(), category }
	}

	pub fn gloss(&self) -> &str {
		&self.gloss
	}

	pub fn category(&self) -> &Category {
		&self.category
	}
}

/// One typed node of a word's phonetic shape.
///
/// Nodes carry the interned handle of their segment; anchor nodes carry
/// the anchor sentinel. Segmentation (orthography to nodes) is a
/// collaborator's job, the model only reads shapes.
#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct ShapeNode {
	kind: SegmentType,
	segment: Segment,
}

impl ShapeNode {
	pub fn new(kind: SegmentType, segment: Segment) -> Self {
		Self { kind, segment }
	}

	/// A word-edge sentinel node.
	pub fn anchor() -> Self {
		Self { kind: SegmentType::Anchor, segment: Segment::ANCHOR }
	}

	pub fn kind(&self) -> SegmentType {
		self.kind
	}

	pub fn segment(&self) -> Segment {
		self.segment
	}
}

/// A word form: its spelling, its segmented shape and its sense.
///
/// # Invariants
/// - The shape is ordered and carries anchor nodes at both ends when
///   produced by a well-behaved segmenter. The model does not enforce
///   this; words without anchors simply train without edge windows.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Word {
	str_rep: String,
	shape: Vec<ShapeNode>,
	sense: Sense,
}

impl Word {
	pub fn new(str_rep: &str, shape: Vec<ShapeNode>, sense: Sense) -> Self {
		Self { str_rep: str_rep.to_owned(), shape, sense }
	}

	pub fn str_rep(&self) -> &str {
		&self.str_rep
	}

	pub fn shape(&self) -> &[ShapeNode] {
		&self.shape
	}

	pub fn sense(&self) -> &Sense {
		&self.sense
	}
}

/// A named collection of words from one language variety.
///
/// Supplied by external collaborators (importers, segmenters); the model
/// treats it as a read-only training snapshot.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Variety {
	name: String,
	words: Vec<Word>,
}

impl Variety {
	pub fn new(name: &str) -> Self {
		Self { name: name.to_owned(), words: Vec::new() }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn add_word(&mut self, word: Word) {
		self.words.push(word);
	}

	pub fn words(&self) -> &[Word] {
		&self.words
	}
}
