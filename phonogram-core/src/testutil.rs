//! Test fixtures: a minimal orthographic segmenter and the reference
//! word list shared by the model tests.

use crate::model::segment::{SegmentKey, SegmentPool, SegmentType};
use crate::model::variety::{Category, Sense, ShapeNode, Variety, Word};

const VOWELS: &str = "aeiou";
const DIGRAPHS: [&str; 3] = ["ch", "sh", "th"];

/// Segments a lowercase spelling into a shape with anchors at both ends
/// and appends the word to the variety.
///
/// Digraphs are matched greedily, vowels are `aeiou`, `-` becomes a
/// boundary node and every other letter a consonant. This is only the
/// fixture stand-in for the real segmenter collaborator.
pub(crate) fn add_word(pool: &mut SegmentPool, variety: &mut Variety, spelling: &str, category: Category) {
	let mut shape = vec![ShapeNode::anchor()];
	let chars: Vec<char> = spelling.chars().collect();
	let mut position = 0;
	while position < chars.len() {
		let pair: String = chars[position..(position + 2).min(chars.len())].iter().collect();
		if DIGRAPHS.contains(&pair.as_str()) {
			let seg = pool.intern(SegmentKey::new(SegmentType::Consonant, &pair));
			shape.push(ShapeNode::new(SegmentType::Consonant, seg));
			position += 2;
			continue;
		}
		let ch = chars[position];
		let kind = if ch == '-' {
			SegmentType::Boundary
		} else if VOWELS.contains(ch) {
			SegmentType::Vowel
		} else {
			SegmentType::Consonant
		};
		let seg = pool.intern(SegmentKey::new(kind, &ch.to_string()));
		shape.push(ShapeNode::new(kind, seg));
		position += 1;
	}
	shape.push(ShapeNode::anchor());

	variety.add_word(Word::new(spelling, shape, Sense::new(spelling, category)));
}

/// The word list behind the reference probabilities: 17 distinct
/// unigrams (anchor included), 37 distinct bigrams.
pub(crate) fn reference_variety(pool: &mut SegmentPool) -> Variety {
	let mut variety = Variety::new("test");
	for spelling in ["call", "stall", "hello", "the", "a", "test", "income", "unproduce"] {
		add_word(pool, &mut variety, spelling, Category::None);
	}
	variety
}
