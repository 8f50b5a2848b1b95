use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::{fs, io, thread};

use serde::{Deserialize, Serialize};

use phonogram_core::model::{
    Category, Direction, Ngram, NgramModel, Segment, SegmentKey, SegmentPool, SegmentType, Sense,
    ShapeNode, SmootherKind, Variety, Word,
};

const VOWELS: &str = "aeiou";
const DIGRAPHS: [&str; 3] = ["ch", "sh", "th"];

/// Hard cap on generated shapes; a chain that never samples the closing
/// anchor must still terminate.
const MAX_GENERATED_SEGMENTS: usize = 24;

/// A word list after training: the variety name, the pool that interned
/// its segments and the backoff chain from order 1 upward.
#[derive(Serialize, Deserialize)]
pub struct TrainedVariety {
    pub name: String,
    pub pool: SegmentPool,
    pub models: Vec<Arc<NgramModel>>,
}

/// Reads a text file and returns its lines.
fn read_file<P: AsRef<Path>>(filepath: P) -> io::Result<Vec<String>> {
    let contents = fs::read_to_string(filepath)?;
    Ok(contents.lines().map(str::to_owned).collect())
}

/// Sibling path with another extension: `data/english.txt` + `"bin"`
/// gives `data/english.bin`.
fn build_output_path<P: AsRef<Path>>(input_path: P, extension: &str) -> io::Result<PathBuf> {
    let input_path = input_path.as_ref();
    if input_path.file_stem().is_none() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"));
    }
    Ok(input_path.with_extension(extension))
}

/// Base filename without extension, used as the variety name.
fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
    let stem = input_path
        .as_ref()
        .file_stem()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;
    Ok(stem.to_string_lossy().to_string())
}

/// File names (no paths) with the given extension, directly in `dir`.
fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
            if let Some(name) = path.file_name() {
                files.push(name.to_string_lossy().to_string());
            }
        }
    }
    Ok(files)
}

/// Parses one word-list line: `spelling<TAB>category`, category optional.
/// Blank lines and `%` comments are skipped.
fn parse_line(line: &str) -> Option<(String, Category)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('%') {
        return None;
    }
    match line.split_once('\t') {
        Some((spelling, category)) => {
            Some((spelling.to_owned(), Category::named(category.trim())))
        }
        None => Some((line.to_owned(), Category::None)),
    }
}

/// Naive orthographic segmenter: digraphs are matched greedily, vowels
/// are `aeiou`, `-` becomes a morpheme boundary and every other letter a
/// consonant. Anchors close the shape at both ends.
fn segment(pool: &mut SegmentPool, spelling: &str) -> Vec<ShapeNode> {
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
    shape
}

fn build_variety(name: &str, lines: &[String], pool: &mut SegmentPool) -> Variety {
    let mut variety = Variety::new(name);
    for line in lines {
        if let Some((spelling, category)) = parse_line(line) {
            let shape = segment(pool, &spelling);
            variety.add_word(Word::new(&spelling, shape, Sense::new(&spelling, category)));
        }
    }
    variety
}

/// Trains a `TrainedVariety` from a word list, or loads the `.bin`
/// sibling if one exists.
///
/// - `filepath` is the input text file.
/// - Uses `postcard` for compact serialization/deserialization.
/// - The trained chain is written back as a binary cache.
pub fn train_or_load<P: AsRef<Path>>(
    filepath: P,
    max_order: usize,
) -> Result<TrainedVariety, Box<dyn std::error::Error>> {
    let binary_path = build_output_path(&filepath, "bin")?;
    if binary_path.exists() {
        let bytes = fs::read(binary_path)?;
        return Ok(postcard::from_bytes(&bytes)?);
    }

    let name = get_filename(&filepath)?;
    let lines = read_file(&filepath)?;
    let mut pool = SegmentPool::new();
    let variety = build_variety(&name, &lines, &mut pool);
    let models = NgramModel::train_all(
        max_order,
        &variety,
        Direction::LeftToRight,
        SmootherKind::ModifiedKneserNey,
    )?;

    let trained = TrainedVariety { name, pool, models };
    let bytes = postcard::to_stdvec(&trained)?;
    fs::write(binary_path, bytes)?;
    Ok(trained)
}

/// Trains every `.txt` word list in a directory, one chunk of files per
/// worker thread, and returns the varieties sorted by name.
pub fn train_folder<P: AsRef<Path>>(
    dir: P,
    max_order: usize,
) -> Result<Vec<TrainedVariety>, Box<dyn std::error::Error>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(format!("Expected a directory, got: {}", dir.display()).into());
    }

    let files = list_files(dir, "txt")?;
    if files.is_empty() {
        return Ok(Vec::new());
    }

    let cpus = num_cpus::get().max(1);
    let chunk_size = files.len().div_ceil(cpus);

    let (tx, rx) = mpsc::channel();
    for chunk in files.chunks(chunk_size) {
        let tx = tx.clone();
        let paths: Vec<PathBuf> = chunk.iter().map(|file| dir.join(file)).collect();

        thread::spawn(move || {
            for path in paths {
                let result = train_or_load(&path, max_order)
                    .map_err(|error| format!("{}: {}", path.display(), error));
                if tx.send(result).is_err() {
                    // Receiver hung up after a first failure; stop the chunk.
                    return;
                }
            }
        });
    }
    drop(tx);

    let mut trained = Vec::new();
    for result in rx.iter() {
        trained.push(result?);
    }
    trained.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(trained)
}

/// Generates one pseudo-word from a trained chain.
///
/// # Behavior
/// - Seeds from a random word-edge n-gram of the highest-order model.
/// - Samples the next segment with the longest context that has recorded
///   continuations, dropping to shorter contexts otherwise.
/// - Stops at the closing anchor, when no model can continue, or at
///   `MAX_GENERATED_SEGMENTS`.
pub fn generate(trained: &TrainedVariety) -> Option<String> {
    let top = trained.models.last()?;
    let seed = top.random_seed()?;
    let mut sequence: Vec<Segment> = seed.segments().to_vec();

    loop {
        if sequence.len() > 1 && sequence.last() == Some(&Segment::ANCHOR) {
            break;
        }
        if sequence.len() >= MAX_GENERATED_SEGMENTS {
            break;
        }

        let mut next = None;
        for model in trained.models.iter().rev() {
            let needed = model.order() - 1;
            if sequence.len() < needed {
                continue;
            }
            let context = Ngram::from(&sequence[sequence.len() - needed..]);
            if let Some(seg) = model.sample_next(&context, &Category::None) {
                next = Some(seg);
                break;
            }
        }

        match next {
            Some(seg) => sequence.push(seg),
            None => break,
        }
    }

    let word: String = sequence
        .iter()
        .filter(|seg| !seg.is_anchor())
        .map(|seg| trained.pool.data(*seg).features.as_str())
        .collect();
    if word.is_empty() { None } else { Some(word) }
}
