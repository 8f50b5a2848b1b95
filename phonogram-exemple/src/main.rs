mod corpus;

use phonogram_core::model::{Category, Ngram, Segment};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Train all word lists from the "data" directory (.txt files)
    // Load automatically if a .bin cache is existing
    let varieties = corpus::train_folder("./data", 3)?;
    if varieties.is_empty() {
        return Err("No word lists found under ./data".into());
    }

    for trained in &varieties {
        println!("== {} ==", trained.name);

        // The chain runs from order 1 (unigrams) up to order 3
        for model in &trained.models {
            println!(
                "order {}: {} distinct n-grams",
                model.order(),
                model.ngrams().len()
            );
        }

        // Categories picked up from the word list, if any
        let mut categories: Vec<&String> = trained.models[0].categories().iter().collect();
        categories.sort();
        if !categories.is_empty() {
            println!("categories: {:?}", categories);
        }

        // Smoothed probability of each vowel right after the word edge
        if let Some(bigram) = trained.models.get(1) {
            let context = Ngram::from(Segment::ANCHOR);
            for vowel in ["a", "e", "i", "o", "u"] {
                if let Some(seg) = trained.pool.get_existing_features(vowel) {
                    let p = bigram.get_probability(seg, &context, &Category::None)?;
                    println!("P({} | #) = {:.4}", vowel, p);
                }
            }

            // A context of the wrong length is a caller error, not a zero
            match bigram.get_probability(Segment::ANCHOR, &Ngram::empty(), &Category::None) {
                Ok(_) => println!("Should not happen"),
                Err(_) => println!("An empty context is rejected by an order 2 model"),
            }
        }

        // Generate 5 pseudo-words using the backoff chain
        for i in 0..5 {
            match corpus::generate(trained) {
                Some(word) => println!("Generated word {}: {}", i + 1, word),
                None => println!("Generated word {}: no seed available", i + 1),
            }
        }

        println!();
    }

    Ok(())
}
