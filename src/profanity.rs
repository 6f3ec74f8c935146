/// Profanity filter for chirp bodies
///
/// Whole-word, case-insensitive match against a fixed word list; matches are
/// replaced with `****`. Splitting and rejoining on single spaces means runs
/// of whitespace collapse as a side effect, which also counts as a change.

const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Replace profane words in a chirp body
///
/// Returns the cleaned text and whether it differs from the input.
pub fn remove_profanity(chirp: &str) -> (String, bool) {
    let cleaned: Vec<&str> = chirp
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            if PROFANE_WORDS.contains(&word.to_lowercase().as_str()) {
                "****"
            } else {
                word
            }
        })
        .collect();

    let cleaned = cleaned.join(" ");
    let changed = cleaned != chirp;
    (cleaned, changed)
}
