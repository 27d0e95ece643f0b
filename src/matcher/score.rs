//! Token-sort similarity scoring for titles.
//!
//! Compares two strings for similarity on a 0..=100 scale, insensitive to
//! word order: "Leg Lock Lachlan" and "Lachlan Leg Lock" score 100 against
//! each other. Both inputs are lowercased, split on whitespace, sorted
//! token-wise and rejoined before a Levenshtein ratio is taken:
//!
//! ```text
//! score = round(100 * (1 - distance(sorted_a, sorted_b) / (len_a + len_b)))
//! ```
//!
//! where `distance` counts insertions and deletions at cost 1 and
//! substitutions at cost 2 (a substitution is a delete plus an insert).
//! Normalising by the combined length keeps a short query scoring high
//! against a longer title that contains all of its words.

/// Compute the token-sort similarity between two strings.
///
/// Guarantees:
/// - symmetric: `similarity(a, b) == similarity(b, a)`
/// - reflexive: `similarity(a, a) == 100`
/// - token-order insensitive: permuting the words of either input does not
///   change the score
/// - 100 only when the token multisets are identical after case and
///   whitespace normalisation
/// - `similarity("", "") == 100`; an empty string against a non-empty one
///   scores 0
pub fn similarity(a: &str, b: &str) -> u8 {
    let sorted_a = token_sort_key(a);
    let sorted_b = token_sort_key(b);

    if sorted_a.is_empty() && sorted_b.is_empty() {
        return 100;
    }
    if sorted_a.is_empty() || sorted_b.is_empty() {
        return 0;
    }
    if sorted_a == sorted_b {
        return 100;
    }

    let chars_a: Vec<char> = sorted_a.chars().collect();
    let chars_b: Vec<char> = sorted_b.chars().collect();
    let distance = indel_distance(&chars_a, &chars_b);
    let combined_len = chars_a.len() + chars_b.len();

    let ratio = 100.0 * (1.0 - distance as f64 / combined_len as f64);
    // Distance never exceeds the combined length, but keep the floor explicit.
    ratio.round().max(0.0) as u8
}

/// Lowercase, tokenize on whitespace, sort lexicographically, rejoin.
///
/// The resulting key is identical for any word-order permutation of the
/// input, which is what makes the scorer order-insensitive.
fn token_sort_key(s: &str) -> String {
    let mut tokens: Vec<String> = s.split_whitespace().map(str::to_lowercase).collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Two-row Levenshtein with substitutions costing 2 (delete + insert).
fn indel_distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + if ca == cb { 0 } else { 2 };
            let insertion = curr[j] + 1;
            let deletion = prev[j + 1] + 1;
            curr[j + 1] = substitution.min(insertion).min(deletion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
