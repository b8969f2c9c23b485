//! Literal-overlap layer: catches copied wording via trigram comparison.

use std::collections::HashSet;

use super::{round2, CheckScore, LITERAL_THRESHOLD};

/// Lowercase alphanumeric words longer than two characters.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .map(String::from)
        .collect()
}

/// Overlapping three-word sequences over the token stream.
fn trigrams(text: &str) -> Vec<String> {
    tokenize(text).windows(3).map(|w| w.join(" ")).collect()
}

/// Fraction of the rewrite's trigrams that already appear in the source.
pub fn check_literal(original: &str, summary: &str) -> CheckScore {
    let source: HashSet<String> = trigrams(original).into_iter().collect();
    let candidate = trigrams(summary);

    // A rewrite too short to form a trigram has nothing to copy.
    if candidate.is_empty() {
        return CheckScore {
            passed: true,
            score: 0.0,
        };
    }

    let matches = candidate.iter().filter(|g| source.contains(*g)).count();
    let score = matches as f64 / candidate.len() as f64;

    CheckScore {
        passed: score <= LITERAL_THRESHOLD,
        score: round2(score),
    }
}
