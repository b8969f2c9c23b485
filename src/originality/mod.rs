//! Originality gate for generated rewrites.
//!
//! Three independent layers score a rewrite against its source text: a
//! literal trigram-overlap check, a shallow sentence-structure check, and
//! an optional embedding-based semantic check. A rewrite is publishable
//! only when every layer passes.

pub mod age;
mod literal;
mod semantic;
mod structure;

pub use self::age::{check_age, AgeDecision, MIN_AGE_HOURS};
pub use self::literal::check_literal;
pub use self::semantic::SemanticCheck;
pub use self::structure::check_structure;

pub const LITERAL_THRESHOLD: f64 = 0.25;
pub const STRUCTURE_THRESHOLD: f64 = 0.40;
pub const SEMANTIC_THRESHOLD: f64 = 0.70;

/// Score and verdict of a single scoring layer.
#[derive(Debug, Clone, Copy)]
pub struct CheckScore {
    pub passed: bool,
    pub score: f64,
}

/// Like [`CheckScore`], but the semantic layer can also decline to run.
#[derive(Debug, Clone, Copy)]
pub struct SemanticScore {
    pub passed: bool,
    pub score: f64,
    pub skipped: bool,
}

/// Combined verdict over all three layers, one per rewrite attempt.
#[derive(Debug, Clone)]
pub struct ScoreResult {
    pub passed: bool,
    pub literal: CheckScore,
    pub structure: CheckScore,
    pub semantic: SemanticScore,
    pub warnings: Vec<String>,
}

// Reported scores carry two decimals; pass/fail is decided on raw values.
pub(crate) fn round2(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

fn percent(score: f64) -> i64 {
    (score * 100.0).round() as i64
}

/// Run every layer of the gate and collect a warning per failing layer.
pub async fn run_checks(original: &str, summary: &str, semantic: &SemanticCheck) -> ScoreResult {
    let literal = check_literal(original, summary);
    let structure = check_structure(original, summary);
    let semantic = semantic.run(original, summary).await;

    let passed = literal.passed && structure.passed && semantic.passed;
    let mut warnings = Vec::new();
    if !literal.passed {
        warnings.push(format!("Literal: {}%", percent(literal.score)));
    }
    if !structure.passed {
        warnings.push(format!("Structure: {}%", percent(structure.score)));
    }
    if !semantic.passed {
        warnings.push(format!("Semantic: {}%", percent(semantic.score)));
    }

    ScoreResult {
        passed,
        literal,
        structure,
        semantic,
        warnings,
    }
}
