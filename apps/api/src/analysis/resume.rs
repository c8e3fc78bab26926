//! Resume Analyzer — compares skills found in a resume against trending skills.
//!
//! Extraction is pluggable behind [`SkillExtractor`] (text → candidate skills).
//! Default: `KeywordSkillExtractor` (pure-Rust, deterministic, no model).
//!
//! `AppState` holds an `Arc<dyn SkillExtractor>`, swapped at startup.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::data::models::Dataset;
use crate::data::queries::top_trending_skills;
use crate::errors::AppError;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Pulls candidate skill terms out of free text.
///
/// Returned terms are lowercase; matching against the dataset is
/// case-insensitive.
#[async_trait]
pub trait SkillExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<BTreeSet<String>, AppError>;

    /// Short label reported back to clients.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordSkillExtractor — default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Tokenizes text and returns every word plus every adjacent word pair.
///
/// Word characters are alphanumerics and `+ # . -`, so terms like `c++`,
/// `c#` and `node.js` survive; trailing dots and dashes are stripped.
pub struct KeywordSkillExtractor;

#[async_trait]
impl SkillExtractor for KeywordSkillExtractor {
    async fn extract(&self, text: &str) -> Result<BTreeSet<String>, AppError> {
        Ok(keyword_terms(text))
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '-')
}

fn keyword_terms(text: &str) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !is_word_char(c))
        .map(|w| w.trim_matches(|c| c == '.' || c == '-'))
        .filter(|w| !w.is_empty())
        .collect();

    let mut terms: BTreeSet<String> = words.iter().map(|w| w.to_string()).collect();
    for pair in words.windows(2) {
        terms.insert(format!("{} {}", pair[0], pair[1]));
    }
    terms
}

// ────────────────────────────────────────────────────────────────────────────
// Report
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeReport {
    /// Trending skills found in the resume, canonical spelling, sorted.
    pub matched: BTreeSet<String>,
    /// Trending skills absent from the resume, canonical spelling, sorted.
    pub missing: BTreeSet<String>,
    /// Raw terms the extractor pulled from the text.
    pub extracted: BTreeSet<String>,
    pub trending_considered: usize,
    pub extractor_backend: String,
}

/// Extracts skills from `text` and splits the top `trending_limit` skills of
/// the dataset into matched and missing.
pub async fn analyze_resume(
    text: &str,
    dataset: &Dataset,
    extractor: &dyn SkillExtractor,
    trending_limit: usize,
) -> Result<ResumeReport, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("resume text cannot be empty".to_string()));
    }

    let extracted = extractor.extract(text).await?;
    let trending = top_trending_skills(dataset, trending_limit);

    let (matched, missing): (BTreeSet<_>, BTreeSet<_>) = trending
        .iter()
        .map(|s| s.skill.clone())
        .partition(|skill| extracted.contains(&skill.to_lowercase()));

    tracing::debug!(
        extracted = extracted.len(),
        matched = matched.len(),
        missing = missing.len(),
        "Resume analyzed"
    );

    Ok(ResumeReport {
        matched,
        missing,
        extracted,
        trending_considered: trending.len(),
        extractor_backend: extractor.backend().to_string(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
