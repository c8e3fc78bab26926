//! Skill canonicalization — maps known lowercase aliases to a single spelling.

/// Lowercase alias → canonical spelling. Lookup is case-insensitive.
pub const SKILL_ALIASES: &[(&str, &str)] = &[
    ("powerbi", "PowerBI"),
    ("aws", "AWS"),
    ("sql", "SQL"),
    ("nlp", "NLP"),
    ("pytorch", "PyTorch"),
    ("tensorflow", "TensorFlow"),
    ("spark", "Spark"),
    ("excel", "Excel"),
    ("tableau", "Tableau"),
    ("python", "Python"),
];

/// Trims a raw skill token and maps it through [`SKILL_ALIASES`].
/// Unknown skills pass through trimmed but otherwise unchanged.
pub fn canonicalize_skill(raw: &str) -> String {
    let trimmed = raw.trim();
    SKILL_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}
