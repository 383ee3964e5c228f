//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, MoneyCents, ResultEngine};

/// Comparison key for category names: NFKD, combining marks stripped,
/// lowercase, whitespace collapsed.
pub(crate) fn normalize_category_key(value: &str) -> String {
    let folded: String = value
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Reject zero and negative amounts.
pub(crate) fn ensure_positive(amount: MoneyCents, label: &str) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(format!("{label} must be > 0")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_key_ignores_case_accents_and_spacing() {
        assert_eq!(normalize_category_key("  Food   &  Dining "), "food & dining");
        assert_eq!(normalize_category_key("Café"), "cafe");
    }

    #[test]
    fn optional_text_drops_blank_values() {
        assert_eq!(normalize_optional_text(Some("   ")), None);
        assert_eq!(normalize_optional_text(Some(" Lidl ")), Some("Lidl".to_string()));
        assert_eq!(normalize_optional_text(None), None);
    }
}
