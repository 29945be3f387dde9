//! Pre-parse rejection gates over the raw expression text.

use super::EvalError;
use regex::Regex;
use std::sync::LazyLock;

/// Dangerous token sequences, scanned case-insensitively on the raw text.
///
/// The grammar alone cannot produce any of these, but the scan is kept as an
/// independent layer so the rejection holds even without the parser.
static UNSAFE_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("__dunder__", r"__\w+__"),
        ("import", r"(?i)import\s+"),
        ("exec(", r"(?i)exec\s*\("),
        ("eval(", r"(?i)eval\s*\("),
        ("open(", r"(?i)open\s*\("),
        ("input(", r"(?i)input\s*\("),
        ("print(", r"(?i)print\s*\("),
        ("file(", r"(?i)file\s*\("),
    ]
    .into_iter()
    .map(|(label, pattern)| (label, Regex::new(pattern).expect("pattern is valid")))
    .collect()
});

/// Rejects any character outside digits, ASCII whitespace, the operator set
/// and identifier characters.
pub(super) fn check_characters(raw: &str) -> Result<(), EvalError> {
    for (position, ch) in raw.char_indices() {
        let allowed = ch.is_ascii_digit()
            || ch.is_ascii_whitespace()
            || ch.is_ascii_alphabetic()
            || matches!(
                ch,
                '+' | '-' | '*' | '/' | '(' | ')' | '.' | ',' | '%' | '^' | '_'
            );

        if !allowed {
            return Err(EvalError::InvalidCharacter { ch, position });
        }
    }

    Ok(())
}

pub(super) fn check_unsafe_patterns(raw: &str) -> Result<(), EvalError> {
    for &(pattern, ref re) in UNSAFE_PATTERNS.iter() {
        if re.is_match(raw) {
            return Err(EvalError::UnsafePattern { pattern });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_ascii_and_quotes() {
        assert!(matches!(
            check_characters("2 + 'a'"),
            Err(EvalError::InvalidCharacter { ch: '\'', .. })
        ));
        assert!(matches!(
            check_characters("2 ÷ 3"),
            Err(EvalError::InvalidCharacter { ch: '÷', position: 2 })
        ));
        assert!(check_characters("sin(pi / 2) ^ 2 % 3, _").is_ok());
    }

    #[test]
    fn rejects_dangerous_sequences() {
        for bad in [
            "__class__",
            "().__CLASS__",
            "import os",
            "exec (1)",
            "EVAL(1)",
            "open(1)",
            "input(1)",
            "print(1)",
            "file(1)",
        ] {
            assert!(
                matches!(check_unsafe_patterns(bad), Err(EvalError::UnsafePattern { .. })),
                "{bad} should be rejected"
            );
        }

        assert!(check_unsafe_patterns("exp(1) + log(2)").is_ok());
    }
}
