//! Construction macros for the tokenizer's rule table and its output.

/// Builds a [`Token`](crate::lexer::tokens::Token) from a kind, its source
/// text and the span that text covers.
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Builds a tokenizer rule for `$kind`.
///
/// `$pattern` is wrapped as `^(?:$pattern)`, so the rule can only match at
/// the start of the remaining input. Patterns are literals; an invalid one
/// is a defect caught the first time the rule table is built.
///
/// ```ignore
/// MK_PATTERN!(r"[0-9]+", TokenKind::Integer)
/// ```
#[macro_export]
macro_rules! MK_PATTERN {
    ($pattern:literal, $kind:expr) => {
        RegexPattern {
            regex: Regex::new(concat!("^(?:", $pattern, ")")).unwrap(),
            kind: $kind,
        }
    };
}
