use std::fmt::Display;

use crate::Span;

/// Lexical class of a token. The tokenizer knows nothing about grammar, so
/// keywords come out as `Name` and every operator or punctuator as
/// `Operator`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Name,
    Integer,
    String,
    Operator,
    Directive,
    Comment,
    Whitespace,
    Invalid,
}

impl TokenKind {
    /// Trivia is emitted by the tokenizer but never seen by the parser.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::Whitespace | TokenKind::Directive)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {:?}}}", self.kind, self.value)
    }
}

impl Token {
    /// The target of an `#include` directive, if this token is one.
    pub fn include_target(&self) -> Option<&str> {
        if self.kind != TokenKind::Directive {
            return None;
        }

        let rest = self.value.strip_prefix("#include")?.trim();
        let (open, close) = match rest.chars().next()? {
            '"' => ('"', '"'),
            '<' => ('<', '>'),
            _ => return None,
        };

        let inner = rest.strip_prefix(open)?;
        inner.find(close).map(|end| &inner[..end])
    }
}
