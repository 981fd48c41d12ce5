use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::{Position, Span, MK_PATTERN, MK_TOKEN};

use super::tokens::{Token, TokenKind};

#[derive(Clone, Debug)]
pub struct RegexPattern {
    regex: Regex,
    kind: TokenKind,
}

lazy_static! {
    /// Lexer rules in priority order. The longest match wins and the
    /// earliest listed rule breaks ties.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        MK_PATTERN!(r"/\*(?s:.)*?\*/", TokenKind::Comment),
        MK_PATTERN!(r"//[^\r\n]*", TokenKind::Comment),
        MK_PATTERN!(r"[a-zA-Z_][a-zA-Z0-9_]*", TokenKind::Name),
        MK_PATTERN!(r"[0-9]+", TokenKind::Integer),
        MK_PATTERN!(r#""[^"]*"?"#, TokenKind::String),
        MK_PATTERN!(r"#(?:include|define|ifdef|ifndef|endif)[^\r\n]*", TokenKind::Directive),
        MK_PATTERN!(
            r"<<|>>|\+\+|--|&&|&|\|\||\||\^|<=|>=|<|>|!=|==|!|~|%=|/=|\*=|\+=|-=|\+|-|%|/|\*|=|\(|\)|\{|\}|\[|\]|,|:|\?|;|\.",
            TokenKind::Operator
        ),
        MK_PATTERN!(r"[ \t\r\n]+", TokenKind::Whitespace),
    ];
}

/// A single-pass cursor over one source document.
///
/// Tokens are produced on demand by [`Lexer::next_token`]; trivia is
/// emitted like everything else. Unrecognised characters come out as
/// one-character [`TokenKind::Invalid`] tokens so the cursor always moves.
#[derive(Clone, Debug)]
pub struct Lexer {
    source: String,
    pos: usize,
    position: Position,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer {
            source: source.to_string(),
            pos: 0,
            position: Position::default(),
        }
    }

    /// Line/character of the cursor.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn next_token(&mut self) -> Option<Token> {
        if self.at_eof() {
            return None;
        }

        let remaining = self.remainder();
        let mut best: Option<(usize, TokenKind)> = None;

        for pattern in PATTERNS.iter() {
            if let Some(found) = pattern.regex.find(remaining) {
                let len = found.end();
                if len > 0 && best.map_or(true, |(best_len, _)| len > best_len) {
                    best = Some((len, pattern.kind));
                }
            }
        }

        let (len, kind) = match best {
            Some(matched) => matched,
            None => {
                let len = remaining.chars().next().map_or(1, char::len_utf8);
                (len, TokenKind::Invalid)
            }
        };

        let value = remaining[..len].to_string();
        let start = self.position;
        self.advance_over(&value);

        let token = MK_TOKEN!(kind, value, Span::new(start, self.position));
        trace!("lexed {:?} {:?}", token.kind, token.value);

        Some(token)
    }

    fn advance_over(&mut self, lexeme: &str) {
        for c in lexeme.chars() {
            if c == '\n' {
                self.position.line += 1;
                self.position.character = 0;
            } else {
                self.position.character += 1;
            }
        }

        self.pos += lexeme.len();
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Tokenizes a whole document, trivia included.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}
