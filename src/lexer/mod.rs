//! Lexical analysis for floyd source text.
//!
//! This module contains the tokenizer that converts source code into a
//! stream of classified lexemes. It handles:
//!
//! - Tokenization of source code using regex patterns
//! - Recognition of names, integer and string literals, and operators
//! - Comments, whitespace and preprocessor directives as trivia
//! - Line/character range tracking for diagnostics

pub mod lexer;
pub mod tokens;
