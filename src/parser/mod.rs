//! Parser module for building the floyd syntax tree.
//!
//! This module contains the parser that turns floyd source text into a
//! syntax tree plus diagnostics. It uses a Pratt parser for expressions
//! and handles:
//!
//! - Statement parsing (declarations, functions, classes, verbs, control flow)
//! - Expression parsing (operators, calls, member and index access)
//! - Lexical scopes, name definition and keyword reservation
//! - Deferred resolution of names used before their declaration
//! - Error recovery and reporting
//!
//! Every grammar symbol carries optional nud (null denotation), led (left
//! denotation) and std (statement denotation) handlers plus a binding
//! power for precedence handling.

pub mod analyzer;
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod scope;
pub mod stmt;

#[cfg(test)]
mod tests;
