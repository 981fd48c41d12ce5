//! Diagnostics produced while parsing.
//!
//! This module defines the diagnostic types used by the front end:
//!
//! - A message catalogue (`ErrorImpl`) rendering each problem's text
//! - Four editor-style severities
//! - Diagnostics carrying their source range
//! - The append-only sink the parser reports into

pub mod errors;
