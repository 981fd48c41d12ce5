use std::fmt::Display;

use serde::Serialize;
use thiserror::Error;

use crate::Span;

/// Diagnostic severity, numbered the way editor protocols number it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Severity {
    Error = 1,
    Warning = 2,
    Information = 3,
    Hint = 4,
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> u8 {
        severity as u8
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorImpl {
    #[error("Already defined")]
    AlreadyDefined,
    #[error("Already reserved")]
    AlreadyReserved,
    #[error("Expected '{expected}'")]
    Expected { expected: String },
    #[error("Missing ';'")]
    MissingSemicolon,
    #[error("Unknown operator '{token}'")]
    UnknownOperator { token: String },
    #[error("Invalid character '{token}'")]
    InvalidCharacter { token: String },
    #[error("Unexpected token '{token}'")]
    UnexpectedToken { token: String },
    #[error("Unterminated string literal")]
    UnterminatedString,
    #[error("Bad expression statement")]
    BadExpressionStatement,
    #[error("Bad left value")]
    BadLeftValue,
    #[error("Expected a property name")]
    ExpectedPropertyName,
    #[error("Expected a variable name")]
    ExpectedVariableName,
    #[error("Expected a function name")]
    ExpectedFunctionName,
    #[error("Invalid parameter type '{token}'. Use either int, string or object.")]
    InvalidParameterType { token: String },
    #[error("Expected parameter name")]
    ExpectedParameterName,
    #[error("Expected class name")]
    ExpectedClassName,
    #[error("Expected super class name")]
    ExpectedSuperClassName,
    #[error("Expected string literal")]
    ExpectedStringLiteral,
    #[error("Expected action identifier")]
    ExpectedActionIdentifier,
    #[error("Expected integer literal")]
    ExpectedIntegerLiteral,
    #[error("Unreachable code")]
    UnreachableCode,
    #[error("Nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
    #[error("'{name}' is undefined")]
    Undefined { name: String },
}

/// One reported problem. `message` is the rendered text of `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    #[serde(skip)]
    pub kind: ErrorImpl,
    pub message: String,
    pub range: Span,
    pub severity: Severity,
    pub source: &'static str,
}

impl Diagnostic {
    pub fn new(kind: ErrorImpl, range: Span, severity: Severity) -> Self {
        Diagnostic {
            message: kind.to_string(),
            kind,
            range,
            severity,
            source: "floyd",
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.kind {
            ErrorImpl::AlreadyDefined => "AlreadyDefined",
            ErrorImpl::AlreadyReserved => "AlreadyReserved",
            ErrorImpl::Expected { .. } => "Expected",
            ErrorImpl::MissingSemicolon => "MissingSemicolon",
            ErrorImpl::UnknownOperator { .. } => "UnknownOperator",
            ErrorImpl::InvalidCharacter { .. } => "InvalidCharacter",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::BadExpressionStatement => "BadExpressionStatement",
            ErrorImpl::BadLeftValue => "BadLeftValue",
            ErrorImpl::ExpectedPropertyName => "ExpectedPropertyName",
            ErrorImpl::ExpectedVariableName => "ExpectedVariableName",
            ErrorImpl::ExpectedFunctionName => "ExpectedFunctionName",
            ErrorImpl::InvalidParameterType { .. } => "InvalidParameterType",
            ErrorImpl::ExpectedParameterName => "ExpectedParameterName",
            ErrorImpl::ExpectedClassName => "ExpectedClassName",
            ErrorImpl::ExpectedSuperClassName => "ExpectedSuperClassName",
            ErrorImpl::ExpectedStringLiteral => "ExpectedStringLiteral",
            ErrorImpl::ExpectedActionIdentifier => "ExpectedActionIdentifier",
            ErrorImpl::ExpectedIntegerLiteral => "ExpectedIntegerLiteral",
            ErrorImpl::UnreachableCode => "UnreachableCode",
            ErrorImpl::NestingTooDeep { .. } => "NestingTooDeep",
            ErrorImpl::Undefined { .. } => "Undefined",
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.range.start.line + 1,
            self.range.start.character + 1,
            self.severity,
            self.message
        )
    }
}

/// Append-only diagnostic sink for one parse.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics(Vec::new())
    }

    pub fn error(&mut self, kind: ErrorImpl, range: Span) {
        self.push(Diagnostic::new(kind, range, Severity::Error));
    }

    pub fn warning(&mut self, kind: ErrorImpl, range: Span) {
        self.push(Diagnostic::new(kind, range, Severity::Warning));
    }

    pub fn information(&mut self, kind: ErrorImpl, range: Span) {
        self.push(Diagnostic::new(kind, range, Severity::Information));
    }

    pub fn hint(&mut self, kind: ErrorImpl, range: Span) {
        self.push(Diagnostic::new(kind, range, Severity::Hint));
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}
