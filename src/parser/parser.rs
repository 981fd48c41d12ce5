//! Parser implementation for floyd documents.
//!
//! This module contains the main Parser struct and the parse entry points.
//! The parser pulls tokens from the lexer one at a time and keeps a single
//! token of lookahead. Expressions are parsed with the Pratt approach using
//! the nud/led handlers of the grammar table, statements are dispatched on
//! the std handler of their first token.
//!
//! Every name is resolved against the current scope as it is read. Names
//! nothing defines yet are remembered together with their scope so the
//! deferred analysis can look them up again once the document is complete.

use log::{debug, info, trace};
use serde::Serialize;

use crate::{
    ast::{
        ast::{Arity, Node, NodeKind, Statements},
        declarations::ValueType,
    },
    config::ParseOptions,
    errors::errors::{Diagnostic, Diagnostics, ErrorImpl, Severity},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    Span,
};

use super::{
    analyzer::{analyze, SymbolOccurrence},
    lookups::{BindingPower, Denotations, Grammar, GrammarSymbol, GRAMMAR},
    scope::{Definition, Lookup, Scope, ScopeId, ScopeTree},
};

/// A token as the parser sees it: the lexeme plus the denotations of the
/// grammar symbol or definition it resolved to.
#[derive(Debug, Clone)]
pub struct ParseToken {
    pub id: &'static str,
    pub denotations: Denotations,
    pub value: String,
    pub span: Span,
    /// Lexical class of the underlying token, `None` for end of input.
    pub origin: Option<TokenKind>,
    pub reserved: bool,
}

impl ParseToken {
    fn from_symbol(symbol: &GrammarSymbol, token: Token) -> ParseToken {
        ParseToken {
            id: symbol.id,
            denotations: symbol.denotations,
            value: token.value,
            span: token.span,
            origin: Some(token.kind),
            reserved: false,
        }
    }

    fn from_definition(definition: &Definition, token: Token) -> ParseToken {
        ParseToken {
            id: definition.id,
            denotations: definition.denotations,
            value: token.value,
            span: token.span,
            origin: Some(token.kind),
            reserved: definition.reserved,
        }
    }

    /// `name` for identifiers and keywords, `literal` for integers and
    /// strings, nothing for operators and end of input.
    pub fn arity(&self) -> Option<Arity> {
        match self.origin {
            Some(TokenKind::Name) => Some(Arity::Name),
            Some(TokenKind::Integer | TokenKind::String) => Some(Arity::Literal),
            _ => None,
        }
    }

    pub fn is_name(&self) -> bool {
        self.origin == Some(TokenKind::Name)
    }

    pub fn is_end(&self) -> bool {
        self.origin.is_none()
    }

    /// Punctuation that closes or separates constructs. These are never
    /// consumed when they show up where an operand was expected.
    pub fn is_closer(&self) -> bool {
        self.is_end() || matches!(self.id, ";" | ")" | "]" | "}" | "," | ":")
    }

    pub fn starts_statement(&self) -> bool {
        self.denotations.std.is_some()
    }

    pub fn to_node(&self, kind: NodeKind) -> Node {
        Node {
            id: self.id,
            value: self.value.clone(),
            span: self.span,
            parenthesized: false,
            kind,
        }
    }

    pub fn into_node(self, kind: NodeKind) -> Node {
        Node {
            id: self.id,
            value: self.value,
            span: self.span,
            parenthesized: false,
            kind,
        }
    }
}

/// Everything one parse produces.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub ast: Statements,
    pub scopes: ScopeTree,
    pub occurrences: Vec<SymbolOccurrence>,
    pub diagnostics: Vec<Diagnostic>,
    /// Targets of `#include` directives in source order.
    pub imports: Vec<String>,
}

impl ParseResult {
    pub fn root_scope(&self) -> &Scope {
        self.scopes.root()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity == Severity::Error)
    }
}

/// Summary logged once a parse completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub statements: usize,
    pub scopes: usize,
    pub occurrences: usize,
    pub diagnostics: usize,
}

/// The main parser structure that maintains parsing state.
pub struct Parser<'g> {
    lexer: Lexer,
    grammar: &'g Grammar,
    options: &'g ParseOptions,
    /// The current (lookahead) token
    token: ParseToken,
    /// Range of the last consumed token
    previous_span: Span,
    scopes: ScopeTree,
    scope: ScopeId,
    diagnostics: Diagnostics,
    occurrences: Vec<SymbolOccurrence>,
    imports: Vec<String>,
    /// Current statement plus expression nesting
    depth: usize,
    depth_reported: bool,
}

impl<'g> Parser<'g> {
    /// Creates a parser over `source` and reads its first token.
    pub fn new(source: &str, grammar: &'g Grammar, options: &'g ParseOptions) -> Self {
        let mut parser = Parser {
            lexer: Lexer::new(source),
            grammar,
            options,
            token: ParseToken {
                id: "(end)",
                denotations: Denotations::default(),
                value: String::new(),
                span: Span::default(),
                origin: None,
                reserved: false,
            },
            previous_span: Span::default(),
            scopes: ScopeTree::new(),
            scope: ScopeId::ROOT,
            diagnostics: Diagnostics::new(),
            occurrences: Vec::new(),
            imports: Vec::new(),
            depth: 0,
            depth_reported: false,
        };

        parser.token = parser.next_significant();
        parser
    }

    /// Returns the current token without advancing.
    pub fn current(&self) -> &ParseToken {
        &self.token
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn error(&mut self, kind: ErrorImpl, span: Span) {
        self.diagnostics.error(kind, span);
    }

    pub fn warning(&mut self, kind: ErrorImpl, span: Span) {
        self.diagnostics.warning(kind, span);
    }

    /// Moves to the next significant token and returns the one that was
    /// current. When `expected` is given and does not match, an error is
    /// reported but the token is consumed anyway.
    pub fn advance(&mut self, expected: Option<&str>) -> ParseToken {
        if let Some(expected) = expected {
            if self.token.id != expected {
                self.diagnostics.error(
                    ErrorImpl::Expected {
                        expected: expected.to_string(),
                    },
                    self.token.span,
                );
            }
        }

        let next = self.next_significant();
        self.previous_span = self.token.span;
        std::mem::replace(&mut self.token, next)
    }

    fn next_significant(&mut self) -> ParseToken {
        loop {
            let Some(token) = self.lexer.next_token() else {
                return ParseToken {
                    id: "(end)",
                    denotations: self.grammar.get("(end)").map(|symbol| symbol.denotations).unwrap_or_default(),
                    value: "(end)".to_string(),
                    span: Span::at(self.lexer.position()),
                    origin: None,
                    reserved: false,
                };
            };

            trace!("advance over {:?} {:?}", token.kind, token.value);

            match token.kind {
                TokenKind::Comment | TokenKind::Whitespace => {}
                TokenKind::Directive => {
                    if let Some(target) = token.include_target() {
                        debug!("Found include of {:?}", target);
                        self.imports.push(target.to_string());
                    }
                }
                TokenKind::Invalid => {
                    self.diagnostics
                        .error(ErrorImpl::InvalidCharacter { token: token.value }, token.span);
                }
                TokenKind::Name => return self.resolve_name(token),
                TokenKind::Operator => match self.grammar.get(&token.value) {
                    Some(symbol) => return ParseToken::from_symbol(symbol, token),
                    None => {
                        self.diagnostics
                            .error(ErrorImpl::UnknownOperator { token: token.value }, token.span);
                    }
                },
                TokenKind::Integer | TokenKind::String => {
                    if token.kind == TokenKind::String && (token.value.len() < 2 || !token.value.ends_with('"')) {
                        self.diagnostics.error(ErrorImpl::UnterminatedString, token.span);
                    }

                    let literal = self.grammar.get("(literal)").cloned().unwrap_or(GrammarSymbol {
                        id: "(literal)",
                        denotations: Denotations::default(),
                    });
                    return ParseToken::from_symbol(&literal, token);
                }
            }
        }
    }

    fn resolve_name(&self, token: Token) -> ParseToken {
        match self.scopes.find(self.scope, &token.value, self.grammar) {
            Lookup::Defined(definition) => ParseToken::from_definition(definition, token),
            Lookup::Grammar(symbol) | Lookup::Undefined(symbol) => ParseToken::from_symbol(symbol, token),
        }
    }

    /// Parses an expression, folding in operators that bind tighter than `rbp`.
    pub fn expression(&mut self, rbp: BindingPower) -> Node {
        if !self.enter() {
            return self.refuse();
        }

        let nud = self.token.denotations.nud;
        let mut left = match nud {
            Some(nud) => {
                let token = self.advance(None);
                nud(self, token)
            }
            None => {
                self.diagnostics.error(
                    ErrorImpl::UnexpectedToken {
                        token: self.token.value.clone(),
                    },
                    self.token.span,
                );

                if self.token.is_closer() {
                    self.token.to_node(NodeKind::Invalid)
                } else {
                    self.advance(None).into_node(NodeKind::Invalid)
                }
            }
        };

        while rbp < self.token.denotations.lbp {
            let token = self.advance(None);
            left = match token.denotations.led {
                Some(led) => led(self, token, left),
                None => {
                    self.diagnostics
                        .error(ErrorImpl::UnexpectedToken { token: token.value }, token.span);
                    left
                }
            };
        }

        self.leave();
        left
    }

    /// Parses one statement. Returns `None` when the statement was skipped
    /// by recovery.
    pub fn statement(&mut self) -> Option<Node> {
        if !self.enter() {
            self.refuse();
            return None;
        }

        let statement = self.dispatch_statement();
        self.leave();
        statement
    }

    fn dispatch_statement(&mut self) -> Option<Node> {
        let std = self.token.denotations.std;
        if let Some(std) = std {
            let token = self.advance(None);
            debug!("Statement '{}' at {}:{}", token.id, token.span.start.line, token.span.start.character);
            self.reserve(&token);
            return Some(std(self, token));
        }

        if self.token.denotations.nud.is_none() {
            self.recover(|token| !token.starts_statement() && !matches!(token.id, ";" | "}"));
            if self.token.id == ";" {
                self.advance(None);
            }
            return None;
        }

        let expression = self.expression(BindingPower::DEFAULT);
        if !expression.is_assignment() && !expression.is_call() && expression.arity() != Arity::Invalid {
            self.diagnostics
                .warning(ErrorImpl::BadExpressionStatement, expression.span);
        }

        self.expect_semicolon();
        Some(expression)
    }

    fn statement_list(&mut self) -> Vec<Node> {
        let mut nodes = vec![];

        while !matches!(self.token.id, "}" | "(end)") {
            if let Some(node) = self.statement() {
                nodes.push(node);
            }
        }

        nodes
    }

    /// Parses statements up to a `}` or end of input.
    pub fn statements(&mut self) -> Statements {
        Statements::from(self.statement_list())
    }

    /// Parses `{ ... }` in a scope of its own.
    pub fn block(&mut self) -> Statements {
        if !self.at_brace() {
            return Statements::Empty;
        }

        self.advance(None);
        self.scoped_statements()
    }

    /// The rest of a block whose `{` was just consumed. The scope closes
    /// before the `}` is read, so the token after it resolves outside.
    pub fn scoped_statements(&mut self) -> Statements {
        self.push_scope();
        let body = self.statements();
        self.pop_scope();
        self.advance(Some("}"));
        body
    }

    /// Parses a function body inside the scope already opened for the
    /// parameters, then closes that scope.
    pub fn function_body(&mut self) -> Statements {
        if !self.at_brace() {
            self.pop_scope();
            return Statements::Empty;
        }

        self.advance(None);
        let body = self.statements();
        self.pop_scope();
        self.advance(Some("}"));
        body
    }

    fn at_brace(&mut self) -> bool {
        if self.token.id == "{" {
            return true;
        }

        self.diagnostics.error(
            ErrorImpl::Expected {
                expected: "{".to_string(),
            },
            self.token.span,
        );
        false
    }

    /// Consumes a `;`, or reports it missing after the previous token and
    /// carries on as if it had been there.
    pub fn expect_semicolon(&mut self) {
        if self.token.id == ";" {
            self.advance(None);
        } else {
            self.diagnostics.error(ErrorImpl::MissingSemicolon, self.previous_span);
        }
    }

    /// Reports the current token as unexpected, then skips tokens while
    /// `skip` holds. Returns the token it stopped at.
    pub fn recover(&mut self, skip: impl Fn(&ParseToken) -> bool) -> &ParseToken {
        self.diagnostics.error(
            ErrorImpl::UnexpectedToken {
                token: self.token.value.clone(),
            },
            self.token.span,
        );

        while !self.token.is_end() && skip(&self.token) {
            self.advance(None);
        }

        &self.token
    }

    pub fn push_scope(&mut self) {
        self.scope = self.scopes.push(self.scope);
    }

    pub fn pop_scope(&mut self) {
        self.scope = self.scopes.pop(self.scope);
    }

    /// Binds `token` as an ordinary name in the current scope.
    pub fn define(&mut self, token: &ParseToken, arity: Arity, value_type: Option<ValueType>) {
        let definition = Definition {
            id: token.id,
            name: token.value.clone(),
            span: token.span,
            arity,
            reserved: false,
            denotations: Denotations::identifier(),
            value_type,
            scope: self.scope,
        };

        self.scopes.define(self.scope, definition, &mut self.diagnostics);
    }

    pub fn reserve(&mut self, token: &ParseToken) {
        self.scopes.reserve(self.scope, token, &mut self.diagnostics);
    }

    /// Remembers a name occurrence for the deferred analysis.
    pub fn record_occurrence(&mut self, token: &ParseToken) {
        self.occurrences.push(SymbolOccurrence {
            name: token.value.clone(),
            span: token.span,
            scope: self.scope,
        });
    }

    /// Records `token` only if nothing in reach defines it yet.
    pub fn record_if_undefined(&mut self, token: &ParseToken) {
        if self.scopes.find(self.scope, &token.value, self.grammar).is_undefined() {
            self.record_occurrence(token);
        }
    }

    fn enter(&mut self) -> bool {
        if self.depth >= self.options.max_depth {
            if !self.depth_reported {
                self.depth_reported = true;
                self.diagnostics.error(
                    ErrorImpl::NestingTooDeep {
                        limit: self.options.max_depth,
                    },
                    self.token.span,
                );
            }
            return false;
        }

        self.depth += 1;
        true
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn refuse(&mut self) -> Node {
        if self.token.is_end() {
            self.token.to_node(NodeKind::Invalid)
        } else {
            self.advance(None).into_node(NodeKind::Invalid)
        }
    }

    /// Parses the whole document. A `}` with no open block is reported and
    /// skipped so the rest of the document is still read.
    pub fn parse_document(&mut self) -> Statements {
        let mut nodes = vec![];

        loop {
            nodes.extend(self.statement_list());

            if self.token.is_end() {
                break;
            }

            self.recover(|token| token.id == "}");
        }

        Statements::from(nodes)
    }

    fn finish(self, ast: Statements) -> ParseResult {
        ParseResult {
            ast,
            scopes: self.scopes,
            occurrences: self.occurrences,
            diagnostics: self.diagnostics.into_vec(),
            imports: self.imports,
        }
    }
}

/// Parses `source` with the shared grammar and default options.
pub fn parse(source: &str) -> ParseResult {
    parse_with(source, &GRAMMAR, &ParseOptions::default())
}

/// Parses `source` against an explicit grammar and options.
///
/// Never fails: malformed input yields a partial tree and diagnostics.
pub fn parse_with(source: &str, grammar: &Grammar, options: &ParseOptions) -> ParseResult {
    info!("Parsing document of {} characters", source.chars().count());

    let mut parser = Parser::new(source, grammar, options);
    let ast = parser.parse_document();
    let mut result = parser.finish(ast);

    if options.analyze {
        let undefined = analyze(&result.scopes, &result.occurrences, grammar, options);
        result.diagnostics.extend(undefined);
    }

    let stats = ParseStats {
        statements: result.ast.len(),
        scopes: result.scopes.len(),
        occurrences: result.occurrences.len(),
        diagnostics: result.diagnostics.len(),
    };
    info!("Parsed document: {:?}", stats);

    result
}
