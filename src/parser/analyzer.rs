//! Deferred resolution of names that were unknown when first read.

use log::debug;
use serde::Serialize;

use crate::{
    config::ParseOptions,
    errors::errors::{Diagnostic, ErrorImpl, Severity},
    Span,
};

use super::{
    lookups::{Grammar, GRAMMAR},
    parser::ParseResult,
    scope::{Scope, ScopeId, ScopeTree},
};

/// A name read before anything in reach defined it, with the scope it was
/// read in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolOccurrence {
    pub name: String,
    pub span: Span,
    pub scope: ScopeId,
}

/// Looks every occurrence up again in its own scope now that the whole
/// document has been read. Only appends diagnostics.
pub fn analyze(
    scopes: &ScopeTree,
    occurrences: &[SymbolOccurrence],
    grammar: &Grammar,
    options: &ParseOptions,
) -> Vec<Diagnostic> {
    resolve(scopes, occurrences, grammar, options, &[])
}

/// Like [`analyze`], but a name declared at the top level of any of
/// `imports` counts as defined.
pub fn resolve_across_imports(
    document: &ParseResult,
    imports: &[&ParseResult],
    options: &ParseOptions,
) -> Vec<Diagnostic> {
    let roots: Vec<&Scope> = imports.iter().map(|import| import.root_scope()).collect();

    resolve(&document.scopes, &document.occurrences, &GRAMMAR, options, &roots)
}

fn resolve(
    scopes: &ScopeTree,
    occurrences: &[SymbolOccurrence],
    grammar: &Grammar,
    options: &ParseOptions,
    imported: &[&Scope],
) -> Vec<Diagnostic> {
    let diagnostics: Vec<Diagnostic> = occurrences
        .iter()
        .filter(|occurrence| scopes.find(occurrence.scope, &occurrence.name, grammar).is_undefined())
        .filter(|occurrence| !imported.iter().any(|root| root.declares(&occurrence.name)))
        .filter(|occurrence| !options.is_intrinsic(&occurrence.name))
        .map(|occurrence| {
            Diagnostic::new(
                ErrorImpl::Undefined {
                    name: occurrence.name.clone(),
                },
                occurrence.span,
                Severity::Warning,
            )
        })
        .collect();

    debug!(
        "Resolved {} occurrences, {} still undefined",
        occurrences.len(),
        diagnostics.len()
    );

    diagnostics
}
