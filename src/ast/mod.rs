/// AST (Abstract Syntax Tree) module
/// Contains the tree the parser builds for a floyd document
///
/// Submodules:
/// - ast: Nodes, node kinds, arities and statement lists
/// - declarations: Value types, parameters and variable declarators
pub mod ast;
pub mod declarations;
