use std::fmt::Display;

use super::ast::Node;

/// The four type keywords. Only `void` is restricted to function returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Void,
    Int,
    String,
    Object,
}

impl ValueType {
    pub fn from_keyword(keyword: &str) -> Option<ValueType> {
        match keyword {
            "void" => Some(ValueType::Void),
            "int" => Some(ValueType::Int),
            "string" => Some(ValueType::String),
            "object" => Some(ValueType::Object),
            _ => None,
        }
    }

    /// Whether values of this type can be stored (parameters, variables).
    pub fn is_storable(&self) -> bool {
        !matches!(self, ValueType::Void)
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Void => write!(f, "void"),
            ValueType::Int => write!(f, "int"),
            ValueType::String => write!(f, "string"),
            ValueType::Object => write!(f, "object"),
        }
    }
}

/// A function parameter. `value_type` is `None` when the type keyword was
/// missing or invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub value_type: Option<ValueType>,
    pub name: Node,
}

/// Right-hand side of a declarator.
#[derive(Debug, Clone, PartialEq)]
pub enum Initializer {
    /// `x = expr`
    Expression(Box<Node>),
    /// `a[3] = (1, 2, 3)`
    List(Vec<Node>),
}

/// One name introduced by a variable declaration, e.g. `a[3] = (1, 2, 3)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: Node,
    /// Set when the name carried `[ ... ]`, even an empty one.
    pub array: bool,
    pub size: Option<Box<Node>>,
    pub value: Option<Initializer>,
}
