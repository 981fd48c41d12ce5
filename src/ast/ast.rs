use std::fmt::Display;

use crate::Span;

use super::declarations::{Declarator, Initializer, Parameter, ValueType};

/// The syntactic role a node ended up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Name,
    Literal,
    Unary,
    Binary,
    Ternary,
    Function,
    Class,
    Statement,
    Verb,
    This,
    Super,
    /// Placeholder left where recovery discarded a construct.
    Invalid,
}

impl Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

/// Kind-specific payload of a [`Node`].
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Name,
    Literal,
    This,
    Super,
    Invalid,
    /// Prefix `- ! ~` and postfix `++ --`.
    Unary { operand: Box<Node> },
    /// Infix operators, assignments, `.` (right is the property literal) and `[`.
    Binary { left: Box<Node>, right: Box<Node> },
    /// `condition ? then : otherwise`
    Ternary {
        condition: Box<Node>,
        then: Box<Node>,
        otherwise: Box<Node>,
    },
    Call { callee: Box<Node>, arguments: Vec<Node> },
    /// `object.member(arguments)` or `object[member](arguments)`, kept as one node.
    MethodCall {
        object: Box<Node>,
        member: Box<Node>,
        arguments: Vec<Node>,
    },
    Function {
        return_type: ValueType,
        parameters: Vec<Parameter>,
        body: Statements,
    },
    Class {
        is_abstract: bool,
        superclass: Option<Box<Node>>,
        body: Statements,
    },
    /// `verb("word", action, flags);`
    Verb {
        word: Box<Node>,
        action: Box<Node>,
        flags: Box<Node>,
    },
    Declaration {
        value_type: ValueType,
        declarators: Vec<Declarator>,
    },
    Block { body: Statements },
    Return { value: Option<Box<Node>> },
    /// `while`, `fetch`, `with` and `switch`: a keyword, a parenthesized
    /// subject and a block.
    Guarded { subject: Box<Node>, body: Statements },
    DoWhile { body: Statements, condition: Box<Node> },
    If {
        condition: Box<Node>,
        then: Statements,
        otherwise: Option<Statements>,
    },
    For {
        init: Option<Box<Node>>,
        condition: Option<Box<Node>>,
        step: Option<Box<Node>>,
        body: Statements,
    },
    Case { value: Box<Node> },
    /// `break`, `default`, `quit` and `halt`.
    Bare,
}

/// A syntax tree node. `id` is the grammar symbol the node was parsed
/// from (`"+"`, `"if"`, `"(name)"`, `"(literal)"`, ...), `value` the
/// source text of that token and `span` its range.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: &'static str,
    pub value: String,
    pub span: Span,
    /// Set when the node was written inside a `( ... )` group.
    pub parenthesized: bool,
    pub kind: NodeKind,
}

impl Node {
    pub fn arity(&self) -> Arity {
        match &self.kind {
            NodeKind::Name => Arity::Name,
            NodeKind::Literal => Arity::Literal,
            NodeKind::This => Arity::This,
            NodeKind::Super => Arity::Super,
            NodeKind::Invalid => Arity::Invalid,
            NodeKind::Unary { .. } => Arity::Unary,
            NodeKind::Binary { .. } | NodeKind::Call { .. } => Arity::Binary,
            NodeKind::Ternary { .. } | NodeKind::MethodCall { .. } => Arity::Ternary,
            NodeKind::Function { .. } => Arity::Function,
            NodeKind::Class { .. } => Arity::Class,
            NodeKind::Verb { .. } => Arity::Verb,
            NodeKind::Declaration { .. }
            | NodeKind::Block { .. }
            | NodeKind::Return { .. }
            | NodeKind::Guarded { .. }
            | NodeKind::DoWhile { .. }
            | NodeKind::If { .. }
            | NodeKind::For { .. }
            | NodeKind::Case { .. }
            | NodeKind::Bare => Arity::Statement,
        }
    }

    pub fn is_assignment(&self) -> bool {
        match &self.kind {
            NodeKind::Binary { .. } => matches!(self.id, "=" | "+=" | "-=" | "*=" | "/=" | "%="),
            NodeKind::Unary { .. } => matches!(self.id, "++" | "--"),
            _ => false,
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self.kind, NodeKind::Call { .. } | NodeKind::MethodCall { .. })
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Node> {
        let mut children = Vec::new();

        match &self.kind {
            NodeKind::Name | NodeKind::Literal | NodeKind::This | NodeKind::Super | NodeKind::Invalid | NodeKind::Bare => {}
            NodeKind::Unary { operand } => children.push(operand.as_ref()),
            NodeKind::Binary { left, right } => {
                children.push(left.as_ref());
                children.push(right.as_ref());
            }
            NodeKind::Ternary { condition, then, otherwise } => {
                children.extend([condition.as_ref(), then.as_ref(), otherwise.as_ref()]);
            }
            NodeKind::Call { callee, arguments } => {
                children.push(callee.as_ref());
                children.extend(arguments.iter());
            }
            NodeKind::MethodCall { object, member, arguments } => {
                children.push(object.as_ref());
                children.push(member.as_ref());
                children.extend(arguments.iter());
            }
            NodeKind::Function { parameters, body, .. } => {
                children.extend(parameters.iter().map(|parameter| &parameter.name));
                children.extend(body.iter());
            }
            NodeKind::Class { superclass, body, .. } => {
                children.extend(superclass.as_deref());
                children.extend(body.iter());
            }
            NodeKind::Verb { word, action, flags } => {
                children.extend([word.as_ref(), action.as_ref(), flags.as_ref()]);
            }
            NodeKind::Declaration { declarators, .. } => {
                for declarator in declarators {
                    children.push(&declarator.name);
                    children.extend(declarator.size.as_deref());
                    match &declarator.value {
                        Some(Initializer::Expression(value)) => children.push(value.as_ref()),
                        Some(Initializer::List(values)) => children.extend(values.iter()),
                        None => {}
                    }
                }
            }
            NodeKind::Block { body } => children.extend(body.iter()),
            NodeKind::Return { value } => children.extend(value.as_deref()),
            NodeKind::Guarded { subject, body } => {
                children.push(subject.as_ref());
                children.extend(body.iter());
            }
            NodeKind::DoWhile { body, condition } => {
                children.extend(body.iter());
                children.push(condition.as_ref());
            }
            NodeKind::If { condition, then, otherwise } => {
                children.push(condition.as_ref());
                children.extend(then.iter());
                if let Some(otherwise) = otherwise {
                    children.extend(otherwise.iter());
                }
            }
            NodeKind::For { init, condition, step, body } => {
                children.extend(init.as_deref());
                children.extend(condition.as_deref());
                children.extend(step.as_deref());
                children.extend(body.iter());
            }
            NodeKind::Case { value } => children.push(value.as_ref()),
        }

        children
    }

    /// Pre-order walk over this node and every descendant.
    pub fn walk<'n>(&'n self, visit: &mut impl FnMut(&'n Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

/// Result of parsing a statement list: nothing, one statement or several.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Statements {
    #[default]
    Empty,
    Single(Box<Node>),
    List(Vec<Node>),
}

impl From<Vec<Node>> for Statements {
    fn from(mut nodes: Vec<Node>) -> Self {
        match nodes.len() {
            0 => Statements::Empty,
            1 => Statements::Single(Box::new(nodes.remove(0))),
            _ => Statements::List(nodes),
        }
    }
}

impl Statements {
    pub fn as_slice(&self) -> &[Node] {
        match self {
            Statements::Empty => &[],
            Statements::Single(node) => std::slice::from_ref(node.as_ref()),
            Statements::List(nodes) => nodes,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.as_slice().iter()
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Statements::Empty)
    }

    /// Pre-order walk over every statement and its descendants.
    pub fn walk<'n>(&'n self, visit: &mut impl FnMut(&'n Node)) {
        for node in self.iter() {
            node.walk(visit);
        }
    }
}
