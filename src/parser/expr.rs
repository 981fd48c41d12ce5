use crate::{
    ast::ast::{Arity, Node, NodeKind},
    errors::errors::ErrorImpl,
};

use super::{
    lookups::BindingPower,
    parser::{ParseToken, Parser},
};

pub fn nud_itself(_parser: &mut Parser, token: ParseToken) -> Node {
    token.into_node(NodeKind::Name)
}

/// A name nothing in scope defines yet. It may still be declared later in
/// the document, so it is only recorded here.
pub fn nud_undefined_name(parser: &mut Parser, token: ParseToken) -> Node {
    parser.record_occurrence(&token);
    token.into_node(NodeKind::Name)
}

pub fn nud_literal(_parser: &mut Parser, token: ParseToken) -> Node {
    token.into_node(NodeKind::Literal)
}

pub fn nud_constant(parser: &mut Parser, token: ParseToken) -> Node {
    parser.reserve(&token);
    token.into_node(NodeKind::Literal)
}

pub fn nud_this(parser: &mut Parser, token: ParseToken) -> Node {
    parser.reserve(&token);
    token.into_node(NodeKind::This)
}

pub fn nud_super(parser: &mut Parser, token: ParseToken) -> Node {
    parser.reserve(&token);
    token.into_node(NodeKind::Super)
}

pub fn nud_prefix(parser: &mut Parser, token: ParseToken) -> Node {
    parser.reserve(&token);
    let operand = parser.expression(BindingPower::UNARY);

    token.into_node(NodeKind::Unary {
        operand: Box::new(operand),
    })
}

pub fn nud_group(parser: &mut Parser, _token: ParseToken) -> Node {
    let mut expression = parser.expression(BindingPower::DEFAULT);
    parser.advance(Some(")"));

    expression.parenthesized = true;
    expression
}

pub fn led_infix(parser: &mut Parser, token: ParseToken, left: Node) -> Node {
    let right = parser.expression(token.denotations.lbp);

    token.into_node(NodeKind::Binary {
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn led_infixr(parser: &mut Parser, token: ParseToken, left: Node) -> Node {
    let right = parser.expression(token.denotations.lbp.weaker());

    token.into_node(NodeKind::Binary {
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn is_left_value(node: &Node) -> bool {
    (matches!(node.id, "." | "[") && matches!(node.kind, NodeKind::Binary { .. })) || node.arity() == Arity::Name
}

pub fn led_assignment(parser: &mut Parser, token: ParseToken, left: Node) -> Node {
    if !is_left_value(&left) {
        parser.error(ErrorImpl::BadLeftValue, left.span);
    }

    let right = parser.expression(BindingPower::ASSIGNMENT.weaker());

    token.into_node(NodeKind::Binary {
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn led_postfix(parser: &mut Parser, token: ParseToken, left: Node) -> Node {
    if !is_left_value(&left) {
        parser.error(ErrorImpl::BadLeftValue, left.span);
    }

    token.into_node(NodeKind::Unary {
        operand: Box::new(left),
    })
}

pub fn led_ternary(parser: &mut Parser, token: ParseToken, left: Node) -> Node {
    let then = parser.expression(BindingPower::DEFAULT);
    parser.advance(Some(":"));
    let otherwise = parser.expression(BindingPower::DEFAULT);

    token.into_node(NodeKind::Ternary {
        condition: Box::new(left),
        then: Box::new(then),
        otherwise: Box::new(otherwise),
    })
}

pub fn led_member(parser: &mut Parser, token: ParseToken, left: Node) -> Node {
    let property = if parser.current().is_name() {
        parser.advance(None).into_node(NodeKind::Literal)
    } else {
        let span = parser.current().span;
        parser.error(ErrorImpl::ExpectedPropertyName, span);

        if parser.current().is_closer() {
            parser.current().to_node(NodeKind::Invalid)
        } else {
            parser.advance(None).into_node(NodeKind::Invalid)
        }
    };

    token.into_node(NodeKind::Binary {
        left: Box::new(left),
        right: Box::new(property),
    })
}

pub fn led_index(parser: &mut Parser, token: ParseToken, left: Node) -> Node {
    let index = parser.expression(BindingPower::DEFAULT);
    parser.advance(Some("]"));

    token.into_node(NodeKind::Binary {
        left: Box::new(left),
        right: Box::new(index),
    })
}

fn arguments(parser: &mut Parser) -> Vec<Node> {
    let mut arguments = vec![];

    if parser.current().id != ")" {
        loop {
            arguments.push(parser.expression(BindingPower::DEFAULT));

            if parser.current().id != "," {
                break;
            }
            parser.advance(Some(","));
        }
    }

    parser.advance(Some(")"));
    arguments
}

/// A call folds a preceding member or index access into one method call
/// node rather than calling the property.
pub fn led_call(parser: &mut Parser, token: ParseToken, left: Node) -> Node {
    let arguments = arguments(parser);

    if matches!(left.id, "." | "[") && !left.parenthesized {
        if let NodeKind::Binary { left: object, right: member } = left.kind {
            return token.into_node(NodeKind::MethodCall {
                object,
                member,
                arguments,
            });
        }
    }

    let callable = left.arity() == Arity::Name
        || left.arity() == Arity::Invalid
        || left.parenthesized
        || matches!(left.id, "(" | "&&" | "||" | "?");

    if !callable {
        parser.error(ErrorImpl::ExpectedVariableName, left.span);
    }

    token.into_node(NodeKind::Call {
        callee: Box::new(left),
        arguments,
    })
}
