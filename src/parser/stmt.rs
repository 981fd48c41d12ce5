use crate::{
    ast::{
        ast::{Arity, Node, NodeKind, Statements},
        declarations::{Declarator, Initializer, Parameter, ValueType},
    },
    errors::errors::ErrorImpl,
    lexer::tokens::TokenKind,
};

use super::{
    lookups::BindingPower,
    parser::{ParseToken, Parser},
};

/// Takes the current token as an operand of a fixed-shape statement. A
/// closing token is left in place and stands in as an invalid node.
fn take_operand(parser: &mut Parser) -> Node {
    if parser.current().is_closer() {
        return parser.current().to_node(NodeKind::Invalid);
    }

    let token = parser.advance(None);
    let kind = match token.arity() {
        Some(Arity::Name) => NodeKind::Name,
        Some(Arity::Literal) => NodeKind::Literal,
        _ => NodeKind::Invalid,
    };
    token.into_node(kind)
}

/// Takes the name a declaration introduces, leaving a closing token in place.
fn take_name(parser: &mut Parser) -> ParseToken {
    if parser.current().is_closer() {
        parser.current().clone()
    } else {
        parser.advance(None)
    }
}

/// `(` expression `)`
fn parenthesized(parser: &mut Parser) -> Node {
    parser.advance(Some("("));
    let expression = parser.expression(BindingPower::DEFAULT);
    parser.advance(Some(")"));
    expression
}

fn optional_expression(parser: &mut Parser, terminator: &str) -> Option<Box<Node>> {
    if parser.current().id == terminator {
        None
    } else {
        Some(Box::new(parser.expression(BindingPower::DEFAULT)))
    }
}

pub fn std_block(parser: &mut Parser, token: ParseToken) -> Node {
    let body = parser.scoped_statements();
    token.into_node(NodeKind::Block { body })
}

/// `verb("word", action, flags);`
pub fn std_verb(parser: &mut Parser, token: ParseToken) -> Node {
    parser.advance(Some("("));

    if parser.current().origin != Some(TokenKind::String) {
        let span = parser.current().span;
        parser.error(ErrorImpl::ExpectedStringLiteral, span);
    }
    let word = take_operand(parser);
    parser.advance(Some(","));

    if parser.current().is_name() {
        let action = parser.current().clone();
        parser.record_if_undefined(&action);
    } else {
        let span = parser.current().span;
        parser.warning(ErrorImpl::ExpectedActionIdentifier, span);
    }
    let action = take_operand(parser);
    parser.advance(Some(","));

    if parser.current().origin != Some(TokenKind::Integer) {
        let span = parser.current().span;
        parser.warning(ErrorImpl::ExpectedIntegerLiteral, span);
    }
    let flags = take_operand(parser);
    parser.advance(Some(")"));
    parser.expect_semicolon();

    token.into_node(NodeKind::Verb {
        word: Box::new(word),
        action: Box::new(action),
        flags: Box::new(flags),
    })
}

/// `[abstract] class Name [: Super] { ... }`
pub fn std_class(parser: &mut Parser, token: ParseToken) -> Node {
    let mut is_abstract = false;

    if parser.current().is_name() && parser.current().value == "abstract" {
        let modifier = parser.advance(None);
        parser.reserve(&modifier);
        is_abstract = true;
    }

    let name = if parser.current().is_name() {
        let name = parser.advance(None);
        parser.define(&name, Arity::Class, None);
        name
    } else {
        let span = parser.current().span;
        parser.error(ErrorImpl::ExpectedClassName, span);

        if matches!(parser.current().id, "{" | ":") || parser.current().is_closer() {
            token
        } else {
            parser.advance(None)
        }
    };

    let mut superclass = None;
    if parser.current().id == ":" {
        parser.advance(Some(":"));

        if parser.current().is_name() {
            let parent = parser.advance(None);
            // may be declared further down, so it is always checked later
            parser.record_occurrence(&parent);
            superclass = Some(Box::new(parent.into_node(NodeKind::Name)));
        } else {
            let span = parser.current().span;
            parser.error(ErrorImpl::ExpectedSuperClassName, span);
        }
    }

    let body = parser.block();

    name.into_node(NodeKind::Class {
        is_abstract,
        superclass,
        body,
    })
}

pub fn std_return(parser: &mut Parser, token: ParseToken) -> Node {
    let value = optional_expression(parser, ";");
    parser.expect_semicolon();

    if !matches!(parser.current().id, "}" | "case" | "default" | "(end)") {
        parser.warning(ErrorImpl::UnreachableCode, token.span);
    }

    token.into_node(NodeKind::Return { value })
}

/// `while`, `fetch`, `with` and `switch`: `keyword (e) { ... }`
pub fn std_guarded(parser: &mut Parser, token: ParseToken) -> Node {
    let subject = parenthesized(parser);
    let body = parser.block();

    token.into_node(NodeKind::Guarded {
        subject: Box::new(subject),
        body,
    })
}

/// `do { ... } while (e);`
pub fn std_do(parser: &mut Parser, token: ParseToken) -> Node {
    let body = parser.block();

    let keyword = parser.current().clone();
    parser.reserve(&keyword);
    parser.advance(Some("while"));

    let condition = parenthesized(parser);
    parser.expect_semicolon();

    token.into_node(NodeKind::DoWhile {
        body,
        condition: Box::new(condition),
    })
}

/// `if (e) { ... } [else { ... } | else if ...]`
pub fn std_if(parser: &mut Parser, token: ParseToken) -> Node {
    let condition = parenthesized(parser);
    let then = parser.block();

    let otherwise = if parser.current().id == "else" {
        let keyword = parser.advance(Some("else"));
        parser.reserve(&keyword);

        if parser.current().id == "if" {
            Some(Statements::from(parser.statement().into_iter().collect::<Vec<_>>()))
        } else {
            Some(parser.block())
        }
    } else {
        None
    };

    token.into_node(NodeKind::If {
        condition: Box::new(condition),
        then,
        otherwise,
    })
}

/// `for ([e]; [e]; [e]) { ... }`
pub fn std_for(parser: &mut Parser, token: ParseToken) -> Node {
    parser.advance(Some("("));
    let init = optional_expression(parser, ";");
    parser.advance(Some(";"));
    let condition = optional_expression(parser, ";");
    parser.advance(Some(";"));
    let step = optional_expression(parser, ")");
    parser.advance(Some(")"));

    let body = parser.block();

    token.into_node(NodeKind::For {
        init,
        condition,
        step,
        body,
    })
}

/// `case (e);`
pub fn std_case(parser: &mut Parser, token: ParseToken) -> Node {
    let value = parenthesized(parser);
    parser.expect_semicolon();

    token.into_node(NodeKind::Case {
        value: Box::new(value),
    })
}

/// `break;`, `default;`, `quit;`, `halt;`
pub fn std_bare(parser: &mut Parser, token: ParseToken) -> Node {
    parser.expect_semicolon();
    token.into_node(NodeKind::Bare)
}

pub fn std_int(parser: &mut Parser, token: ParseToken) -> Node {
    declaration(parser, token, ValueType::Int)
}

pub fn std_string(parser: &mut Parser, token: ParseToken) -> Node {
    declaration(parser, token, ValueType::String)
}

pub fn std_object(parser: &mut Parser, token: ParseToken) -> Node {
    declaration(parser, token, ValueType::Object)
}

/// `void` only ever introduces a function.
pub fn std_void(parser: &mut Parser, _token: ParseToken) -> Node {
    let name = take_name(parser);
    function(parser, name, ValueType::Void)
}

/// A type keyword starts a function when its name is followed by `(`,
/// otherwise a list of variables.
fn declaration(parser: &mut Parser, keyword: ParseToken, value_type: ValueType) -> Node {
    let name = take_name(parser);

    if parser.current().id == "(" {
        function(parser, name, value_type)
    } else {
        variables(parser, keyword, name, value_type)
    }
}

fn function(parser: &mut Parser, name: ParseToken, return_type: ValueType) -> Node {
    if name.is_name() {
        parser.define(&name, Arity::Function, Some(return_type));
    } else {
        parser.error(ErrorImpl::ExpectedFunctionName, name.span);
    }

    parser.advance(Some("("));
    parser.push_scope();

    let mut parameters = vec![];
    if parser.current().id != ")" {
        loop {
            parameters.push(parameter(parser));

            if parser.current().id != "," {
                break;
            }
            parser.advance(Some(","));
        }
    }

    parser.advance(Some(")"));
    let body = parser.function_body();

    let kind = NodeKind::Function {
        return_type,
        parameters,
        body,
    };
    name.into_node(kind)
}

fn parameter(parser: &mut Parser) -> Parameter {
    if parser.current().is_closer() {
        let span = parser.current().span;
        parser.error(ErrorImpl::ExpectedParameterName, span);

        return Parameter {
            value_type: None,
            name: parser.current().to_node(NodeKind::Invalid),
        };
    }

    let type_token = parser.advance(None);
    let value_type = type_token
        .is_name()
        .then(|| ValueType::from_keyword(&type_token.value))
        .flatten()
        .filter(ValueType::is_storable);

    if value_type.is_none() {
        parser.error(
            ErrorImpl::InvalidParameterType {
                token: type_token.value.clone(),
            },
            type_token.span,
        );
    }

    // `(a, b)`: the type is missing and the token is the name itself
    let name = if value_type.is_none() && type_token.is_name() && matches!(parser.current().id, "," | ")") {
        type_token
    } else if parser.current().is_name() {
        parser.advance(None)
    } else {
        let span = parser.current().span;
        parser.error(ErrorImpl::ExpectedParameterName, span);

        let placeholder = take_name(parser);
        return Parameter {
            value_type,
            name: placeholder.into_node(NodeKind::Invalid),
        };
    };

    parser.define(&name, Arity::Name, value_type);
    Parameter {
        value_type,
        name: name.into_node(NodeKind::Name),
    }
}

fn variables(parser: &mut Parser, keyword: ParseToken, first: ParseToken, value_type: ValueType) -> Node {
    let mut declarators = vec![];
    let mut name = first;

    loop {
        declarators.push(declarator(parser, name, value_type));

        if parser.current().id != "," {
            break;
        }
        parser.advance(Some(","));
        name = take_name(parser);
    }

    parser.expect_semicolon();

    keyword.into_node(NodeKind::Declaration {
        value_type,
        declarators,
    })
}

/// `name [ '[' [size] ']' ] [ = value | = (v1, v2, ...) ]`
fn declarator(parser: &mut Parser, name: ParseToken, value_type: ValueType) -> Declarator {
    let name = if name.is_name() {
        parser.define(&name, Arity::Name, Some(value_type));
        name.into_node(NodeKind::Name)
    } else {
        parser.error(ErrorImpl::ExpectedVariableName, name.span);
        name.into_node(NodeKind::Invalid)
    };

    let mut array = false;
    let mut size = None;
    if parser.current().id == "[" {
        parser.advance(Some("["));
        array = true;
        size = optional_expression(parser, "]");
        parser.advance(Some("]"));
    }

    let value = if parser.current().id == "=" {
        parser.advance(Some("="));

        if array && parser.current().id == "(" {
            parser.advance(Some("("));

            let mut values = vec![];
            if parser.current().id != ")" {
                loop {
                    values.push(parser.expression(BindingPower::DEFAULT));

                    if parser.current().id != "," {
                        break;
                    }
                    parser.advance(Some(","));
                }
            }
            parser.advance(Some(")"));

            Some(Initializer::List(values))
        } else {
            Some(Initializer::Expression(Box::new(parser.expression(BindingPower::DEFAULT))))
        }
    } else {
        None
    };

    Declarator {
        name,
        array,
        size,
        value,
    }
}
