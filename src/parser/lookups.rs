use std::{collections::HashMap, fmt::Debug};

use lazy_static::lazy_static;

use crate::ast::ast::Node;

use super::{
    expr::*,
    parser::{ParseToken, Parser},
    stmt::*,
};

/// Left binding power. Higher binds tighter.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Default, Hash)]
pub struct BindingPower(pub u8);

impl BindingPower {
    pub const DEFAULT: BindingPower = BindingPower(0);
    pub const ASSIGNMENT: BindingPower = BindingPower(10);
    pub const TERNARY: BindingPower = BindingPower(20);
    pub const LOGICAL: BindingPower = BindingPower(30);
    pub const BITWISE_OR: BindingPower = BindingPower(35);
    pub const BITWISE_XOR: BindingPower = BindingPower(36);
    pub const BITWISE_AND: BindingPower = BindingPower(37);
    pub const RELATIONAL: BindingPower = BindingPower(40);
    pub const SHIFT: BindingPower = BindingPower(45);
    pub const ADDITIVE: BindingPower = BindingPower(50);
    pub const MULTIPLICATIVE: BindingPower = BindingPower(60);
    pub const UNARY: BindingPower = BindingPower(70);
    pub const MEMBER: BindingPower = BindingPower(80);

    /// The power a right-associative operator parses its right side at.
    pub fn weaker(self) -> BindingPower {
        BindingPower(self.0.saturating_sub(1))
    }
}

pub type NudHandler = fn(&mut Parser<'_>, ParseToken) -> Node;
pub type LedHandler = fn(&mut Parser<'_>, ParseToken, Node) -> Node;
pub type StdHandler = fn(&mut Parser<'_>, ParseToken) -> Node;

/// Parsing behaviour of one grammar symbol.
#[derive(Clone, Copy, Default)]
pub struct Denotations {
    pub lbp: BindingPower,
    pub nud: Option<NudHandler>,
    pub led: Option<LedHandler>,
    pub std: Option<StdHandler>,
}

impl Denotations {
    /// The profile every defined name gets: evaluates to itself, binds nothing.
    pub fn identifier() -> Denotations {
        Denotations {
            lbp: BindingPower::DEFAULT,
            nud: Some(nud_itself),
            led: None,
            std: None,
        }
    }
}

impl Debug for Denotations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Denotations")
            .field("lbp", &self.lbp.0)
            .field("nud", &self.nud.is_some())
            .field("led", &self.led.is_some())
            .field("std", &self.std.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct GrammarSymbol {
    pub id: &'static str,
    pub denotations: Denotations,
}

/// Immutable table of grammar symbols keyed by id.
#[derive(Debug, Clone)]
pub struct Grammar {
    symbols: HashMap<&'static str, GrammarSymbol>,
    undefined: GrammarSymbol,
}

impl Default for Grammar {
    fn default() -> Self {
        Grammar::new()
    }
}

impl Grammar {
    /// An empty grammar holding only the generic undefined-name prototype.
    pub fn new() -> Grammar {
        let undefined = GrammarSymbol {
            id: "(name)",
            denotations: Denotations {
                nud: Some(nud_undefined_name),
                ..Denotations::default()
            },
        };

        let mut symbols = HashMap::new();
        symbols.insert(undefined.id, undefined.clone());

        Grammar { symbols, undefined }
    }

    pub fn get(&self, id: &str) -> Option<&GrammarSymbol> {
        self.symbols.get(id)
    }

    /// The prototype names fall back to when no scope defines them.
    pub fn undefined(&self) -> &GrammarSymbol {
        &self.undefined
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Registers `id`, or raises its binding power if it is already known.
    /// A symbol's binding power never decreases.
    pub fn symbol(&mut self, id: &'static str, bp: BindingPower) -> &mut GrammarSymbol {
        let symbol = self.symbols.entry(id).or_insert_with(|| GrammarSymbol {
            id,
            denotations: Denotations {
                lbp: bp,
                ..Denotations::default()
            },
        });

        if bp > symbol.denotations.lbp {
            symbol.denotations.lbp = bp;
        }

        symbol
    }

    pub fn infix(&mut self, id: &'static str, bp: BindingPower, led: LedHandler) {
        self.symbol(id, bp).denotations.led = Some(led);
    }

    pub fn prefix(&mut self, id: &'static str, nud: NudHandler) {
        self.symbol(id, BindingPower::DEFAULT).denotations.nud = Some(nud);
    }

    pub fn assignment(&mut self, id: &'static str) {
        self.infix(id, BindingPower::ASSIGNMENT, led_assignment);
    }

    pub fn constant(&mut self, id: &'static str) {
        self.prefix(id, nud_constant);
    }

    pub fn stmt(&mut self, id: &'static str, std: StdHandler) {
        self.symbol(id, BindingPower::DEFAULT).denotations.std = Some(std);
    }
}

/// Builds the floyd grammar table.
pub fn create_grammar() -> Grammar {
    let mut grammar = Grammar::new();

    for id in [":", ";", ",", ")", "]", "}", "else", "(end)"] {
        grammar.symbol(id, BindingPower::DEFAULT);
    }
    grammar.prefix("(literal)", nud_literal);

    // Arithmetic
    grammar.infix("+", BindingPower::ADDITIVE, led_infix);
    grammar.infix("-", BindingPower::ADDITIVE, led_infix);
    grammar.infix("*", BindingPower::MULTIPLICATIVE, led_infix);
    grammar.infix("/", BindingPower::MULTIPLICATIVE, led_infix);
    grammar.infix("%", BindingPower::MULTIPLICATIVE, led_infix);

    // Relational
    grammar.infix("==", BindingPower::RELATIONAL, led_infix);
    grammar.infix("!=", BindingPower::RELATIONAL, led_infix);
    grammar.infix("<", BindingPower::RELATIONAL, led_infix);
    grammar.infix("<=", BindingPower::RELATIONAL, led_infix);
    grammar.infix(">", BindingPower::RELATIONAL, led_infix);
    grammar.infix(">=", BindingPower::RELATIONAL, led_infix);

    // Bitwise
    grammar.infix("<<", BindingPower::SHIFT, led_infix);
    grammar.infix(">>", BindingPower::SHIFT, led_infix);
    grammar.infix("&", BindingPower::BITWISE_AND, led_infix);
    grammar.infix("^", BindingPower::BITWISE_XOR, led_infix);
    grammar.infix("|", BindingPower::BITWISE_OR, led_infix);

    // Logical
    grammar.infix("&&", BindingPower::LOGICAL, led_infixr);
    grammar.infix("||", BindingPower::LOGICAL, led_infixr);

    grammar.infix("?", BindingPower::TERNARY, led_ternary);

    // Member, index and call
    grammar.infix(".", BindingPower::MEMBER, led_member);
    grammar.infix("[", BindingPower::MEMBER, led_index);
    grammar.infix("(", BindingPower::MEMBER, led_call);

    grammar.prefix("-", nud_prefix);
    grammar.prefix("!", nud_prefix);
    grammar.prefix("~", nud_prefix);
    grammar.prefix("(", nud_group);

    // Assignment
    grammar.assignment("=");
    grammar.assignment("+=");
    grammar.assignment("-=");
    grammar.assignment("*=");
    grammar.assignment("/=");
    grammar.assignment("%=");
    grammar.infix("++", BindingPower::ASSIGNMENT, led_postfix);
    grammar.infix("--", BindingPower::ASSIGNMENT, led_postfix);

    grammar.constant("NULL");
    grammar.prefix("this", nud_this);
    grammar.prefix("super", nud_super);

    // Statements
    grammar.stmt("{", std_block);
    grammar.stmt("verb", std_verb);
    grammar.stmt("class", std_class);
    grammar.stmt("return", std_return);
    grammar.stmt("while", std_guarded);
    grammar.stmt("fetch", std_guarded);
    grammar.stmt("with", std_guarded);
    grammar.stmt("switch", std_guarded);
    grammar.stmt("do", std_do);
    grammar.stmt("if", std_if);
    grammar.stmt("for", std_for);
    grammar.stmt("case", std_case);
    grammar.stmt("break", std_bare);
    grammar.stmt("default", std_bare);
    grammar.stmt("quit", std_bare);
    grammar.stmt("halt", std_bare);
    grammar.stmt("int", std_int);
    grammar.stmt("string", std_string);
    grammar.stmt("object", std_object);
    grammar.stmt("void", std_void);

    grammar
}

lazy_static! {
    /// The process-wide grammar, built on first use.
    pub static ref GRAMMAR: Grammar = create_grammar();
}
