//! Operator identities for the Vesper language.
//!
//! Operator tokens never store their spelling verbatim: the raw text is
//! resolved to an [`Operator`] identity once, at token construction, and the
//! canonical spelling is reconstructed from the identity on demand.

use std::collections::HashMap;
use std::sync::LazyLock;

/// The closed set of Vesper operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Member access
    Dot,

    // Arithmetic
    Multiply,
    Divide,
    Modulus,
    Add,
    Subtract,

    // Comparison
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
    Equals,
    NotEquals,

    // Logical
    And,
    Or,

    // Assignment
    Assign,

    // Unary prefix
    Increment,
    Decrement,
}

/// Every operator, used to build the spelling table.
const OPERATORS: &[Operator] = &[
    Operator::Dot,
    Operator::Multiply,
    Operator::Divide,
    Operator::Modulus,
    Operator::Add,
    Operator::Subtract,
    Operator::Greater,
    Operator::Less,
    Operator::GreaterOrEqual,
    Operator::LessOrEqual,
    Operator::Equals,
    Operator::NotEquals,
    Operator::And,
    Operator::Or,
    Operator::Assign,
    Operator::Increment,
    Operator::Decrement,
];

/// Spelling-to-identity table, built once on first lookup.
static SPELLINGS: LazyLock<HashMap<&'static str, Operator>> = LazyLock::new(|| {
    OPERATORS.iter().map(|op| (op.text(), *op)).collect()
});

impl Operator {
    /// Resolve raw operator text to an identity.
    ///
    /// Returns `None` for spellings not in the table; there is no sentinel
    /// "unknown operator" value, so callers must handle the miss.
    pub fn resolve(text: &str) -> Option<Operator> {
        SPELLINGS.get(text).copied()
    }

    /// The canonical spelling of this operator.
    pub fn text(&self) -> &'static str {
        match self {
            Operator::Dot => ".",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulus => "%",
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Assign => "=",
            Operator::Increment => "++",
            Operator::Decrement => "--",
        }
    }

    /// Binding strength when this operator appears between two operands.
    /// Higher binds tighter. Meaningless for non-binary operators.
    pub fn precedence(&self) -> i32 {
        match self {
            Operator::Dot => 19,
            Operator::Multiply | Operator::Divide | Operator::Modulus => 12,
            Operator::Add | Operator::Subtract => 11,
            Operator::Greater
            | Operator::Less
            | Operator::GreaterOrEqual
            | Operator::LessOrEqual => 9,
            Operator::Equals | Operator::NotEquals => 8,
            Operator::And => 4,
            Operator::Or => 3,
            Operator::Assign => 1,
            Operator::Increment | Operator::Decrement => 0,
        }
    }

    /// Whether this operator may appear between two operands.
    pub fn is_binary(&self) -> bool {
        !matches!(self, Operator::Increment | Operator::Decrement)
    }

    /// Whether chains of this operator group right-to-left.
    pub fn is_right_associative(&self) -> bool {
        matches!(self, Operator::Assign)
    }
}
