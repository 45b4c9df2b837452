//! Vesper Parser
//!
//! Turns the flat token stream from `vesper-lexer` into a syntax tree.
//! There is no monolithic grammar: rules are pluggable [`Pattern`]s held
//! in a [`PatternRegistry`], and the engine repeatedly selects the best
//! match at the scan position (type-signature filter, then shape check,
//! then strictly-highest priority with first-registered tie-break), lets
//! it consume tokens and emit a subtree, and recurses into the sections
//! of content tokens through the same entry point.
//!
//! Parsing is fail-fast: the first unresolved operator, unmatched token
//! or failed build aborts the unit, and the error carries the position at
//! which it occurred.

pub mod context;
pub mod engine;
pub mod pattern;
pub mod patterns;
pub mod tree;

pub use context::Context;
pub use engine::{parse_unit, ParseState, MAX_SECTION_DEPTH};
pub use pattern::{Built, Pattern, PatternRegistry};
pub use patterns::default_registry;
pub use tree::{NodeId, NodeKind, SyntaxTree, TreeError};

use vesper_lexer::Span;

/// Parse failure for one unit, carrying the offending position.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// Operator text that the spelling table does not know.
    #[error("unknown operator '{text}' at {span}")]
    UnknownOperator { text: String, span: Span },

    /// Tokens remain but no registered pattern passes at this position.
    #[error("no pattern matches token '{text}' at {span}")]
    NoMatchingPattern { text: String, span: Span },

    /// Section nesting deeper than the engine allows.
    #[error("section nesting exceeds the maximum depth of {limit} at {span}")]
    DepthLimitExceeded { limit: usize, span: Span },

    /// A selected pattern's build rejected the window.
    #[error("{message} at {span}")]
    Build { message: String, span: Span },

    /// A build violated the tree invariants.
    #[error(transparent)]
    Tree(#[from] TreeError),
}
