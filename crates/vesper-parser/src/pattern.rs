//! The pattern contract and the registry the engine selects from.

use vesper_lexer::{Token, TokenTypes};

use crate::engine::ParseState;
use crate::tree::NodeId;
use crate::ParseError;

/// The outcome of a successful pattern build: the subtree root and how
/// many tokens of the window the build consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Built {
    pub node: NodeId,
    pub consumed: usize,
}

/// A pluggable grammar rule.
///
/// The engine queries `signature`, `passes` and `priority` speculatively,
/// so all three must be pure; only `build` may allocate nodes, consult the
/// context, and fail. Once a pattern is selected its build is committed;
/// the engine never retries an alternative after a build failure.
pub trait Pattern {
    /// One token-type mask per leading window slot. The window must be at
    /// least this long and match every slot before the pattern is
    /// considered further. This is the cheap pre-filter.
    fn signature(&self) -> &[TokenTypes];

    /// Rank this pattern for the candidate window. May depend on the
    /// actual tokens, not just their types.
    fn priority(&self, tokens: &[Token]) -> i32;

    /// Fine-grained shape check beyond the type signature.
    fn passes(&self, tokens: &[Token]) -> bool;

    /// Consume a prefix of the window and emit a subtree. Patterns must
    /// construct fresh nodes, never re-parent an already-attached one.
    fn build(&self, state: &mut ParseState<'_>, tokens: &[Token]) -> Result<Built, ParseError>;
}

/// Ordered collection of patterns.
///
/// Iteration follows registration order, which is also the deterministic
/// tie-break when two patterns report equal priority: first registered
/// wins.
#[derive(Default)]
pub struct PatternRegistry {
    patterns: Vec<Box<dyn Pattern>>,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    pub fn register(&mut self, pattern: impl Pattern + 'static) {
        self.patterns.push(Box::new(pattern));
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &dyn Pattern> {
        self.patterns.iter().map(|pattern| pattern.as_ref())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
