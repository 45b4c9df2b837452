//! Fallback pattern for lone value tokens.

use vesper_lexer::{Token, TokenKind, TokenTypes};

use crate::engine::ParseState;
use crate::pattern::{Built, Pattern};
use crate::tree::NodeKind;
use crate::ParseError;

/// Lowest tier: every other pattern outranks a bare leaf.
pub const PRIORITY: i32 = 0;

const SIGNATURE: [TokenTypes; 1] = [TokenTypes::IDENTIFIER.union(TokenTypes::NUMBER)];

/// Builds a leaf node from a single identifier or number literal.
pub struct SingletonPattern;

impl Pattern for SingletonPattern {
    fn signature(&self) -> &[TokenTypes] {
        &SIGNATURE
    }

    fn priority(&self, _tokens: &[Token]) -> i32 {
        PRIORITY
    }

    fn passes(&self, _tokens: &[Token]) -> bool {
        true
    }

    fn build(&self, state: &mut ParseState<'_>, tokens: &[Token]) -> Result<Built, ParseError> {
        let kind = match &tokens[0].kind {
            TokenKind::Identifier(name) => NodeKind::Identifier(name.clone()),
            TokenKind::Number(value) => NodeKind::Number(*value),
            _ => {
                return Err(ParseError::Build {
                    message: "expected an identifier or number".to_string(),
                    span: tokens[0].span,
                })
            }
        };

        let node = state.tree.alloc(kind);
        Ok(Built { node, consumed: 1 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::engine::parse_unit;
    use crate::patterns::default_registry;
    use crate::tree::SyntaxTree;
    use pretty_assertions::assert_eq;
    use vesper_lexer::Span;

    #[test]
    fn test_identifier_becomes_a_leaf() {
        let registry = default_registry();
        let mut tree = SyntaxTree::new();
        let mut context = Context::new();
        let nodes = parse_unit(
            &registry,
            &mut context,
            &mut tree,
            &[Token::identifier("total", Span::default())],
        )
        .unwrap();

        assert_eq!(tree.kind(nodes[0]), &NodeKind::Identifier("total".to_string()));
        assert_eq!(tree.child_count(nodes[0]), 0);
    }

    #[test]
    fn test_number_becomes_a_leaf() {
        let registry = default_registry();
        let mut tree = SyntaxTree::new();
        let mut context = Context::new();
        let nodes = parse_unit(
            &registry,
            &mut context,
            &mut tree,
            &[Token::number(6.5, Span::default())],
        )
        .unwrap();

        assert_eq!(tree.kind(nodes[0]), &NodeKind::Number(6.5));
    }
}
