//! Pattern for bracketed regions.

use vesper_lexer::{Token, TokenKind, TokenTypes};

use crate::engine::ParseState;
use crate::pattern::{Built, Pattern};
use crate::tree::NodeKind;
use crate::ParseError;

/// Fixed: a grouped region admits no competing parse at its own boundary,
/// so the priority never depends on the tokens.
pub const PRIORITY: i32 = 16;

const SIGNATURE: [TokenTypes; 1] = [TokenTypes::CONTENT];

/// Parses one content token by recursing into each of its sections and
/// attaching the results as children, in section order.
pub struct ContentPattern;

impl Pattern for ContentPattern {
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
        let TokenKind::Content(content) = &tokens[0].kind else {
            return Err(ParseError::Build {
                message: "expected a content token".to_string(),
                span: tokens[0].span,
            });
        };

        let node = state.tree.alloc(NodeKind::Content(content.bracket()));
        for index in 0..content.section_count() {
            let child = state.parse_section(content.section(index))?;
            state.tree.add(node, child);
        }

        Ok(Built { node, consumed: 1 })
    }
}
