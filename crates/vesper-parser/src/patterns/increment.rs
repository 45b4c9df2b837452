//! Pattern for prefix increment and decrement.

use vesper_lexer::{Operator, Token, TokenKind, TokenTypes};

use crate::engine::ParseState;
use crate::pattern::{Built, Pattern};
use crate::tree::NodeKind;
use crate::ParseError;

pub const PRIORITY: i32 = 18;

// ++ $identifier | -- $identifier
const SIGNATURE: [TokenTypes; 2] = [TokenTypes::OPERATOR, TokenTypes::IDENTIFIER];

/// Builds `++x` / `--x` as a one-child node over the parsed operand.
pub struct IncrementPattern;

impl Pattern for IncrementPattern {
    fn signature(&self) -> &[TokenTypes] {
        &SIGNATURE
    }

    fn priority(&self, _tokens: &[Token]) -> i32 {
        PRIORITY
    }

    fn passes(&self, tokens: &[Token]) -> bool {
        match &tokens[0].kind {
            TokenKind::Operator(op) => matches!(
                op.known(),
                Some(Operator::Increment | Operator::Decrement)
            ),
            _ => false,
        }
    }

    fn build(&self, state: &mut ParseState<'_>, tokens: &[Token]) -> Result<Built, ParseError> {
        let kind = match &tokens[0].kind {
            TokenKind::Operator(op) if op.known() == Some(Operator::Increment) => {
                NodeKind::Increment
            }
            TokenKind::Operator(op) if op.known() == Some(Operator::Decrement) => {
                NodeKind::Decrement
            }
            _ => {
                return Err(ParseError::Build {
                    message: "expected an increment or decrement operator".to_string(),
                    span: tokens[0].span,
                })
            }
        };

        let node = state.tree.alloc(kind);
        let operand = state.parse_token(&tokens[1])?;
        state.tree.add(node, operand);

        Ok(Built { node, consumed: 2 })
    }
}
