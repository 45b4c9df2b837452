//! Pattern for binary operator expressions.

use vesper_lexer::{Operator, Token, TokenKind, TokenTypes};

use crate::engine::ParseState;
use crate::pattern::{Built, Pattern};
use crate::tree::{NodeId, NodeKind};
use crate::ParseError;

/// Kinds usable as an operand.
const VALUE: TokenTypes = TokenTypes::IDENTIFIER
    .union(TokenTypes::NUMBER)
    .union(TokenTypes::CONTENT);

// $value $operator $value is the minimum run; build keeps folding as long
// as further operator/value pairs follow.
const SIGNATURE: [TokenTypes; 3] = [
    TokenTypes::IDENTIFIER.union(TokenTypes::NUMBER),
    TokenTypes::OPERATOR,
    VALUE,
];

/// Parses the maximal `value (operator value)*` run with precedence
/// climbing. Dot binds tightest, assignment chains group right-to-left,
/// everything else is left-associative.
pub struct OperatorPattern;

impl Pattern for OperatorPattern {
    fn signature(&self) -> &[TokenTypes] {
        &SIGNATURE
    }

    /// Priority follows the identity of the leading operator, so an
    /// operator run outranks the bare-leaf pattern on the same window.
    fn priority(&self, tokens: &[Token]) -> i32 {
        match operator_at(tokens, 1) {
            Some(op) => op.precedence(),
            None => 0,
        }
    }

    /// Unresolved operator spellings pass the shape check on purpose:
    /// they must surface as a build failure, not as a missing pattern.
    fn passes(&self, tokens: &[Token]) -> bool {
        match &tokens[1].kind {
            TokenKind::Operator(op) => op.known().is_none_or(|op| op.is_binary()),
            _ => false,
        }
    }

    fn build(&self, state: &mut ParseState<'_>, tokens: &[Token]) -> Result<Built, ParseError> {
        let lhs = state.parse_token(&tokens[0])?;
        let (node, consumed) = climb(state, tokens, lhs, 1, i32::MIN)?;
        Ok(Built { node, consumed })
    }
}

fn operator_at(tokens: &[Token], index: usize) -> Option<Operator> {
    match &tokens.get(index)?.kind {
        TokenKind::Operator(op) => op.known(),
        _ => None,
    }
}

/// Whether `tokens[index]` can serve as an operand.
fn value_at(tokens: &[Token], index: usize) -> bool {
    tokens
        .get(index)
        .is_some_and(|token| VALUE.contains(token.types()))
}

/// Precedence climbing over `tokens`, starting with `lhs` already built
/// and `pos` at the next unconsumed token. Returns the expression root and
/// the position after the consumed run.
fn climb(
    state: &mut ParseState<'_>,
    tokens: &[Token],
    mut lhs: NodeId,
    mut pos: usize,
    min_precedence: i32,
) -> Result<(NodeId, usize), ParseError> {
    loop {
        let Some(op_token) = tokens.get(pos) else { break };
        let TokenKind::Operator(op) = &op_token.kind else { break };
        let Some(op) = op.known() else {
            return Err(ParseError::UnknownOperator {
                text: op_token.text(),
                span: op_token.span,
            });
        };
        if !op.is_binary() || op.precedence() < min_precedence || !value_at(tokens, pos + 1) {
            break;
        }

        let mut rhs = state.parse_token(&tokens[pos + 1])?;
        let mut next = pos + 2;

        // Fold tighter-binding (or equal, when right-associative)
        // follow-up operators into the right operand first.
        loop {
            let Some(next_op) = operator_at(tokens, next) else { break };
            if !next_op.is_binary() || !value_at(tokens, next + 1) {
                break;
            }
            let tighter = next_op.precedence() > op.precedence()
                || (next_op.precedence() == op.precedence() && next_op.is_right_associative());
            if !tighter {
                break;
            }

            let bound = if next_op.precedence() > op.precedence() {
                op.precedence() + 1
            } else {
                op.precedence()
            };
            (rhs, next) = climb(state, tokens, rhs, next, bound)?;
        }

        let node = state.tree.alloc(NodeKind::Operator(op));
        state.tree.add(node, lhs);
        state.tree.add(node, rhs);
        declare_assignment_target(state, op, lhs);

        lhs = node;
        pos = next;
    }

    Ok((lhs, pos))
}

/// An assignment whose target is a lone identifier declares that variable
/// in the compile context.
fn declare_assignment_target(state: &mut ParseState<'_>, op: Operator, target: NodeId) {
    if op != Operator::Assign {
        return;
    }
    if let NodeKind::Identifier(name) = state.tree.kind(target) {
        let name = name.clone();
        state.context.declare_variable(&name);
    }
}
