//! Vesper Token Model
//!
//! The structural representation of Vesper lexical units: operator tokens
//! resolved against a static spelling table, identifiers and number
//! literals, and content tokens for bracketed regions pre-split into
//! delimiter-separated sections by the scanner.
//!
//! Character-level scanning lives outside this crate; it hands over raw
//! [`TokenArea`] records which [`Token::from_area`] classifies into
//! correctly-tagged tokens. Tokens never mutate after construction.

pub mod operator;
pub mod token;

pub use operator::Operator;
pub use token::{Bracket, ContentToken, OperatorToken, Span, Token, TokenArea, TokenKind, TokenTypes};

/// Error classifying a raw token area, with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TokenError {
    #[error("empty token area at {span}")]
    EmptyArea { span: Span },

    #[error("malformed number literal '{text}' at {span}")]
    MalformedNumber { text: String, span: Span },
}
