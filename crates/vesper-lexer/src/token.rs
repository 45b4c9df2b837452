use crate::operator::Operator;
use crate::TokenError;

/// A position in source text, tracking line and column for error reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Bit mask over token kind tags.
///
/// Patterns declare their token-type signatures as one mask per window slot,
/// so a single slot can accept several kinds (`IDENTIFIER | NUMBER`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTypes(u8);

impl TokenTypes {
    pub const OPERATOR: TokenTypes = TokenTypes(1 << 0);
    pub const CONTENT: TokenTypes = TokenTypes(1 << 1);
    pub const IDENTIFIER: TokenTypes = TokenTypes(1 << 2);
    pub const NUMBER: TokenTypes = TokenTypes(1 << 3);

    /// Usable in `const` signature tables, unlike the `BitOr` impl.
    pub const fn union(self, other: TokenTypes) -> TokenTypes {
        TokenTypes(self.0 | other.0)
    }

    pub const fn contains(self, other: TokenTypes) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for TokenTypes {
    type Output = TokenTypes;

    fn bitor(self, rhs: TokenTypes) -> TokenTypes {
        self.union(rhs)
    }
}

/// The bracket flavor of a grouped region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    Parens,
    Braces,
    Brackets,
}

impl Bracket {
    pub fn open(&self) -> char {
        match self {
            Bracket::Parens => '(',
            Bracket::Braces => '{',
            Bracket::Brackets => '[',
        }
    }

    pub fn close(&self) -> char {
        match self {
            Bracket::Parens => ')',
            Bracket::Braces => '}',
            Bracket::Brackets => ']',
        }
    }
}

/// An operator token: either a resolved identity or the unresolved spelling.
///
/// The unresolved arm exists so lexing never fails on strange operator text;
/// the parser surfaces it as an error when a pattern tries to build with it.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorToken {
    Known(Operator),
    Unresolved(String),
}

impl OperatorToken {
    /// Resolve raw operator text against the spelling table.
    pub fn from_text(text: &str) -> Self {
        match Operator::resolve(text) {
            Some(op) => OperatorToken::Known(op),
            None => OperatorToken::Unresolved(text.to_string()),
        }
    }

    /// The resolved identity, if any.
    pub fn known(&self) -> Option<Operator> {
        match self {
            OperatorToken::Known(op) => Some(*op),
            OperatorToken::Unresolved(_) => None,
        }
    }

    /// Canonical text for known operators, the raw spelling otherwise.
    pub fn text(&self) -> &str {
        match self {
            OperatorToken::Known(op) => op.text(),
            OperatorToken::Unresolved(raw) => raw,
        }
    }
}

/// A bracketed region, pre-split by the scanner into ordered sections.
///
/// Each section is the raw token run of one top-level delimiter-separated
/// sub-expression; nested brackets never split the outer region. Sections
/// are not parsed until a pattern recurses into them.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentToken {
    bracket: Bracket,
    sections: Vec<Vec<Token>>,
}

impl ContentToken {
    pub fn new(bracket: Bracket, sections: Vec<Vec<Token>>) -> Self {
        Self { bracket, sections }
    }

    pub fn bracket(&self) -> Bracket {
        self.bracket
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// The raw token run of one section.
    pub fn section(&self, index: usize) -> &[Token] {
        &self.sections[index]
    }

    fn text(&self) -> String {
        let inner = self
            .sections
            .iter()
            .map(|section| {
                section
                    .iter()
                    .map(Token::text)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!("{}{}{}", self.bracket.open(), inner, self.bracket.close())
    }
}

/// Token classification for Vesper source.
///
/// Data-carrying variants embed their value directly. Identifier and number
/// values come from the scanner verbatim; operator text is canonicalized
/// through [`Operator`] identities.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Operator(OperatorToken),
    Content(ContentToken),
    Identifier(String),
    Number(f64),
}

/// A structured lexical unit: kind tag plus source position.
///
/// Tokens are immutable once constructed.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Tokens compare by kind and kind-specific data; the span is positional
/// metadata, not identity.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

/// A raw scanner handoff: the text of one lexical unit plus its position.
///
/// Delimiter splitting for grouped regions happens on the scanner side, so
/// content tokens are constructed from pre-split sections, not from areas.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenArea {
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn identifier(name: impl Into<String>, span: Span) -> Self {
        Self::new(TokenKind::Identifier(name.into()), span)
    }

    pub fn number(value: f64, span: Span) -> Self {
        Self::new(TokenKind::Number(value), span)
    }

    /// An operator token from a resolved identity.
    pub fn operator(op: Operator, span: Span) -> Self {
        Self::new(TokenKind::Operator(OperatorToken::Known(op)), span)
    }

    /// An operator token from raw text, which may be unresolved.
    pub fn operator_text(text: &str, span: Span) -> Self {
        Self::new(TokenKind::Operator(OperatorToken::from_text(text)), span)
    }

    pub fn content(bracket: Bracket, sections: Vec<Vec<Token>>, span: Span) -> Self {
        Self::new(TokenKind::Content(ContentToken::new(bracket, sections)), span)
    }

    /// Classify a raw token area into the correctly-tagged token.
    ///
    /// Digit-leading text must be a number; known spellings and purely
    /// symbolic text become operator tokens (the latter unresolved);
    /// everything else is an identifier.
    pub fn from_area(area: TokenArea) -> Result<Token, TokenError> {
        let TokenArea { text, span } = area;

        let Some(first) = text.chars().next() else {
            return Err(TokenError::EmptyArea { span });
        };

        if first.is_ascii_digit() {
            return match text.parse::<f64>() {
                Ok(value) => Ok(Token::number(value, span)),
                Err(_) => Err(TokenError::MalformedNumber { text, span }),
            };
        }

        if Operator::resolve(&text).is_some()
            || text.chars().all(|c| !c.is_alphanumeric() && c != '_')
        {
            return Ok(Token::operator_text(&text, span));
        }

        Ok(Token::identifier(text, span))
    }

    /// The kind tag as a type mask, for signature matching.
    pub fn types(&self) -> TokenTypes {
        match &self.kind {
            TokenKind::Operator(_) => TokenTypes::OPERATOR,
            TokenKind::Content(_) => TokenTypes::CONTENT,
            TokenKind::Identifier(_) => TokenTypes::IDENTIFIER,
            TokenKind::Number(_) => TokenTypes::NUMBER,
        }
    }

    /// The canonical rendering of this token.
    pub fn text(&self) -> String {
        match &self.kind {
            TokenKind::Operator(op) => op.text().to_string(),
            TokenKind::Content(content) => content.text(),
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Number(value) => value.to_string(),
        }
    }
}
