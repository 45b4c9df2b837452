//! The parser engine.
//!
//! Given a token sequence, the engine repeatedly selects the applicable
//! pattern at the current scan position (type-signature filter, then
//! `passes`, then strictly-highest `priority` with first-registered
//! winning ties), invokes its build, and advances past the consumed
//! tokens until the sequence is exhausted. Patterns recurse into nested
//! sections through [`ParseState::parse_section`], which is the only
//! place nesting depth is tracked.

use vesper_lexer::{Token, TokenTypes};

use crate::context::Context;
use crate::pattern::{Pattern, PatternRegistry};
use crate::tree::{NodeId, NodeKind, SyntaxTree};
use crate::ParseError;

/// Default bound on recursive section nesting. Source nesting depth is the
/// only unbounded resource a parse consumes; past this the parse fails
/// instead of exhausting the call stack.
pub const MAX_SECTION_DEPTH: usize = 256;

/// Parse one top-level unit, yielding its root nodes in order.
///
/// The engine keeps no state across units: independent units may be parsed
/// on separate threads as long as each gets its own tree and context.
pub fn parse_unit(
    registry: &PatternRegistry,
    context: &mut Context,
    tree: &mut SyntaxTree,
    tokens: &[Token],
) -> Result<Vec<NodeId>, ParseError> {
    ParseState::new(registry, tree, context).parse(tokens)
}

/// Everything a pattern build may touch: the node arena, the compile
/// context, and re-entry into the engine for nested token runs.
pub struct ParseState<'a> {
    registry: &'a PatternRegistry,
    pub tree: &'a mut SyntaxTree,
    pub context: &'a mut Context,
    depth: usize,
    max_depth: usize,
}

impl<'a> ParseState<'a> {
    pub fn new(
        registry: &'a PatternRegistry,
        tree: &'a mut SyntaxTree,
        context: &'a mut Context,
    ) -> Self {
        Self::with_max_depth(registry, tree, context, MAX_SECTION_DEPTH)
    }

    pub fn with_max_depth(
        registry: &'a PatternRegistry,
        tree: &'a mut SyntaxTree,
        context: &'a mut Context,
        max_depth: usize,
    ) -> Self {
        Self {
            registry,
            tree,
            context,
            depth: 0,
            max_depth,
        }
    }

    /// Parse a token sequence into an ordered run of sibling nodes.
    ///
    /// An empty sequence yields an empty run. A position where tokens
    /// remain but no pattern passes fails with the offending token.
    pub fn parse(&mut self, tokens: &[Token]) -> Result<Vec<NodeId>, ParseError> {
        let mut nodes = Vec::new();
        let mut pos = 0;

        while pos < tokens.len() {
            let window = &tokens[pos..];
            let Some(pattern) = select(self.registry, window) else {
                let token = &tokens[pos];
                return Err(ParseError::NoMatchingPattern {
                    text: token.text(),
                    span: token.span,
                });
            };

            let built = pattern.build(self, window)?;
            nodes.push(built.node);
            // A build always makes progress, even if it claims otherwise.
            pos += built.consumed.max(1);
        }

        Ok(nodes)
    }

    /// Recursive entry point for a nested token run (a content-token
    /// section, a sub-expression).
    ///
    /// Yields the lone parsed node when the run has exactly one root;
    /// otherwise the roots are wrapped in a `Scope` node so each section
    /// contributes exactly one child. An empty run yields an empty scope.
    pub fn parse_section(&mut self, tokens: &[Token]) -> Result<NodeId, ParseError> {
        if self.depth >= self.max_depth {
            let span = tokens.first().map(|token| token.span).unwrap_or_default();
            return Err(ParseError::DepthLimitExceeded {
                limit: self.max_depth,
                span,
            });
        }

        self.depth += 1;
        let result = self.parse(tokens);
        self.depth -= 1;

        let mut nodes = result?;
        if nodes.len() == 1 {
            return Ok(nodes.remove(0));
        }

        let scope = self.tree.alloc(NodeKind::Scope);
        for node in nodes {
            self.tree.add(scope, node);
        }
        Ok(scope)
    }

    /// Parse a single token in isolation, e.g. a leaf operand or a nested
    /// content token.
    pub fn parse_token(&mut self, token: &Token) -> Result<NodeId, ParseError> {
        self.parse_section(std::slice::from_ref(token))
    }
}

/// Pick the pattern to commit to at the head of `window`, if any.
fn select<'r>(registry: &'r PatternRegistry, window: &[Token]) -> Option<&'r dyn Pattern> {
    let mut best: Option<(&dyn Pattern, i32)> = None;

    for pattern in registry.iter() {
        if !matches_signature(pattern.signature(), window) {
            continue;
        }
        if !pattern.passes(window) {
            continue;
        }

        let priority = pattern.priority(window);
        // Strictly higher replaces; the first registered keeps ties.
        if best.map_or(true, |(_, current)| priority > current) {
            best = Some((pattern, priority));
        }
    }

    best.map(|(pattern, _)| pattern)
}

fn matches_signature(signature: &[TokenTypes], window: &[Token]) -> bool {
    !signature.is_empty()
        && signature.len() <= window.len()
        && signature
            .iter()
            .zip(window)
            .all(|(mask, token)| mask.contains(token.types()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Built;
    use crate::patterns::default_registry;
    use pretty_assertions::assert_eq;
    use vesper_lexer::{Bracket, Operator, Span};

    fn ident(name: &str) -> Token {
        Token::identifier(name, Span::default())
    }

    fn num(value: f64) -> Token {
        Token::number(value, Span::default())
    }

    fn op(operator: Operator) -> Token {
        Token::operator(operator, Span::default())
    }

    fn content(sections: Vec<Vec<Token>>) -> Token {
        Token::content(Bracket::Parens, sections, Span::default())
    }

    /// Render a subtree as a compact string, e.g. `+(x *(y z))`.
    fn shape(tree: &SyntaxTree, id: NodeId) -> String {
        let label = match tree.kind(id) {
            NodeKind::Scope => "scope".to_string(),
            NodeKind::Content(_) => "content".to_string(),
            NodeKind::Identifier(name) => name.clone(),
            NodeKind::Number(value) => value.to_string(),
            NodeKind::Operator(operator) => operator.text().to_string(),
            NodeKind::Increment => "++".to_string(),
            NodeKind::Decrement => "--".to_string(),
        };

        let children: Vec<String> = tree
            .children(id)
            .map(|child| shape(tree, child))
            .collect();
        if children.is_empty() {
            label
        } else {
            format!("{}({})", label, children.join(" "))
        }
    }

    fn parse_shapes(tokens: &[Token]) -> Result<Vec<String>, ParseError> {
        let registry = default_registry();
        let mut tree = SyntaxTree::new();
        let mut context = Context::new();
        let nodes = parse_unit(&registry, &mut context, &mut tree, tokens)?;
        Ok(nodes.iter().map(|id| shape(&tree, *id)).collect())
    }

    #[test]
    fn test_empty_input_yields_empty_run() {
        assert_eq!(parse_shapes(&[]).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_single_identifier() {
        assert_eq!(parse_shapes(&[ident("x")]).unwrap(), vec!["x"]);
    }

    #[test]
    fn test_sibling_runs_stay_ordered() {
        let shapes = parse_shapes(&[ident("a"), ident("b"), num(3.0)]).unwrap();
        assert_eq!(shapes, vec!["a", "b", "3"]);
    }

    #[test]
    fn test_no_matching_pattern_reports_the_token() {
        let stray = Token::operator(Operator::Add, Span::new(4, 5, 2, 5));
        let err = parse_shapes(&[stray]).unwrap_err();
        assert_eq!(
            err,
            ParseError::NoMatchingPattern {
                text: "+".to_string(),
                span: Span::new(4, 5, 2, 5),
            }
        );
    }

    #[test]
    fn test_unresolved_operator_fails_the_build() {
        let bad = Token::operator_text("@@", Span::new(1, 3, 1, 2));
        let err = parse_shapes(&[ident("a"), bad, ident("b")]).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownOperator {
                text: "@@".to_string(),
                span: Span::new(1, 3, 1, 2),
            }
        );
    }

    #[test]
    fn test_content_sections_parse_in_order() {
        // [ContentToken{sections: [[x], [y]]}] parses to one content node
        // with two single-identifier children, left to right.
        let token = content(vec![vec![ident("x")], vec![ident("y")]]);
        let shapes = parse_shapes(&[token]).unwrap();
        assert_eq!(shapes, vec!["content(x y)"]);
    }

    #[test]
    fn test_section_with_expression_parses_alone() {
        let token = content(vec![
            vec![ident("a")],
            vec![ident("b"), op(Operator::Add), ident("c")],
        ]);
        let shapes = parse_shapes(&[token]).unwrap();
        assert_eq!(shapes, vec!["content(a +(b c))"]);
    }

    #[test]
    fn test_multi_root_section_is_wrapped_in_scope() {
        let token = content(vec![vec![ident("a"), ident("b")]]);
        let shapes = parse_shapes(&[token]).unwrap();
        assert_eq!(shapes, vec!["content(scope(a b))"]);
    }

    #[test]
    fn test_empty_section_yields_empty_scope() {
        let token = content(vec![vec![]]);
        let shapes = parse_shapes(&[token]).unwrap();
        assert_eq!(shapes, vec!["content(scope)"]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let tokens = vec![
            ident("a"),
            op(Operator::Add),
            ident("b"),
            op(Operator::Multiply),
            content(vec![vec![ident("c")], vec![ident("d")]]),
        ];
        let first = parse_shapes(&tokens).unwrap();
        let second = parse_shapes(&tokens).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_depth_limit_fails_cleanly() {
        // Nest content tokens deeper than the limit allows.
        let mut token = ident("x");
        for _ in 0..5 {
            token = content(vec![vec![token]]);
        }

        let registry = default_registry();
        let mut tree = SyntaxTree::new();
        let mut context = Context::new();
        let mut state = ParseState::with_max_depth(&registry, &mut tree, &mut context, 3);
        let err = state.parse(std::slice::from_ref(&token)).unwrap_err();
        assert!(matches!(
            err,
            ParseError::DepthLimitExceeded { limit: 3, .. }
        ));
    }

    #[test]
    fn test_depth_within_limit_succeeds() {
        let mut token = ident("x");
        for _ in 0..5 {
            token = content(vec![vec![token]]);
        }

        let registry = default_registry();
        let mut tree = SyntaxTree::new();
        let mut context = Context::new();
        let mut state = ParseState::with_max_depth(&registry, &mut tree, &mut context, 16);
        let nodes = state.parse(std::slice::from_ref(&token)).unwrap();
        assert_eq!(nodes.len(), 1);
    }

    // -------------------------------------------------------------------
    // Selection order
    // -------------------------------------------------------------------

    /// Test pattern matching one identifier at a fixed priority, building
    /// a marker leaf so tests can observe which pattern won.
    struct Marker {
        label: &'static str,
        priority: i32,
    }

    impl Pattern for Marker {
        fn signature(&self) -> &[TokenTypes] {
            const SIGNATURE: [TokenTypes; 1] = [TokenTypes::IDENTIFIER];
            &SIGNATURE
        }

        fn priority(&self, _tokens: &[Token]) -> i32 {
            self.priority
        }

        fn passes(&self, _tokens: &[Token]) -> bool {
            true
        }

        fn build(&self, state: &mut ParseState<'_>, _tokens: &[Token]) -> Result<Built, ParseError> {
            let node = state.tree.alloc(NodeKind::Identifier(self.label.to_string()));
            Ok(Built { node, consumed: 1 })
        }
    }

    fn parse_marker(registry: &PatternRegistry) -> String {
        let mut tree = SyntaxTree::new();
        let mut context = Context::new();
        let nodes = parse_unit(registry, &mut context, &mut tree, &[ident("x")]).unwrap();
        assert_eq!(nodes.len(), 1);
        shape(&tree, nodes[0])
    }

    #[test]
    fn test_equal_priority_tie_goes_to_first_registered() {
        let mut registry = PatternRegistry::new();
        registry.register(Marker { label: "first", priority: 5 });
        registry.register(Marker { label: "second", priority: 5 });
        assert_eq!(parse_marker(&registry), "first");

        // Swap the registration order; the other one must win now.
        let mut registry = PatternRegistry::new();
        registry.register(Marker { label: "second", priority: 5 });
        registry.register(Marker { label: "first", priority: 5 });
        assert_eq!(parse_marker(&registry), "second");
    }

    #[test]
    fn test_strictly_higher_priority_wins_regardless_of_order() {
        let mut registry = PatternRegistry::new();
        registry.register(Marker { label: "low", priority: 1 });
        registry.register(Marker { label: "high", priority: 9 });
        assert_eq!(parse_marker(&registry), "high");
    }

    #[test]
    fn test_failing_passes_excludes_a_pattern() {
        struct NeverPasses;

        impl Pattern for NeverPasses {
            fn signature(&self) -> &[TokenTypes] {
                const SIGNATURE: [TokenTypes; 1] = [TokenTypes::IDENTIFIER];
                &SIGNATURE
            }

            fn priority(&self, _tokens: &[Token]) -> i32 {
                100
            }

            fn passes(&self, _tokens: &[Token]) -> bool {
                false
            }

            fn build(&self, _state: &mut ParseState<'_>, tokens: &[Token]) -> Result<Built, ParseError> {
                Err(ParseError::Build {
                    message: "must never be selected".to_string(),
                    span: tokens[0].span,
                })
            }
        }

        let mut registry = PatternRegistry::new();
        registry.register(NeverPasses);
        registry.register(Marker { label: "fallback", priority: 0 });
        assert_eq!(parse_marker(&registry), "fallback");
    }

    #[test]
    fn test_empty_registry_never_matches() {
        let registry = PatternRegistry::new();
        let mut tree = SyntaxTree::new();
        let mut context = Context::new();
        let err = parse_unit(&registry, &mut context, &mut tree, &[ident("x")]).unwrap_err();
        assert!(matches!(err, ParseError::NoMatchingPattern { .. }));
    }

    // -------------------------------------------------------------------
    // End to end
    // -------------------------------------------------------------------

    #[test]
    fn test_end_to_end_nested_unit() {
        // x = (a + b, c)
        let tokens = vec![
            ident("x"),
            op(Operator::Assign),
            content(vec![
                vec![ident("a"), op(Operator::Add), ident("b")],
                vec![ident("c")],
            ]),
        ];

        let registry = default_registry();
        let mut tree = SyntaxTree::new();
        let mut context = Context::new();
        let nodes = parse_unit(&registry, &mut context, &mut tree, &tokens).unwrap();

        assert_eq!(nodes.len(), 1);
        assert_eq!(shape(&tree, nodes[0]), "=(x content(+(a b) c))");
        assert!(context.is_variable_declared("x"));

        // Every node is reachable exactly once from the root.
        let root = nodes[0];
        assert_eq!(tree.parent(root), None);
        for child in tree.children(root).collect::<Vec<_>>() {
            assert_eq!(tree.parent(child), Some(root));
        }
    }

    #[test]
    fn test_whole_window_is_consumed() {
        // Parsing succeeds with no dangling tokens: a trailing token that
        // no pattern accepts is an error, not silently dropped.
        let tokens = vec![ident("a"), op(Operator::Add), ident("b"), op(Operator::Add)];
        let err = parse_shapes(&tokens).unwrap_err();
        assert!(matches!(err, ParseError::NoMatchingPattern { ref text, .. } if text == "+"));
    }

    #[test]
    fn test_operator_content_identifier_mix() {
        let tokens = vec![
            ident("total"),
            op(Operator::Assign),
            ident("base"),
            op(Operator::Add),
            content(vec![vec![num(1.0), op(Operator::Multiply), num(2.0)]]),
        ];
        let shapes = parse_shapes(&tokens).unwrap();
        assert_eq!(shapes, vec!["=(total +(base content(*(1 2))))"]);
    }

    #[test]
    fn test_token_kind_is_preserved_in_leaves() {
        let registry = default_registry();
        let mut tree = SyntaxTree::new();
        let mut context = Context::new();
        let nodes = parse_unit(&registry, &mut context, &mut tree, &[num(42.0)]).unwrap();
        assert_eq!(tree.kind(nodes[0]), &NodeKind::Number(42.0));
    }

    #[test]
    fn test_tokens_remain_unchanged_by_parsing() {
        let tokens = vec![ident("a"), op(Operator::Add), ident("b")];
        let before = tokens.clone();
        parse_shapes(&tokens).unwrap();
        assert_eq!(tokens, before);
    }
}
