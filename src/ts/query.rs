//! Compiled tree-sitter queries over Go source.

use crate::ts::errors::TreeSitterError;
use crate::ts::parser::{go_language, ParsedSource};
use std::collections::HashMap;
use tree_sitter::{Node, Query, QueryCursor, StreamingIterator};

/// One query match, detached from the tree.
#[derive(Debug, Clone)]
pub struct QueryMatch {
    /// Smallest range covering every capture
    pub byte_start: usize,
    pub byte_end: usize,
    pub captures: HashMap<String, CapturedNode>,
}

#[derive(Debug, Clone)]
pub struct CapturedNode {
    pub byte_start: usize,
    pub byte_end: usize,
    pub text: String,
    pub kind: String,
}

/// A compiled query plus its capture names.
pub struct QueryEngine {
    query: Query,
    capture_names: Vec<String>,
}

impl QueryEngine {
    /// Compile `query_str` against the Go grammar.
    ///
    /// See [`queries`] for the patterns gobump uses.
    pub fn new(query_str: &str) -> Result<Self, TreeSitterError> {
        let query = Query::new(&go_language(), query_str).map_err(|e| {
            TreeSitterError::InvalidQuery {
                message: e.to_string(),
            }
        })?;

        let capture_names = query.capture_names().iter().map(|s| s.to_string()).collect();

        Ok(Self {
            query,
            capture_names,
        })
    }

    /// All matches in document order, with capture text copied out.
    pub fn find_all<'a>(&self, parsed: &'a ParsedSource<'a>) -> Vec<QueryMatch> {
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, parsed.root_node(), parsed.source.as_bytes());

        let mut results = Vec::new();

        while let Some(m) = matches.next() {
            let mut captures = HashMap::new();
            let mut start = usize::MAX;
            let mut end = 0usize;

            for capture in m.captures {
                let node = capture.node;
                let name = &self.capture_names[capture.index as usize];

                start = start.min(node.start_byte());
                end = end.max(node.end_byte());

                captures.insert(
                    name.clone(),
                    CapturedNode {
                        byte_start: node.start_byte(),
                        byte_end: node.end_byte(),
                        text: parsed.node_text(node).to_string(),
                        kind: node.kind().to_string(),
                    },
                );
            }

            if start != usize::MAX {
                results.push(QueryMatch {
                    byte_start: start,
                    byte_end: end,
                    captures,
                });
            }
        }

        results
    }

    /// The first match of the query in document order.
    pub fn find_first<'a>(
        &self,
        parsed: &'a ParsedSource<'a>,
    ) -> Result<QueryMatch, TreeSitterError> {
        self.find_all(parsed)
            .into_iter()
            .next()
            .ok_or(TreeSitterError::NoMatch)
    }

    /// Return the raw nodes bound to `capture`, in document order.
    ///
    /// Unlike [`find_all`](Self::find_all) this keeps the nodes themselves so
    /// callers can keep walking the tree from them.
    pub fn captured_nodes<'tree>(
        &self,
        root: Node<'tree>,
        source: &[u8],
        capture: &str,
    ) -> Vec<Node<'tree>> {
        let Some(index) = self.capture_names.iter().position(|name| name == capture) else {
            return Vec::new();
        };

        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, root, source);
        let mut nodes = Vec::new();

        while let Some(m) = matches.next() {
            nodes.extend(
                m.captures
                    .iter()
                    .filter(|c| c.index as usize == index)
                    .map(|c| c.node),
            );
        }

        nodes
    }
}

/// Tree-sitter queries for the Go constructs gobump cares about.
pub mod queries {
    /// The `package` clause of a file.
    pub const PACKAGE_CLAUSE: &str = r#"(package_clause
        (package_identifier) @name
    ) @package"#;

    /// Every spec of every `const` declaration at file scope.
    ///
    /// Consts declared inside function bodies are not direct children of
    /// `source_file` and never match.
    pub const TOP_LEVEL_CONST_SPECS: &str = r#"(source_file
        (const_declaration
            (const_spec) @spec))"#;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ts::parser::GoParser;

    #[test]
    fn find_package_clause() {
        let mut parser = GoParser::new().unwrap();
        let source = "// Package demo does things.\npackage demo\n\nfunc Run() {}\n";
        let parsed = parser.parse_with_source(source).unwrap();
        let engine = QueryEngine::new(queries::PACKAGE_CLAUSE).unwrap();

        let m = engine.find_first(&parsed).unwrap();
        assert_eq!(m.captures["name"].text, "demo");
        assert_eq!(m.captures["name"].kind, "package_identifier");
    }

    #[test]
    fn top_level_specs_skip_function_scope() {
        let mut parser = GoParser::new().unwrap();
        let source = r#"package demo

const A = 1

const (
	B = 2
	C
)

func f() {
	const Local = "ignored"
	_ = Local
}
"#;
        let parsed = parser.parse_with_source(source).unwrap();
        let engine = QueryEngine::new(queries::TOP_LEVEL_CONST_SPECS).unwrap();

        let specs = engine.captured_nodes(parsed.root_node(), source.as_bytes(), "spec");
        let texts: Vec<_> = specs.iter().map(|n| parsed.node_text(*n)).collect();
        assert_eq!(texts, vec!["A = 1", "B = 2", "C"]);
    }

    #[test]
    fn unknown_capture_yields_nothing() {
        let mut parser = GoParser::new().unwrap();
        let source = "package demo\n\nconst A = 1\n";
        let parsed = parser.parse_with_source(source).unwrap();
        let engine = QueryEngine::new(queries::TOP_LEVEL_CONST_SPECS).unwrap();

        assert!(engine
            .captured_nodes(parsed.root_node(), source.as_bytes(), "nope")
            .is_empty());
    }

    #[test]
    fn invalid_query_is_rejected() {
        let result = QueryEngine::new("(not_a_go_node) @x");
        assert!(matches!(result, Err(TreeSitterError::InvalidQuery { .. })));
    }

    #[test]
    fn no_match_error() {
        let mut parser = GoParser::new().unwrap();
        let source = "func main() {}";
        let parsed = parser.parse_with_source(source).unwrap();
        let engine = QueryEngine::new(queries::PACKAGE_CLAUSE).unwrap();

        let result = engine.find_first(&parsed);
        assert!(matches!(result, Err(TreeSitterError::NoMatch)));
    }
}
