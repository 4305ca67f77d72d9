//! Parsing Go source with tree-sitter.

use crate::ts::errors::TreeSitterError;
use ast_grep_language::{LanguageExt, SupportLang};
use tree_sitter::{Language, Parser, Tree};

/// The Go grammar bundled with ast-grep-language.
pub fn go_language() -> Language {
    SupportLang::Go.get_ts_language()
}

/// A tree-sitter parser with the Go grammar loaded.
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> Result<Self, TreeSitterError> {
        let mut parser = Parser::new();
        parser
            .set_language(&go_language())
            .map_err(|_| TreeSitterError::LanguageSet)?;

        Ok(Self { parser })
    }

    pub fn parse(&mut self, source: &str) -> Result<Tree, TreeSitterError> {
        self.parser
            .parse(source, None)
            .ok_or(TreeSitterError::ParseFailed)
    }

    /// Parse and keep the source next to the tree for text lookups.
    pub fn parse_with_source<'a>(
        &mut self,
        source: &'a str,
    ) -> Result<ParsedSource<'a>, TreeSitterError> {
        let tree = self.parse(source)?;
        Ok(ParsedSource { source, tree })
    }
}

/// Go source together with its syntax tree.
pub struct ParsedSource<'a> {
    pub source: &'a str,
    pub tree: Tree,
}

impl<'a> ParsedSource<'a> {
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// True if the tree contains any ERROR or MISSING node.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Every ERROR and MISSING node, in document order.
    pub fn error_nodes(&self) -> Vec<ErrorNode> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &mut errors);
        errors
    }

    /// Fail with the location of the first syntax error, if any.
    pub fn check_syntax(&self) -> Result<(), TreeSitterError> {
        let errors = self.error_nodes();
        match errors.first() {
            None => Ok(()),
            Some(first) => Err(first.to_error(errors.len())),
        }
    }

    /// Source text covered by `node`.
    pub fn node_text(&self, node: tree_sitter::Node<'_>) -> &'a str {
        &self.source[node.byte_range()]
    }
}

/// Position of an ERROR or MISSING node.
#[derive(Debug, Clone)]
pub struct ErrorNode {
    pub byte_start: usize,
    pub byte_end: usize,
    pub start_point: tree_sitter::Point,
}

impl ErrorNode {
    /// Convert to a [`TreeSitterError::SyntaxError`] with 1-based line/column.
    pub fn to_error(&self, count: usize) -> TreeSitterError {
        TreeSitterError::SyntaxError {
            line: self.start_point.row + 1,
            column: self.start_point.column + 1,
            byte_start: self.byte_start,
            byte_end: self.byte_end,
            count,
        }
    }
}

fn collect_error_nodes(node: tree_sitter::Node<'_>, errors: &mut Vec<ErrorNode>) {
    if node.is_error() || node.is_missing() {
        errors.push(ErrorNode {
            byte_start: node.start_byte(),
            byte_end: node.end_byte(),
            start_point: node.start_position(),
        });
    }

    if !node.has_error() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, errors);
    }
}
