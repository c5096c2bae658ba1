//! TypeScript syntax removal on a tree-sitter syntax tree
//!
//! The source is parsed with the TypeScript (or TSX) grammar and every
//! TypeScript-only node is cut out by byte range: annotations, type
//! declarations, type arguments and parameters, `as`/`satisfies` casts,
//! non-null assertions and type-only imports. Constructs with runtime meaning
//! (enums, namespaces, parameter properties, decorators) are refused. The
//! result is re-parsed as JavaScript and rejected unless it parses cleanly.

use crate::error::TransformError;
use std::ops::Range;
use tree_sitter::{Language, Node, Parser, Tree};

/// Nodes that cannot be removed without changing behaviour
const UNSUPPORTED: &[&str] = &[
    "enum_declaration",
    "internal_module",
    "module",
    "ambient_declaration",
    "abstract_class_declaration",
    "abstract_method_signature",
    "method_signature",
    "function_signature",
    "index_signature",
    "accessibility_modifier",
    "override_modifier",
    "decorator",
    "import_alias",
    "import_require_clause",
];

/// Nodes deleted outright, wherever they appear
const TYPE_ONLY: &[&str] = &[
    "type_annotation",
    "opting_type_annotation",
    "omitting_type_annotation",
    "adding_type_annotation",
    "asserts_annotation",
    "type_predicate_annotation",
    "type_arguments",
    "type_parameters",
    "implements_clause",
];

/// Grammar used to read a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `.ts`
    TypeScript,
    /// `.tsx`
    Tsx,
}

impl Dialect {
    fn language(self) -> Language {
        match self {
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Convert TypeScript source to JavaScript, or explain why not
pub fn strip_types(source: &str, dialect: Dialect) -> Result<String, TransformError> {
    let tree = parse(source, dialect.language())?;
    if let Some(node) = first_error(tree.root_node()) {
        return Err(TransformError::Parse {
            line: line_of(node),
        });
    }

    let mut stripper = Stripper {
        source,
        edits: Vec::new(),
    };
    stripper.visit(tree.root_node(), "")?;
    let output = apply(source, stripper.edits);

    let check = parse(&output, tree_sitter_javascript::LANGUAGE.into())?;
    if let Some(node) = first_error(check.root_node()) {
        return Err(TransformError::InvalidOutput {
            line: line_of(node),
        });
    }
    Ok(output)
}

/// `./x.tsx` → `./x.jsx`, `@/lib/y.ts` → `@/lib/y.js`; packages and `.d.ts` stay
pub fn javascript_specifier(specifier: &str) -> Option<String> {
    let local = ["./", "../", "@/"]
        .iter()
        .any(|prefix| specifier.starts_with(prefix));
    if !local || specifier.ends_with(".d.ts") {
        return None;
    }
    if let Some(stem) = specifier.strip_suffix(".tsx") {
        return Some(format!("{}.jsx", stem));
    }
    specifier
        .strip_suffix(".ts")
        .map(|stem| format!("{}.js", stem))
}

fn parse(source: &str, language: Language) -> Result<Tree, TransformError> {
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| TransformError::Grammar(e.to_string()))?;
    parser
        .parse(source, None)
        .ok_or(TransformError::Parse { line: 1 })
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    children(node).into_iter().find_map(first_error)
}

fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

fn children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// `import type ...`, `export type { ... }` and `type X` specifiers
fn has_type_keyword(node: Node) -> bool {
    children(node)
        .iter()
        .any(|child| !child.is_named() && child.kind() == "type")
}

struct Edit {
    range: Range<usize>,
    text: String,
}

struct Stripper<'s> {
    source: &'s str,
    edits: Vec<Edit>,
}

impl Stripper<'_> {
    fn visit(&mut self, node: Node, parent: &str) -> Result<(), TransformError> {
        let kind = node.kind();

        if TYPE_ONLY.contains(&kind) {
            self.delete(node.byte_range());
            return Ok(());
        }
        if UNSUPPORTED.contains(&kind) {
            return Err(self.residual(node));
        }

        match kind {
            "interface_declaration" | "type_alias_declaration" => {
                self.delete_statement(node);
                return Ok(());
            }
            "import_statement" | "export_statement" => {
                if self.strip_module_statement(node)? {
                    return Ok(());
                }
            }
            "as_expression" | "satisfies_expression" => {
                if let Some(inner) = children(node).first() {
                    self.delete(inner.end_byte()..node.end_byte());
                    return self.visit(*inner, kind);
                }
            }
            "call_expression" => self.rewrite_dynamic_import(node),
            _ => {}
        }

        if !node.is_named() {
            return self.token(node, parent);
        }

        for child in children(node) {
            self.visit(child, kind)?;
        }
        Ok(())
    }

    /// Anonymous tokens that only mean something to the type checker
    fn token(&mut self, node: Node, parent: &str) -> Result<(), TransformError> {
        match (parent, node.kind()) {
            ("non_null_expression", "!")
            | ("variable_declarator", "!")
            | ("public_field_definition", "!" | "?")
            | ("optional_parameter", "?")
            | ("method_definition", "?") => self.delete(node.byte_range()),
            (_, "declare" | "abstract" | "readonly") | ("export_statement", "=") => {
                return Err(self.residual(node));
            }
            _ => {}
        }
        Ok(())
    }

    /// Returns true when the whole statement was removed
    fn strip_module_statement(&mut self, node: Node) -> Result<bool, TransformError> {
        if has_type_keyword(node) {
            self.delete_statement(node);
            return Ok(true);
        }

        let parts = named_children(node);
        if parts
            .iter()
            .any(|part| matches!(part.kind(), "interface_declaration" | "type_alias_declaration"))
        {
            self.delete_statement(node);
            return Ok(true);
        }

        if let Some(source) = node.child_by_field_name("source") {
            self.rewrite_specifier(source);
        }

        // `import a, { type B }` keeps the default binding
        if let Some(clause) = parts.iter().find(|part| part.kind() == "import_clause") {
            let bindings = named_children(*clause);
            if let Some(idx) = bindings.iter().position(|b| b.kind() == "named_imports") {
                let list = bindings[idx];
                return Ok(self.strip_specifiers(node, list, "import_specifier", |list| {
                    (idx > 0).then(|| bindings[idx - 1].end_byte()..list.end_byte())
                }));
            }
        }

        if let Some(clause) = parts.iter().find(|part| part.kind() == "export_clause") {
            return Ok(self.strip_specifiers(node, *clause, "export_specifier", |_| None));
        }

        Ok(false)
    }

    /// Drop type-only specifiers from `list`; returns true when `statement` went with them
    fn strip_specifiers(
        &mut self,
        statement: Node,
        list: Node,
        kind: &str,
        remainder: impl FnOnce(Node) -> Option<Range<usize>>,
    ) -> bool {
        let items: Vec<Node> = named_children(list)
            .into_iter()
            .filter(|item| item.kind() == kind)
            .collect();
        let remove: Vec<bool> = items.iter().map(|item| has_type_keyword(*item)).collect();

        if !remove.contains(&true) {
            return false;
        }

        if remove.iter().all(|r| *r) {
            match remainder(list) {
                Some(range) => self.delete(range),
                None => {
                    self.delete_statement(statement);
                    return true;
                }
            }
            return false;
        }

        for (i, item) in items.iter().enumerate() {
            if !remove[i] {
                continue;
            }
            match items.get(i + 1) {
                Some(next) => self.delete(item.start_byte()..next.start_byte()),
                None => {
                    // last item: take the comma before it instead
                    if let Some(kept) = (0..i).rev().find(|&k| !remove[k]) {
                        self.delete(items[kept].end_byte()..item.end_byte());
                    }
                }
            }
        }
        false
    }

    fn rewrite_dynamic_import(&mut self, call: Node) {
        let is_import = call
            .child_by_field_name("function")
            .is_some_and(|f| f.kind() == "import");
        if !is_import {
            return;
        }
        let argument = call
            .child_by_field_name("arguments")
            .and_then(|args| named_children(args).into_iter().next());
        if let Some(argument) = argument.filter(|a| a.kind() == "string") {
            self.rewrite_specifier(argument);
        }
    }

    fn rewrite_specifier(&mut self, string: Node) {
        let Some(fragment) = named_children(string)
            .into_iter()
            .find(|part| part.kind() == "string_fragment")
        else {
            return;
        };
        if let Some(rewritten) = javascript_specifier(&self.source[fragment.byte_range()]) {
            self.edits.push(Edit {
                range: fragment.byte_range(),
                text: rewritten,
            });
        }
    }

    fn delete(&mut self, range: Range<usize>) {
        self.edits.push(Edit {
            range,
            text: String::new(),
        });
    }

    /// Delete a statement together with its line when nothing else is on it
    fn delete_statement(&mut self, node: Node) {
        let range = whole_lines(self.source, node.byte_range());
        self.delete(range);
    }

    fn residual(&self, node: Node) -> TransformError {
        let text = self.source[node.byte_range()]
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        TransformError::Residual {
            line: line_of(node),
            text,
        }
    }
}

/// Widen `range` to full lines; a blank line after it goes too when one precedes it
fn whole_lines(source: &str, range: Range<usize>) -> Range<usize> {
    let line_start = source[..range.start].rfind('\n').map_or(0, |i| i + 1);
    if !source[line_start..range.start].trim().is_empty() {
        return range;
    }
    let line_end = source[range.end..]
        .find('\n')
        .map_or(source.len(), |i| range.end + i + 1);
    if !source[range.end..line_end].trim().is_empty() {
        return range;
    }

    let mut end = line_end;
    let after_blank = line_start == 0 || source[..line_start].ends_with("\n\n");
    if after_blank {
        if let Some(i) = source[end..].find('\n') {
            if source[end..end + i].trim().is_empty() {
                end += i + 1;
            }
        }
    }
    line_start..end
}

fn apply(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|edit| (edit.range.start, std::cmp::Reverse(edit.range.end)));

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in edits {
        if edit.range.start < cursor {
            // nested in an earlier deletion
            cursor = cursor.max(edit.range.end);
            continue;
        }
        out.push_str(&source[cursor..edit.range.start]);
        out.push_str(&edit.text);
        cursor = edit.range.end;
    }
    out.push_str(&source[cursor..]);
    out
}
