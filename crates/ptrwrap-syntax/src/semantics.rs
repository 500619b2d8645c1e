//! Per-translation-unit type and macro knowledge.
//!
//! Tree-sitter only provides syntax. This module recovers what the rewriter
//! needs from semantic analysis:
//!
//! - declared types of declarators, following C's inside-out declarator rules
//!   (`int (*f)()` is a pointer to a function, `int* f()` a function);
//! - `typedef` and `using` aliases declared in the unit, so `F* p` can be
//!   recognised as a pointer to a function-pointer alias;
//! - macro names from `#define` directives and `-D` flags, so declarations
//!   spelled through macros are left alone.
//!
//! Aliases are keyed by their unqualified name and the table is flat. Aliases
//! declared in headers the unit includes are unknown and behave like class
//! names.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use tree_sitter::Node;

use crate::parser::ParseResult;
use crate::types::{Qualifiers, TagKind, Type};

/// Alias and macro tables for one translation unit.
#[derive(Debug, Clone, Default)]
pub struct SemanticModel {
    aliases: HashMap<String, Type>,
    macros: HashSet<String>,
}

/// Result of applying a declarator chain to a base type.
#[derive(Debug, Clone)]
pub(crate) struct DeclaratorShape<'t> {
    /// Declared type of the name.
    pub(crate) ty: Type,
    /// The declared name, if the chain ended in one.
    pub(crate) name: Option<Node<'t>>,
}

impl SemanticModel {
    /// Builds the model from a parsed unit plus macros defined on the
    /// command line.
    #[must_use]
    pub fn build(parsed: &ParseResult, predefined_macros: &[String]) -> Self {
        let mut model = Self {
            aliases: HashMap::new(),
            macros: predefined_macros.iter().cloned().collect(),
        };
        let source = parsed.source();

        let mut stack = vec![parsed.root_node()];
        while let Some(node) = stack.pop() {
            match node.kind() {
                "type_definition" => model.record_typedef(node, source),
                "alias_declaration" => model.record_using_alias(node, source),
                "preproc_def" | "preproc_function_def" => {
                    if let Some(name) = node.child_by_field_name("name") {
                        model.macros.insert(node_text(name, source).to_owned());
                    }
                }
                _ => {}
            }

            // Push in reverse so nodes are visited in source order, which keeps
            // chained aliases resolvable.
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        model
    }

    /// Returns the aliased type for `name`, if the unit declares one.
    #[must_use]
    pub fn alias(&self, name: &str) -> Option<&Type> {
        self.aliases.get(name)
    }

    /// Returns whether `name` is a known macro.
    #[must_use]
    pub fn is_macro(&self, name: &str) -> bool {
        self.macros.contains(name)
    }

    fn record_typedef(&mut self, node: Node<'_>, source: &str) {
        let Some(base) = self.specifier_type(node, source) else {
            return;
        };
        let mut cursor = node.walk();
        let declarators: Vec<_> = node.children_by_field_name("declarator", &mut cursor).collect();
        for declarator in declarators {
            let shape = self.apply_declarator(base.clone(), declarator, source);
            if let Some(name) = shape.name {
                self.aliases
                    .insert(node_text(name, source).to_owned(), shape.ty);
            }
        }
    }

    fn record_using_alias(&mut self, node: Node<'_>, source: &str) {
        let (Some(name), Some(descriptor)) = (
            node.child_by_field_name("name"),
            node.child_by_field_name("type"),
        ) else {
            return;
        };
        let Some(base) = self.specifier_type(descriptor, source) else {
            return;
        };
        let ty = descriptor.child_by_field_name("declarator").map_or_else(
            || base.clone(),
            |declarator| self.apply_declarator(base.clone(), declarator, source).ty,
        );
        self.aliases.insert(node_text(name, source).to_owned(), ty);
    }

    /// Base type of a declaration: its `type` child plus any cv-qualifiers
    /// among the declaration specifiers.
    pub(crate) fn specifier_type(&self, declaration: Node<'_>, source: &str) -> Option<Type> {
        let type_node = declaration.child_by_field_name("type")?;
        let mut quals = Qualifiers::default();
        let mut cursor = declaration.walk();
        for child in declaration.children(&mut cursor) {
            if child.kind() == "type_qualifier" {
                quals.add_keyword(node_text(child, source).trim());
            }
        }
        Some(self.type_from_specifier(type_node, source).with_qualifiers(quals))
    }

    fn type_from_specifier(&self, node: Node<'_>, source: &str) -> Type {
        let kind = node.kind();
        if let Some(tag) = TagKind::from_node_kind(kind) {
            let name = node.child_by_field_name("name");
            return Type::Named {
                spelling: name.map_or_else(
                    || "(anonymous)".to_owned(),
                    |name_node| normalized_spelling(name_node, source),
                ),
                tag: Some(tag),
                anonymous: name.is_none(),
                quals: Qualifiers::default(),
            };
        }

        if kind == "type_identifier" {
            let name = node_text(node, source);
            if let Some(target) = self.aliases.get(name) {
                return Type::Alias {
                    name: name.to_owned(),
                    target: Box::new(target.clone()),
                    quals: Qualifiers::default(),
                };
            }
        }

        Type::named(normalized_spelling(node, source))
    }

    /// Applies a declarator chain to `base`, outermost declarator first.
    pub(crate) fn apply_declarator<'t>(
        &self,
        base: Type,
        declarator: Node<'t>,
        source: &str,
    ) -> DeclaratorShape<'t> {
        let mut ty = base;
        let mut current = Some(declarator);

        while let Some(node) = current {
            match node.kind() {
                "field_identifier" | "identifier" | "type_identifier" | "qualified_identifier"
                | "operator_name" | "destructor_name" | "template_method" => {
                    return DeclaratorShape {
                        ty,
                        name: Some(node),
                    };
                }
                "pointer_declarator" | "abstract_pointer_declarator" => {
                    let mut quals = Qualifiers::default();
                    let mut cursor = node.walk();
                    for child in node.children(&mut cursor) {
                        if child.kind() == "type_qualifier" {
                            quals.add_keyword(node_text(child, source).trim());
                        }
                    }
                    ty = Type::Pointer {
                        pointee: Box::new(ty),
                        quals,
                    };
                    current = node.child_by_field_name("declarator");
                }
                "reference_declarator" | "abstract_reference_declarator" => {
                    ty = Type::Reference {
                        referee: Box::new(ty),
                    };
                    current = last_named_child(node);
                }
                "function_declarator" | "abstract_function_declarator" => {
                    ty = Type::Function {
                        result: Box::new(ty),
                    };
                    current = node.child_by_field_name("declarator");
                }
                "array_declarator" | "abstract_array_declarator" => {
                    ty = Type::Array {
                        element: Box::new(ty),
                    };
                    current = node.child_by_field_name("declarator");
                }
                "parenthesized_declarator"
                | "abstract_parenthesized_declarator"
                | "attributed_declarator" => {
                    current = first_named_child(node);
                }
                _ => break,
            }
        }

        DeclaratorShape { ty, name: None }
    }

    /// First identifier inside `node` that names a known macro, ignoring the
    /// byte ranges in `excluded`.
    pub(crate) fn first_macro_in(
        &self,
        node: Node<'_>,
        excluded: &[Range<usize>],
        source: &str,
    ) -> Option<String> {
        if self.macros.is_empty() {
            return None;
        }
        let mut tokens = Vec::new();
        collect_tokens(node, source, &mut tokens);
        tokens
            .into_iter()
            .filter(|(range, _)| !excluded.iter().any(|ex| ex.start <= range.start && range.end <= ex.end))
            .find(|(_, text)| self.macros.contains(*text))
            .map(|(_, text)| text.to_owned())
    }
}

/// Source text of `node`.
pub(crate) fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or_default()
}

fn first_named_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment");
    found
}

fn last_named_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment" && child.kind() != "type_qualifier")
        .last();
    found
}

/// Leaf tokens of `node` with their byte ranges, comments excluded.
fn collect_tokens<'s>(node: Node<'_>, source: &'s str, out: &mut Vec<(Range<usize>, &'s str)>) {
    if node.kind() == "comment" {
        return;
    }
    if node.child_count() == 0 {
        let text = node_text(node, source);
        if !text.is_empty() {
            out.push((node.byte_range(), text));
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_tokens(child, source, out);
    }
}

/// Token-normalised spelling of `node`: comments dropped, no whitespace
/// around punctuation, one space after commas and between adjacent words.
pub(crate) fn normalized_spelling(node: Node<'_>, source: &str) -> String {
    let mut tokens = Vec::new();
    collect_tokens(node, source, &mut tokens);

    let mut out = String::new();
    let mut previous: Option<&str> = None;
    for (_, token) in tokens {
        if previous.is_some_and(|prev| {
            prev == "," || (is_word_char(prev.chars().last()) && is_word_char(token.chars().next()))
        }) {
            out.push(' ');
        }
        out.push_str(token);
        previous = Some(token);
    }
    out
}

fn is_word_char(ch: Option<char>) -> bool {
    ch.is_some_and(|c| c.is_alphanumeric() || c == '_')
}
