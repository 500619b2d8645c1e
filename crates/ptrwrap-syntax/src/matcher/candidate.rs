//! Facts about one field declarator, gathered before classification.

use tree_sitter::Node;

use crate::semantics::normalized_spelling;
use crate::types::{TagKind, Type};
use crate::unit::TranslationUnit;

/// One declarator of a `field_declaration` with everything the shape filters
/// inspect.
#[derive(Debug, Clone)]
pub(crate) struct Candidate<'u> {
    pub(crate) declaration: Node<'u>,
    pub(crate) name: Node<'u>,
    pub(crate) declared_type: Type,
    pub(crate) declarator_count: usize,
    pub(crate) member_pointer_syntax: bool,
    pub(crate) inline_definition: bool,
    pub(crate) macro_name: Option<String>,
    pub(crate) qualified_name: String,
}

impl<'u> Candidate<'u> {
    /// Gathers facts for `declarator`, one of `siblings`.
    ///
    /// Returns `None` when the declarator does not name a data member, for
    /// example a method declarator or an unnamed bit-field.
    pub(crate) fn build(
        unit: &'u TranslationUnit,
        declaration: Node<'u>,
        declarator: Node<'u>,
        siblings: &[Node<'u>],
        base: Type,
    ) -> Option<Self> {
        let source = unit.source();
        let shape = unit.model().apply_declarator(base, declarator, source);
        let name = shape.name.filter(|node| node.kind() == "field_identifier")?;

        let prefix = source
            .get(declaration.start_byte()..name.start_byte())
            .unwrap_or_default();
        let member_pointer_syntax = prefix
            .split_whitespace()
            .collect::<String>()
            .contains("::*");

        let inline_definition = declaration
            .child_by_field_name("type")
            .is_some_and(|ty| {
                TagKind::from_node_kind(ty.kind()).is_some()
                    && ty.child_by_field_name("body").is_some()
            });

        let mut excluded = vec![name.byte_range()];
        excluded.extend(
            siblings
                .iter()
                .filter(|sibling| sibling.id() != declarator.id())
                .map(Node::byte_range),
        );
        if let Some(default_value) = declaration.child_by_field_name("default_value") {
            excluded.push(default_value.byte_range());
        }
        let macro_name = unit
            .model()
            .first_macro_in(declaration, &excluded, source);

        Some(Self {
            declaration,
            name,
            declared_type: if member_pointer_syntax {
                as_member_pointer(shape.ty)
            } else {
                shape.ty
            },
            declarator_count: siblings.len(),
            member_pointer_syntax,
            inline_definition,
            macro_name,
            qualified_name: qualified_name(unit, declaration, name),
        })
    }
}

/// The parse view turns `S::*` into `*`, so the outermost pointer level of a
/// member-pointer declarator is restored here.
fn as_member_pointer(ty: Type) -> Type {
    match ty {
        Type::Pointer { pointee, .. } => Type::MemberPointer { pointee },
        other => other,
    }
}

/// Joins enclosing namespace and class names with the field name, as in
/// `ns::Outer::Inner::field_`.
fn qualified_name(unit: &TranslationUnit, declaration: Node<'_>, name: Node<'_>) -> String {
    let source = unit.source();
    let mut parts = vec![unit.text(name).to_owned()];
    let mut current = declaration.parent();
    while let Some(node) = current {
        let kind = node.kind();
        if TagKind::from_node_kind(kind).is_some() {
            parts.push(node.child_by_field_name("name").map_or_else(
                || "(anonymous)".to_owned(),
                |scope| normalized_spelling(scope, source),
            ));
        } else if kind == "namespace_definition" {
            parts.push(node.child_by_field_name("name").map_or_else(
                || "(anonymous namespace)".to_owned(),
                |scope| normalized_spelling(scope, source),
            ));
        }
        current = node.parent();
    }
    parts.reverse();
    parts.join("::")
}
