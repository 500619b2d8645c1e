//! Traversal that finds pointer-typed member fields.
//!
//! The matcher walks a translation unit in pre-order, so field declarations
//! are visited top to bottom. Every declarator of a `field_declaration` is
//! classified against a [`FieldPattern`]. Matches reach the caller's callback
//! in source order, skips are counted in a [`SkipReport`], and everything else
//! is ignored without side effects.

mod candidate;

use std::convert::Infallible;

use tree_sitter::Node;

use crate::pattern::{Classification, FieldPattern, SkipReason};
use crate::position::SourceLocation;
use crate::report::SkipReport;
use crate::types::Type;
use crate::unit::TranslationUnit;

pub(crate) use candidate::Candidate;

/// A field declarator that matched a pattern.
///
/// Borrows the tree and text services of the unit it came from; it owns no
/// tree data itself.
#[derive(Debug, Clone)]
pub struct MatchedDeclaration<'u> {
    unit: &'u TranslationUnit,
    declaration: Node<'u>,
    name: Node<'u>,
    declared_type: Type,
    qualified_name: String,
}

impl<'u> MatchedDeclaration<'u> {
    /// The translation unit the match belongs to.
    #[must_use]
    pub const fn unit(&self) -> &'u TranslationUnit {
        self.unit
    }

    /// The whole `field_declaration` node.
    #[must_use]
    pub const fn declaration(&self) -> Node<'u> {
        self.declaration
    }

    /// The declared name node.
    #[must_use]
    pub const fn name_node(&self) -> Node<'u> {
        self.name
    }

    /// The declared field name.
    #[must_use]
    pub fn name(&self) -> &'u str {
        self.unit.text(self.name)
    }

    /// Field name qualified with its enclosing namespaces and classes.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Resolved type of the field.
    #[must_use]
    pub const fn declared_type(&self) -> &Type {
        &self.declared_type
    }

    /// Location of the first token of the declaration.
    #[must_use]
    pub fn begin_location(&self) -> SourceLocation {
        self.unit.location(self.declaration.start_byte())
    }

    /// Location of the first byte of the field name.
    #[must_use]
    pub fn name_location(&self) -> SourceLocation {
        self.unit.location(self.name.start_byte())
    }

    /// One-based line and column of the declaration.
    #[must_use]
    pub fn start_position(&self) -> (u32, u32) {
        self.unit.line_column(self.declaration)
    }
}

impl<'u> Candidate<'u> {
    fn into_match(self, unit: &'u TranslationUnit) -> MatchedDeclaration<'u> {
        MatchedDeclaration {
            unit,
            declaration: self.declaration,
            name: self.name,
            declared_type: self.declared_type,
            qualified_name: self.qualified_name,
        }
    }
}

/// Applies a [`FieldPattern`] to translation units.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'p> {
    pattern: &'p FieldPattern,
}

impl<'p> Matcher<'p> {
    /// Creates a matcher for `pattern`.
    #[must_use]
    pub const fn new(pattern: &'p FieldPattern) -> Self {
        Self { pattern }
    }

    /// Invokes `on_match` for every matching declarator of `unit`, in source
    /// order, and counts skipped ones in `skips`.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error produced by `on_match`.
    pub fn for_each_match<'u, E, F>(
        &self,
        unit: &'u TranslationUnit,
        skips: &mut SkipReport,
        mut on_match: F,
    ) -> Result<(), E>
    where
        F: FnMut(MatchedDeclaration<'u>) -> Result<(), E>,
    {
        let mut stack = vec![unit.root_node()];
        while let Some(node) = stack.pop() {
            if node.kind() == "field_declaration" {
                self.visit_declaration(unit, node, skips, &mut on_match)?;
            }
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
        Ok(())
    }

    /// Collects every match of `unit`.
    #[must_use]
    pub fn find_all<'u>(
        &self,
        unit: &'u TranslationUnit,
        skips: &mut SkipReport,
    ) -> Vec<MatchedDeclaration<'u>> {
        let mut matches = Vec::new();
        self.for_each_match(unit, skips, |found| {
            matches.push(found);
            Ok::<(), Infallible>(())
        })
        .unwrap_or_else(|never| match never {});
        matches
    }

    fn visit_declaration<'u, E, F>(
        &self,
        unit: &'u TranslationUnit,
        declaration: Node<'u>,
        skips: &mut SkipReport,
        on_match: &mut F,
    ) -> Result<(), E>
    where
        F: FnMut(MatchedDeclaration<'u>) -> Result<(), E>,
    {
        if is_static(unit, declaration) {
            return Ok(());
        }

        if declaration.has_error() {
            // Only reachable when parse errors are tolerated.
            if unit.text(declaration).contains('*') {
                tracing::debug!(
                    path = %unit.path(),
                    offset = declaration.start_byte(),
                    "skipping field declaration containing syntax errors"
                );
                skips.record(SkipReason::MissingLocation);
            }
            return Ok(());
        }

        let Some(base) = unit.model().specifier_type(declaration, unit.source()) else {
            return Ok(());
        };

        let mut cursor = declaration.walk();
        let declarators: Vec<_> = declaration
            .children_by_field_name("declarator", &mut cursor)
            .collect();

        for declarator in &declarators {
            let Some(candidate) =
                Candidate::build(unit, declaration, *declarator, &declarators, base.clone())
            else {
                continue;
            };
            match self.pattern.classify(&candidate) {
                Classification::NoMatch => {}
                Classification::Skip(reason) => {
                    tracing::debug!(
                        field = %candidate.qualified_name,
                        %reason,
                        macro_name = candidate.macro_name.as_deref(),
                        "skipping field"
                    );
                    skips.record(reason);
                }
                Classification::Match => on_match(candidate.into_match(unit))?,
            }
        }
        Ok(())
    }
}

fn is_static(unit: &TranslationUnit, declaration: Node<'_>) -> bool {
    let mut cursor = declaration.walk();
    let found = declaration
        .children(&mut cursor)
        .any(|child| child.kind() == "storage_class_specifier" && unit.text(child) == "static");
    found
}

#[cfg(test)]
mod tests;
