//! Structural patterns and the shape filters that narrow them.
//!
//! A [`FieldPattern`] is a closed set of predicates. Each variant carries an
//! ordered list of [`ShapeFilter`]s. Filters run after the coarse predicate
//! and turn a match into a skip with a [`SkipReason`]. Adding a filter never
//! changes how the matcher traverses the tree.

use std::collections::BTreeSet;

use strum::{Display, IntoStaticStr};

use crate::matcher::Candidate;
use crate::types::Type;

/// Why a pointer-shaped field was not rewritten.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    /// Pointer to member or pointer to member function.
    MemberPointer,
    /// Pointer to a function, directly or through aliases.
    FunctionPointer,
    /// Pointer to pointer.
    MultiLevelPointer,
    /// Pointer to an array.
    PointerToArray,
    /// Declared through a `typedef` or `using` alias of a pointer type.
    TypedefAlias,
    /// The declaration spells a macro.
    MacroObscured,
    /// The pointee type is defined inside the declaration.
    InlineTypeDefinition,
    /// The statement declares more than one name.
    MultipleDeclarators,
    /// The field is listed in the field filter file.
    ExcludedByFilter,
    /// No usable source range could be determined.
    MissingLocation,
}

impl SkipReason {
    /// Stable snake-case identifier used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Handling of statements that declare several fields at once, such as
/// `int *a, *b;`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MultiDeclaratorPolicy {
    /// Skip every declarator of the statement.
    #[default]
    Skip,
    /// Rewrite each declarator on its own. Sibling replacements share a start
    /// offset and therefore overlap.
    Independent,
}

/// Fully-qualified field names that must not be rewritten.
///
/// The text format has one name per line (`ns::Class::field_`). `#` starts a
/// comment and blank lines are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFilter {
    names: BTreeSet<String>,
}

impl FieldFilter {
    /// Parses a field filter file.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        text.lines()
            .map(|line| line.split('#').next().unwrap_or_default().trim())
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Returns whether `qualified_name` is excluded.
    #[must_use]
    pub fn contains(&self, qualified_name: &str) -> bool {
        self.names.contains(qualified_name)
    }

    /// Number of excluded names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns whether the filter excludes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<String> for FieldFilter {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// A refinement applied after the coarse predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeFilter {
    /// Skip pointers to members (`int S::*p`, `int (S::*p)(char)`).
    MemberPointers,
    /// Skip pointers whose pointee chain ends in a function type.
    FunctionPointers,
    /// Skip pointers to pointers.
    MultiLevelPointers,
    /// Skip pointers to arrays.
    PointerToArray,
    /// Skip fields whose declared type is an alias of a pointer.
    TypedefAliases,
    /// Skip declarations that spell a known macro.
    MacroObscured,
    /// Skip fields whose pointee is defined in the declaration.
    InlineTypeDefinitions,
    /// Skip statements with more than one declarator.
    MultipleDeclarators,
    /// Skip fields listed in a [`FieldFilter`].
    Excluded(FieldFilter),
}

impl ShapeFilter {
    /// The filters every raw-pointer pattern starts with, in evaluation
    /// order.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::MemberPointers,
            Self::FunctionPointers,
            Self::MultiLevelPointers,
            Self::PointerToArray,
            Self::TypedefAliases,
            Self::MacroObscured,
            Self::InlineTypeDefinitions,
            Self::MultipleDeclarators,
        ]
    }

    fn check(&self, candidate: &Candidate<'_>) -> Option<SkipReason> {
        let ty = &candidate.declared_type;
        let pointee = ty.pointee().map(Type::desugared);
        let hit = match self {
            Self::MemberPointers => {
                candidate.member_pointer_syntax
                    || matches!(ty.desugared(), Type::MemberPointer { .. })
            }
            Self::FunctionPointers => reaches_function(ty),
            Self::MultiLevelPointers => matches!(
                pointee,
                Some(Type::Pointer { .. } | Type::MemberPointer { .. })
            ),
            Self::PointerToArray => matches!(pointee, Some(Type::Array { .. })),
            Self::TypedefAliases => matches!(ty, Type::Alias { .. }),
            Self::MacroObscured => candidate.macro_name.is_some(),
            Self::InlineTypeDefinitions => candidate.inline_definition,
            Self::MultipleDeclarators => candidate.declarator_count > 1,
            Self::Excluded(filter) => filter.contains(&candidate.qualified_name),
        };
        hit.then_some(self.reason())
    }

    /// Skip reason reported when the filter applies.
    #[must_use]
    pub const fn reason(&self) -> SkipReason {
        match self {
            Self::MemberPointers => SkipReason::MemberPointer,
            Self::FunctionPointers => SkipReason::FunctionPointer,
            Self::MultiLevelPointers => SkipReason::MultiLevelPointer,
            Self::PointerToArray => SkipReason::PointerToArray,
            Self::TypedefAliases => SkipReason::TypedefAlias,
            Self::MacroObscured => SkipReason::MacroObscured,
            Self::InlineTypeDefinitions => SkipReason::InlineTypeDefinition,
            Self::MultipleDeclarators => SkipReason::MultipleDeclarators,
            Self::Excluded(_) => SkipReason::ExcludedByFilter,
        }
    }
}

/// Follows pointers (through aliases) and reports whether they end in a
/// function type.
fn reaches_function(ty: &Type) -> bool {
    let mut current = ty.desugared();
    loop {
        match current {
            Type::Pointer { pointee, .. } | Type::MemberPointer { pointee } => {
                current = pointee.desugared();
            }
            Type::Function { .. } => return true,
            _ => return false,
        }
    }
}

/// Outcome of classifying one declarator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Fails the coarse predicate.
    NoMatch,
    /// Pointer-shaped but excluded.
    Skip(SkipReason),
    /// To be rewritten.
    Match,
}

/// Structural patterns the matcher understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPattern {
    /// Non-static data members whose declared type is a raw pointer.
    RawPointerField {
        /// Refinements, evaluated in order. The first one that applies wins.
        filters: Vec<ShapeFilter>,
    },
}

impl Default for FieldPattern {
    fn default() -> Self {
        Self::raw_pointer_fields()
    }
}

impl FieldPattern {
    /// Raw-pointer fields with every default filter enabled.
    #[must_use]
    pub fn raw_pointer_fields() -> Self {
        Self::RawPointerField {
            filters: ShapeFilter::defaults(),
        }
    }

    /// Raw-pointer fields narrowed by exactly `filters`.
    #[must_use]
    pub const fn with_filters(filters: Vec<ShapeFilter>) -> Self {
        Self::RawPointerField { filters }
    }

    /// Applies a multi-declarator policy, adding or removing the
    /// [`ShapeFilter::MultipleDeclarators`] filter.
    #[must_use]
    pub fn with_multi_declarator_policy(mut self, policy: MultiDeclaratorPolicy) -> Self {
        let Self::RawPointerField { filters } = &mut self;
        let present = filters.contains(&ShapeFilter::MultipleDeclarators);
        match policy {
            MultiDeclaratorPolicy::Skip if !present => {
                filters.push(ShapeFilter::MultipleDeclarators);
            }
            MultiDeclaratorPolicy::Independent => {
                filters.retain(|filter| filter != &ShapeFilter::MultipleDeclarators);
            }
            MultiDeclaratorPolicy::Skip => {}
        }
        self
    }

    /// Adds a field filter. Empty filters are ignored.
    #[must_use]
    pub fn with_field_filter(mut self, field_filter: FieldFilter) -> Self {
        if !field_filter.is_empty() {
            let Self::RawPointerField { filters } = &mut self;
            filters.push(ShapeFilter::Excluded(field_filter));
        }
        self
    }

    /// Filters of the pattern, in evaluation order.
    #[must_use]
    pub fn filters(&self) -> &[ShapeFilter] {
        match self {
            Self::RawPointerField { filters } => filters,
        }
    }

    pub(crate) fn classify(&self, candidate: &Candidate<'_>) -> Classification {
        match self {
            Self::RawPointerField { filters } => {
                let pointer_shaped = candidate.member_pointer_syntax
                    || matches!(
                        candidate.declared_type.desugared(),
                        Type::Pointer { .. } | Type::MemberPointer { .. }
                    );
                if !pointer_shaped {
                    return Classification::NoMatch;
                }
                filters
                    .iter()
                    .find_map(|filter| filter.check(candidate))
                    .map_or(Classification::Match, Classification::Skip)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn field_filter_ignores_comments_and_blank_lines() {
        let filter = FieldFilter::parse(
            "# constexpr-initialised fields\nFoo::ptr_\n\n  ns::Bar::baz_  # inline comment\n",
        );
        assert_eq!(filter.len(), 2);
        assert!(filter.contains("Foo::ptr_"));
        assert!(filter.contains("ns::Bar::baz_"));
        assert!(!filter.contains("Foo::null_"));
    }

    #[rstest]
    #[case(MultiDeclaratorPolicy::Skip, true)]
    #[case(MultiDeclaratorPolicy::Independent, false)]
    fn multi_declarator_policy_toggles_filter(
        #[case] policy: MultiDeclaratorPolicy,
        #[case] expected: bool,
    ) {
        let pattern = FieldPattern::raw_pointer_fields().with_multi_declarator_policy(policy);
        assert_eq!(
            pattern
                .filters()
                .contains(&ShapeFilter::MultipleDeclarators),
            expected
        );
    }

    #[test]
    fn empty_field_filter_is_not_added() {
        let pattern = FieldPattern::raw_pointer_fields().with_field_filter(FieldFilter::default());
        assert_eq!(pattern.filters(), ShapeFilter::defaults().as_slice());
    }

    #[rstest]
    #[case(SkipReason::FunctionPointer, "function_pointer")]
    #[case(SkipReason::ExcludedByFilter, "excluded_by_filter")]
    #[case(SkipReason::MissingLocation, "missing_location")]
    fn skip_reasons_render_snake_case(#[case] reason: SkipReason, #[case] expected: &str) {
        assert_eq!(reason.as_str(), expected);
        assert_eq!(reason.to_string(), expected);
    }
}
