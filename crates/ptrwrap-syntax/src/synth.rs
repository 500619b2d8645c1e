//! Replacement text for a matched pointer type.

use crate::error::SyntaxError;
use crate::types::{PrintingPolicy, Type};

/// Wrapper template used when none is configured.
pub const DEFAULT_WRAPPER: &str = "CheckedPtr";

/// Renders `Wrapper<Pointee>` for pointer types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesizer {
    wrapper: String,
    policy: PrintingPolicy,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_WRAPPER)
    }
}

impl Synthesizer {
    /// Creates a synthesizer emitting `wrapper<...>` with tag keywords
    /// suppressed.
    #[must_use]
    pub fn new(wrapper: impl Into<String>) -> Self {
        Self {
            wrapper: wrapper.into(),
            policy: PrintingPolicy::default(),
        }
    }

    /// Name of the wrapper template.
    #[must_use]
    pub fn wrapper(&self) -> &str {
        &self.wrapper
    }

    /// Renders the replacement for a field of type `ty`.
    ///
    /// Qualifiers on the pointer itself (`T* const`) are dropped; pointee
    /// qualifiers are kept.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::Precondition`] if `ty` is not a pointer. The
    /// matcher only hands out pointer types, so this indicates a pattern that
    /// let an unsupported shape through.
    pub fn synthesize(&self, ty: &Type) -> Result<String, SyntaxError> {
        let Type::Pointer { pointee, quals } = ty else {
            return Err(SyntaxError::precondition(format!(
                "expected a pointer type, got `{}`",
                ty.print(&self.policy)
            )));
        };
        if !quals.is_empty() {
            tracing::debug!(qualifiers = %quals, "dropping pointer qualifiers");
        }
        Ok(format!("{}<{}>", self.wrapper, pointee.print(&self.policy)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Qualifiers, TagKind};

    #[test]
    fn wraps_pointee_without_tag_keyword() {
        let ty = Type::pointer_to(Type::Named {
            spelling: "Foo".to_owned(),
            tag: Some(TagKind::Class),
            anonymous: false,
            quals: Qualifiers {
                is_const: true,
                ..Qualifiers::default()
            },
        });
        let text = Synthesizer::default().synthesize(&ty).expect("pointer");
        assert_eq!(text, "CheckedPtr<const Foo>");
    }

    #[test]
    fn pointer_qualifiers_are_dropped() {
        let ty = Type::pointer_to(Type::named("int")).with_qualifiers(Qualifiers {
            is_volatile: true,
            ..Qualifiers::default()
        });
        let text = Synthesizer::new("raw_ptr").synthesize(&ty).expect("pointer");
        assert_eq!(text, "raw_ptr<int>");
    }

    #[test]
    fn non_pointer_is_a_precondition_violation() {
        let err = Synthesizer::default()
            .synthesize(&Type::named("int"))
            .expect_err("must reject");
        assert!(matches!(err, SyntaxError::Precondition { .. }));
        assert!(err.is_fatal());
    }
}
