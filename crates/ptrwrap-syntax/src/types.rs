//! Semantic type model for declared field types.
//!
//! Types are built from declaration specifiers and declarator chains by
//! [`SemanticModel`](crate::SemanticModel). They keep alias sugar (the name a
//! typedef was spelled with) while still allowing the underlying type to be
//! inspected via [`Type::desugared`].

use std::fmt;

/// Upper bound on alias chains followed while desugaring.
const MAX_ALIAS_DEPTH: usize = 32;

/// CV-qualifiers attached to a type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Qualifiers {
    /// `const`
    pub is_const: bool,
    /// `volatile`
    pub is_volatile: bool,
    /// `restrict` / `__restrict`
    pub is_restrict: bool,
}

impl Qualifiers {
    /// Records a qualifier keyword. Returns `false` for keywords that are not
    /// cv-qualifiers (for example `constexpr`).
    pub fn add_keyword(&mut self, keyword: &str) -> bool {
        match keyword {
            "const" => self.is_const = true,
            "volatile" => self.is_volatile = true,
            "restrict" | "__restrict" | "__restrict__" => self.is_restrict = true,
            _ => return false,
        }
        true
    }

    /// Returns whether no qualifier is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.is_const || self.is_volatile || self.is_restrict)
    }

    /// Union of two qualifier sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            is_const: self.is_const || other.is_const,
            is_volatile: self.is_volatile || other.is_volatile,
            is_restrict: self.is_restrict || other.is_restrict,
        }
    }
}

impl fmt::Display for Qualifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = [
            (self.is_const, "const"),
            (self.is_volatile, "volatile"),
            (self.is_restrict, "restrict"),
        ];
        let mut first = true;
        for (_, word) in words.iter().filter(|(set, _)| *set) {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(word)?;
            first = false;
        }
        Ok(())
    }
}

/// Elaborated-type keyword a named type was declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// `struct`
    Struct,
    /// `class`
    Class,
    /// `union`
    Union,
    /// `enum`
    Enum,
}

impl TagKind {
    /// Keyword spelling.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Class => "class",
            Self::Union => "union",
            Self::Enum => "enum",
        }
    }

    pub(crate) fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "struct_specifier" => Some(Self::Struct),
            "class_specifier" => Some(Self::Class),
            "union_specifier" => Some(Self::Union),
            "enum_specifier" => Some(Self::Enum),
            _ => None,
        }
    }
}

/// Printing options for rendering types back to source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintingPolicy {
    /// Print `Foo` instead of `class Foo`.
    pub suppress_tag_keyword: bool,
}

impl Default for PrintingPolicy {
    fn default() -> Self {
        Self {
            suppress_tag_keyword: true,
        }
    }
}

/// A resolved declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// A builtin, class, template specialisation, or any other type known
    /// only by its spelling.
    Named {
        /// Normalised spelling without cv-qualifiers or tag keyword.
        spelling: String,
        /// Elaborated keyword, when one was written.
        tag: Option<TagKind>,
        /// Whether the type is an unnamed struct/union/enum definition.
        anonymous: bool,
        /// Qualifiers applied to the type.
        quals: Qualifiers,
    },
    /// A `typedef` or `using` alias declared in the translation unit.
    Alias {
        /// Alias name as written.
        name: String,
        /// The aliased type.
        target: Box<Type>,
        /// Qualifiers applied at the use site.
        quals: Qualifiers,
    },
    /// `T*`
    Pointer {
        /// The type pointed to.
        pointee: Box<Type>,
        /// Qualifiers on the pointer itself (`T* const`).
        quals: Qualifiers,
    },
    /// `T C::*`
    MemberPointer {
        /// The member type pointed to.
        pointee: Box<Type>,
    },
    /// `T&` or `T&&`
    Reference {
        /// The referenced type.
        referee: Box<Type>,
    },
    /// `T[N]`
    Array {
        /// Element type.
        element: Box<Type>,
    },
    /// A function type, as produced by a function declarator.
    Function {
        /// Return type.
        result: Box<Type>,
    },
}

impl Type {
    /// Creates an unqualified named type.
    #[must_use]
    pub fn named(spelling: impl Into<String>) -> Self {
        Self::Named {
            spelling: spelling.into(),
            tag: None,
            anonymous: false,
            quals: Qualifiers::default(),
        }
    }

    /// Creates an unqualified pointer to `pointee`.
    #[must_use]
    pub fn pointer_to(pointee: Self) -> Self {
        Self::Pointer {
            pointee: Box::new(pointee),
            quals: Qualifiers::default(),
        }
    }

    /// Returns whether the type, as written, is a pointer.
    #[must_use]
    pub const fn is_pointer(&self) -> bool {
        matches!(self, Self::Pointer { .. })
    }

    /// Pointee of a pointer or member pointer, as written.
    #[must_use]
    pub fn pointee(&self) -> Option<&Self> {
        match self {
            Self::Pointer { pointee, .. } | Self::MemberPointer { pointee } => Some(pointee),
            _ => None,
        }
    }

    /// Follows alias targets until a non-alias type is reached.
    #[must_use]
    pub fn desugared(&self) -> &Self {
        let mut current = self;
        for _ in 0..MAX_ALIAS_DEPTH {
            match current {
                Self::Alias { target, .. } => current = target,
                _ => return current,
            }
        }
        current
    }

    /// Qualifiers written directly on this type.
    #[must_use]
    pub const fn qualifiers(&self) -> Qualifiers {
        match self {
            Self::Named { quals, .. } | Self::Alias { quals, .. } | Self::Pointer { quals, .. } => {
                *quals
            }
            _ => Qualifiers {
                is_const: false,
                is_volatile: false,
                is_restrict: false,
            },
        }
    }

    /// Returns the type with `extra` added to its own qualifiers. Types that
    /// cannot carry qualifiers are returned unchanged.
    #[must_use]
    pub fn with_qualifiers(self, extra: Qualifiers) -> Self {
        match self {
            Self::Named {
                spelling,
                tag,
                anonymous,
                quals,
            } => Self::Named {
                spelling,
                tag,
                anonymous,
                quals: quals.union(extra),
            },
            Self::Alias {
                name,
                target,
                quals,
            } => Self::Alias {
                name,
                target,
                quals: quals.union(extra),
            },
            Self::Pointer { pointee, quals } => Self::Pointer {
                pointee,
                quals: quals.union(extra),
            },
            other => other,
        }
    }

    /// Renders the type as source text under `policy`.
    ///
    /// Only named and alias types print exactly as a C++ compiler would;
    /// compound types use a simplified suffix notation meant for logs.
    #[must_use]
    pub fn print(&self, policy: &PrintingPolicy) -> String {
        match self {
            Self::Named {
                spelling,
                tag,
                quals,
                ..
            } => {
                let base = match tag {
                    Some(tag) if !policy.suppress_tag_keyword => {
                        format!("{} {spelling}", tag.keyword())
                    }
                    _ => spelling.clone(),
                };
                prefix_qualifiers(*quals, base)
            }
            Self::Alias { name, quals, .. } => prefix_qualifiers(*quals, name.clone()),
            Self::Pointer { pointee, quals } => {
                let base = format!("{}*", pointee.print(policy));
                if quals.is_empty() {
                    base
                } else {
                    format!("{base} {quals}")
                }
            }
            Self::MemberPointer { pointee } => format!("{} ::*", pointee.print(policy)),
            Self::Reference { referee } => format!("{}&", referee.print(policy)),
            Self::Array { element } => format!("{}[]", element.print(policy)),
            Self::Function { result } => format!("{}()", result.print(policy)),
        }
    }
}

fn prefix_qualifiers(quals: Qualifiers, base: String) -> String {
    if quals.is_empty() {
        base
    } else {
        format!("{quals} {base}")
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print(&PrintingPolicy::default()))
    }
}
