//! Language detection and Tree-sitter grammar selection.
//!
//! Only C++ is rewritten. C-style headers (`.h`) are treated as C++ because
//! the wrapper templates the tool emits only exist in C++.

use std::fmt;

/// Languages supported for syntactic analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SupportedLanguage {
    /// C++ sources and headers.
    #[default]
    Cpp,
}

impl SupportedLanguage {
    /// Detects the language from a file extension.
    ///
    /// Returns `None` if the extension is not recognised.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let normalised = ext.to_ascii_lowercase();
        match normalised.as_str() {
            "cc" | "cpp" | "cxx" | "c++" | "cp" | "h" | "hh" | "hpp" | "hxx" | "h++" | "inl"
            | "ipp" | "tcc" => Some(Self::Cpp),
            _ => None,
        }
    }

    /// Returns the Tree-sitter language grammar for this language.
    #[must_use]
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Self::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        }
    }

    /// Returns the lower-case identifier for this language.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cpp => "cpp",
        }
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("cc")]
    #[case("cpp")]
    #[case("h")]
    #[case("HPP")]
    #[case("inl")]
    fn from_extension_recognises_cpp(#[case] ext: &str) {
        assert_eq!(
            SupportedLanguage::from_extension(ext),
            Some(SupportedLanguage::Cpp)
        );
    }

    #[rstest]
    #[case("rs")]
    #[case("mm")]
    #[case("py")]
    fn from_extension_returns_none_for_unknown(#[case] ext: &str) {
        assert_eq!(SupportedLanguage::from_extension(ext), None);
    }
}
