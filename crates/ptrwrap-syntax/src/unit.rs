//! Translation units: one parsed file plus its semantic model.

use camino::{Utf8Path, Utf8PathBuf};
use tree_sitter::Node;

use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::member_ptr;
use crate::parser::{ParseResult, Parser};
use crate::position::{FileId, SourceLocation, point_to_one_based};
use crate::semantics::SemanticModel;

/// What to do with a tree that contains ERROR or MISSING nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseErrorPolicy {
    /// Reject the translation unit.
    #[default]
    Abort,
    /// Keep the tree; declarations containing errors are skipped.
    Tolerate,
}

/// Options applied when loading a translation unit.
#[derive(Debug, Clone, Default)]
pub struct UnitOptions {
    /// Macro names defined on the command line (`-D`).
    pub predefined_macros: Vec<String>,
    /// Handling of syntax errors.
    pub parse_errors: ParseErrorPolicy,
}

/// A parsed source file together with the location and type services the
/// matcher needs.
#[derive(Debug)]
pub struct TranslationUnit {
    path: Utf8PathBuf,
    file: FileId,
    parsed: ParseResult,
    model: SemanticModel,
}

impl TranslationUnit {
    /// Parses `source` as the contents of `path`.
    ///
    /// The language is taken from the path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::UnsupportedExtension`] or
    /// [`SyntaxError::UnknownLanguage`] when the path is not a C++ file, and
    /// [`SyntaxError::ParseError`] when the tree contains errors under
    /// [`ParseErrorPolicy::Abort`].
    pub fn parse(
        path: impl Into<Utf8PathBuf>,
        source: &str,
        options: &UnitOptions,
    ) -> Result<Self, SyntaxError> {
        let unit_path: Utf8PathBuf = path.into();
        let ext = unit_path
            .extension()
            .ok_or_else(|| SyntaxError::unknown_language(unit_path.clone().into_std_path_buf()))?;
        let language = SupportedLanguage::from_extension(ext)
            .ok_or_else(|| SyntaxError::unsupported_extension(ext))?;

        let view = member_ptr::parse_view(source);
        let parsed = Parser::new(language)?.parse_view(source, &view)?;
        if parsed.has_errors() && options.parse_errors == ParseErrorPolicy::Abort {
            let errors = parsed.errors();
            let first = errors
                .first()
                .map_or_else(|| "unknown location".to_owned(), ToString::to_string);
            return Err(SyntaxError::parse(
                unit_path.as_str(),
                format!("{} syntax error(s), first at {first}", errors.len().max(1)),
            ));
        }

        let model = SemanticModel::build(&parsed, &options.predefined_macros);
        let file = FileId::for_path(&unit_path);
        Ok(Self {
            path: unit_path,
            file,
            parsed,
            model,
        })
    }

    /// Path the unit was loaded from.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Identity of the unit's file.
    #[must_use]
    pub const fn file(&self) -> FileId {
        self.file
    }

    /// Original source text.
    #[must_use]
    pub fn source(&self) -> &str {
        self.parsed.source()
    }

    /// The parse result backing the unit.
    #[must_use]
    pub const fn parsed(&self) -> &ParseResult {
        &self.parsed
    }

    /// Alias and macro knowledge for the unit.
    #[must_use]
    pub const fn model(&self) -> &SemanticModel {
        &self.model
    }

    /// Root of the syntax tree.
    #[must_use]
    pub fn root_node(&self) -> Node<'_> {
        self.parsed.root_node()
    }

    /// Location of byte `offset` in this unit.
    #[must_use]
    pub const fn location(&self, offset: usize) -> SourceLocation {
        SourceLocation::new(self.file, offset)
    }

    /// Source text of `node`.
    #[must_use]
    pub fn text(&self, node: Node<'_>) -> &str {
        crate::semantics::node_text(node, self.source())
    }

    /// One-based line and column where `node` starts.
    #[must_use]
    pub fn line_column(&self, node: Node<'_>) -> (u32, u32) {
        point_to_one_based(node.start_position())
    }
}
