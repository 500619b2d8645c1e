//! Drives the rewriter over every requested translation unit.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use ptrwrap_config::{Config, MultiDeclarator, ParseErrors};
use ptrwrap_edits::EditBatch;
use ptrwrap_syntax::{
    FieldFilter, FieldPattern, FieldRewriter, MultiDeclaratorPolicy, ParseErrorPolicy,
    RewriteSummary, Synthesizer, TranslationUnit, UnitOptions,
};

use crate::compile_db::CompilationDatabase;
use crate::errors::AppError;

/// Result of a run in which no fatal error occurred.
#[derive(Debug, Default)]
pub(crate) struct RunOutcome {
    pub(crate) batch: EditBatch,
    pub(crate) summary: RewriteSummary,
    pub(crate) failures: usize,
}

impl RunOutcome {
    /// Returns whether every unit loaded and parsed.
    pub(crate) const fn succeeded(&self) -> bool {
        self.failures == 0
    }
}

pub(crate) struct Runner {
    rewriter: FieldRewriter,
    parse_errors: ParseErrorPolicy,
    database: Option<CompilationDatabase>,
}

impl Runner {
    pub(crate) fn new(
        config: &Config,
        field_filter: FieldFilter,
        database: Option<CompilationDatabase>,
    ) -> Self {
        let multi_declarator = match config.multi_declarator() {
            MultiDeclarator::Skip => MultiDeclaratorPolicy::Skip,
            MultiDeclarator::Independent => MultiDeclaratorPolicy::Independent,
        };
        let parse_errors = match config.parse_errors() {
            ParseErrors::Abort => ParseErrorPolicy::Abort,
            ParseErrors::Skip => ParseErrorPolicy::Tolerate,
        };
        let pattern = FieldPattern::default()
            .with_multi_declarator_policy(multi_declarator)
            .with_field_filter(field_filter);
        Self {
            rewriter: FieldRewriter::new(pattern, Synthesizer::new(config.wrapper())),
            parse_errors,
            database,
        }
    }

    /// Rewrites every source in order.
    ///
    /// Unit failures are logged and counted so that every unit gets a
    /// diagnostic. A precondition violation stops the run at once.
    pub(crate) fn run(&self, sources: &[Utf8PathBuf]) -> Result<RunOutcome, AppError> {
        let mut outcome = RunOutcome::default();
        for source in sources {
            let mut batch = EditBatch::new();
            match self.rewrite_unit(source, &mut batch) {
                Ok(summary) => {
                    outcome.summary.merge(&summary);
                    outcome.batch.merge(batch);
                }
                Err(AppError::Syntax(error)) if error.is_fatal() => {
                    return Err(AppError::Syntax(error));
                }
                Err(error) => {
                    tracing::error!(path = %source, %error, "translation unit failed");
                    outcome.failures += 1;
                }
            }
        }

        tracing::info!(
            units = sources.len(),
            edits = outcome.summary.edits(),
            failures = outcome.failures,
            skipped = %outcome.summary.skips(),
            "rewrite finished"
        );
        Ok(outcome)
    }

    fn rewrite_unit(
        &self,
        path: &Utf8Path,
        batch: &mut EditBatch,
    ) -> Result<RewriteSummary, AppError> {
        let options = UnitOptions {
            predefined_macros: self.predefined_macros(path)?,
            parse_errors: self.parse_errors,
        };
        let source = fs::read_to_string(path).map_err(|source| AppError::ReadSource {
            path: path.to_owned(),
            source,
        })?;
        let unit = TranslationUnit::parse(path, &source, &options)?;
        let summary = self.rewriter.rewrite(&unit, batch)?;
        tracing::debug!(path = %path, records = summary.edits(), "rewrote unit");
        Ok(summary)
    }

    fn predefined_macros(&self, path: &Utf8Path) -> Result<Vec<String>, AppError> {
        self.database.as_ref().map_or_else(
            || Ok(Vec::new()),
            |database| {
                database
                    .lookup(path)
                    .map(crate::compile_db::CompileCommand::defined_macros)
                    .ok_or_else(|| AppError::MissingCompileCommand(path.to_owned()))
            },
        )
    }
}
