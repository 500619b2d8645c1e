//! Rewrite policies selectable from configuration.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Handling of declarations that bind several names at once
/// (`int *a, *b;`).
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MultiDeclarator {
    /// Leave every pointer declarator of the statement untouched.
    #[default]
    Skip,
    /// Rewrite each declarator on its own.
    Independent,
}

/// Handling of sources whose syntax tree contains errors.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ParseErrors {
    /// Fail the unit.
    #[default]
    Abort,
    /// Keep going and skip only the broken declarations.
    Skip,
}
