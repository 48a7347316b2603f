//! Command tree validation.
//!
//! Catches declaration mistakes such as blank or malformed aliases, an alias
//! repeated on one node, and sibling subcommands sharing an alias, before a
//! tree reaches the registry.
//!
//! # Examples
//!
//! ```
//! use command_dispatch_core::*;
//!
//! let ok = ParentCommand::new(CommandInfo::new("ban"));
//! assert!(validate_command(&ok).is_empty());
//!
//! // Invalid: whitespace inside an alias
//! let bad = ParentCommand::new(CommandInfo::new("ban ip"));
//! assert_eq!(
//!     validate_command(&bad),
//!     vec![ValidationError::InvalidAlias("ban ip".to_string())]
//! );
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::command::{CommandInfo, CommandNode, ParentCommand};

static ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s/][^\s]*$").expect("static regex must compile"));

/// Command tree validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An alias is empty or whitespace-only.
    #[error("alias cannot be empty")]
    EmptyAlias,
    /// An alias contains whitespace or starts with `/`.
    #[error("invalid alias format: {0}")]
    InvalidAlias(String),
    /// One node lists the same alias twice.
    #[error("duplicate alias on command: {0}")]
    DuplicateAlias(String),
    /// Two sibling subcommands share an alias.
    #[error("duplicate subcommand alias in scope: {0}")]
    DuplicateChildAlias(String),
    /// A node's usage text is blank.
    #[error("usage text cannot be empty for command: {0}")]
    EmptyUsage(String),
}

/// Validates a root command and its children.
///
/// Alias comparison follows the root's [`AliasMatching`](crate::AliasMatching).
/// Validation stops at the first error.
pub fn validate_command(root: &ParentCommand) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_info(root, root.info()));
    if !errors.is_empty() {
        return errors;
    }

    let mut seen: HashSet<String> = HashSet::new();
    for child in root.children() {
        errors.extend(validate_info(root, child.info()));
        if !errors.is_empty() {
            return errors;
        }

        for alias in child.aliases() {
            if !seen.insert(root.matching().normalize(alias)) {
                errors.push(ValidationError::DuplicateChildAlias(alias.clone()));
                return errors;
            }
        }
    }

    errors
}

fn validate_info(root: &ParentCommand, info: &CommandInfo) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for alias in info.aliases() {
        if alias.trim().is_empty() {
            errors.push(ValidationError::EmptyAlias);
            return errors;
        }
        if !ALIAS_RE.is_match(alias) {
            errors.push(ValidationError::InvalidAlias(alias.clone()));
            return errors;
        }
        if !seen.insert(root.matching().normalize(alias)) {
            errors.push(ValidationError::DuplicateAlias(alias.clone()));
            return errors;
        }
    }

    if info.usage().trim().is_empty() {
        errors.push(ValidationError::EmptyUsage(info.primary_alias().to_string()));
    }

    errors
}
