//! The set of registered root commands.
//!
//! Registering a root whose primary alias is already taken merges the new
//! root's children into the existing one instead of adding a second root.
//! Merges and insertions are all-or-nothing: the registry is unchanged when
//! registration fails.
//!
//! # Example
//!
//! ```
//! use command_dispatch_core::*;
//!
//! let noop = Handler::new(|_| Ok(()));
//! let mut registry = CommandRegistry::new();
//! registry
//!     .register(ParentCommand::new(CommandInfo::new("ban"))
//!         .with_child(ChildCommand::new(CommandInfo::new("ip"), noop.clone())))
//!     .unwrap();
//! registry
//!     .register(ParentCommand::new(CommandInfo::new("ban"))
//!         .with_child(ChildCommand::new(CommandInfo::new("player"), noop)))
//!     .unwrap();
//!
//! assert_eq!(registry.len(), 1);
//! assert_eq!(registry.find_by_alias("ban").unwrap().children().len(), 2);
//! assert!(registry.find_root_by_child_alias("player").is_some());
//! ```

use tracing::{debug, info};

use crate::command::{AliasMatching, CommandNode, CommandSummary, ParentCommand};
use crate::error::{DispatchError, Result};
use crate::validate::validate_command;

/// Ordered collection of root commands, unique by primary alias.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    roots: Vec<ParentCommand>,
    matching: AliasMatching,
}

impl CommandRegistry {
    /// Creates an empty registry with exact alias matching.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with the given alias matching.
    pub fn with_matching(matching: AliasMatching) -> Self {
        Self {
            roots: Vec::new(),
            matching,
        }
    }

    /// Alias comparison applied to every registered root.
    pub fn matching(&self) -> AliasMatching {
        self.matching
    }

    /// First root with `alias` among its aliases.
    pub fn find_by_alias(&self, alias: &str) -> Option<&ParentCommand> {
        self.roots.iter().find(|root| root.contains_alias(alias))
    }

    /// First root with a child named `alias`.
    pub fn find_root_by_child_alias(&self, alias: &str) -> Option<&ParentCommand> {
        self.roots
            .iter()
            .find(|root| root.find_child(alias).is_some())
    }

    /// Registers a root command, merging into an existing root with the same
    /// primary alias.
    ///
    /// On merge only the children are taken from `root`; the existing root
    /// keeps its own aliases, permission, usage and handler. A child that is
    /// the same declaration as one already present is skipped.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::InvalidCommand`] if `root` fails validation.
    /// - [`DispatchError::DuplicateRootAlias`] if a new root's alias belongs
    ///   to another root.
    /// - [`DispatchError::DuplicateChildAlias`] if a merged child's alias is
    ///   taken by a different child.
    pub fn register(&mut self, mut root: ParentCommand) -> Result<()> {
        root.set_matching(self.matching);
        if let Some(error) = validate_command(&root).into_iter().next() {
            return Err(error.into());
        }

        let primary = root.primary_alias().to_string();
        let existing = self
            .roots
            .iter()
            .position(|r| self.matching.matches(r.primary_alias(), &primary));
        match existing {
            Some(position) => self.merge(position, root),
            None => self.insert(root),
        }
    }

    fn insert(&mut self, root: ParentCommand) -> Result<()> {
        for alias in root.aliases() {
            if let Some(existing) = self.find_by_alias(alias) {
                return Err(DispatchError::DuplicateRootAlias {
                    alias: alias.clone(),
                    existing: existing.primary_alias().to_string(),
                });
            }
        }

        info!(
            command = root.primary_alias(),
            children = root.children().len(),
            "registered root command"
        );
        self.roots.push(root);
        Ok(())
    }

    fn merge(&mut self, position: usize, incoming: ParentCommand) -> Result<()> {
        let existing = &self.roots[position];

        let mut accepted = Vec::new();
        for child in incoming.children() {
            if existing
                .children()
                .iter()
                .any(|present| present.same_declaration(child))
            {
                debug!(
                    command = existing.primary_alias(),
                    child = child.primary_alias(),
                    "child already registered, skipping"
                );
                continue;
            }
            if let Some(alias) = child
                .aliases()
                .iter()
                .find(|alias| existing.find_child(alias).is_some())
            {
                return Err(DispatchError::DuplicateChildAlias {
                    parent: existing.primary_alias().to_string(),
                    alias: alias.clone(),
                });
            }
            accepted.push(child.clone());
        }

        let root = &mut self.roots[position];
        let merged = accepted.len();
        for child in accepted {
            root.put_child(child);
        }
        info!(
            command = root.primary_alias(),
            merged,
            children = root.children().len(),
            "merged children into existing root command"
        );
        Ok(())
    }

    /// Registered roots in registration order.
    pub fn roots(&self) -> &[ParentCommand] {
        &self.roots
    }

    /// Number of registered roots.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Returns `true` if no root is registered.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Snapshots of every registered root.
    pub fn summaries(&self) -> Vec<CommandSummary> {
        self.roots.iter().map(ParentCommand::summary).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChildCommand, CommandInfo, Handler};

    fn child(alias: &str, handler: &Handler) -> ChildCommand {
        ChildCommand::new(CommandInfo::new(alias), handler.clone())
    }

    fn noop() -> Handler {
        Handler::new(|_| Ok(()))
    }

    #[test]
    fn test_register_and_find() {
        let mut registry = CommandRegistry::new();
        registry
            .register(ParentCommand::new(CommandInfo::new("warp").with_alias("w")))
            .unwrap();

        assert_eq!(registry.find_by_alias("w").unwrap().primary_alias(), "warp");
        assert!(registry.find_by_alias("home").is_none());
    }

    #[test]
    fn test_merge_is_union_of_children() {
        let handler = noop();
        let mut registry = CommandRegistry::new();
        registry
            .register(ParentCommand::new(CommandInfo::new("ban")).with_child(child("ip", &handler)))
            .unwrap();
        registry
            .register(
                ParentCommand::new(CommandInfo::new("ban")).with_child(child("player", &handler)),
            )
            .unwrap();

        assert_eq!(registry.len(), 1);
        let root = registry.find_by_alias("ban").unwrap();
        assert!(root.find_child("ip").is_some());
        assert!(root.find_child("player").is_some());
    }

    #[test]
    fn test_reregistering_same_root_is_idempotent() {
        let handler = noop();
        let root = ParentCommand::new(CommandInfo::new("ban"))
            .with_child(child("ip", &handler))
            .with_child(child("player", &handler));

        let mut registry = CommandRegistry::new();
        registry.register(root.clone()).unwrap();
        registry.register(root).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.roots()[0].children().len(), 2);
    }

    #[test]
    fn test_merge_rejects_different_child_with_same_alias() {
        let mut registry = CommandRegistry::new();
        registry
            .register(ParentCommand::new(CommandInfo::new("ban")).with_child(child("ip", &noop())))
            .unwrap();

        let err = registry
            .register(
                ParentCommand::new(CommandInfo::new("ban"))
                    .with_child(child("mute", &noop()))
                    .with_child(child("ip", &noop())),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::DuplicateChildAlias { ref parent, ref alias } if parent == "ban" && alias == "ip"
        ));
        // All-or-nothing: "mute" was not merged either.
        assert!(registry.find_root_by_child_alias("mute").is_none());
    }

    #[test]
    fn test_root_alias_collision_is_rejected() {
        let mut registry = CommandRegistry::new();
        registry
            .register(ParentCommand::new(CommandInfo::new("ban").with_alias("b")))
            .unwrap();

        let err = registry
            .register(ParentCommand::new(CommandInfo::new("broadcast").with_alias("b")))
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::DuplicateRootAlias { ref alias, ref existing } if alias == "b" && existing == "ban"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_secondary_alias_does_not_trigger_merge() {
        let mut registry = CommandRegistry::new();
        registry
            .register(ParentCommand::new(CommandInfo::new("ban").with_alias("b")))
            .unwrap();

        let err = registry
            .register(ParentCommand::new(CommandInfo::new("b")))
            .unwrap_err();
        assert!(matches!(err, DispatchError::DuplicateRootAlias { .. }));
    }

    #[test]
    fn test_invalid_root_is_rejected() {
        let mut registry = CommandRegistry::new();
        let err = registry
            .register(ParentCommand::new(CommandInfo::new("two words")))
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidCommand(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ignore_case_registry() {
        let handler = noop();
        let mut registry = CommandRegistry::with_matching(AliasMatching::IgnoreCase);
        registry
            .register(ParentCommand::new(CommandInfo::new("Ban")).with_child(child("IP", &handler)))
            .unwrap();
        registry
            .register(ParentCommand::new(CommandInfo::new("ban")).with_child(child("player", &handler)))
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.find_by_alias("BAN").is_some());
        assert!(registry.find_root_by_child_alias("ip").is_some());
    }

    #[test]
    fn test_find_root_by_child_alias_returns_first() {
        let handler = noop();
        let mut registry = CommandRegistry::new();
        registry
            .register(ParentCommand::new(CommandInfo::new("a")).with_child(child("list", &handler)))
            .unwrap();
        registry
            .register(ParentCommand::new(CommandInfo::new("b")).with_child(child("list", &handler)))
            .unwrap();

        assert_eq!(
            registry.find_root_by_child_alias("list").unwrap().primary_alias(),
            "a"
        );
    }
}
