//! The actor that invoked a command.
//!
//! Hosts implement [`Issuer`] for whatever represents "who sent this" on
//! their transport (a chat member, a game player, a console). The dispatch
//! engine only queries permissions and sends replies through it.

use std::collections::BTreeSet;
use std::sync::Mutex;

/// Capability set the host provides for the issuer of a command.
pub trait Issuer {
    /// Stable unique identity, when the host has one.
    fn unique_id(&self) -> Option<String> {
        None
    }

    /// Display name.
    fn name(&self) -> &str;

    /// Sends a reply to the issuer.
    fn send_message(&self, message: &str);

    /// Returns `true` if the issuer holds `permission`.
    fn has_permission(&self, permission: &str) -> bool;

    /// Returns `true` for automated or console actors.
    fn is_console(&self) -> bool {
        false
    }

    /// Returns `true` for human players or members.
    fn is_player(&self) -> bool {
        !self.is_console()
    }

    /// Returns `true` if the issuer is currently reachable.
    fn is_online(&self) -> bool {
        true
    }
}

/// In-memory console issuer.
///
/// Holds an explicit permission set and records every message sent to it.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::{ConsoleIssuer, Issuer};
///
/// let console = ConsoleIssuer::new("console").with_permission("ban.ip");
/// assert!(console.has_permission("ban.ip"));
/// assert!(!console.has_permission("ban.player"));
///
/// console.send_message("done");
/// assert_eq!(console.take_messages(), vec!["done"]);
/// assert!(console.messages().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct ConsoleIssuer {
    name: String,
    permissions: BTreeSet<String>,
    all_permissions: bool,
    messages: Mutex<Vec<String>>,
}

impl ConsoleIssuer {
    /// Creates a console issuer without permissions.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Grants a permission.
    pub fn with_permission(mut self, permission: &str) -> Self {
        self.permissions.insert(permission.to_string());
        self
    }

    /// Grants several permissions.
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions
            .extend(permissions.into_iter().map(Into::into));
        self
    }

    /// Grants every permission.
    pub fn with_all_permissions(mut self) -> Self {
        self.all_permissions = true;
        self
    }

    /// Returns a copy of the messages received so far.
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Drains and returns the messages received so far.
    pub fn take_messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(mut messages) => std::mem::take(&mut *messages),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Issuer for ConsoleIssuer {
    fn name(&self) -> &str {
        &self.name
    }

    fn send_message(&self, message: &str) {
        match self.messages.lock() {
            Ok(mut messages) => messages.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.all_permissions || self.permissions.contains(permission)
    }

    fn is_console(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_defaults() {
        let console = ConsoleIssuer::new("console");
        assert_eq!(console.name(), "console");
        assert!(console.unique_id().is_none());
        assert!(console.is_console());
        assert!(!console.is_player());
        assert!(console.is_online());
    }

    #[test]
    fn test_all_permissions() {
        let console = ConsoleIssuer::new("root").with_all_permissions();
        assert!(console.has_permission("anything.at.all"));
    }

    #[test]
    fn test_with_permissions_extends_set() {
        let console = ConsoleIssuer::new("ops").with_permissions(["a", "b"]);
        assert!(console.has_permission("a"));
        assert!(console.has_permission("b"));
        assert!(!console.has_permission("c"));
    }

    #[test]
    fn test_messages_are_recorded_in_order() {
        let console = ConsoleIssuer::new("console");
        console.send_message("first");
        console.send_message("second");
        assert_eq!(console.messages(), vec!["first", "second"]);
        assert_eq!(console.take_messages().len(), 2);
        assert!(console.messages().is_empty());
    }
}
