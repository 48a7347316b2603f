//! Command tree nodes.
//!
//! A [`ParentCommand`] is a root command with an optional handler of its own
//! and a keyed set of [`ChildCommand`]s. Both carry a [`CommandInfo`] with
//! aliases, permission, usage text and the handler's declared parameters.
//! Trees are assembled with `with_*` builder methods at startup.
//!
//! # Example
//!
//! ```
//! use command_dispatch_core::*;
//!
//! let ip = ChildCommand::new(
//!     CommandInfo::new("ip")
//!         .with_permission("ban.ip")
//!         .with_param(ParameterDescriptor::named("address", ParameterType::Token)),
//!     Handler::new(|_| Ok(())),
//! );
//! let ban = ParentCommand::new(CommandInfo::new("ban").with_alias("b")).with_child(ip);
//!
//! assert!(ban.contains_alias("b"));
//! let child = ban.find_child("ip").unwrap();
//! assert_eq!(child.usage(), "/ban ip <address>");
//! assert_eq!(child.required_arg_count(), 1);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Handler, ParameterDescriptor, ParameterType};

/// Message sent when a node has no explicit permission-denied message.
pub const DEFAULT_PERMISSION_MESSAGE: &str = "You do not have permission to use this command.";

/// How aliases are compared during lookup.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::AliasMatching;
///
/// assert!(AliasMatching::IgnoreCase.matches("Ban", "ban"));
/// assert!(!AliasMatching::Exact.matches("Ban", "ban"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasMatching {
    /// Byte-for-byte comparison.
    #[default]
    Exact,
    /// Unicode lowercase comparison.
    IgnoreCase,
}

impl AliasMatching {
    /// Normalizes an alias into its lookup key.
    pub fn normalize(self, alias: &str) -> String {
        match self {
            Self::Exact => alias.to_string(),
            Self::IgnoreCase => alias.to_lowercase(),
        }
    }

    /// Returns `true` if both aliases name the same command.
    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            Self::Exact => a == b,
            Self::IgnoreCase => a.to_lowercase() == b.to_lowercase(),
        }
    }
}

/// Attributes shared by root and child commands.
#[derive(Debug, Clone)]
pub struct CommandInfo {
    aliases: Vec<String>,
    permission: Option<String>,
    permission_message: Option<String>,
    usage: Option<String>,
    description: Option<String>,
    parameters: Vec<ParameterDescriptor>,
}

impl CommandInfo {
    /// Creates command attributes with a primary alias.
    pub fn new(primary: &str) -> Self {
        Self {
            aliases: vec![primary.to_string()],
            permission: None,
            permission_message: None,
            usage: None,
            description: None,
            parameters: Vec::new(),
        }
    }

    /// Adds a secondary alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Requires a permission.
    pub fn with_permission(mut self, permission: &str) -> Self {
        self.permission = Some(permission.to_string());
        self
    }

    /// Sets the message sent when the permission is missing.
    pub fn with_permission_message(mut self, message: &str) -> Self {
        self.permission_message = Some(message.to_string());
        self
    }

    /// Sets the usage text.
    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = Some(usage.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Appends a handler parameter.
    pub fn with_param(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Appends several handler parameters.
    pub fn with_params(mut self, parameters: impl IntoIterator<Item = ParameterDescriptor>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// All aliases; the first is the primary alias.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The primary alias.
    pub fn primary_alias(&self) -> &str {
        self.aliases.first().map(String::as_str).unwrap_or_default()
    }

    /// Required permission, if any.
    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    /// Message sent when the permission check fails.
    pub fn permission_message(&self) -> &str {
        self.permission_message
            .as_deref()
            .unwrap_or(DEFAULT_PERMISSION_MESSAGE)
    }

    /// Usage text sent on arity or resolution failure.
    pub fn usage(&self) -> &str {
        self.usage.as_deref().unwrap_or_default()
    }

    /// Description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Declared handler parameters in order.
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub(crate) fn has_explicit_permission_message(&self) -> bool {
        self.permission_message.is_some()
    }

    pub(crate) fn set_permission_message(&mut self, message: &str) {
        self.permission_message = Some(message.to_string());
    }

    fn fill_usage(&mut self, path: &[&str]) {
        if self.usage.is_none() {
            self.usage = Some(generate_usage(path, &self.parameters));
        }
    }
}

/// Number of tokens a handler expects: its non-passthrough parameters.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::*;
///
/// let params = [
///     ParameterDescriptor::new(ParameterType::Issuer),
///     ParameterDescriptor::new(ParameterType::Token),
///     ParameterDescriptor::new(ParameterType::RawTokens),
///     ParameterDescriptor::new(ParameterType::Integer),
/// ];
/// assert_eq!(required_arg_count(&params), 2);
/// ```
pub fn required_arg_count(parameters: &[ParameterDescriptor]) -> usize {
    parameters.iter().filter(|p| !p.is_passthrough()).count()
}

fn generate_usage(path: &[&str], parameters: &[ParameterDescriptor]) -> String {
    let mut usage = format!("/{}", path.join(" "));
    for parameter in parameters {
        match parameter.kind {
            ParameterType::Issuer => {}
            ParameterType::RawTokens => {
                if let Some(name) = &parameter.name {
                    usage.push_str(&format!(" [{name}...]"));
                }
            }
            _ => usage.push_str(&format!(" <{}>", parameter.label())),
        }
    }
    usage
}

/// Capability shared by root and child nodes.
pub trait CommandNode {
    /// The node's attributes.
    fn info(&self) -> &CommandInfo;

    /// The bound handler, if the node has one.
    fn handler(&self) -> Option<&Handler>;

    /// All aliases; the first is the primary alias.
    fn aliases(&self) -> &[String] {
        self.info().aliases()
    }

    /// The primary alias.
    fn primary_alias(&self) -> &str {
        self.info().primary_alias()
    }

    /// Required permission, if any.
    fn permission(&self) -> Option<&str> {
        self.info().permission()
    }

    /// Message sent when the permission check fails.
    fn permission_message(&self) -> &str {
        self.info().permission_message()
    }

    /// Usage text.
    fn usage(&self) -> &str {
        self.info().usage()
    }

    /// Declared handler parameters.
    fn parameters(&self) -> &[ParameterDescriptor] {
        self.info().parameters()
    }

    /// Number of tokens the handler expects.
    fn required_arg_count(&self) -> usize {
        required_arg_count(self.parameters())
    }
}

/// A subcommand bound to exactly one handler.
#[derive(Debug, Clone)]
pub struct ChildCommand {
    info: CommandInfo,
    handler: Handler,
}

impl ChildCommand {
    /// Creates a child command.
    pub fn new(info: CommandInfo, handler: Handler) -> Self {
        Self { info, handler }
    }

    /// The bound handler.
    pub fn bound_handler(&self) -> &Handler {
        &self.handler
    }

    /// Returns `true` if `other` is the same declaration: equal aliases and
    /// the same handler.
    pub fn same_declaration(&self, other: &ChildCommand) -> bool {
        self.info.aliases == other.info.aliases && self.handler.same_as(&other.handler)
    }

    pub(crate) fn info_mut(&mut self) -> &mut CommandInfo {
        &mut self.info
    }
}

impl CommandNode for ChildCommand {
    fn info(&self) -> &CommandInfo {
        &self.info
    }

    fn handler(&self) -> Option<&Handler> {
        Some(&self.handler)
    }
}

/// A root command with named subcommands.
///
/// Child lookup goes through an alias index, so it costs one hash lookup.
#[derive(Debug, Clone)]
pub struct ParentCommand {
    info: CommandInfo,
    handler: Option<Handler>,
    children: Vec<ChildCommand>,
    index: HashMap<String, usize>,
    matching: AliasMatching,
}

impl ParentCommand {
    /// Creates a root command without handler or children.
    pub fn new(mut info: CommandInfo) -> Self {
        let primary = info.primary_alias().to_string();
        info.fill_usage(&[primary.as_str()]);
        Self {
            info,
            handler: None,
            children: Vec::new(),
            index: HashMap::new(),
            matching: AliasMatching::default(),
        }
    }

    /// Binds the handler run when no subcommand matches.
    pub fn with_handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Adds a subcommand.
    ///
    /// A child without explicit usage text gets one generated from this
    /// command's primary alias and the child's parameters. If an alias is
    /// already taken, the earlier child keeps it; registration validation
    /// reports the clash.
    pub fn with_child(mut self, child: ChildCommand) -> Self {
        self.put_child(child);
        self
    }

    /// Returns `true` if `alias` names this command.
    pub fn contains_alias(&self, alias: &str) -> bool {
        self.info
            .aliases()
            .iter()
            .any(|candidate| self.matching.matches(candidate, alias))
    }

    /// Finds a child by any of its aliases.
    pub fn find_child(&self, alias: &str) -> Option<&ChildCommand> {
        self.index
            .get(&self.matching.normalize(alias))
            .and_then(|&i| self.children.get(i))
    }

    /// Children in registration order.
    pub fn children(&self) -> &[ChildCommand] {
        &self.children
    }

    /// Alias comparison used by this command.
    pub fn matching(&self) -> AliasMatching {
        self.matching
    }

    /// Snapshot of this command and its children.
    pub fn summary(&self) -> CommandSummary {
        let mut summary = CommandSummary::from_info(&self.info, self.handler.is_some());
        summary.children = self
            .children
            .iter()
            .map(|child| CommandSummary::from_info(&child.info, true))
            .collect();
        summary
    }

    pub(crate) fn info_mut(&mut self) -> &mut CommandInfo {
        &mut self.info
    }

    pub(crate) fn children_mut(&mut self) -> &mut [ChildCommand] {
        &mut self.children
    }

    pub(crate) fn set_matching(&mut self, matching: AliasMatching) {
        self.matching = matching;
        self.reindex();
    }

    /// Appends a child and indexes its aliases.
    pub(crate) fn put_child(&mut self, mut child: ChildCommand) {
        let parent = self.info.primary_alias().to_string();
        let primary = child.info.primary_alias().to_string();
        child.info.fill_usage(&[parent.as_str(), primary.as_str()]);

        let position = self.children.len();
        for alias in child.info.aliases() {
            self.index
                .entry(self.matching.normalize(alias))
                .or_insert(position);
        }
        self.children.push(child);
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (position, child) in self.children.iter().enumerate() {
            for alias in child.info.aliases() {
                self.index
                    .entry(self.matching.normalize(alias))
                    .or_insert(position);
            }
        }
    }
}

impl CommandNode for ParentCommand {
    fn info(&self) -> &CommandInfo {
        &self.info
    }

    fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }
}

/// Serializable snapshot of a command node.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::*;
///
/// let root = ParentCommand::new(CommandInfo::new("echo").with_description("Repeat input"));
/// let summary = root.summary();
/// assert_eq!(summary.aliases, vec!["echo"]);
/// assert_eq!(summary.usage, "/echo");
/// assert!(!summary.executable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSummary {
    /// Aliases, primary first.
    pub aliases: Vec<String>,
    /// Description, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Required permission, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
    /// Usage text.
    pub usage: String,
    /// Declared handler parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDescriptor>,
    /// Whether a handler is bound.
    pub executable: bool,
    /// Subcommands (empty for children).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CommandSummary>,
}

impl CommandSummary {
    fn from_info(info: &CommandInfo, executable: bool) -> Self {
        Self {
            aliases: info.aliases().to_vec(),
            description: info.description().map(String::from),
            permission: info.permission().map(String::from),
            usage: info.usage().to_string(),
            parameters: info.parameters().to_vec(),
            executable,
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Handler {
        Handler::new(|_| Ok(()))
    }

    #[test]
    fn test_generated_usage_skips_passthrough() {
        let child = ChildCommand::new(
            CommandInfo::new("player").with_params([
                ParameterDescriptor::new(ParameterType::Issuer),
                ParameterDescriptor::named("name", ParameterType::Token),
                ParameterDescriptor::named("reason", ParameterType::RawTokens),
            ]),
            noop(),
        );
        let root = ParentCommand::new(CommandInfo::new("ban")).with_child(child);

        assert_eq!(root.usage(), "/ban");
        assert_eq!(
            root.find_child("player").unwrap().usage(),
            "/ban player <name> [reason...]"
        );
    }

    #[test]
    fn test_explicit_usage_is_kept() {
        let child = ChildCommand::new(
            CommandInfo::new("ip").with_usage("/ban ip <address>"),
            noop(),
        );
        let root = ParentCommand::new(CommandInfo::new("ban")).with_child(child);
        assert_eq!(root.find_child("ip").unwrap().usage(), "/ban ip <address>");
    }

    #[test]
    fn test_find_child_by_secondary_alias() {
        let child = ChildCommand::new(CommandInfo::new("list").with_alias("ls"), noop());
        let root = ParentCommand::new(CommandInfo::new("warp")).with_child(child);

        assert_eq!(root.find_child("ls").unwrap().primary_alias(), "list");
        assert!(root.find_child("LS").is_none());
    }

    #[test]
    fn test_ignore_case_matching_reindexes_children() {
        let child = ChildCommand::new(CommandInfo::new("list"), noop());
        let mut root = ParentCommand::new(CommandInfo::new("Warp")).with_child(child);
        assert!(!root.contains_alias("warp"));

        root.set_matching(AliasMatching::IgnoreCase);
        assert!(root.contains_alias("warp"));
        assert!(root.find_child("LIST").is_some());
    }

    #[test]
    fn test_first_child_keeps_contested_alias() {
        let first = ChildCommand::new(CommandInfo::new("add"), noop());
        let second = ChildCommand::new(CommandInfo::new("plus").with_alias("add"), noop());
        let root = ParentCommand::new(CommandInfo::new("calc"))
            .with_child(first)
            .with_child(second);

        assert_eq!(root.find_child("add").unwrap().primary_alias(), "add");
        assert_eq!(root.find_child("plus").unwrap().primary_alias(), "plus");
    }

    #[test]
    fn test_permission_message_default() {
        let info = CommandInfo::new("ban");
        assert_eq!(info.permission_message(), DEFAULT_PERMISSION_MESSAGE);
        let info = info.with_permission_message("nope");
        assert_eq!(info.permission_message(), "nope");
    }

    #[test]
    fn test_same_declaration() {
        let handler = noop();
        let a = ChildCommand::new(CommandInfo::new("ip"), handler.clone());
        let b = ChildCommand::new(CommandInfo::new("ip"), handler);
        let c = ChildCommand::new(CommandInfo::new("ip"), noop());
        assert!(a.same_declaration(&b));
        assert!(!a.same_declaration(&c));
    }

    #[test]
    fn test_summary_lists_children() {
        let root = ParentCommand::new(CommandInfo::new("ban").with_permission("ban.use"))
            .with_handler(noop())
            .with_child(ChildCommand::new(CommandInfo::new("ip"), noop()));
        let summary = root.summary();

        assert!(summary.executable);
        assert_eq!(summary.permission.as_deref(), Some("ban.use"));
        assert_eq!(summary.children.len(), 1);
        assert_eq!(summary.children[0].usage, "/ban ip");

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("description").is_none());
    }
}
