//! Host-facing facade over the registries and the dispatcher.
//!
//! A host builds one [`CommandManager`] at startup, registers commands,
//! resolvers and completions, and then calls
//! [`dispatch`](CommandManager::dispatch) for every incoming invocation.
//!
//! # Example
//!
//! ```
//! use command_dispatch_core::*;
//!
//! let mut manager = CommandManager::new();
//! manager
//!     .register_command(
//!         ParentCommand::new(
//!             CommandInfo::new("add").with_params([
//!                 ParameterDescriptor::named("a", ParameterType::Integer),
//!                 ParameterDescriptor::named("b", ParameterType::Integer),
//!             ]),
//!         )
//!         .with_handler(Handler::new(|args| {
//!             let sum = args.integer(0).unwrap_or(0) + args.integer(1).unwrap_or(0);
//!             args.issuer().send_message(&sum.to_string());
//!             Ok(())
//!         })),
//!     )
//!     .unwrap();
//!
//! let console = ConsoleIssuer::new("console");
//! let root = manager.find_command("add").unwrap();
//! let args = vec!["2".to_string(), "40".to_string()];
//! let outcome = manager.dispatch(root, None, &args, &console).unwrap();
//!
//! assert!(outcome.is_executed());
//! assert_eq!(console.messages(), vec!["42"]);
//! ```

use tracing::debug;

use crate::command::{CommandNode, ParentCommand};
use crate::completion::{Completion, CompletionProvider};
use crate::config::DispatchConfig;
use crate::context::{ContextRegistry, ContextResolver};
use crate::dispatch::{Dispatcher, Outcome};
use crate::error::Result;
use crate::issuer::Issuer;
use crate::registry::CommandRegistry;
use crate::types::{ParameterDescriptor, ParameterType, Value};

/// Owns the command registry, resolver registry and completions of a host.
#[derive(Debug, Clone)]
pub struct CommandManager {
    commands: CommandRegistry,
    resolver: ContextResolver,
    completions: CompletionProvider,
    config: DispatchConfig,
}

impl CommandManager {
    /// Creates a manager with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::default())
    }

    /// Creates a manager with `config`.
    ///
    /// The resolver registry starts with the passthrough, token, integer,
    /// float and boolean resolvers.
    pub fn with_config(config: DispatchConfig) -> Self {
        Self {
            commands: CommandRegistry::with_matching(config.alias_matching),
            resolver: ContextResolver::new(ContextRegistry::with_primitives()),
            completions: CompletionProvider::new(),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Registered root commands.
    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Resolver registry.
    pub fn contexts(&self) -> &ContextRegistry {
        self.resolver.registry()
    }

    /// Completion store.
    pub fn completions(&self) -> &CompletionProvider {
        &self.completions
    }

    /// Registers a root command, merging into an existing root with the same
    /// primary alias.
    ///
    /// Nodes without their own denial message get the configured one.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::MissingResolver`](crate::DispatchError::MissingResolver)
    ///   if any declared parameter type has no resolver yet.
    /// - Any error of [`CommandRegistry::register`].
    pub fn register_command(&mut self, mut root: ParentCommand) -> Result<()> {
        let contexts = self.resolver.registry();
        contexts.ensure_resolvable(root.parameters())?;
        for child in root.children() {
            contexts.ensure_resolvable(child.parameters())?;
        }

        let message = self.config.permission_message.as_str();
        if !root.info().has_explicit_permission_message() {
            root.info_mut().set_permission_message(message);
        }
        for child in root.children_mut() {
            if !child.info().has_explicit_permission_message() {
                child.info_mut().set_permission_message(message);
            }
        }

        self.commands.register(root)
    }

    /// Registers several root commands, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error of [`register_command`](Self::register_command).
    pub fn register_commands(&mut self, roots: impl IntoIterator<Item = ParentCommand>) -> Result<()> {
        for root in roots {
            self.register_command(root)?;
        }
        Ok(())
    }

    /// Registers a completion, replacing one with the same name.
    pub fn register_completion(&mut self, completion: Completion) {
        self.completions.register(completion);
    }

    /// Registers a resolver for `kind`, replacing any previous one.
    pub fn register_context<F>(&mut self, kind: ParameterType, resolver: F)
    where
        F: for<'a> Fn(&'a dyn Issuer, &'a [String], &'a str, &ParameterDescriptor) -> Option<Value<'a>>
            + Send
            + Sync
            + 'static,
    {
        debug!(kind = %kind, "registering context resolver");
        self.resolver.registry_mut().register(kind, resolver);
    }

    /// Finds a root command by any of its aliases.
    pub fn find_command(&self, alias: &str) -> Option<&ParentCommand> {
        self.commands.find_by_alias(alias)
    }

    /// Finds the first root with a child named `alias`.
    pub fn find_command_by_child_alias(&self, alias: &str) -> Option<&ParentCommand> {
        self.commands.find_root_by_child_alias(alias)
    }

    /// Finds a completion by name.
    pub fn find_completion(&self, name: &str) -> Option<&Completion> {
        self.completions.find(name)
    }

    /// A dispatcher bound to this manager's resolvers.
    pub fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(&self.resolver)
    }

    /// Dispatches with the configured `args_required` policy.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::dispatch`].
    pub fn dispatch(
        &self,
        root: &ParentCommand,
        sub_token: Option<&str>,
        args: &[String],
        issuer: &dyn Issuer,
    ) -> Result<Outcome> {
        self.dispatch_with(root, sub_token, args, issuer, self.config.args_required)
    }

    /// Dispatches with an explicit `args_required` policy.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::dispatch`].
    pub fn dispatch_with(
        &self,
        root: &ParentCommand,
        sub_token: Option<&str>,
        args: &[String],
        issuer: &dyn Issuer,
        args_required: bool,
    ) -> Result<Outcome> {
        self.dispatcher()
            .dispatch(root, sub_token, args, issuer, args_required)
    }

    /// Suggestions for the token being typed.
    ///
    /// `tokens` are the tokens after the root alias, the last one being the
    /// partial token. With at most one token, the root's visible child
    /// aliases are offered; positional parameters naming a completion
    /// contribute that completion's entries. Nothing is offered under a root
    /// or child the issuer may not use.
    pub fn suggest(&self, alias: &str, tokens: &[String], issuer: &dyn Issuer) -> Vec<String> {
        let Some(root) = self.find_command(alias) else {
            return Vec::new();
        };
        if !may_use(root, issuer) {
            return Vec::new();
        }

        let partial = tokens.last().map(String::as_str).unwrap_or("");
        let mut suggestions: Vec<String> = Vec::new();

        if tokens.len() <= 1 {
            let prefix = partial.to_lowercase();
            suggestions.extend(
                root.children()
                    .iter()
                    .filter(|child| may_use(*child, issuer))
                    .map(|child| child.primary_alias())
                    .filter(|alias| alias.to_lowercase().starts_with(&prefix))
                    .map(String::from),
            );
            suggestions.extend(self.parameter_suggestions(root.parameters(), 0, partial));
        } else if let Some(child) = root.find_child(&tokens[0]) {
            if may_use(child, issuer) {
                suggestions.extend(self.parameter_suggestions(
                    child.parameters(),
                    tokens.len() - 2,
                    partial,
                ));
            }
        } else {
            suggestions.extend(self.parameter_suggestions(
                root.parameters(),
                tokens.len() - 1,
                partial,
            ));
        }

        suggestions.sort();
        suggestions.dedup();
        suggestions
    }

    fn parameter_suggestions(
        &self,
        parameters: &[ParameterDescriptor],
        position: usize,
        partial: &str,
    ) -> Vec<String> {
        parameters
            .iter()
            .filter(|p| !p.is_passthrough())
            .nth(position)
            .and_then(|p| p.completion.as_deref())
            .and_then(|name| self.completions.find(name))
            .map(|completion| {
                completion
                    .matching(partial)
                    .into_iter()
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for CommandManager {
    fn default() -> Self {
        Self::new()
    }
}

fn may_use(node: &dyn CommandNode, issuer: &dyn Issuer) -> bool {
    node.permission()
        .is_none_or(|permission| issuer.has_permission(permission))
}
