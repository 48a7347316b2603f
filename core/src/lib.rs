//! Command registration, argument resolution and dispatch.
//!
//! This crate is the engine a host (a chat bot, a game server plugin, a
//! console) embeds to route textual invocations to handlers:
//!
//! - [`ParentCommand`] / [`ChildCommand`]: a root command
//!   with named subcommands, each with aliases, permission and usage text.
//! - [`CommandRegistry`]: the registered roots, with alias lookup and
//!   merge-on-reregistration.
//! - [`ContextRegistry`] / [`ContextResolver`]: type-keyed resolvers turning
//!   raw tokens into typed [`Value`]s, with passthrough parameters (the
//!   [`Issuer`], the raw token list) that never consume a token.
//! - [`Dispatcher`]: permission, argument-count and resolution checks in a
//!   fixed order, then exactly one handler invocation.
//! - [`CommandManager`]: the facade hosts usually hold.
//!
//! The host owns the transport: it splits input into tokens, implements
//! [`Issuer`] and decides what permission strings mean.
//!
//! # Example
//!
//! ```
//! use command_dispatch_core::*;
//!
//! let mut manager = CommandManager::new();
//! manager
//!     .register_command(
//!         ParentCommand::new(CommandInfo::new("ban")).with_child(ChildCommand::new(
//!             CommandInfo::new("ip")
//!                 .with_permission("ban.ip")
//!                 .with_usage("/ban ip <address>")
//!                 .with_params([
//!                     ParameterDescriptor::new(ParameterType::Issuer),
//!                     ParameterDescriptor::named("address", ParameterType::Token),
//!                 ]),
//!             Handler::new(|args| {
//!                 let address = args.token(1).unwrap_or_default();
//!                 args.issuer().send_message(&format!("banned {address}"));
//!                 Ok(())
//!             }),
//!         )),
//!     )
//!     .unwrap();
//!
//! let admin = ConsoleIssuer::new("admin").with_permission("ban.ip");
//! let ban = manager.find_command("ban").unwrap();
//! let args = vec!["1.2.3.4".to_string()];
//!
//! let outcome = manager.dispatch_with(ban, Some("ip"), &args, &admin, true).unwrap();
//! assert_eq!(outcome, Outcome::Executed);
//! assert_eq!(admin.messages(), vec!["banned 1.2.3.4"]);
//! ```

mod command;
mod completion;
mod config;
mod context;
mod dispatch;
mod error;
mod issuer;
mod manager;
mod registry;
mod types;
mod validate;

pub use command::{
    AliasMatching, ChildCommand, CommandInfo, CommandNode, CommandSummary,
    DEFAULT_PERMISSION_MESSAGE, ParentCommand, required_arg_count,
};
pub use completion::{Completion, CompletionProvider};
pub use config::DispatchConfig;
pub use context::{ContextRegistry, ContextResolver, ResolverFn};
pub use dispatch::{Dispatcher, Outcome};
pub use error::{DispatchError, HandlerError, Result};
pub use issuer::{ConsoleIssuer, Issuer};
pub use manager::CommandManager;
pub use registry::CommandRegistry;
pub use types::{Arguments, Handler, HandlerResult, ParameterDescriptor, ParameterType, Value};
pub use validate::{ValidationError, validate_command};
