//! Routing one invocation to exactly one handler.
//!
//! The dispatcher picks the node (the root, or the child named by the
//! subcommand token), then runs the checks in a fixed order: permission,
//! argument count, argument resolution. The first failing check sends a
//! message to the issuer and ends the call; otherwise the handler runs once.

use tracing::{debug, warn};

use crate::command::{CommandNode, ParentCommand};
use crate::context::ContextResolver;
use crate::error::{DispatchError, Result};
use crate::issuer::Issuer;
use crate::types::Arguments;

/// Result of a dispatch call.
///
/// Every variant other than [`Executed`](Outcome::Executed) means no handler
/// ran and one message was sent to the issuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The handler ran.
    Executed,
    /// The issuer lacks a required permission; the denial message was sent.
    PermissionDenied,
    /// The token count does not match, or the node has no handler; the usage
    /// text was sent.
    UsageMismatch,
    /// A resolver rejected a token; the usage text was sent.
    ResolutionFailed,
}

impl Outcome {
    /// Returns `true` if a handler ran.
    pub fn is_executed(self) -> bool {
        self == Self::Executed
    }
}

/// Dispatches invocations against a command tree.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::*;
///
/// let ip = ChildCommand::new(
///     CommandInfo::new("ip")
///         .with_permission("ban.ip")
///         .with_usage("/ban ip <address>")
///         .with_param(ParameterDescriptor::named("address", ParameterType::Token)),
///     Handler::new(|args| {
///         args.issuer().send_message(&format!("banned {}", args.token(0).unwrap_or_default()));
///         Ok(())
///     }),
/// );
/// let ban = ParentCommand::new(CommandInfo::new("ban")).with_child(ip);
/// let resolver = ContextResolver::default();
/// let dispatcher = Dispatcher::new(&resolver);
/// let args = vec!["1.2.3.4".to_string()];
///
/// let guest = ConsoleIssuer::new("guest");
/// let outcome = dispatcher.dispatch(&ban, Some("ip"), &args, &guest, true).unwrap();
/// assert_eq!(outcome, Outcome::PermissionDenied);
///
/// let admin = ConsoleIssuer::new("admin").with_permission("ban.ip");
/// let outcome = dispatcher.dispatch(&ban, Some("ip"), &args, &admin, true).unwrap();
/// assert_eq!(outcome, Outcome::Executed);
/// assert_eq!(admin.messages(), vec!["banned 1.2.3.4"]);
///
/// let outcome = dispatcher.dispatch(&ban, Some("ip"), &[], &admin, true).unwrap();
/// assert_eq!(outcome, Outcome::UsageMismatch);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'r> {
    resolver: &'r ContextResolver,
}

impl<'r> Dispatcher<'r> {
    /// Creates a dispatcher resolving arguments with `resolver`.
    pub fn new(resolver: &'r ContextResolver) -> Self {
        Self { resolver }
    }

    /// Dispatches one invocation.
    ///
    /// If `sub_token` is absent or names no child, the root itself is
    /// executed with `args`. Otherwise the root's permission is checked
    /// first and, only if it passes, the child is executed with `args`.
    ///
    /// With `args_required`, a token count different from the node's
    /// positional parameter count ends the call with
    /// [`Outcome::UsageMismatch`] before any resolver runs.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::MissingResolver`] if the selected node declares a
    ///   parameter type without a resolver. No handler runs.
    /// - [`DispatchError::Handler`] if the handler ran and returned an error.
    pub fn dispatch(
        &self,
        root: &ParentCommand,
        sub_token: Option<&str>,
        args: &[String],
        issuer: &dyn Issuer,
        args_required: bool,
    ) -> Result<Outcome> {
        let Some(child) = sub_token.and_then(|token| root.find_child(token)) else {
            debug!(command = root.primary_alias(), "dispatching to root");
            return self.execute(root, args, issuer, args_required);
        };

        if !permitted(root, issuer) {
            return Ok(Outcome::PermissionDenied);
        }

        debug!(
            command = root.primary_alias(),
            child = child.primary_alias(),
            "descending to child"
        );
        self.execute(child, args, issuer, args_required)
    }

    fn execute(
        &self,
        node: &dyn CommandNode,
        args: &[String],
        issuer: &dyn Issuer,
        args_required: bool,
    ) -> Result<Outcome> {
        if !permitted(node, issuer) {
            return Ok(Outcome::PermissionDenied);
        }

        let expected = node.required_arg_count();
        if args_required && args.len() != expected {
            debug!(
                command = node.primary_alias(),
                expected,
                supplied = args.len(),
                "argument count mismatch"
            );
            issuer.send_message(node.usage());
            return Ok(Outcome::UsageMismatch);
        }

        let Some(handler) = node.handler() else {
            debug!(command = node.primary_alias(), "no handler bound");
            issuer.send_message(node.usage());
            return Ok(Outcome::UsageMismatch);
        };

        let Some(values) = self.resolver.resolve(node.parameters(), args, issuer)? else {
            debug!(command = node.primary_alias(), "argument resolution failed");
            issuer.send_message(node.usage());
            return Ok(Outcome::ResolutionFailed);
        };

        handler
            .invoke(&Arguments::new(issuer, values))
            .map_err(|err| {
                warn!(command = node.primary_alias(), error = %err, "handler failed");
                DispatchError::Handler(err)
            })?;
        Ok(Outcome::Executed)
    }
}

/// Checks the node's own permission, sending its denial message on failure.
fn permitted(node: &dyn CommandNode, issuer: &dyn Issuer) -> bool {
    match node.permission() {
        Some(permission) if !issuer.has_permission(permission) => {
            debug!(
                command = node.primary_alias(),
                permission,
                issuer = issuer.name(),
                "permission denied"
            );
            issuer.send_message(node.permission_message());
            false
        }
        _ => true,
    }
}
