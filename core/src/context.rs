//! Context resolvers: turning raw tokens into typed handler arguments.
//!
//! [`ContextRegistry`] maps a [`ParameterType`] to a resolver function.
//! [`ContextResolver`] walks a handler's parameter list with a cursor over the
//! raw tokens, asking the registry's resolvers for one value per parameter.
//!
//! # Example
//!
//! ```
//! use command_dispatch_core::*;
//!
//! let resolver = ContextResolver::new(ContextRegistry::with_primitives());
//! let issuer = ConsoleIssuer::new("console");
//! let tokens = vec!["alice".to_string(), "3".to_string()];
//! let params = vec![
//!     ParameterDescriptor::new(ParameterType::Issuer),
//!     ParameterDescriptor::named("player", ParameterType::Token),
//!     ParameterDescriptor::named("days", ParameterType::Integer),
//! ];
//!
//! let values = resolver.resolve(&params, &tokens, &issuer).unwrap().unwrap();
//! let args = Arguments::new(&issuer, values);
//! assert_eq!(args.token(1), Some("alice"));
//! assert_eq!(args.integer(2), Some(3));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{DispatchError, Result};
use crate::issuer::Issuer;
use crate::types::{ParameterDescriptor, ParameterType, Value};

/// Resolver function: `(issuer, all tokens, current token, parameter)`.
///
/// Returning `None` means the token did not convert.
pub type ResolverFn = Arc<
    dyn for<'a> Fn(&'a dyn Issuer, &'a [String], &'a str, &ParameterDescriptor) -> Option<Value<'a>>
        + Send
        + Sync,
>;

/// Mapping from parameter type to resolver.
///
/// Lookups are exact; there is no fallback between types. Registering a type
/// twice replaces the earlier resolver, built-ins included.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::*;
///
/// let mut registry = ContextRegistry::new();
/// assert!(registry.find(&ParameterType::Token).is_some());
/// assert!(registry.find(&ParameterType::Integer).is_none());
///
/// registry.register(ParameterType::Custom("upper".into()), |_, _, current, _| {
///     (!current.is_empty()).then(|| Value::Custom(std::sync::Arc::new(current.to_uppercase())))
/// });
/// assert!(registry.contains(&ParameterType::Custom("upper".into())));
/// ```
#[derive(Clone)]
pub struct ContextRegistry {
    resolvers: HashMap<ParameterType, ResolverFn>,
}

impl ContextRegistry {
    /// Creates a registry holding the raw-tokens, single-token and issuer
    /// resolvers.
    pub fn new() -> Self {
        let mut registry = Self {
            resolvers: HashMap::new(),
        };
        registry.register(ParameterType::RawTokens, |_, tokens, _, _| {
            Some(Value::Tokens(tokens))
        });
        registry.register(ParameterType::Token, |_, _, current, _| {
            Some(Value::Token(current))
        });
        registry.register(ParameterType::Issuer, |issuer, _, _, _| {
            Some(Value::Issuer(issuer))
        });
        registry
    }

    /// Creates a registry with the built-ins plus integer, float and boolean
    /// parsers.
    pub fn with_primitives() -> Self {
        let mut registry = Self::new();
        registry.register(ParameterType::Integer, |_, _, current, _| {
            current.parse::<i64>().ok().map(Value::Integer)
        });
        registry.register(ParameterType::Float, |_, _, current, _| {
            current
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(Value::Float)
        });
        registry.register(ParameterType::Boolean, |_, _, current, _| {
            parse_bool(current).map(Value::Boolean)
        });
        registry
    }

    /// Inserts or replaces the resolver for `kind`.
    pub fn register<F>(&mut self, kind: ParameterType, resolver: F)
    where
        F: for<'a> Fn(&'a dyn Issuer, &'a [String], &'a str, &ParameterDescriptor) -> Option<Value<'a>>
            + Send
            + Sync
            + 'static,
    {
        self.resolvers.insert(kind, Arc::new(resolver));
    }

    /// Finds the resolver registered for exactly `kind`.
    pub fn find(&self, kind: &ParameterType) -> Option<&ResolverFn> {
        self.resolvers.get(kind)
    }

    /// Returns `true` if a resolver is registered for `kind`.
    pub fn contains(&self, kind: &ParameterType) -> bool {
        self.resolvers.contains_key(kind)
    }

    /// Number of registered resolvers.
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// Returns `true` if no resolver is registered.
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Checks that every parameter has a resolver.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MissingResolver`] for the first parameter type
    /// without one.
    pub fn ensure_resolvable(&self, parameters: &[ParameterDescriptor]) -> Result<()> {
        match parameters.iter().find(|p| !self.contains(&p.kind)) {
            Some(parameter) => Err(DispatchError::MissingResolver(parameter.kind.clone())),
            None => Ok(()),
        }
    }
}

impl Default for ContextRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContextRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.resolvers.keys()).finish()
    }
}

fn parse_bool(token: &str) -> Option<bool> {
    match token.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Binds raw tokens to a parameter list.
#[derive(Debug, Clone, Default)]
pub struct ContextResolver {
    registry: ContextRegistry,
}

impl ContextResolver {
    /// Creates a resolver backed by `registry`.
    pub fn new(registry: ContextRegistry) -> Self {
        Self { registry }
    }

    /// The backing registry.
    pub fn registry(&self) -> &ContextRegistry {
        &self.registry
    }

    /// Mutable access to the backing registry, for setup-time registration.
    pub fn registry_mut(&mut self) -> &mut ContextRegistry {
        &mut self.registry
    }

    /// Resolves one value per parameter.
    ///
    /// A cursor starts at the first token. Each parameter's resolver sees the
    /// token under the cursor (an empty string once the cursor runs past the
    /// end), and the cursor advances after every non-passthrough parameter.
    ///
    /// Returns `Ok(None)` as soon as any resolver rejects its token.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MissingResolver`] before any resolver runs if
    /// a parameter type has no registered resolver.
    pub fn resolve<'a>(
        &self,
        parameters: &[ParameterDescriptor],
        tokens: &'a [String],
        issuer: &'a dyn Issuer,
    ) -> Result<Option<Vec<Value<'a>>>> {
        self.registry.ensure_resolvable(parameters)?;

        let mut values = Vec::with_capacity(parameters.len());
        let mut cursor = 0usize;

        for parameter in parameters {
            let resolver = self
                .registry
                .find(&parameter.kind)
                .ok_or_else(|| DispatchError::MissingResolver(parameter.kind.clone()))?;

            let current = tokens.get(cursor).map(String::as_str).unwrap_or("");
            match resolver(issuer, tokens, current, parameter) {
                Some(value) => values.push(value),
                None => {
                    debug!(
                        parameter = %parameter.label(),
                        token = current,
                        "resolver rejected token"
                    );
                    return Ok(None);
                }
            }

            if !parameter.is_passthrough() {
                cursor += 1;
            }
        }

        Ok(Some(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConsoleIssuer;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| t.to_string()).collect()
    }

    fn param(kind: ParameterType) -> ParameterDescriptor {
        ParameterDescriptor::new(kind)
    }

    fn bound_tokens<'a>(values: &[Value<'a>]) -> Vec<&'a str> {
        values
            .iter()
            .filter_map(|v| match v {
                Value::Token(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_builtins_present() {
        let registry = ContextRegistry::new();
        assert_eq!(registry.len(), 3);
        assert!(registry.contains(&ParameterType::RawTokens));
        assert!(registry.contains(&ParameterType::Token));
        assert!(registry.contains(&ParameterType::Issuer));
    }

    #[test]
    fn test_register_overrides_builtin() {
        let mut registry = ContextRegistry::new();
        registry.register(ParameterType::Token, |_, _, _, _| None);
        let resolver = ContextResolver::new(registry);
        let issuer = ConsoleIssuer::new("console");
        let raw = tokens(&["x"]);

        let result = resolver
            .resolve(&[param(ParameterType::Token)], &raw, &issuer)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_raw_tokens_receive_everything() {
        let resolver = ContextResolver::default();
        let issuer = ConsoleIssuer::new("console");
        let raw = tokens(&["a", "b", "c"]);

        let values = resolver
            .resolve(&[param(ParameterType::RawTokens)], &raw, &issuer)
            .unwrap()
            .unwrap();
        assert!(matches!(values[0], Value::Tokens(t) if t.len() == 3));
    }

    #[test]
    fn test_passthrough_does_not_consume() {
        let resolver = ContextResolver::default();
        let issuer = ConsoleIssuer::new("console");
        let raw = tokens(&["first", "second"]);

        let orderings = [
            vec![
                param(ParameterType::Token),
                param(ParameterType::Token),
            ],
            vec![
                param(ParameterType::Issuer),
                param(ParameterType::Token),
                param(ParameterType::Token),
            ],
            vec![
                param(ParameterType::Token),
                param(ParameterType::RawTokens),
                param(ParameterType::Token),
            ],
            vec![
                param(ParameterType::Token),
                param(ParameterType::Token),
                param(ParameterType::Issuer),
                param(ParameterType::RawTokens),
            ],
        ];

        for params in &orderings {
            let values = resolver.resolve(params, &raw, &issuer).unwrap().unwrap();
            assert_eq!(values.len(), params.len());
            assert_eq!(bound_tokens(&values), vec!["first", "second"]);
        }
    }

    #[test]
    fn test_cursor_past_end_presents_empty_string() {
        let resolver = ContextResolver::default();
        let issuer = ConsoleIssuer::new("console");
        let raw = tokens(&["only"]);

        let values = resolver
            .resolve(
                &[param(ParameterType::Token), param(ParameterType::Token)],
                &raw,
                &issuer,
            )
            .unwrap()
            .unwrap();
        assert_eq!(bound_tokens(&values), vec!["only", ""]);
    }

    #[test]
    fn test_empty_tokens_present_empty_string() {
        let resolver = ContextResolver::new(ContextRegistry::with_primitives());
        let issuer = ConsoleIssuer::new("console");

        let result = resolver
            .resolve(&[param(ParameterType::Integer)], &[], &issuer)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_missing_resolver_is_error() {
        let resolver = ContextResolver::default();
        let issuer = ConsoleIssuer::new("console");
        let raw = tokens(&["x", "y"]);

        let err = resolver
            .resolve(
                &[
                    param(ParameterType::Token),
                    param(ParameterType::Custom("player".into())),
                ],
                &raw,
                &issuer,
            )
            .unwrap_err();
        assert!(matches!(err, DispatchError::MissingResolver(ParameterType::Custom(name)) if name == "player"));
    }

    #[test]
    fn test_primitive_parsers() {
        let resolver = ContextResolver::new(ContextRegistry::with_primitives());
        let issuer = ConsoleIssuer::new("console");
        let raw = tokens(&["-12", "2.5", "Yes"]);

        let values = resolver
            .resolve(
                &[
                    param(ParameterType::Integer),
                    param(ParameterType::Float),
                    param(ParameterType::Boolean),
                ],
                &raw,
                &issuer,
            )
            .unwrap()
            .unwrap();
        let args = crate::Arguments::new(&issuer, values);
        assert_eq!(args.integer(0), Some(-12));
        assert_eq!(args.float(1), Some(2.5));
        assert_eq!(args.boolean(2), Some(true));
    }

    #[test]
    fn test_unparseable_token_fails_resolution() {
        let resolver = ContextResolver::new(ContextRegistry::with_primitives());
        let issuer = ConsoleIssuer::new("console");
        let raw = tokens(&["abc"]);

        assert!(
            resolver
                .resolve(&[param(ParameterType::Integer)], &raw, &issuer)
                .unwrap()
                .is_none()
        );
        let raw = tokens(&["NaN"]);
        assert!(
            resolver
                .resolve(&[param(ParameterType::Float)], &raw, &issuer)
                .unwrap()
                .is_none()
        );
    }
}
