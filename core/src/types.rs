//! Parameter, value and handler types shared by every dispatch component.
//!
//! A handler declares its signature as an ordered list of
//! [`ParameterDescriptor`]s. Each descriptor carries a [`ParameterType`] tag
//! that selects the resolver used to turn raw tokens into a [`Value`]. The
//! resolved values reach the handler wrapped in [`Arguments`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::HandlerError;
use crate::issuer::Issuer;

/// Semantic type tag of a handler parameter.
///
/// Resolvers are keyed by this tag with exact matching. [`Issuer`] and
/// [`RawTokens`] are passthrough types: they receive contextual data and never
/// consume a positional token.
///
/// [`Issuer`]: ParameterType::Issuer
/// [`RawTokens`]: ParameterType::RawTokens
///
/// # Examples
///
/// ```
/// use command_dispatch_core::ParameterType;
///
/// assert!(ParameterType::Issuer.is_passthrough());
/// assert!(ParameterType::RawTokens.is_passthrough());
/// assert!(!ParameterType::Token.is_passthrough());
/// assert_eq!(ParameterType::Custom("player".into()).to_string(), "player");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    /// The command issuer.
    Issuer,
    /// Every raw token of the invocation, unchanged.
    RawTokens,
    /// A single raw token.
    Token,
    /// A signed integer.
    Integer,
    /// A floating point number.
    Float,
    /// A boolean word (`true`, `no`, `on`, ...).
    Boolean,
    /// A host-defined type identified by name.
    Custom(String),
}

impl ParameterType {
    /// Returns `true` for types that never consume a positional token.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::Issuer | Self::RawTokens)
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issuer => f.write_str("issuer"),
            Self::RawTokens => f.write_str("tokens"),
            Self::Token => f.write_str("token"),
            Self::Integer => f.write_str("integer"),
            Self::Float => f.write_str("float"),
            Self::Boolean => f.write_str("boolean"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// One declared handler parameter.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::{ParameterDescriptor, ParameterType};
///
/// let address = ParameterDescriptor::named("address", ParameterType::Token);
/// assert!(!address.is_passthrough());
///
/// let issuer = ParameterDescriptor::new(ParameterType::Issuer);
/// assert!(issuer.is_passthrough());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Type tag used to select the resolver.
    pub kind: ParameterType,
    /// Display name used in generated usage text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Name of a registered completion offering values for this parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<String>,
}

impl ParameterDescriptor {
    /// Creates an unnamed parameter.
    pub fn new(kind: ParameterType) -> Self {
        Self {
            kind,
            name: None,
            completion: None,
        }
    }

    /// Creates a named parameter.
    pub fn named(name: &str, kind: ParameterType) -> Self {
        Self {
            kind,
            name: Some(name.to_string()),
            completion: None,
        }
    }

    /// Links the parameter to a named completion.
    pub fn with_completion(mut self, completion: &str) -> Self {
        self.completion = Some(completion.to_string());
        self
    }

    /// Returns `true` if this parameter does not consume a token.
    pub fn is_passthrough(&self) -> bool {
        self.kind.is_passthrough()
    }

    /// Label used in usage text: the name if set, the type otherwise.
    pub fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.kind.to_string())
    }
}

/// A typed argument produced by a resolver.
///
/// Borrowed variants point into the token slice and issuer of the dispatch
/// call that produced them.
#[derive(Clone)]
pub enum Value<'a> {
    /// The command issuer.
    Issuer(&'a dyn Issuer),
    /// All raw tokens of the invocation.
    Tokens(&'a [String]),
    /// A single token.
    Token(&'a str),
    /// A parsed integer.
    Integer(i64),
    /// A parsed float.
    Float(f64),
    /// A parsed boolean.
    Boolean(bool),
    /// A host-defined value.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issuer(issuer) => f.debug_tuple("Issuer").field(&issuer.name()).finish(),
            Self::Tokens(tokens) => f.debug_tuple("Tokens").field(tokens).finish(),
            Self::Token(token) => f.debug_tuple("Token").field(token).finish(),
            Self::Integer(value) => f.debug_tuple("Integer").field(value).finish(),
            Self::Float(value) => f.debug_tuple("Float").field(value).finish(),
            Self::Boolean(value) => f.debug_tuple("Boolean").field(value).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Resolved arguments handed to a [`Handler`].
///
/// Positions follow the handler's declared parameter list, passthrough
/// parameters included.
pub struct Arguments<'a> {
    issuer: &'a dyn Issuer,
    values: Vec<Value<'a>>,
}

impl<'a> Arguments<'a> {
    /// Wraps resolved values.
    pub fn new(issuer: &'a dyn Issuer, values: Vec<Value<'a>>) -> Self {
        Self { issuer, values }
    }

    /// The issuer of the invocation, whether or not it was declared.
    pub fn issuer(&self) -> &'a dyn Issuer {
        self.issuer
    }

    /// Number of resolved values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the handler declared no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All resolved values in declaration order.
    pub fn values(&self) -> &[Value<'a>] {
        &self.values
    }

    /// Value at `index`.
    pub fn get(&self, index: usize) -> Option<&Value<'a>> {
        self.values.get(index)
    }

    /// Token at `index`, if that value is a token.
    pub fn token(&self, index: usize) -> Option<&'a str> {
        match self.values.get(index) {
            Some(Value::Token(token)) => Some(*token),
            _ => None,
        }
    }

    /// Raw token list at `index`, if that value is one.
    pub fn tokens(&self, index: usize) -> Option<&'a [String]> {
        match self.values.get(index) {
            Some(Value::Tokens(tokens)) => Some(*tokens),
            _ => None,
        }
    }

    /// Integer at `index`, if that value is one.
    pub fn integer(&self, index: usize) -> Option<i64> {
        match self.values.get(index) {
            Some(Value::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    /// Float at `index`, if that value is one.
    pub fn float(&self, index: usize) -> Option<f64> {
        match self.values.get(index) {
            Some(Value::Float(value)) => Some(*value),
            _ => None,
        }
    }

    /// Boolean at `index`, if that value is one.
    pub fn boolean(&self, index: usize) -> Option<bool> {
        match self.values.get(index) {
            Some(Value::Boolean(value)) => Some(*value),
            _ => None,
        }
    }

    /// Host-defined value at `index`, downcast to `T`.
    pub fn custom<T: Any + Send + Sync>(&self, index: usize) -> Option<&T> {
        match self.values.get(index) {
            Some(Value::Custom(value)) => value.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Arguments<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("issuer", &self.issuer.name())
            .field("values", &self.values)
            .finish()
    }
}

/// Result returned by a handler.
pub type HandlerResult = std::result::Result<(), HandlerError>;

type HandlerFn = dyn Fn(&Arguments<'_>) -> HandlerResult + Send + Sync;

/// Invocable bound to a command node.
///
/// Cloning shares the underlying function, and [`same_as`](Handler::same_as)
/// compares by identity.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::{Arguments, ConsoleIssuer, Handler, Value};
///
/// let greet = Handler::new(|args: &Arguments<'_>| {
///     args.issuer().send_message(&format!("hello {}", args.token(0).unwrap_or("?")));
///     Ok(())
/// });
///
/// let issuer = ConsoleIssuer::new("console");
/// greet.invoke(&Arguments::new(&issuer, vec![Value::Token("world")])).unwrap();
/// assert_eq!(issuer.messages(), vec!["hello world"]);
/// assert!(greet.same_as(&greet.clone()));
/// ```
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    /// Wraps a handler function.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Arguments<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        Self(Arc::new(handler))
    }

    /// Invokes the handler.
    pub fn invoke(&self, arguments: &Arguments<'_>) -> HandlerResult {
        (self.0)(arguments)
    }

    /// Returns `true` if both handles point at the same function.
    pub fn same_as(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConsoleIssuer;

    #[test]
    fn test_passthrough_types() {
        assert!(ParameterType::Issuer.is_passthrough());
        assert!(ParameterType::RawTokens.is_passthrough());
        for kind in [
            ParameterType::Token,
            ParameterType::Integer,
            ParameterType::Float,
            ParameterType::Boolean,
            ParameterType::Custom("player".into()),
        ] {
            assert!(!kind.is_passthrough(), "{kind} should consume a token");
        }
    }

    #[test]
    fn test_parameter_label_prefers_name() {
        assert_eq!(
            ParameterDescriptor::named("amount", ParameterType::Integer).label(),
            "amount"
        );
        assert_eq!(ParameterDescriptor::new(ParameterType::Float).label(), "float");
    }

    #[test]
    fn test_arguments_typed_accessors() {
        let issuer = ConsoleIssuer::new("console");
        let tokens = vec!["a".to_string(), "2".to_string()];
        let args = Arguments::new(
            &issuer,
            vec![
                Value::Issuer(&issuer),
                Value::Token("a"),
                Value::Integer(2),
                Value::Tokens(&tokens),
                Value::Custom(Arc::new(7u8)),
            ],
        );

        assert_eq!(args.len(), 5);
        assert_eq!(args.token(1), Some("a"));
        assert_eq!(args.token(2), None);
        assert_eq!(args.integer(2), Some(2));
        assert_eq!(args.tokens(3).map(<[String]>::len), Some(2));
        assert_eq!(args.custom::<u8>(4), Some(&7));
        assert_eq!(args.custom::<u16>(4), None);
        assert!(matches!(args.get(0), Some(Value::Issuer(_))));
    }

    #[test]
    fn test_handler_identity() {
        let a = Handler::new(|_| Ok(()));
        let b = Handler::new(|_| Ok(()));
        assert!(a.same_as(&a.clone()));
        assert!(!a.same_as(&b));
    }

    #[test]
    fn test_parameter_type_serializes_snake_case() {
        let json = serde_json::to_string(&ParameterType::RawTokens).unwrap();
        assert_eq!(json, "\"raw_tokens\"");
    }
}
