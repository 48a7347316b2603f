//! Named suggestion lists for tab completion.
//!
//! Dispatch never consults completions. Hosts use them, through
//! [`CommandManager::suggest`](crate::CommandManager::suggest), to offer
//! values for parameters that name a completion.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A named list of suggestions.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::Completion;
///
/// let worlds = Completion::new("worlds", ["overworld", "nether", "end"]);
/// assert_eq!(worlds.matching("ne"), vec!["nether"]);
/// assert_eq!(worlds.matching("").len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Name parameters refer to.
    pub name: String,
    /// Suggested values.
    pub suggestions: Vec<String>,
}

impl Completion {
    /// Creates a completion.
    pub fn new<I, S>(name: &str, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            suggestions: suggestions.into_iter().map(Into::into).collect(),
        }
    }

    /// Suggestions starting with `prefix`, ignoring case.
    pub fn matching(&self, prefix: &str) -> Vec<&str> {
        let prefix = prefix.to_lowercase();
        self.suggestions
            .iter()
            .filter(|s| s.to_lowercase().starts_with(&prefix))
            .map(String::as_str)
            .collect()
    }
}

/// Store of completions keyed by name.
#[derive(Debug, Clone, Default)]
pub struct CompletionProvider {
    completions: HashMap<String, Completion>,
}

impl CompletionProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a completion, replacing one with the same name.
    pub fn register(&mut self, completion: Completion) {
        self.completions.insert(completion.name.clone(), completion);
    }

    /// Finds a completion by name.
    pub fn find(&self, name: &str) -> Option<&Completion> {
        self.completions.get(name)
    }

    /// Number of registered completions.
    pub fn len(&self) -> usize {
        self.completions.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.completions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_replaces_by_name() {
        let mut provider = CompletionProvider::new();
        provider.register(Completion::new("colors", ["red"]));
        provider.register(Completion::new("colors", ["blue", "green"]));

        assert_eq!(provider.len(), 1);
        assert_eq!(provider.find("colors").unwrap().suggestions, vec!["blue", "green"]);
        assert!(provider.find("sizes").is_none());
    }

    #[test]
    fn test_matching_ignores_case() {
        let completion = Completion::new("players", ["Alice", "alfred", "Bob"]);
        assert_eq!(completion.matching("AL"), vec!["Alice", "alfred"]);
    }
}
