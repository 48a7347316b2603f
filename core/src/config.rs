//! Host-level dispatch configuration.
//!
//! Loaded from YAML by hosts that want their case rules, default permission
//! message and argument-count policy outside the code.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! args_required: true
//! alias_matching: ignore_case
//! permission_message: "You cannot do that."
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::command::{AliasMatching, DEFAULT_PERMISSION_MESSAGE};
use crate::error::Result;

/// Dispatch settings shared by a [`CommandManager`](crate::CommandManager).
///
/// Every field except `version` may be omitted.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::{AliasMatching, DispatchConfig};
///
/// let config: DispatchConfig = serde_yaml::from_str("version: \"1.0\"\nalias_matching: ignore_case\n").unwrap();
/// assert_eq!(config.alias_matching, AliasMatching::IgnoreCase);
/// assert!(!config.args_required);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Whether dispatch checks the token count against the handler's
    /// positional parameters before resolving.
    #[serde(default)]
    pub args_required: bool,
    /// Alias comparison for roots and children.
    #[serde(default)]
    pub alias_matching: AliasMatching,
    /// Denial message for commands that do not set their own.
    #[serde(default = "default_permission_message")]
    pub permission_message: String,
}

fn default_permission_message() -> String {
    DEFAULT_PERMISSION_MESSAGE.to_string()
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            args_required: false,
            alias_matching: AliasMatching::Exact,
            permission_message: default_permission_message(),
        }
    }
}

impl DispatchConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DispatchError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::DispatchError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DispatchError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::DispatchError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}
