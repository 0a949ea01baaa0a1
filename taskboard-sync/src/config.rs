//! Board configuration loaded with figment.
//!
//! Sources, lowest to highest precedence:
//!
//! 1. Built-in defaults ([`BoardConfig::default`])
//! 2. An optional TOML file
//! 3. `TASKBOARD_*` environment variables (e.g. `TASKBOARD_DROP_PLACEMENT=at_index`)

use crate::drag::DropPlacement;
use crate::error::Result;
use crate::types::ColumnKey;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "TASKBOARD_";

/// Tunables for a board instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Column new tasks are created in
    pub default_column: ColumnKey,
    /// How a drop picks the moved task's position
    pub drop_placement: DropPlacement,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            default_column: ColumnKey::Todo,
            drop_placement: DropPlacement::Append,
        }
    }
}

impl BoardConfig {
    /// Load defaults, then the TOML file at `path` if given, then the environment.
    ///
    /// A `path` that does not exist contributes nothing.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            debug!("Loading board configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));
        Self::from_figment(&figment)
    }

    /// Extract a configuration from a caller-assembled figment
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Self = figment.extract()?;
        debug!(
            default_column = %config.default_column,
            drop_placement = ?config.drop_placement,
            "board configuration loaded"
        );
        Ok(config)
    }

    /// Set the default column
    pub fn with_default_column(mut self, column: ColumnKey) -> Self {
        self.default_column = column;
        self
    }

    /// Set the drop placement policy
    pub fn with_drop_placement(mut self, placement: DropPlacement) -> Self {
        self.drop_placement = placement;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn clear_env() {
        std::env::remove_var("TASKBOARD_DEFAULT_COLUMN");
        std::env::remove_var("TASKBOARD_DROP_PLACEMENT");
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = BoardConfig::load(None).unwrap();
        assert_eq!(config, BoardConfig::default());
        assert_eq!(config.default_column, ColumnKey::Todo);
        assert_eq!(config.drop_placement, DropPlacement::Append);
    }

    #[test]
    #[serial]
    fn test_toml_file_overrides_defaults() {
        clear_env();
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "default_column = \"inProgress\"").unwrap();
        writeln!(file, "drop_placement = \"at_index\"").unwrap();

        let config = BoardConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.default_column, ColumnKey::InProgress);
        assert_eq!(config.drop_placement, DropPlacement::AtIndex);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        clear_env();
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "default_column = \"inProgress\"").unwrap();

        std::env::set_var("TASKBOARD_DEFAULT_COLUMN", "done");
        let config = BoardConfig::load(Some(file.path()));
        clear_env();

        assert_eq!(config.unwrap().default_column, ColumnKey::Done);
    }

    #[test]
    #[serial]
    fn test_missing_file_is_ignored() {
        clear_env();
        let config = BoardConfig::load(Some(Path::new("/nonexistent/taskboard.toml"))).unwrap();
        assert_eq!(config, BoardConfig::default());
    }

    #[test]
    #[serial]
    fn test_unknown_column_is_rejected() {
        clear_env();
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "default_column = \"archive\"").unwrap();

        let err = BoardConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, BoardError::Config(_)));
    }

    #[test]
    fn test_builders() {
        let config = BoardConfig::default()
            .with_default_column(ColumnKey::Done)
            .with_drop_placement(DropPlacement::AtIndex);
        assert_eq!(config.default_column, ColumnKey::Done);
        assert_eq!(config.drop_placement, DropPlacement::AtIndex);
    }
}
