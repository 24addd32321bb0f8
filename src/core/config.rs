//! Tool configuration with documented defaults
//!
//! Values can be overridden from a `polgen.toml` file. Every field is
//! optional in the file; anything left out keeps its default.

use crate::core::error::{PolgenError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "polgen.toml";

/// Which AWS transport the executor should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Structured client when compiled in, AWS CLI otherwise
    #[default]
    Auto,
    /// Structured client only
    Sdk,
    /// AWS CLI only
    Cli,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolgenConfig {
    pub transport: TransportKind,

    /// AWS CLI executable
    pub aws_program: String,

    /// git executable, used to discover the repository name
    pub git_program: String,

    /// Sleep between stack status checks when no native waiter exists
    ///
    /// Together with `max_poll_attempts` this also bounds the native waiter:
    /// at the defaults (30s x 120) a stack gets one hour to settle.
    pub poll_interval_secs: u64,

    /// Number of status checks before giving up with a timeout error
    pub max_poll_attempts: u32,

    /// Bootstrap stack name is `<prefix><postfix>`
    pub stack_name_prefix: String,

    /// Branch used when the user does not name one
    pub default_branch: String,
}

impl Default for PolgenConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::Auto,
            aws_program: os_program("aws"),
            git_program: os_program("git"),
            poll_interval_secs: 30,
            max_poll_attempts: 120,
            stack_name_prefix: "PolGenBootstrap".into(),
            default_branch: "main".into(),
        }
    }
}

impl PolgenConfig {
    /// Load config from `path`, falling back to defaults if the file is absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)
            .map_err(|e| PolgenError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| PolgenError::Config(e.to_string()))?;
        config.validate().map_err(PolgenError::Config)?;
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Upper bound handed to provider-native waiters
    pub fn wait_timeout(&self) -> Duration {
        self.poll_interval() * self.max_poll_attempts
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_poll_attempts == 0 {
            return Err("max_poll_attempts must be at least 1".into());
        }
        if self.aws_program.trim().is_empty() || self.git_program.trim().is_empty() {
            return Err("aws_program and git_program must not be empty".into());
        }
        if self.stack_name_prefix.is_empty() {
            return Err("stack_name_prefix must not be empty".into());
        }
        Ok(())
    }
}

fn os_program(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}
