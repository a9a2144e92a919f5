//! The three environment variables the core engine itself reads at
//! startup. Everything else is a specific node's business.

use std::env::VarError;
use std::time::Duration;

/// `MAX_NODE_PARALLELISM` / `NODE_DEADLINE_SECONDS` /
/// `OBJECT_STORE_PRESIGN_TTL_SECONDS`, parsed once at engine construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub max_node_parallelism: usize,
    pub node_deadline: Duration,
    pub object_store_presign_ttl: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_node_parallelism: 4,
            node_deadline: Duration::from_secs(300),
            object_store_presign_ttl: Duration::from_secs(3600),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidInteger { var: &'static str, value: String },
}

impl EngineConfig {
    /// Reads `MAX_NODE_PARALLELISM`, `NODE_DEADLINE_SECONDS`, and
    /// `OBJECT_STORE_PRESIGN_TTL_SECONDS` from the process environment,
    /// falling back to [`Self::default`]'s values for any variable that is
    /// unset. A variable that is set but unparseable is a startup error,
    /// not a silently-ignored default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidInteger`] if a set variable does not
    /// parse as a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            max_node_parallelism: read_positive(
                "MAX_NODE_PARALLELISM",
                defaults.max_node_parallelism,
            )?,
            node_deadline: Duration::from_secs(read_positive(
                "NODE_DEADLINE_SECONDS",
                defaults.node_deadline.as_secs() as usize,
            )? as u64),
            object_store_presign_ttl: Duration::from_secs(read_positive(
                "OBJECT_STORE_PRESIGN_TTL_SECONDS",
                defaults.object_store_presign_ttl.as_secs() as usize,
            )? as u64),
        })
    }

}

fn read_positive(var: &'static str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(var) {
        Ok(value) => parse_positive(var, &value),
        Err(VarError::NotPresent) => Ok(default),
        Err(VarError::NotUnicode(raw)) => Err(ConfigError::InvalidInteger {
            var,
            value: raw.to_string_lossy().into_owned(),
        }),
    }
}

fn parse_positive(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    value
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ConfigError::InvalidInteger { var, value: value.to_string() })
}
