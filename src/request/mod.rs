//! Provisioning request model
//!
//! A [`RawRequest`] holds the caller's fields exactly as submitted. The only way to
//! obtain a [`ProvisioningRequest`] is [`validation::validate`], so every value of that
//! type carries a sanitized staging prefix and a usable config target.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, request};

pub mod validation;

pub use validation::{sanitize_prefix, validate};

/// Default dotenv key for the database name (Laravel convention)
pub const DEFAULT_ENV_DB_NAME_KEY: &str = "DB_DATABASE";

/// Default dotenv key for the database user
pub const DEFAULT_ENV_DB_USER_KEY: &str = "DB_USERNAME";

/// Default dotenv key for the database password
pub const DEFAULT_ENV_DB_PASS_KEY: &str = "DB_PASSWORD";

/// Number of positional fields accepted by the plugin action (no password)
pub const ACTION_FIELD_COUNT: usize = 9;

/// Application configuration dialect selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigType {
    /// Leave the application config alone
    Manual,
    /// `wp-config.php` style `define()` constants
    WordPress,
    /// dotenv `KEY=VALUE` file
    Env,
}

impl ConfigType {
    /// Parse a caller-supplied config type.
    ///
    /// Anything unrecognized falls back to [`ConfigType::Manual`] so an unexpected value
    /// never blocks provisioning, it only skips the rewrite.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "wordpress" => ConfigType::WordPress,
            "env" => ConfigType::Env,
            _ => ConfigType::Manual,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigType::Manual => "manual",
            ConfigType::WordPress => "wordpress",
            ConfigType::Env => "env",
        }
    }
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key names of the database connection fields in a dotenv file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvKeyMap {
    pub db_name_key: String,
    pub db_user_key: String,
    pub db_pass_key: String,
}

impl Default for EnvKeyMap {
    fn default() -> Self {
        Self {
            db_name_key: DEFAULT_ENV_DB_NAME_KEY.to_string(),
            db_user_key: DEFAULT_ENV_DB_USER_KEY.to_string(),
            db_pass_key: DEFAULT_ENV_DB_PASS_KEY.to_string(),
        }
    }
}

/// Where and how the staging copy's application config gets rewritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigTarget {
    Manual,
    WordPress { path: PathBuf },
    Env { path: PathBuf, keys: EnvKeyMap },
}

impl ConfigTarget {
    pub fn config_type(&self) -> ConfigType {
        match self {
            ConfigTarget::Manual => ConfigType::Manual,
            ConfigTarget::WordPress { .. } => ConfigType::WordPress,
            ConfigTarget::Env { .. } => ConfigType::Env,
        }
    }

    /// Config path relative to the staging domain root, if a rewrite is requested
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigTarget::Manual => None,
            ConfigTarget::WordPress { path } | ConfigTarget::Env { path, .. } => Some(path),
        }
    }
}

/// Caller-supplied fields before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRequest {
    pub user: String,
    pub source_domain: String,
    pub staging_prefix: String,
    pub source_database: String,
    pub config_type: String,
    pub config_path: String,
    pub env_db_name_key: String,
    pub env_db_user_key: String,
    pub env_db_pass_key: String,
}

impl RawRequest {
    /// Build a request from positional action fields.
    ///
    /// Order: user, source domain, staging prefix, source database, config type,
    /// config path, dotenv name key, dotenv user key, dotenv password key. The first
    /// four are mandatory; missing trailing fields are treated as empty.
    pub fn from_fields(fields: &[String]) -> Result<Self> {
        if fields.len() < 4 {
            return Err(request::invalid(format!(
                "expected at least 4 fields (user, domain, prefix, database), got {}",
                fields.len()
            )));
        }
        if fields.len() > ACTION_FIELD_COUNT {
            return Err(request::invalid(format!(
                "expected at most {ACTION_FIELD_COUNT} fields, got {}",
                fields.len()
            )));
        }

        let field = |i: usize| fields.get(i).cloned().unwrap_or_default();
        Ok(Self {
            user: field(0),
            source_domain: field(1),
            staging_prefix: field(2),
            source_database: field(3),
            config_type: field(4),
            config_path: field(5),
            env_db_name_key: field(6),
            env_db_user_key: field(7),
            env_db_pass_key: field(8),
        })
    }
}

/// A validated provisioning request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRequest {
    requesting_user: String,
    source_domain: String,
    staging_prefix: String,
    source_database: String,
    config: ConfigTarget,
}

impl ProvisioningRequest {
    pub fn requesting_user(&self) -> &str {
        &self.requesting_user
    }

    pub fn source_domain(&self) -> &str {
        &self.source_domain
    }

    pub fn staging_prefix(&self) -> &str {
        &self.staging_prefix
    }

    pub fn source_database(&self) -> &str {
        &self.source_database
    }

    pub fn config(&self) -> &ConfigTarget {
        &self.config
    }

    /// The staging domain: `<prefix>.<source domain>`
    pub fn staging_domain(&self) -> String {
        staging_domain(&self.staging_prefix, &self.source_domain)
    }
}

/// Derive the staging domain from a prefix and the source domain
pub fn staging_domain(prefix: &str, source_domain: &str) -> String {
    format!("{prefix}.{source_domain}")
}
