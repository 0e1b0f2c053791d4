//! Request validation
//!
//! Runs synchronously before anything touches the host. A request that fails here is
//! reported back to the caller and no job is ever launched.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::{ConfigTarget, ConfigType, EnvKeyMap, ProvisioningRequest, RawRequest};
use crate::error::{Result, request};

#[allow(clippy::expect_used)]
static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*$").expect("domain pattern is valid")
});

#[allow(clippy::expect_used)]
static ENV_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*$").expect("env key pattern is valid"));

/// Strip every character outside `[A-Za-z0-9-]` from a staging prefix
pub fn sanitize_prefix(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

/// Validate raw caller fields into a [`ProvisioningRequest`]
pub fn validate(raw: &RawRequest) -> Result<ProvisioningRequest> {
    let requesting_user = raw.user.trim();
    if requesting_user.is_empty() {
        return Err(request::invalid("requesting user cannot be empty"));
    }
    if matches!(requesting_user, "." | "..") || requesting_user.contains(['/', '\0']) {
        return Err(request::invalid(format!(
            "requesting user '{requesting_user}' cannot be used in a path"
        )));
    }

    let source_domain = raw.source_domain.trim();
    validate_domain(source_domain)?;

    let staging_prefix = sanitize_prefix(&raw.staging_prefix);
    let source_database = raw.source_database.trim();
    if staging_prefix.is_empty() || source_database.is_empty() {
        return Err(request::invalid(
            "staging prefix and database cannot be empty",
        ));
    }

    let config = config_target(raw)?;

    Ok(ProvisioningRequest {
        requesting_user: requesting_user.to_string(),
        source_domain: source_domain.to_string(),
        staging_prefix,
        source_database: source_database.to_string(),
        config,
    })
}

fn validate_domain(domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(request::invalid("source domain cannot be empty"));
    }
    if !DOMAIN_RE.is_match(domain) {
        return Err(request::invalid(format!(
            "source domain '{domain}' is not a valid domain name"
        )));
    }
    Ok(())
}

fn config_target(raw: &RawRequest) -> Result<ConfigTarget> {
    let config_type = ConfigType::parse_lenient(&raw.config_type);
    if config_type == ConfigType::Manual {
        return Ok(ConfigTarget::Manual);
    }

    let config_path = raw.config_path.trim();
    if config_path.is_empty() {
        return Err(request::invalid(format!(
            "config path is required for config type '{config_type}'"
        )));
    }
    let path = relative_config_path(config_path)?;

    Ok(match config_type {
        ConfigType::WordPress => ConfigTarget::WordPress { path },
        ConfigType::Env => ConfigTarget::Env {
            path,
            keys: env_keys(raw)?,
        },
        ConfigType::Manual => ConfigTarget::Manual,
    })
}

/// The config path must stay inside the staging domain root
fn relative_config_path(config_path: &str) -> Result<PathBuf> {
    let path = Path::new(config_path);
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(request::invalid(format!(
                    "config path '{config_path}' must be relative to the domain root and may not contain '..'"
                )));
            }
        }
    }
    Ok(path.to_path_buf())
}

/// Each connection field needs its own key, or one line would be rewritten twice
fn env_keys(raw: &RawRequest) -> Result<EnvKeyMap> {
    let defaults = EnvKeyMap::default();
    let keys = EnvKeyMap {
        db_name_key: env_key(&raw.env_db_name_key, defaults.db_name_key)?,
        db_user_key: env_key(&raw.env_db_user_key, defaults.db_user_key)?,
        db_pass_key: env_key(&raw.env_db_pass_key, defaults.db_pass_key)?,
    };
    if keys.db_name_key == keys.db_user_key
        || keys.db_name_key == keys.db_pass_key
        || keys.db_user_key == keys.db_pass_key
    {
        return Err(request::invalid(format!(
            "dotenv keys must be distinct, got '{}', '{}' and '{}'",
            keys.db_name_key, keys.db_user_key, keys.db_pass_key
        )));
    }
    Ok(keys)
}

fn env_key(value: &str, default: String) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(default);
    }
    if !ENV_KEY_RE.is_match(value) {
        return Err(request::invalid(format!(
            "'{value}' is not a valid dotenv key name"
        )));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StagerError;
    use proptest::prelude::*;

    fn raw(prefix: &str, database: &str) -> RawRequest {
        RawRequest {
            user: "admin".to_string(),
            source_domain: "example.com".to_string(),
            staging_prefix: prefix.to_string(),
            source_database: database.to_string(),
            ..RawRequest::default()
        }
    }

    #[test]
    fn test_sanitize_strips_punctuation() {
        let request = validate(&raw("staging!!", "admin_wp")).unwrap();
        assert_eq!(request.staging_prefix(), "staging");
        assert_eq!(request.staging_domain(), "staging.example.com");
    }

    #[test]
    fn test_sanitize_keeps_hyphen_and_digits() {
        assert_eq!(sanitize_prefix("dev-2 .x/"), "dev-2x");
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let err = validate(&raw("", "admin_wp")).unwrap_err();
        assert!(matches!(err, StagerError::Validation { .. }));
    }

    #[test]
    fn test_prefix_empty_after_sanitize_rejected() {
        let err = validate(&raw("!!!", "admin_wp")).unwrap_err();
        assert!(err.to_string().contains("staging prefix and database"));
    }

    #[test]
    fn test_empty_database_rejected() {
        let err = validate(&raw("staging", "  ")).unwrap_err();
        assert!(matches!(err, StagerError::Validation { .. }));
    }

    #[test]
    fn test_empty_user_rejected() {
        let mut request = raw("staging", "admin_wp");
        request.user = String::new();
        assert!(validate(&request).is_err());
    }

    #[test]
    fn test_user_with_path_separator_rejected() {
        for user in ["..", "admin/../root", "."] {
            let mut request = raw("staging", "admin_wp");
            request.user = user.to_string();
            assert!(validate(&request).is_err(), "user {user:?} should fail");
        }
    }

    #[test]
    fn test_bad_domain_rejected() {
        for domain in ["", "../etc", "exa mple.com", ".example.com", "example..com"] {
            let mut request = raw("staging", "admin_wp");
            request.source_domain = domain.to_string();
            assert!(validate(&request).is_err(), "domain {domain:?} should fail");
        }
    }

    #[test]
    fn test_unknown_config_type_is_manual() {
        let mut request = raw("staging", "admin_wp");
        request.config_type = "joomla".to_string();
        request.config_path = String::new();
        let request = validate(&request).unwrap();
        assert_eq!(request.config(), &ConfigTarget::Manual);
    }

    #[test]
    fn test_wordpress_requires_path() {
        let mut request = raw("staging", "admin_wp");
        request.config_type = "wordpress".to_string();
        let err = validate(&request).unwrap_err();
        assert!(err.to_string().contains("config path is required"));
    }

    #[test]
    fn test_env_requires_path() {
        let mut request = raw("staging", "admin_wp");
        request.config_type = "env".to_string();
        assert!(validate(&request).is_err());
    }

    #[test]
    fn test_wordpress_target() {
        let mut request = raw("staging", "admin_wp");
        request.config_type = "wordpress".to_string();
        request.config_path = "public_html/wp-config.php".to_string();
        let request = validate(&request).unwrap();
        assert_eq!(
            request.config(),
            &ConfigTarget::WordPress {
                path: PathBuf::from("public_html/wp-config.php")
            }
        );
    }

    #[test]
    fn test_config_path_escape_rejected() {
        for path in ["../other.com/public_html/.env", "/etc/passwd", "a/../../b"] {
            let mut request = raw("staging", "admin_wp");
            request.config_type = "env".to_string();
            request.config_path = path.to_string();
            assert!(validate(&request).is_err(), "path {path:?} should fail");
        }
    }

    #[test]
    fn test_env_keys_default_when_empty() {
        let mut request = raw("staging", "admin_wp");
        request.config_type = "env".to_string();
        request.config_path = "public_html/.env".to_string();
        request.env_db_pass_key = "APP_DB_PASS".to_string();
        let request = validate(&request).unwrap();
        match request.config() {
            ConfigTarget::Env { keys, .. } => {
                assert_eq!(keys.db_name_key, "DB_DATABASE");
                assert_eq!(keys.db_user_key, "DB_USERNAME");
                assert_eq!(keys.db_pass_key, "APP_DB_PASS");
            }
            other => panic!("Expected env target, got {other:?}"),
        }
    }

    #[test]
    fn test_env_key_with_equals_rejected() {
        let mut request = raw("staging", "admin_wp");
        request.config_type = "env".to_string();
        request.config_path = ".env".to_string();
        request.env_db_name_key = "DB=NAME".to_string();
        assert!(validate(&request).is_err());
    }

    #[test]
    fn test_env_keys_must_be_distinct() {
        let mut request = raw("staging", "admin_wp");
        request.config_type = "env".to_string();
        request.config_path = ".env".to_string();
        request.env_db_name_key = "DB".to_string();
        request.env_db_user_key = "DB".to_string();
        request.env_db_pass_key = "DB_PASS".to_string();

        let err = validate(&request).unwrap_err();
        assert!(matches!(err, StagerError::Validation { .. }));
        assert!(err.to_string().contains("must be distinct"));
    }

    #[test]
    fn test_custom_key_colliding_with_default_rejected() {
        let mut request = raw("staging", "admin_wp");
        request.config_type = "env".to_string();
        request.config_path = ".env".to_string();
        request.env_db_user_key = "DB_PASSWORD".to_string();
        assert!(validate(&request).is_err());
    }

    proptest! {
        #[test]
        fn prop_sanitized_prefix_charset(input in ".*") {
            let sanitized = sanitize_prefix(&input);
            prop_assert!(sanitized.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
        }

        #[test]
        fn prop_empty_sanitized_prefix_always_rejected(input in "[^A-Za-z0-9-]*") {
            let result = validate(&raw(&input, "admin_wp"));
            let is_validation_error = matches!(result, Err(StagerError::Validation { .. }));
            prop_assert!(is_validation_error);
        }

        #[test]
        fn prop_staging_domain_is_exact_concatenation(
            prefix in "[A-Za-z0-9-]{1,20}",
            domain in "[a-z0-9]{1,10}\\.[a-z]{2,6}",
        ) {
            let mut request = raw(&prefix, "admin_wp");
            request.source_domain = domain.clone();
            let request = validate(&request).unwrap();
            prop_assert_eq!(request.staging_domain(), format!("{prefix}.{domain}"));
        }
    }
}
