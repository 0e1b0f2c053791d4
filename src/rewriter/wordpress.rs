//! WordPress `wp-config.php` rewriting
//!
//! Targets the `define('DB_NAME', '...')`, `define('DB_USER', '...')` and
//! `define('DB_PASSWORD', '...')` statements. Only the quoted value literal is
//! replaced; spacing, quote style and the rest of the statement are kept as written.

use std::sync::LazyLock;

use regex::bytes::{Captures, Regex};

use super::{ConfigRewriter, ConnectionValues, Rewritten};
use crate::request::ConfigType;

/// Constants rewritten in a WordPress config, in reporting order
pub const CONSTANTS: [&str; 3] = ["DB_NAME", "DB_USER", "DB_PASSWORD"];

#[allow(clippy::expect_used)]
static DEFINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m-u)^(?P<head>[ \t]*(?i:define)\s*\(\s*['"](?P<name>DB_NAME|DB_USER|DB_PASSWORD)['"]\s*,\s*)(?:'(?P<single>(?:[^'\\]|\\.)*)'|"(?P<double>(?:[^"\\]|\\.)*)")(?P<tail>\s*\))"#,
    )
    .expect("define pattern is valid")
});

#[derive(Debug, Default, Clone, Copy)]
pub struct WordPressRewriter;

impl ConfigRewriter for WordPressRewriter {
    fn config_type(&self) -> ConfigType {
        ConfigType::WordPress
    }

    fn rewrite(&self, content: &[u8], values: &ConnectionValues<'_>) -> Rewritten {
        let mut found = [false; CONSTANTS.len()];

        let content = DEFINE_RE
            .replace_all(content, |caps: &Captures<'_>| {
                let (index, value) = match &caps["name"] {
                    b"DB_NAME" => (0, values.database),
                    b"DB_USER" => (1, values.user),
                    _ => (2, values.password),
                };
                found[index] = true;

                let literal = if caps.name("single").is_some() {
                    format!("'{}'", escape_single(value))
                } else {
                    format!("\"{}\"", escape_double(value))
                };
                let mut replacement = caps["head"].to_vec();
                replacement.extend_from_slice(literal.as_bytes());
                replacement.extend_from_slice(&caps["tail"]);
                replacement
            })
            .into_owned();

        let warnings = CONSTANTS
            .iter()
            .zip(found)
            .filter(|(_, was_found)| !was_found)
            .map(|(name, _)| format!("{name} is not defined with a literal value; left unchanged"))
            .collect();

        Rewritten { content, warnings }
    }
}

/// Escape for a PHP single-quoted string
fn escape_single(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Escape for a PHP double-quoted string
fn escape_double(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
}
