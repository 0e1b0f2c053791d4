//! dotenv (`KEY=VALUE`) rewriting
//!
//! Key names come from the request because every framework names its database keys
//! differently. Matching lines keep their key, any `export ` prefix, spacing around
//! `=`, quote style and trailing comment; only the value is replaced. A key that is not
//! present gets one `KEY=VALUE` line appended at the end of the file.

use super::{ConfigRewriter, ConnectionValues, Rewritten};
use crate::request::{ConfigType, EnvKeyMap};

#[derive(Debug, Clone, Default)]
pub struct DotenvRewriter {
    keys: EnvKeyMap,
}

impl DotenvRewriter {
    pub fn new(keys: EnvKeyMap) -> Self {
        Self { keys }
    }
}

impl ConfigRewriter for DotenvRewriter {
    fn config_type(&self) -> ConfigType {
        ConfigType::Env
    }

    fn rewrite(&self, content: &[u8], values: &ConnectionValues<'_>) -> Rewritten {
        let targets = [
            (self.keys.db_name_key.as_str(), values.database),
            (self.keys.db_user_key.as_str(), values.user),
            (self.keys.db_pass_key.as_str(), values.password),
        ];
        let mut found = [false; 3];
        let mut out = Vec::with_capacity(content.len() + 64);

        for line in content.split_inclusive(|b| *b == b'\n') {
            let (body, ending) = split_line_ending(line);
            let replaced = line_key(body).and_then(|(key, eq)| {
                let index = targets.iter().position(|(k, _)| *k == key)?;
                // Keys sharing a name all count as present
                for (i, (k, _)) in targets.iter().enumerate() {
                    found[i] |= *k == key;
                }
                let mut new_body = body[..=eq].to_vec();
                new_body.extend_from_slice(&replace_value(&body[eq + 1..], targets[index].1));
                Some(new_body)
            });
            match replaced {
                Some(new_body) => out.extend_from_slice(&new_body),
                None => out.extend_from_slice(body),
            }
            out.extend_from_slice(ending);
        }

        let newline: &[u8] = if content.windows(2).any(|w| w == b"\r\n") {
            &b"\r\n"[..]
        } else {
            &b"\n"[..]
        };
        for (i, ((key, value), was_found)) in targets.iter().zip(found).enumerate() {
            if was_found || targets[..i].iter().any(|(k, _)| k == key) {
                continue;
            }
            if !out.is_empty() && !out.ends_with(b"\n") {
                out.extend_from_slice(newline);
            }
            out.extend_from_slice(key.as_bytes());
            out.push(b'=');
            out.extend_from_slice(render_unquoted(value).as_bytes());
            out.extend_from_slice(newline);
        }

        Rewritten {
            content: out,
            warnings: Vec::new(),
        }
    }
}

fn split_line_ending(line: &[u8]) -> (&[u8], &[u8]) {
    if let Some(body) = line.strip_suffix(b"\r\n") {
        (body, &b"\r\n"[..])
    } else if let Some(body) = line.strip_suffix(b"\n") {
        (body, &b"\n"[..])
    } else {
        (line, &b""[..])
    }
}

/// Key of an assignment line and the byte index of its `=`
fn line_key(body: &[u8]) -> Option<(&str, usize)> {
    if body.trim_ascii_start().starts_with(b"#") {
        return None;
    }
    let eq = body.iter().position(|b| *b == b'=')?;
    let key = std::str::from_utf8(body[..eq].trim_ascii()).ok()?;
    let key = key
        .strip_prefix("export")
        .filter(|rest| rest.starts_with([' ', '\t']))
        .map_or(key, str::trim_start);
    if key.is_empty() {
        return None;
    }
    Some((key, eq))
}

/// Replace the value part after `=`, keeping spacing, quotes and comments
fn replace_value(rest: &[u8], value: &str) -> Vec<u8> {
    let trimmed = rest.trim_ascii_start();
    let lead = &rest[..rest.len() - trimmed.len()];
    let mut out = lead.to_vec();

    match trimmed.first() {
        Some(&(quote @ (b'"' | b'\''))) => {
            let after_open = &trimmed[1..];
            let trailer =
                closing_quote(after_open, quote).map_or(&b""[..], |end| &after_open[end + 1..]);
            let escaped = if quote == b'"' {
                value.replace('\\', "\\\\").replace('"', "\\\"")
            } else {
                value.to_string()
            };
            out.push(quote);
            out.extend_from_slice(escaped.as_bytes());
            out.push(quote);
            out.extend_from_slice(trailer);
        }
        _ => {
            let trailer = trimmed
                .windows(2)
                .position(|w| w == b" #" || w == b"\t#")
                .map_or(&b""[..], |i| &trimmed[i..]);
            out.extend_from_slice(render_unquoted(value).as_bytes());
            out.extend_from_slice(trailer);
        }
    }
    out
}

fn closing_quote(s: &[u8], quote: u8) -> Option<usize> {
    let mut escaped = false;
    for (i, &c) in s.iter().enumerate() {
        if escaped {
            escaped = false;
        } else if c == b'\\' && quote == b'"' {
            escaped = true;
        } else if c == quote {
            return Some(i);
        }
    }
    None
}

/// Write a bare value, quoting only when dotenv parsers would misread it
fn render_unquoted(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '\\' | '$'));
    if needs_quotes {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VALUES: ConnectionValues<'static> = ConnectionValues {
        database: "admin_stg_staging_1a2b3c4d",
        user: "admin_stg_staging_1a2b3c4d",
        password: "5f0c9e7a1b2d3c4e5f6a7b8c9d0e1f2a",
    };

    const LARAVEL_ENV: &str = "APP_NAME=Laravel\n\
APP_ENV=production\n\
\n\
DB_CONNECTION=mysql\n\
DB_HOST=127.0.0.1\n\
DB_DATABASE=admin_shop\n\
DB_USERNAME=admin_shop\n\
DB_PASSWORD=\"old secret\"\n";

    fn rewrite_with(rewriter: &DotenvRewriter, input: &str, values: &ConnectionValues<'_>) -> String {
        String::from_utf8(rewriter.rewrite(input.as_bytes(), values).content).unwrap()
    }

    fn rewrite(input: &str) -> String {
        rewrite_with(&DotenvRewriter::default(), input, &VALUES)
    }

    #[test]
    fn test_rewrites_laravel_env() {
        assert_eq!(
            rewrite(LARAVEL_ENV),
            "APP_NAME=Laravel\n\
APP_ENV=production\n\
\n\
DB_CONNECTION=mysql\n\
DB_HOST=127.0.0.1\n\
DB_DATABASE=admin_stg_staging_1a2b3c4d\n\
DB_USERNAME=admin_stg_staging_1a2b3c4d\n\
DB_PASSWORD=\"5f0c9e7a1b2d3c4e5f6a7b8c9d0e1f2a\"\n"
        );
    }

    #[test]
    fn test_missing_password_key_appends_one_line() {
        let out = rewrite("DB_DATABASE=admin_shop\nDB_USERNAME=admin_shop\n");

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "DB_PASSWORD=5f0c9e7a1b2d3c4e5f6a7b8c9d0e1f2a");
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_append_after_missing_trailing_newline() {
        let out = rewrite("DB_DATABASE=local");
        assert_eq!(
            out,
            "DB_DATABASE=admin_stg_staging_1a2b3c4d\n\
             DB_USERNAME=admin_stg_staging_1a2b3c4d\n\
             DB_PASSWORD=5f0c9e7a1b2d3c4e5f6a7b8c9d0e1f2a\n"
        );
    }

    #[test]
    fn test_shared_key_name_is_stable_across_runs() {
        let rewriter = DotenvRewriter::new(EnvKeyMap {
            db_name_key: "DB".to_string(),
            db_user_key: "DB".to_string(),
            db_pass_key: "DB_PASS".to_string(),
        });
        let values = ConnectionValues {
            database: "d",
            user: "u",
            password: "p",
        };

        let once = rewrite_with(&rewriter, "DB=x\n", &values);
        let twice = rewrite_with(&rewriter, &once, &values);

        assert_eq!(once, "DB=d\nDB_PASS=p\n");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_custom_keys() {
        let keys = EnvKeyMap {
            db_name_key: "DATABASE_NAME".to_string(),
            db_user_key: "DATABASE_USER".to_string(),
            db_pass_key: "DATABASE_PASSWORD".to_string(),
        };
        let input = "DATABASE_NAME=a\nDATABASE_USER=b\nDATABASE_PASSWORD=c\nDB_DATABASE=keep\n";
        let out = rewrite_with(&DotenvRewriter::new(keys), input, &VALUES);
        assert!(out.ends_with("DB_DATABASE=keep\n"));
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn test_keeps_export_spacing_and_comment() {
        let out = rewrite("export DB_DATABASE = live_db # production\n");
        assert!(out.starts_with("export DB_DATABASE = admin_stg_staging_1a2b3c4d # production\n"));
    }

    #[test]
    fn test_single_quotes_kept() {
        let out = rewrite("DB_USERNAME='root'\n");
        assert!(out.starts_with("DB_USERNAME='admin_stg_staging_1a2b3c4d'\n"));
    }

    #[test]
    fn test_commented_key_is_not_a_match() {
        let out = rewrite("# DB_PASSWORD=example\n");
        assert!(out.starts_with("# DB_PASSWORD=example\n"));
        assert!(out.ends_with("DB_PASSWORD=5f0c9e7a1b2d3c4e5f6a7b8c9d0e1f2a\n"));
    }

    #[test]
    fn test_crlf_preserved() {
        assert_eq!(
            rewrite("DB_DATABASE=a\r\nDB_USERNAME=b\r\n"),
            "DB_DATABASE=admin_stg_staging_1a2b3c4d\r\n\
             DB_USERNAME=admin_stg_staging_1a2b3c4d\r\n\
             DB_PASSWORD=5f0c9e7a1b2d3c4e5f6a7b8c9d0e1f2a\r\n"
        );
    }

    #[test]
    fn test_similar_prefix_key_not_matched() {
        let out = rewrite("DB_DATABASE_URL=mysql://x\n");
        assert!(out.starts_with("DB_DATABASE_URL=mysql://x\n"));
    }

    #[test]
    fn test_non_utf8_lines_kept_byte_for_byte() {
        let input = b"APP_NAME=Caf\xe9\n# r\xe9sum\xe9\nDB_DATABASE=live\n";
        let out = DotenvRewriter::default().rewrite(input, &VALUES).content;

        assert!(out.starts_with(b"APP_NAME=Caf\xe9\n# r\xe9sum\xe9\nDB_DATABASE=admin_stg_staging_1a2b3c4d\n"));
        assert_eq!(DotenvRewriter::default().rewrite(&out, &VALUES).content, out);
    }

    #[test]
    fn test_render_unquoted() {
        assert_eq!(render_unquoted("abc"), "abc");
        assert_eq!(render_unquoted("a b"), "\"a b\"");
        assert_eq!(render_unquoted(""), "\"\"");
    }

    #[test]
    fn test_idempotent_on_sample() {
        let once = rewrite("APP=1\n");
        assert_eq!(rewrite(&once), once);
    }

    proptest! {
        #[test]
        fn prop_missing_key_appends_exactly_one_line(
            lines in proptest::collection::vec("[A-Z]{1,8}_X=[a-z0-9]{0,10}", 0..10),
            password in "[a-f0-9]{32}",
        ) {
            let mut input = String::from("DB_DATABASE=a\nDB_USERNAME=b\n");
            for line in &lines {
                input.push_str(line);
                input.push('\n');
            }
            let values = ConnectionValues { database: "a", user: "b", password: &password };
            let rewriter = DotenvRewriter::default();
            let out = rewrite_with(&rewriter, &input, &values);

            prop_assert_eq!(out.lines().count(), input.lines().count() + 1);
            prop_assert!(out.starts_with(&input));
            let expected_tail = format!("DB_PASSWORD={password}\n");
            prop_assert!(out.ends_with(&expected_tail));

            let twice = rewrite_with(&rewriter, &out, &values);
            prop_assert_eq!(out, twice);
        }
    }
}
