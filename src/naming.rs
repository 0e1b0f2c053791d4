//! Staging database naming
//!
//! Names are derived from the staging domain only, never from the caller's database
//! field, so they cannot carry injected SQL or shell text and stay the same when the
//! same request is run again.

use blake3::Hasher;

use crate::request::ProvisioningRequest;

/// Prefix marking database objects created by sitestager
pub const STEM_PREFIX: &str = "stg_";

/// Maximum number of prefix characters kept in the stem
const PREFIX_CHARS: usize = 10;

/// Number of hash hex characters appended to the stem
const HASH_CHARS: usize = 8;

/// MySQL user names are limited to 32 characters
const MAX_IDENTIFIER_LEN: usize = 32;

/// Names of the staging database and its dedicated user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingDatabase {
    /// Unqualified name handed to host primitives that add the owner prefix themselves
    pub stem: String,
    /// Owner-qualified database name, as the application sees it
    pub database: String,
    /// Owner-qualified database user, as the application sees it
    pub user: String,
}

impl StagingDatabase {
    pub fn for_request(request: &ProvisioningRequest) -> Self {
        let owner = identifier_safe(request.requesting_user());
        let stem = database_stem(&owner, request.staging_prefix(), &request.staging_domain());
        let qualified = format!("{owner}_{stem}");
        Self {
            database: qualified.clone(),
            user: qualified,
            stem,
        }
    }
}

/// Build the `stg_<prefix>_<hash>` stem for a staging domain
///
/// The prefix label is shortened so that `<owner>_<stem>` fits a MySQL user name. The
/// hash is always kept whole; once there is no room left for the label the stem is
/// `stg_<hash>`.
pub fn database_stem(owner: &str, prefix: &str, staging_domain: &str) -> String {
    let fixed = owner.len() + 1 + STEM_PREFIX.len() + 1 + HASH_CHARS;
    let budget = MAX_IDENTIFIER_LEN.saturating_sub(fixed).min(PREFIX_CHARS);
    let label: String = identifier_safe(&prefix.to_ascii_lowercase().replace('-', "_"))
        .chars()
        .take(budget)
        .collect();

    let mut hasher = Hasher::new();
    hasher.update(staging_domain.as_bytes());
    let digest = hasher.finalize().to_hex();
    let hash = &digest[..HASH_CHARS];

    if label.is_empty() {
        format!("{STEM_PREFIX}{hash}")
    } else {
        format!("{STEM_PREFIX}{label}_{hash}")
    }
}

/// Keep only `[A-Za-z0-9_]`
fn identifier_safe(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}
