//! Staging database credential
//!
//! The password for the staging database user is drawn from the operating system's
//! CSPRNG and hex-encoded. It never depends on request fields, never appears in
//! `Debug` output, and is wiped from memory when dropped.

use std::fmt;

use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::error::{Result, request};

/// Number of random bytes behind each credential
pub const CREDENTIAL_BYTES: usize = 16;

/// Length of the hex-encoded credential
pub const CREDENTIAL_LEN: usize = CREDENTIAL_BYTES * 2;

/// A generated staging database password
#[derive(Clone, PartialEq, Eq)]
pub struct StagingCredential(Zeroizing<String>);

impl StagingCredential {
    /// Generate a fresh credential from the OS entropy source
    pub fn generate() -> Result<Self> {
        Self::generate_from(&mut OsRng)
    }

    /// Generate a credential from an explicit entropy source
    pub fn generate_from<R: RngCore + ?Sized>(rng: &mut R) -> Result<Self> {
        let mut bytes = Zeroizing::new([0u8; CREDENTIAL_BYTES]);
        rng.try_fill_bytes(&mut bytes[..])
            .map_err(|e| request::credential_failed(e.to_string()))?;
        Ok(Self(Zeroizing::new(hex::encode(&bytes[..]))))
    }

    /// Wrap a credential handed over by the launching process
    pub fn from_handoff(value: String) -> Result<Self> {
        if value.is_empty() {
            return Err(request::credential_failed(
                "no staging credential was handed to the job",
            ));
        }
        Ok(Self(Zeroizing::new(value)))
    }

    /// The plain-text password, for the database primitive and the config rewrite only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StagingCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StagingCredential([REDACTED])")
    }
}
