//! Service configuration.
//!
//! A small TOML document configures the deployment-specific values the
//! pipeline itself does not own — currently the public origin used to
//! build verification URLs for the rendering layer.

use std::path::Path;

use serde::Deserialize;

use sigil_contracts::{SigilError, SigilResult};

/// Deployment configuration, loaded from TOML.
///
/// ```toml
/// origin = "https://receipts.example.com"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Public origin the verification page is served from.  A trailing
    /// slash is tolerated.
    pub origin: String,
}

impl ServiceConfig {
    /// Parse `s` as TOML configuration.
    ///
    /// Returns `SigilError::Config` if the TOML is malformed or missing
    /// required keys.
    pub fn from_toml_str(s: &str) -> SigilResult<Self> {
        toml::from_str(s).map_err(|e| SigilError::Config {
            reason: format!("failed to parse service config TOML: {e}"),
        })
    }

    /// Read the file at `path` and parse it as TOML configuration.
    pub fn from_file(path: &Path) -> SigilResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| SigilError::Config {
            reason: format!("failed to read config file '{}': {e}", path.display()),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The URL at which the given receipt can be verified.
    ///
    /// This — together with the sealed receipt itself — is the input to
    /// the external rendering layer (PDF/QR).  The URL is a lookup
    /// convenience: possession of it proves nothing about authenticity.
    pub fn verification_url(&self, receipt_id: &str) -> String {
        format!("{}/verify/{}", self.origin.trim_end_matches('/'), receipt_id)
    }
}
