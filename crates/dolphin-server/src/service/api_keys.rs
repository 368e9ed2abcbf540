//! Static API key set.

use std::collections::BTreeSet;
use std::fmt;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::service::{Error, Result};

/// Number of hex characters kept from a key hash for logging.
const FINGERPRINT_LEN: usize = 12;

/// Keys accepted by the API.
///
/// Loaded once at startup and never mutated. An empty set disables
/// authentication entirely.
#[derive(Clone, Default)]
pub struct ApiKeys {
    keys: Arc<BTreeSet<String>>,
}

impl ApiKeys {
    /// Creates a key set, trimming entries and dropping empty ones.
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let keys = keys
            .into_iter()
            .map(|key| key.as_ref().trim().to_owned())
            .filter(|key| !key.is_empty())
            .collect();

        Self {
            keys: Arc::new(keys),
        }
    }

    /// Creates an empty key set; every request is authorized.
    #[inline]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Loads keys from an inline list and an optional key file.
    ///
    /// The inline list is split on commas and whitespace. The file holds one
    /// key per line; blank lines and lines starting with `#` are ignored. A
    /// missing file is logged and skipped.
    pub async fn load(inline: Option<&str>, file: Option<&Path>) -> Result<Self> {
        let mut keys = inline.map(parse_inline).unwrap_or_default();

        if let Some(path) = file {
            match tokio::fs::read_to_string(path).await {
                Ok(contents) => {
                    let file_keys = parse_key_file(&contents);
                    tracing::debug!(
                        target: TRACING_TARGET_AUTHENTICATION,
                        path = %path.display(),
                        count = file_keys.len(),
                        "Loaded API keys file"
                    );
                    keys.extend(file_keys);
                }
                Err(err) if err.kind() == IoErrorKind::NotFound => {
                    tracing::warn!(
                        target: TRACING_TARGET_AUTHENTICATION,
                        path = %path.display(),
                        "API keys file not found, ignoring"
                    );
                }
                Err(err) => {
                    return Err(Error::file_system(format!(
                        "cannot read API keys file {}",
                        path.display()
                    ))
                    .with_source(err));
                }
            }
        }

        let api_keys = Self::new(keys);
        if api_keys.is_enabled() {
            tracing::info!(
                target: TRACING_TARGET_AUTHENTICATION,
                count = api_keys.len(),
                "API key authentication enabled"
            );
        } else {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                "No API keys configured, authentication disabled"
            );
        }

        Ok(api_keys)
    }

    /// Returns true if requests must present a key.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Number of distinct keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if no key is configured.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns true if `key` is one of the configured keys.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Short, non-reversible identifier of a key for logs.
    pub fn fingerprint(key: &str) -> String {
        let digest = Sha256::digest(key.as_bytes());
        let mut encoded = hex::encode(digest);
        encoded.truncate(FINGERPRINT_LEN);
        encoded
    }
}

impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fingerprints: Vec<String> = self.keys.iter().map(|k| Self::fingerprint(k)).collect();
        f.debug_struct("ApiKeys")
            .field("fingerprints", &fingerprints)
            .finish()
    }
}

/// Splits an inline key list on commas and whitespace.
fn parse_inline(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|key| !key.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Reads one key per line, skipping blanks and `#` comments.
fn parse_key_file(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn inline_keys_split_on_commas_and_whitespace() {
        let keys = parse_inline("alpha, beta\tgamma\n,delta,,");
        assert_eq!(keys, ["alpha", "beta", "gamma", "delta"]);
    }

    #[test]
    fn key_file_skips_comments_and_blanks() {
        let keys = parse_key_file("# production\nalpha\n\n  beta  \n#gamma\n");
        assert_eq!(keys, ["alpha", "beta"]);
    }

    #[test]
    fn duplicates_are_merged() {
        let keys = ApiKeys::new(["alpha", " alpha ", "beta", ""]);
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("alpha"));
        assert!(!keys.contains(""));
    }

    #[test]
    fn empty_set_disables_auth() {
        assert!(!ApiKeys::disabled().is_enabled());
        assert!(ApiKeys::new(["k"]).is_enabled());
    }

    #[test]
    fn fingerprints_hide_keys() {
        let fingerprint = ApiKeys::fingerprint("sk-secret");
        assert_eq!(fingerprint.len(), FINGERPRINT_LEN);
        assert!(!fingerprint.contains("secret"));
        assert_eq!(fingerprint, ApiKeys::fingerprint("sk-secret"));

        let debug = format!("{:?}", ApiKeys::new(["sk-secret"]));
        assert!(!debug.contains("sk-secret"));
    }

    #[tokio::test]
    async fn load_merges_inline_and_file() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "# keys")?;
        writeln!(file, "from-file")?;
        writeln!(file, "shared")?;

        let keys = ApiKeys::load(Some("inline,shared"), Some(file.path())).await?;
        assert_eq!(keys.len(), 3);
        assert!(keys.contains("from-file"));
        assert!(keys.contains("inline"));
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_ignored() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("absent.txt");

        let keys = ApiKeys::load(Some("only"), Some(&path)).await?;
        assert_eq!(keys.len(), 1);

        let keys = ApiKeys::load(None, Some(&path)).await?;
        assert!(!keys.is_enabled());
        Ok(())
    }
}
