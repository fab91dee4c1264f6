//! Credential pool loading and rotation
//!
//! A pool is loaded once at startup from a plain-text file, one
//! `identifier:secret` entry per line. A secret beginning with the literal
//! `HASH` marker is treated as hash material rather than a password.
//!
//! The rotator hands out credentials round-robin with a full-cycle reset:
//! every pool member is used exactly once before any repeats, deterministic
//! given the pool's file order.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::errors::{Result, ScanError};
use crate::secure_types::{Credential, SecretKind};

/// Ordered, read-only sequence of credentials loaded at startup.
#[derive(Debug)]
pub struct CredentialPool {
    entries: Vec<Credential>,
}

impl CredentialPool {
    pub fn new(entries: Vec<Credential>) -> Self {
        Self { entries }
    }

    /// Load a pool from a credential file.
    ///
    /// Blank lines and lines without a `:` separator are skipped with a
    /// warning. The file itself being unreadable is a configuration error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ScanError::Config(format!(
                "cannot read credential file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut entries = Vec::new();
        for (lineno, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.split_once(':') {
                Some((identifier, secret)) if !identifier.is_empty() => {
                    entries.push(parse_credential(identifier, secret));
                }
                _ => {
                    warn!(
                        "skipping malformed credential file line {} (expected identifier:secret)",
                        lineno + 1
                    );
                }
            }
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Interpret one `identifier:secret` pair, honoring the `HASH` marker.
fn parse_credential(identifier: &str, secret: &str) -> Credential {
    if let Some(rest) = secret.strip_prefix("HASH") {
        let material = rest.trim_start_matches(':').to_string();
        Credential::new(identifier.to_string(), material, SecretKind::Hash)
    } else {
        Credential::new(identifier.to_string(), secret.to_string(), SecretKind::Password)
    }
}

/// Selects the next credential per query without repeating any pool member
/// until the whole pool has been used once.
#[derive(Debug)]
pub struct CredentialRotator {
    pool: CredentialPool,
    used: HashSet<String>,
}

impl CredentialRotator {
    /// Construction fails on an empty pool; `next` can then never starve.
    pub fn new(pool: CredentialPool) -> Result<Self> {
        if pool.is_empty() {
            return Err(ScanError::Config(
                "credential pool is empty".to_string(),
            ));
        }
        Ok(Self {
            pool,
            used: HashSet::new(),
        })
    }

    /// Select the next unused credential in original pool order; once all
    /// have been used, the used-set is cleared before choosing again.
    pub fn next(&mut self) -> &Credential {
        if self.used.len() == self.pool.len() {
            self.used.clear();
        }
        let idx = self
            .pool
            .entries
            .iter()
            .position(|c| !self.used.contains(c.identifier()))
            .unwrap_or(0);
        let credential = &self.pool.entries[idx];
        self.used.insert(credential.identifier().to_string());
        credential
    }
}

/// Where the orchestrator gets its authenticating identity from.
pub enum CredentialSource {
    /// One fixed credential reused for every query, no rotation state.
    Single(Credential),
    /// A rotating pool: a fresh credential per query.
    Rotating(CredentialRotator),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn pool_of(identifiers: &[&str]) -> CredentialPool {
        CredentialPool::new(
            identifiers
                .iter()
                .map(|id| {
                    Credential::new(id.to_string(), "pw".to_string(), SecretKind::Password)
                })
                .collect(),
        )
    }

    #[test]
    fn test_rotation_covers_pool_without_repeats() {
        let mut rotator = CredentialRotator::new(pool_of(&["a", "b", "c"])).unwrap();
        let first_cycle: Vec<String> = (0..3)
            .map(|_| rotator.next().identifier().to_string())
            .collect();
        assert_eq!(first_cycle, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_rotation_resets_after_full_cycle() {
        let mut rotator = CredentialRotator::new(pool_of(&["a", "b"])).unwrap();
        let picks: Vec<String> = (0..6)
            .map(|_| rotator.next().identifier().to_string())
            .collect();
        // After N selections the (N+1)-th matches the 1st, for N = pool size
        assert_eq!(picks, vec!["a", "b", "a", "b", "a", "b"]);
    }

    #[test]
    fn test_rotation_single_member_never_starves() {
        let mut rotator = CredentialRotator::new(pool_of(&["only"])).unwrap();
        for _ in 0..4 {
            assert_eq!(rotator.next().identifier(), "only");
        }
    }

    #[test]
    fn test_empty_pool_fails_at_construction() {
        let err = CredentialRotator::new(pool_of(&[])).unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }

    #[test]
    fn test_from_file_parses_passwords_and_hashes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "user1:Summer2024!").unwrap();
        writeln!(file, "user2:HASH:aad3b435b51404eeaad3b435b51404ee").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "not-a-credential-line").unwrap();
        file.flush().unwrap();

        let pool = CredentialPool::from_file(file.path()).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.entries[0].identifier(), "user1");
        assert_eq!(pool.entries[0].kind(), SecretKind::Password);
        assert_eq!(pool.entries[0].secret(), "Summer2024!");
        assert_eq!(pool.entries[1].kind(), SecretKind::Hash);
        assert_eq!(pool.entries[1].secret(), "aad3b435b51404eeaad3b435b51404ee");
    }

    #[test]
    fn test_from_file_hash_marker_without_separator() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "user3:HASH8846f7eaee8fb117ad06bdd830b7586c").unwrap();
        file.flush().unwrap();

        let pool = CredentialPool::from_file(file.path()).unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.entries[0].kind(), SecretKind::Hash);
        assert_eq!(pool.entries[0].secret(), "8846f7eaee8fb117ad06bdd830b7586c");
    }

    #[test]
    fn test_from_file_missing_is_config_error() {
        let err = CredentialPool::from_file(Path::new("/nonexistent/users.txt")).unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }

    #[test]
    fn test_secret_containing_colons_is_preserved() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "user4:pass:with:colons").unwrap();
        file.flush().unwrap();

        let pool = CredentialPool::from_file(file.path()).unwrap();
        assert_eq!(pool.entries[0].secret(), "pass:with:colons");
    }
}
