//! Scan configuration
//!
//! One configuration schema, validated in a single pass after argument
//! parsing: credential-file rotation and fixed username/secret are mutually
//! exclusive groups. All violations surface as `Config` errors before any
//! directory contact is attempted.

use std::path::PathBuf;

use crate::credentials::{CredentialPool, CredentialRotator, CredentialSource};
use crate::errors::{Result, ScanError};
use crate::secure_types::{Credential, SecretKind};

/// Validated inputs for one scan run.
#[derive(Default)]
pub struct ScanConfig {
    pub domain: String,
    pub domain_controller: String,
    /// Output name handed to report renderers; the engine never opens it.
    pub filename: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub hash: Option<String>,
    pub userfile: Option<PathBuf>,
    pub rotate: bool,
}

impl ScanConfig {
    /// Single validation pass over the mutually-exclusive credential groups,
    /// producing the credential source for the run.
    ///
    /// Rules:
    /// - `rotate` requires `userfile`, and vice versa;
    /// - rotating mode must yield a non-empty pool;
    /// - single mode requires `username` plus exactly one of
    ///   `password` / `hash`.
    pub fn credential_source(&self) -> Result<CredentialSource> {
        if self.rotate && self.userfile.is_none() {
            return Err(ScanError::Config(
                "--rotate can only be used with --userfile".to_string(),
            ));
        }
        if self.userfile.is_some() && !self.rotate {
            return Err(ScanError::Config(
                "--userfile must be used with --rotate".to_string(),
            ));
        }

        if let Some(path) = &self.userfile {
            let pool = CredentialPool::from_file(path)?;
            let rotator = CredentialRotator::new(pool)?;
            return Ok(CredentialSource::Rotating(rotator));
        }

        let username = self.username.clone().ok_or_else(|| {
            ScanError::Config("a username is required without --userfile".to_string())
        })?;

        match (&self.password, &self.hash) {
            (Some(_), Some(_)) => Err(ScanError::Config(
                "--password and --hash are mutually exclusive".to_string(),
            )),
            (Some(password), None) => Ok(CredentialSource::Single(Credential::new(
                username,
                password.clone(),
                SecretKind::Password,
            ))),
            (None, Some(hash)) => Ok(CredentialSource::Single(Credential::new(
                username,
                hash.clone(),
                SecretKind::Hash,
            ))),
            (None, None) => Err(ScanError::Config(
                "you must provide either a password or a hash".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn base_config() -> ScanConfig {
        ScanConfig {
            domain: "corp.local".to_string(),
            domain_controller: "dc01.corp.local".to_string(),
            filename: "report.json".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_rotate_without_userfile_is_config_error() {
        let config = ScanConfig {
            rotate: true,
            ..base_config()
        };
        assert!(matches!(
            config.credential_source(),
            Err(ScanError::Config(_))
        ));
    }

    #[test]
    fn test_userfile_without_rotate_is_config_error() {
        let config = ScanConfig {
            userfile: Some(PathBuf::from("users.txt")),
            ..base_config()
        };
        assert!(matches!(
            config.credential_source(),
            Err(ScanError::Config(_))
        ));
    }

    #[test]
    fn test_rotate_with_nonempty_userfile_succeeds() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "user1:pass1").unwrap();
        writeln!(file, "user2:HASH:aabbcc").unwrap();
        file.flush().unwrap();

        let config = ScanConfig {
            rotate: true,
            userfile: Some(file.path().to_path_buf()),
            ..base_config()
        };
        assert!(matches!(
            config.credential_source(),
            Ok(CredentialSource::Rotating(_))
        ));
    }

    #[test]
    fn test_rotate_with_empty_userfile_is_config_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = ScanConfig {
            rotate: true,
            userfile: Some(file.path().to_path_buf()),
            ..base_config()
        };
        assert!(matches!(
            config.credential_source(),
            Err(ScanError::Config(_))
        ));
    }

    #[test]
    fn test_single_mode_requires_a_secret() {
        let config = ScanConfig {
            username: Some("admin".to_string()),
            ..base_config()
        };
        assert!(matches!(
            config.credential_source(),
            Err(ScanError::Config(_))
        ));
    }

    #[test]
    fn test_single_mode_rejects_both_secrets() {
        let config = ScanConfig {
            username: Some("admin".to_string()),
            password: Some("pw".to_string()),
            hash: Some("aabb".to_string()),
            ..base_config()
        };
        assert!(matches!(
            config.credential_source(),
            Err(ScanError::Config(_))
        ));
    }

    #[test]
    fn test_single_mode_password() {
        let config = ScanConfig {
            username: Some("admin".to_string()),
            password: Some("Summer2024!".to_string()),
            ..base_config()
        };
        match config.credential_source().unwrap() {
            CredentialSource::Single(cred) => {
                assert_eq!(cred.identifier(), "admin");
                assert_eq!(cred.kind(), SecretKind::Password);
            }
            _ => panic!("expected single credential source"),
        }
    }

    #[test]
    fn test_single_mode_hash() {
        let config = ScanConfig {
            username: Some("admin".to_string()),
            hash: Some("8846f7eaee8fb117ad06bdd830b7586c".to_string()),
            ..base_config()
        };
        match config.credential_source().unwrap() {
            CredentialSource::Single(cred) => {
                assert_eq!(cred.kind(), SecretKind::Hash);
            }
            _ => panic!("expected single credential source"),
        }
    }

    #[test]
    fn test_single_mode_requires_username() {
        let config = ScanConfig {
            password: Some("pw".to_string()),
            ..base_config()
        };
        assert!(matches!(
            config.credential_source(),
            Err(ScanError::Config(_))
        ));
    }
}
