//! Error handling module
//!
//! Structured error types for the scan engine. Configuration problems are
//! fatal and surface before any directory contact; bind and search failures
//! are recovered per category by the orchestrator.

use thiserror::Error;

/// Main error type for scan operations
#[derive(Error, Debug)]
pub enum ScanError {
    /// Invalid or contradictory configuration input
    #[error("Configuration error: {0}")]
    Config(String),

    /// A credential failed to bind
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A search failed after a successful bind (protocol/network fault)
    #[error("Directory operation failed: {0}")]
    Directory(String),
}

impl From<ldap3::LdapError> for ScanError {
    fn from(err: ldap3::LdapError) -> Self {
        match err {
            ldap3::LdapError::LdapResult { result } => match result.rc {
                // 49 = invalidCredentials
                49 => ScanError::Auth(format!("invalid credentials: {}", result.text)),
                _ => ScanError::Directory(format!(
                    "LDAP error code {}: {}",
                    result.rc, result.text
                )),
            },
            ldap3::LdapError::EndOfStream => {
                ScanError::Directory("connection closed unexpectedly".to_string())
            }
            ldap3::LdapError::Io { source } => {
                ScanError::Directory(format!("I/O error: {}", source))
            }
            _ => ScanError::Directory(format!("LDAP error: {}", err)),
        }
    }
}

/// Result type alias for scan operations
pub type Result<T> = std::result::Result<T, ScanError>;
