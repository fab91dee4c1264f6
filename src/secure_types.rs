//! Secure credential types
//!
//! Credential storage that automatically zeros sensitive data from memory
//! when dropped, preventing secret exposure through memory dumps or
//! debugging tools.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A secure string that automatically zeros its contents when dropped.
///
/// Used for any sensitive string data such as passwords or hash material.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecureString {
    inner: Vec<u8>,
}

impl SecureString {
    /// Creates a new SecureString, consuming the original String.
    pub fn new(s: String) -> Self {
        Self {
            inner: s.into_bytes(),
        }
    }

    /// Temporarily exposes the secret as a string slice.
    ///
    /// # Security
    /// The returned reference should be used immediately and not stored.
    pub fn expose_secret(&self) -> &str {
        // SecureString can only be constructed from String (valid UTF-8)
        std::str::from_utf8(&self.inner)
            .expect("SecureString invariant violated: contains invalid UTF-8")
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecureString([REDACTED])")
    }
}

/// How the secret of a credential is to be interpreted at bind time.
///
/// Exactly one interpretation is active for a given credential; a credential
/// never carries both a password and a hash for the same attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    Password,
    Hash,
}

/// One authentication identity: identifier plus secret plus its kind.
///
/// Immutable once constructed. The secret is zeroed from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    identifier: String,
    secret: SecureString,
    #[zeroize(skip)]
    kind: SecretKind,
}

impl Credential {
    pub fn new(identifier: String, secret: String, kind: SecretKind) -> Self {
        Self {
            identifier,
            secret: SecureString::new(secret),
            kind,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Temporarily exposes the secret for a bind attempt.
    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }

    pub fn kind(&self) -> SecretKind {
        self.kind
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("secret", &"[REDACTED]")
            .field("kind", &self.kind)
            .finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.identifier, self.kind)
    }
}
