//! Directory session layer
//!
//! A session is ephemeral: opened with exactly one bind attempt for a chosen
//! credential, used for blocking subtree searches, then discarded. The
//! orchestrator depends on the traits here so the engine can run against a
//! simulated directory in tests; `LdapSessionProvider` is the production
//! implementation over the synchronous ldap3 client.

use std::time::Duration;

use ldap3::{LdapConn, LdapConnSettings, Scope, SearchEntry};
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::secure_types::Credential;

/// Transport-level connect timeout. The engine itself enforces no timeouts;
/// this is passed down to the connection settings.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// A live, bound directory session exposing one blocking search operation.
pub trait DirectorySession {
    /// Execute one filtered subtree search. An empty result set is `Ok`,
    /// not an error.
    fn search(
        &mut self,
        base_dn: &str,
        filter: &str,
        attrs: &[&str],
    ) -> Result<Vec<SearchEntry>>;
}

/// Opens sessions against a fixed endpoint and domain. Exactly one
/// authentication attempt per call; a rejected bind is an `Auth` error,
/// never retried.
pub trait SessionProvider {
    type Session: DirectorySession;

    fn open(&self, credential: &Credential) -> Result<Self::Session>;
}

/// Derive the search base from the domain name: `corp.example.com` becomes
/// `DC=corp,DC=example,DC=com`. Computed once per run.
pub fn base_dn_for_domain(domain: &str) -> String {
    domain
        .split('.')
        .filter(|part| !part.is_empty())
        .map(|part| format!("DC={}", part))
        .collect::<Vec<_>>()
        .join(",")
}

/// Production session provider over ldap3.
pub struct LdapSessionProvider {
    endpoint: String,
    domain: String,
}

impl LdapSessionProvider {
    pub fn new(endpoint: String, domain: String) -> Self {
        Self { endpoint, domain }
    }

    fn ldap_url(&self) -> String {
        let use_ldaps = self.endpoint.ends_with(":636") || self.endpoint.contains("ldaps://");
        if use_ldaps {
            format!("ldaps://{}", self.endpoint.replace("ldaps://", ""))
        } else {
            format!("ldap://{}", self.endpoint.replace("ldap://", ""))
        }
    }
}

impl SessionProvider for LdapSessionProvider {
    type Session = LdapSession;

    fn open(&self, credential: &Credential) -> Result<LdapSession> {
        let url = self.ldap_url();
        info!(
            "connecting to {} as {}\\{}",
            url,
            self.domain,
            credential.identifier()
        );

        // Relaxed TLS verification: enterprise DCs commonly present
        // self-signed or internal-CA certificates.
        let settings = LdapConnSettings::new()
            .set_conn_timeout(CONNECT_TIMEOUT)
            .set_no_tls_verify(true);

        let mut conn = LdapConn::with_settings(settings, &url)?;

        // Down-level logon name, qualified with the domain. The secret is
        // whatever the credential carries: password or hash material,
        // according to its kind.
        let principal = format!("{}\\{}", self.domain, credential.identifier());
        conn.simple_bind(&principal, credential.secret())?.success()?;

        debug!("bind succeeded for {}", principal);
        Ok(LdapSession { conn })
    }
}

/// A bound ldap3 connection. Unbinds on drop.
pub struct LdapSession {
    conn: LdapConn,
}

impl DirectorySession for LdapSession {
    fn search(
        &mut self,
        base_dn: &str,
        filter: &str,
        attrs: &[&str],
    ) -> Result<Vec<SearchEntry>> {
        let result = self
            .conn
            .search(base_dn, Scope::Subtree, filter, attrs.to_vec())?;
        let (entries, status) = (result.0, result.1);

        // rc=4 is sizeLimitExceeded; the partial result set is still usable
        if status.rc == 4 {
            warn!(
                "size limit exceeded for filter {}, keeping {} partial entries",
                filter,
                entries.len()
            );
        } else if status.rc != 0 {
            return Err(ldap3::LdapError::LdapResult { result: status }.into());
        }

        Ok(entries.into_iter().map(SearchEntry::construct).collect())
    }
}

impl Drop for LdapSession {
    fn drop(&mut self) {
        let _ = self.conn.unbind();
    }
}
