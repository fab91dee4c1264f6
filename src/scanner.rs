//! Enumeration orchestrator
//!
//! The core control loop: for each catalog query, select a credential, open
//! a session, execute the search, shape the entries, and append the
//! category-tagged records to the aggregate. Strictly sequential — no query
//! begins before the previous one's session is closed and its records
//! appended.
//!
//! Failure policy: in rotating mode a rejected bind or a failed search skips
//! exactly that query's category (zero records) and the run continues with
//! the next rotated credential. With a single fixed credential there is
//! nothing to rotate to, so the one bind failure is a run-level error.

use tracing::{info, warn};

use crate::catalog::{catalog, Query};
use crate::common_types::{Finding, FindingCategory};
use crate::credentials::CredentialSource;
use crate::errors::Result;
use crate::session::{base_dn_for_domain, DirectorySession, SessionProvider};

/// Observer capability for discrete scan events. Purely observational; no
/// effect on engine state. The engine never owns or initializes console
/// output.
pub trait ScanObserver {
    fn query_started(&self, _step: usize, _total: usize, _category: FindingCategory) {}
    /// Fires once per attempted category, including skipped ones.
    fn query_advanced(&self, _step: usize, _total: usize) {}
    fn category_count(&self, _category: FindingCategory, _count: usize) {}
}

/// Observer that ignores every event.
pub struct NullObserver;

impl ScanObserver for NullObserver {}

/// Credential-rotating enumeration engine.
pub struct Scanner<P: SessionProvider> {
    provider: P,
    source: CredentialSource,
    base_dn: String,
}

impl<P: SessionProvider> Scanner<P> {
    pub fn new(provider: P, source: CredentialSource, domain: &str) -> Self {
        Self {
            provider,
            source,
            base_dn: base_dn_for_domain(domain),
        }
    }

    /// Run the full catalog exactly once and return the aggregate.
    pub fn run(&mut self, observer: &dyn ScanObserver) -> Result<Vec<Finding>> {
        let queries = catalog();
        let total = queries.len();
        let mut aggregate = Vec::new();

        match &mut self.source {
            CredentialSource::Single(credential) => {
                // One bind before the first query; the session is reused for
                // all six searches.
                let mut session = self.provider.open(credential)?;
                for (i, query) in queries.iter().enumerate() {
                    let step = i + 1;
                    observer.query_started(step, total, query.category);
                    let count =
                        collect(&mut session, &self.base_dn, query, &mut aggregate);
                    observer.category_count(query.category, count);
                    observer.query_advanced(step, total);
                }
            }
            CredentialSource::Rotating(rotator) => {
                for (i, query) in queries.iter().enumerate() {
                    let step = i + 1;
                    observer.query_started(step, total, query.category);
                    let credential = rotator.next();
                    let count = match self.provider.open(credential) {
                        Ok(mut session) => {
                            collect(&mut session, &self.base_dn, query, &mut aggregate)
                        }
                        Err(e) => {
                            warn!(
                                "skipping category {} — bind failed for {}: {}",
                                query.category,
                                credential.identifier(),
                                e
                            );
                            0
                        }
                    };
                    observer.category_count(query.category, count);
                    observer.query_advanced(step, total);
                }
            }
        }

        info!("scan complete: {} records", aggregate.len());
        Ok(aggregate)
    }
}

/// Execute one query on an open session and append its shaped records.
/// Returns the number of records appended; a failed search yields zero and
/// leaves the aggregate untouched.
fn collect<S: DirectorySession>(
    session: &mut S,
    base_dn: &str,
    query: &Query,
    aggregate: &mut Vec<Finding>,
) -> usize {
    let entries = match session.search(base_dn, &query.filter, query.attrs) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("skipping category {} — search failed: {}", query.category, e);
            return 0;
        }
    };

    let before = aggregate.len();
    for entry in &entries {
        if let Some((subject, related)) = (query.shape)(entry) {
            aggregate.push(Finding {
                category: query.category,
                subject,
                related,
            });
        }
    }
    aggregate.len() - before
}
