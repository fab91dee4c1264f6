//! adscout — Active Directory misconfiguration scanner
//!
//! Enumerates security-relevant AD misconfigurations (accounts without
//! Kerberos pre-authentication, SID-history carriers, delegation rights,
//! DC-sync capable objects, broadly-ACLed objects, and SPN service
//! accounts) using either a single credential or a rotating pool, and
//! aggregates the results into a uniform record model for reporting.

pub mod catalog;
pub mod common_types;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod ldap_helpers;
pub mod ldap_utils;
pub mod report;
pub mod scanner;
pub mod secure_types;
pub mod session;

pub use common_types::{Finding, FindingCategory};
pub use errors::{Result, ScanError};
pub use scanner::{ScanObserver, Scanner};
