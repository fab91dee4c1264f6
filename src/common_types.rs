//! Common Types Module
//!
//! Shared types used across the query catalog, scanner, and report layers.

use serde::{Serialize, Serializer};

/// The six fixed enumeration categories, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindingCategory {
    NoPreauth,
    SidHistory,
    Delegation,
    DcSync,
    FullControl,
    Service,
}

impl FindingCategory {
    /// All categories in catalog order. Order affects progress reporting
    /// only, not correctness.
    pub const ALL: [FindingCategory; 6] = [
        FindingCategory::NoPreauth,
        FindingCategory::SidHistory,
        FindingCategory::Delegation,
        FindingCategory::DcSync,
        FindingCategory::FullControl,
        FindingCategory::Service,
    ];

    /// Report label for the category.
    pub fn label(&self) -> &'static str {
        match self {
            FindingCategory::NoPreauth => "No Pre-auth Users",
            FindingCategory::SidHistory => "SID History Users",
            FindingCategory::Delegation => "Delegation Users",
            FindingCategory::DcSync => "DC-Sync Users",
            FindingCategory::FullControl => "Full Control Users",
            FindingCategory::Service => "Service Users",
        }
    }
}

impl std::fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for FindingCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One category-tagged enumeration record.
///
/// Produced only by a query's shape function; immutable once produced.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Finding {
    pub category: FindingCategory,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
}

/// User Account Control (UAC) flag constants used to compose search filters.
pub mod uac_flags {
    /// Account doesn't require Kerberos pre-authentication (AS-REP roastable)
    pub const DONT_REQ_PREAUTH: u32 = 0x400000;
    /// Account is trusted for delegation (unconstrained)
    pub const TRUSTED_FOR_DELEGATION: u32 = 0x80000;
}
