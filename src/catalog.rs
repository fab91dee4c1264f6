//! Query Catalog
//!
//! The fixed, ordered set of six enumeration queries. Each query is a pure
//! declarative description: an LDAP filter, the attributes to project, and a
//! shape function that normalizes a directory entry into a
//! (subject, related) pair. No query behavior lives anywhere else.

use ldap3::SearchEntry;

use crate::common_types::{uac_flags, FindingCategory};
use crate::ldap_helpers::SearchEntryExt;
use crate::ldap_utils::parse_sid;

/// Built-in privileged groups whose members are excluded from the
/// Full Control category; membership in one of these already implies broad
/// access, so reporting them would only restate the obvious.
pub const PRIVILEGED_GROUPS: [&str; 7] = [
    "Domain Admins",
    "Enterprise Admins",
    "Schema Admins",
    "Administrators",
    "Server Operators",
    "Account Operators",
    "Backup Operators",
];

/// LDAP_MATCHING_RULE_BIT_AND, used for userAccountControl bit filters.
const BIT_AND_RULE: &str = "1.2.840.113556.1.4.803";

/// A shaped result: subject name plus an optional related object. A `None`
/// return drops the entry entirely (used by Full Control exclusion).
pub type ShapeFn = fn(&SearchEntry) -> Option<(String, Option<String>)>;

/// One enumeration query. Immutable, defined at build time.
pub struct Query {
    pub category: FindingCategory,
    pub filter: String,
    pub attrs: &'static [&'static str],
    pub shape: ShapeFn,
}

/// The six catalog queries in fixed order.
pub fn catalog() -> Vec<Query> {
    vec![
        Query {
            category: FindingCategory::NoPreauth,
            filter: format!(
                "(userAccountControl:{}:={})",
                BIT_AND_RULE,
                uac_flags::DONT_REQ_PREAUTH
            ),
            attrs: &["cn", "userAccountControl"],
            shape: shape_no_preauth,
        },
        Query {
            category: FindingCategory::SidHistory,
            filter: "(sIDHistory=*)".to_string(),
            attrs: &["cn", "sIDHistory"],
            shape: shape_sid_history,
        },
        Query {
            category: FindingCategory::Delegation,
            filter: format!(
                "(userAccountControl:{}:={})",
                BIT_AND_RULE,
                uac_flags::TRUSTED_FOR_DELEGATION
            ),
            attrs: &["cn", "userAccountControl", "memberOf"],
            shape: shape_delegation,
        },
        Query {
            category: FindingCategory::DcSync,
            filter: "(|(msDS-AllowedToDelegateTo=*)(msDS-AllowedToActOnBehalfOfOtherIdentity=*))"
                .to_string(),
            attrs: &[
                "cn",
                "msDS-AllowedToDelegateTo",
                "msDS-AllowedToActOnBehalfOfOtherIdentity",
            ],
            shape: shape_dc_sync,
        },
        Query {
            category: FindingCategory::FullControl,
            filter: "(nTSecurityDescriptor=*)".to_string(),
            attrs: &["cn", "nTSecurityDescriptor", "memberOf"],
            shape: shape_full_control,
        },
        Query {
            category: FindingCategory::Service,
            filter: "(servicePrincipalName=*)".to_string(),
            attrs: &["cn", "servicePrincipalName"],
            shape: shape_service,
        },
    ]
}

/// Subject name for an entry: cn, falling back to the DN when absent.
fn subject_of(entry: &SearchEntry) -> String {
    let cn = entry.get_string_attr("cn");
    if cn.is_empty() {
        entry.dn.clone()
    } else {
        cn
    }
}

fn shape_no_preauth(entry: &SearchEntry) -> Option<(String, Option<String>)> {
    Some((subject_of(entry), entry.get_optional_attr("userAccountControl")))
}

fn shape_sid_history(entry: &SearchEntry) -> Option<(String, Option<String>)> {
    let sid = entry
        .get_first_binary("sIDHistory")
        .map(|bytes| parse_sid(&bytes));
    Some((subject_of(entry), sid))
}

fn shape_delegation(entry: &SearchEntry) -> Option<(String, Option<String>)> {
    let group = entry.get_multi_attr("memberOf").into_iter().next();
    Some((subject_of(entry), group))
}

fn shape_dc_sync(entry: &SearchEntry) -> Option<(String, Option<String>)> {
    // RBCD-only matches carry a binary security descriptor rather than a
    // target name; they report no related object.
    let target = entry
        .get_multi_attr("msDS-AllowedToDelegateTo")
        .into_iter()
        .next();
    Some((subject_of(entry), target))
}

fn shape_full_control(entry: &SearchEntry) -> Option<(String, Option<String>)> {
    let is_privileged = entry
        .get_multi_attr("memberOf")
        .iter()
        .any(|dn| is_privileged_group_dn(dn));
    if is_privileged {
        return None;
    }
    Some((subject_of(entry), None))
}

fn shape_service(entry: &SearchEntry) -> Option<(String, Option<String>)> {
    let spn = entry
        .get_multi_attr("servicePrincipalName")
        .into_iter()
        .next();
    Some((subject_of(entry), spn))
}

/// Whether a memberOf DN names one of the built-in privileged groups.
/// Compares the leading CN component, case-insensitively.
fn is_privileged_group_dn(dn: &str) -> bool {
    let first_rdn = dn.split(',').next().unwrap_or("").trim();
    let name = match first_rdn
        .strip_prefix("CN=")
        .or_else(|| first_rdn.strip_prefix("cn="))
    {
        Some(name) => name,
        None => return false,
    };
    PRIVILEGED_GROUPS
        .iter()
        .any(|group| group.eq_ignore_ascii_case(name))
}
