//! LDAP Helper Utilities
//!
//! Extension trait for working with LDAP search results, reducing
//! boilerplate for common attribute extraction patterns.

use ldap3::SearchEntry;

/// Extension trait for SearchEntry to simplify attribute extraction
pub trait SearchEntryExt {
    /// Get a string attribute, returning empty string if not found
    fn get_string_attr(&self, name: &str) -> String;

    /// Get an optional string attribute (returns None if missing)
    fn get_optional_attr(&self, name: &str) -> Option<String>;

    /// Get all values for a multi-valued attribute
    fn get_multi_attr(&self, name: &str) -> Vec<String>;

    /// Get the first value of a binary attribute as bytes.
    ///
    /// Binary attributes normally land in `bin_attrs`, but values that
    /// happen to decode as UTF-8 end up in `attrs`; both are checked.
    fn get_first_binary(&self, name: &str) -> Option<Vec<u8>>;

    /// Check if attribute exists AND has at least one value
    fn has_values(&self, name: &str) -> bool;
}

impl SearchEntryExt for SearchEntry {
    fn get_string_attr(&self, name: &str) -> String {
        self.attrs
            .get(name)
            .and_then(|v| v.first())
            .cloned()
            .unwrap_or_default()
    }

    fn get_optional_attr(&self, name: &str) -> Option<String> {
        self.attrs.get(name).and_then(|v| v.first()).cloned()
    }

    fn get_multi_attr(&self, name: &str) -> Vec<String> {
        self.attrs.get(name).cloned().unwrap_or_default()
    }

    fn get_first_binary(&self, name: &str) -> Option<Vec<u8>> {
        if let Some(values) = self.bin_attrs.get(name) {
            if let Some(first) = values.first() {
                return Some(first.clone());
            }
        }
        self.attrs
            .get(name)
            .and_then(|v| v.first())
            .map(|v| v.as_bytes().to_vec())
    }

    fn has_values(&self, name: &str) -> bool {
        self.attrs.get(name).map(|v| !v.is_empty()).unwrap_or(false)
            || self
                .bin_attrs
                .get(name)
                .map(|v| !v.is_empty())
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn entry_with(attrs: Vec<(&str, Vec<&str>)>) -> SearchEntry {
        SearchEntry {
            dn: "CN=test,DC=example,DC=com".to_string(),
            attrs: attrs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.into_iter().map(String::from).collect()))
                .collect(),
            bin_attrs: HashMap::new(),
        }
    }

    #[test]
    fn test_get_string_attr() {
        let entry = entry_with(vec![("cn", vec!["svc_sql"])]);
        assert_eq!(entry.get_string_attr("cn"), "svc_sql");
        assert_eq!(entry.get_string_attr("missing"), "");
    }

    #[test]
    fn test_get_optional_attr() {
        let entry = entry_with(vec![("userAccountControl", vec!["4260352"])]);
        assert_eq!(
            entry.get_optional_attr("userAccountControl"),
            Some("4260352".to_string())
        );
        assert_eq!(entry.get_optional_attr("memberOf"), None);
    }

    #[test]
    fn test_get_multi_attr() {
        let entry = entry_with(vec![(
            "servicePrincipalName",
            vec!["MSSQLSvc/db01:1433", "MSSQLSvc/db01"],
        )]);
        assert_eq!(entry.get_multi_attr("servicePrincipalName").len(), 2);
        assert!(entry.get_multi_attr("memberOf").is_empty());
    }

    #[test]
    fn test_get_first_binary_prefers_bin_attrs() {
        let mut entry = entry_with(vec![("sIDHistory", vec!["stringy"])]);
        entry
            .bin_attrs
            .insert("sIDHistory".to_string(), vec![vec![0x01, 0x02]]);
        assert_eq!(entry.get_first_binary("sIDHistory"), Some(vec![0x01, 0x02]));
    }

    #[test]
    fn test_get_first_binary_falls_back_to_attrs() {
        let entry = entry_with(vec![("sIDHistory", vec!["ab"])]);
        assert_eq!(entry.get_first_binary("sIDHistory"), Some(vec![b'a', b'b']));
        assert_eq!(entry.get_first_binary("missing"), None);
    }

    #[test]
    fn test_has_values() {
        let entry = entry_with(vec![("servicePrincipalName", vec!["HTTP/web01"])]);
        assert!(entry.has_values("servicePrincipalName"));
        assert!(!entry.has_values("sIDHistory"));
    }
}
