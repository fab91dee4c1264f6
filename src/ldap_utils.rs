//! LDAP value conversion utilities
//!
//! Binary SID parsing (MS-DTYP 2.4.2) for attributes that arrive as raw
//! bytes, such as sIDHistory.

/// Convert a binary SID to string format (S-1-5-21-...)
///
/// # Format (MS-DTYP 2.4.2):
/// ```text
/// Offset  Size  Field
/// 0       1     Revision
/// 1       1     SubAuthorityCount
/// 2       6     IdentifierAuthority
/// 8       4*N   SubAuthorities (N = SubAuthorityCount)
/// ```
pub(crate) fn sid_to_string(bytes: &[u8]) -> Result<String, String> {
    if bytes.len() < 8 {
        return Err("SID too short (minimum 8 bytes)".to_string());
    }

    let revision = bytes[0];
    let sub_auth_count = bytes[1] as usize;

    if bytes.len() < 8 + (sub_auth_count * 4) {
        return Err(format!(
            "SID data insufficient for {} sub-authorities",
            sub_auth_count
        ));
    }

    // 48-bit identifier authority (big-endian)
    let id_auth = u64::from_be_bytes([
        0, 0, bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ]);

    let mut sid = format!("S-{}-{}", revision, id_auth);

    // Sub-authorities (little-endian)
    for i in 0..sub_auth_count {
        let offset = 8 + (i * 4);
        let sub_auth = u32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ]);
        sid.push_str(&format!("-{}", sub_auth));
    }

    Ok(sid)
}

/// Parse a binary SID, returning a placeholder on failure.
///
/// Convenience wrapper around [`sid_to_string`] for shaping code where a
/// fallback value is acceptable.
pub(crate) fn parse_sid(bytes: &[u8]) -> String {
    sid_to_string(bytes).unwrap_or_else(|_| format!("(invalid SID: {} bytes)", bytes.len()))
}
