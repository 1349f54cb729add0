/// Canonical form used for blood-group comparison: trimmed and uppercased.
///
/// No further canonicalization happens, so malformed values such as `"O pos"`
/// stay literal and simply never match a well-formed request.
pub fn normalize_blood_group(blood_group: &str) -> String {
    blood_group.trim().to_uppercase()
}

/// Returns true if both blood groups are equal after normalization.
pub fn blood_groups_match(a: &str, b: &str) -> bool {
    normalize_blood_group(a) == normalize_blood_group(b)
}
