//! Design name derivation from a chart URI.

/// Derive a human-readable design name from a chart URI.
///
/// Takes the final path segment (trailing slashes ignored) and strips
/// everything from its last `.` onward. `"https://x/y/nginx-13.2.33.tgz"`
/// becomes `"nginx-13.2.33"`. Empty input yields an empty name.
pub fn derive_name(uri: &str) -> String {
    let trimmed = uri.trim_end_matches('/');
    let segment = match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    };
    match segment.rfind('.') {
        Some(idx) => segment[..idx].to_string(),
        None => segment.to_string(),
    }
}
