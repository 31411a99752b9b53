//! Shared string helpers.

/// Last segment of a qualified type path (e.g., "items::Weapon" -> "Weapon").
///
/// Both `.` and `::` separate segments.
pub fn simple_name(path: &str) -> &str {
    let after_colons = path.rsplit("::").next().unwrap_or(path);
    after_colons.rsplit('.').next().unwrap_or(after_colons)
}
