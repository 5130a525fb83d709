pub const DEFAULT_ROTATION_TEXT: &str = "rice, wheat";

/// Previously grown crops from the comma-separated rotation field.
///
/// Entries are trimmed and blanks dropped; order is preserved.
pub fn parse_rotation(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|crop| !crop.is_empty())
        .map(str::to_string)
        .collect()
}
