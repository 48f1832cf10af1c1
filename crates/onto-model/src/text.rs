//! Case folding shared by every case-insensitive name and URL comparison.

/// Lowercases `value` one character at a time using Unicode case mapping.
pub fn fold_case(value: &str) -> String {
    value.chars().flat_map(char::to_lowercase).collect()
}

/// Compares two strings ignoring case, using the same mapping as [`fold_case`].
pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}
