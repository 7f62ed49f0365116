//! Symbol normalization.

/// Longest accepted symbol after trimming.
pub const MAX_SYMBOL_LEN: usize = 32;

/// Normalize a raw symbol: surrounding whitespace removed, uppercased.
///
/// Symbol comparisons across the engine are case-insensitive; every map is
/// keyed by the normalized form.
#[must_use]
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("aapl"), "AAPL");
        assert_eq!(normalize_symbol("  Reliance "), "RELIANCE");
        assert_eq!(normalize_symbol("BRK.b"), "BRK.B");
        assert_eq!(normalize_symbol("   "), "");
    }
}
