//! Hard ceiling on the number of stored mappings.

/// Ceiling applied when `MAX_MAPPINGS` is not configured.
pub const DEFAULT_MAX_MAPPINGS: usize = 50;

/// Returns `true` if one more mapping fits under `ceiling`.
pub fn has_capacity(current_count: usize, ceiling: usize) -> bool {
    current_count < ceiling
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_has_capacity() {
        assert!(has_capacity(0, DEFAULT_MAX_MAPPINGS));
    }

    #[test]
    fn test_one_below_ceiling_has_capacity() {
        assert!(has_capacity(49, 50));
    }

    #[test]
    fn test_at_ceiling_is_full() {
        assert!(!has_capacity(50, 50));
    }

    #[test]
    fn test_above_ceiling_is_full() {
        assert!(!has_capacity(51, 50));
    }

    #[test]
    fn test_zero_ceiling_never_has_capacity() {
        assert!(!has_capacity(0, 0));
    }
}
