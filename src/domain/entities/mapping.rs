//! Mapping entity representing a stored short identifier.

/// A short identifier and the URL it redirects to.
///
/// The key-value store is the only owner of mappings; a `Mapping` is a
/// snapshot read from it and carries no lifecycle state of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub short_id: String,
    pub original_url: String,
}

impl Mapping {
    /// Creates a new Mapping instance.
    pub fn new(short_id: impl Into<String>, original_url: impl Into<String>) -> Self {
        Self {
            short_id: short_id.into(),
            original_url: original_url.into(),
        }
    }
}

/// Result of an allocation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub short_id: String,
    pub short_url: String,
    /// `false` when an existing mapping for the same URL was returned.
    pub created: bool,
}

/// One page of mappings plus the cursor for the next page.
///
/// `next_cursor` is `None` once the store has no further pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingPage {
    pub mappings: Vec<Mapping>,
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_creation() {
        let mapping = Mapping::new("abc123", "https://example.com");

        assert_eq!(mapping.short_id, "abc123");
        assert_eq!(mapping.original_url, "https://example.com");
    }

    #[test]
    fn test_empty_page_has_no_cursor() {
        let page = MappingPage::default();

        assert!(page.mappings.is_empty());
        assert!(page.next_cursor.is_none());
    }
}
