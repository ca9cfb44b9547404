//! Tab set and the store-specific relation profile.

/// Available tabs in the inspector view.
///
/// The set is fixed and partitions the collections: Header shows the
/// address-like collections, Protocols shows the parent collection, Main
/// shows everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Main,
    Protocols,
    Header,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Main, Tab::Protocols, Tab::Header]
    }

    /// Returns the display name of the tab.
    pub fn name(&self) -> &'static str {
        match self {
            Tab::Main => "Main",
            Tab::Protocols => "Protocols",
            Tab::Header => "Header",
        }
    }

    /// Returns the next tab.
    pub fn next(&self) -> Tab {
        match self {
            Tab::Main => Tab::Protocols,
            Tab::Protocols => Tab::Header,
            Tab::Header => Tab::Main,
        }
    }

    /// Returns the previous tab.
    pub fn prev(&self) -> Tab {
        match self {
            Tab::Main => Tab::Header,
            Tab::Protocols => Tab::Main,
            Tab::Header => Tab::Protocols,
        }
    }
}

/// Store-specific identifiers used to correlate rows across collections.
///
/// Selecting a row anywhere derives a relation value: the row's
/// `relation_field` when present, else the row's `parent_id_field` when the
/// row lives in `parent_collection`, else nothing. Every row elsewhere whose
/// `relation_field` equals that value is highlighted as related.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreProfile {
    /// Field correlating rows across collections.
    pub relation_field: String,
    /// Collection whose rows own the relation identifiers.
    pub parent_collection: String,
    /// Identity field on the parent collection.
    pub parent_id_field: String,
    /// Collections shown on the Header tab, in display order.
    pub header_collections: Vec<String>,
}

impl Default for StoreProfile {
    fn default() -> Self {
        Self {
            relation_field: "protocolId".to_string(),
            parent_collection: "protocols".to_string(),
            parent_id_field: "id".to_string(),
            header_collections: vec!["addresses".to_string(), "fibreOnLocations".to_string()],
        }
    }
}

impl StoreProfile {
    /// Overrides the relation field, e.g. from a CLI flag.
    pub fn with_relation_field(mut self, field: impl Into<String>) -> Self {
        self.relation_field = field.into();
        self
    }

    /// True when the collection is pinned to the Header or Protocols tab and
    /// therefore excluded from Main.
    pub fn is_pinned(&self, collection: &str) -> bool {
        collection == self.parent_collection
            || self.header_collections.iter().any(|c| c == collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle_is_closed() {
        for tab in Tab::all() {
            assert_eq!(tab.next().prev(), *tab);
            assert_eq!(tab.prev().next(), *tab);
        }
        assert_eq!(Tab::default(), Tab::Main);
    }

    #[test]
    fn test_default_profile_pins() {
        let profile = StoreProfile::default();
        assert!(profile.is_pinned("protocols"));
        assert!(profile.is_pinned("addresses"));
        assert!(profile.is_pinned("fibreOnLocations"));
        assert!(!profile.is_pinned("documents"));
    }
}
