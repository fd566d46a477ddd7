use serde::{Deserialize, Serialize};

/// One title returned by a catalogue search, normalized from the wire format.
/// Fields the catalogue omitted are empty / false / zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogueItem {
    pub title: String,
    /// Catalogue's primary creator (usually the author)
    pub first_creator_name: String,
    pub is_owned: bool,
    pub owned_copies: u32,
    pub is_available: bool,
    pub available_copies: u32,
}

/// Result of a catalogue search, items in catalogue order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogueResponse {
    pub total_items: u64,
    pub items: Vec<CatalogueItem>,
}

impl CatalogueResponse {
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }
}
