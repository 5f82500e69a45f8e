//! Item catalog: the ordered set of items defining the system's dimension.

use std::collections::HashMap;

use crate::error::{PlanError, PlanResult};
use crate::id::ItemId;

/// Ordered, deduplicated set of item identifiers.
///
/// Position in the catalog is the index used by every vector and matrix of a
/// computation. A catalog is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<ItemId>,
    index: HashMap<ItemId, usize>,
}

impl Catalog {
    /// Build a catalog from the provider's ordered item list.
    ///
    /// Fails with `CatalogEmpty` if no items are supplied. Repeated
    /// identifiers keep their first position.
    pub fn new<I>(items: I) -> PlanResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<ItemId>,
    {
        let mut ordered: Vec<ItemId> = Vec::new();
        let mut index: HashMap<ItemId, usize> = HashMap::new();
        let mut duplicates: Vec<ItemId> = Vec::new();

        for item in items {
            let item = item.into();
            if index.contains_key(&item) {
                duplicates.push(item);
                continue;
            }
            index.insert(item.clone(), ordered.len());
            ordered.push(item);
        }

        if ordered.is_empty() {
            return Err(PlanError::CatalogEmpty);
        }

        if !duplicates.is_empty() {
            tracing::warn!(
                count = duplicates.len(),
                "catalog contained duplicate item ids (first occurrence kept): {:?}",
                duplicates
            );
        }

        Ok(Self {
            items: ordered,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.items.iter()
    }

    /// Position of `item`, if it belongs to the catalog.
    pub fn index_of(&self, item: &ItemId) -> Option<usize> {
        self.index.get(item).copied()
    }

    pub fn contains(&self, item: &ItemId) -> bool {
        self.index.contains_key(item)
    }

    /// Identifier at `index`.
    pub fn get(&self, index: usize) -> Option<&ItemId> {
        self.items.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_catalog_is_rejected() {
        let err = Catalog::new(Vec::<ItemId>::new()).unwrap_err();
        assert_eq!(err, PlanError::CatalogEmpty);
    }

    #[test]
    fn preserves_provider_order() {
        let catalog = Catalog::new(["B", "A", "C"]).unwrap();
        assert_eq!(catalog.index_of(&ItemId::new("B")), Some(0));
        assert_eq!(catalog.index_of(&ItemId::new("C")), Some(2));
        assert_eq!(catalog.get(1), Some(&ItemId::new("A")));
    }

    #[test]
    fn duplicates_keep_first_position() {
        let catalog = Catalog::new(["A", "B", "A"]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.index_of(&ItemId::new("A")), Some(0));
        assert_eq!(catalog.index_of(&ItemId::new("B")), Some(1));
    }

    #[test]
    fn unknown_item_has_no_index() {
        let catalog = Catalog::new(["A"]).unwrap();
        assert!(!catalog.contains(&ItemId::new("GHOST")));
        assert_eq!(catalog.index_of(&ItemId::new("GHOST")), None);
    }
}
