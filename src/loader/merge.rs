use std::collections::HashMap;

use crate::catalog::CatalogItem;

/// Merge `batch` into `items`, keyed by name.
///
/// A name already present keeps its slot and takes the incoming value. New
/// names are appended in batch order. Returns how many names were new.
pub fn merge_by_name(items: &mut Vec<CatalogItem>, batch: Vec<CatalogItem>) -> usize {
    let mut slots: HashMap<String, usize> = items
        .iter()
        .enumerate()
        .map(|(slot, item)| (item.name.clone(), slot))
        .collect();

    let before = items.len();
    for item in batch {
        match slots.get(&item.name) {
            Some(&slot) => items[slot] = item,
            None => {
                slots.insert(item.name.clone(), items.len());
                items.push(item);
            }
        }
    }
    items.len() - before
}

/// Collapse repeated names, first position and last value.
pub fn dedup_by_name(items: Vec<CatalogItem>) -> Vec<CatalogItem> {
    let mut merged = Vec::with_capacity(items.len());
    merge_by_name(&mut merged, items);
    merged
}
