//! Resolving favorited names into displayable entries.

use futures::future::join_all;

use super::set::FavoritesSet;
use crate::catalog::{CatalogSource, ItemRef};

/// A favorite with the numeric id needed to render its artwork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteEntry {
    pub name: String,
    pub id: u32,
}

/// Look up every favorite concurrently, keeping set order.
///
/// Each lookup fails on its own: entries whose detail request fails (for
/// example a favorite that no longer exists upstream) are left out rather
/// than failing the whole view.
pub async fn resolve_favorites<S>(source: &S, names: &FavoritesSet) -> Vec<FavoriteEntry>
where
    S: CatalogSource + ?Sized,
{
    let lookups = names.iter().map(|name| async move {
        let item = ItemRef::Name(name.to_string());
        match source.detail(&item).await {
            Ok(detail) => Some(FavoriteEntry {
                name: detail.name,
                id: detail.id,
            }),
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "Dropping favorite from view");
                None
            }
        }
    });

    join_all(lookups).await.into_iter().flatten().collect()
}

/// Case-insensitive substring match on the trimmed query. Empty matches all.
pub fn filter_by_query(entries: &[FavoriteEntry], query: &str) -> Vec<FavoriteEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|entry| entry.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<FavoriteEntry> {
        vec![
            FavoriteEntry {
                name: "pikachu".to_string(),
                id: 25,
            },
            FavoriteEntry {
                name: "raichu".to_string(),
                id: 26,
            },
            FavoriteEntry {
                name: "eevee".to_string(),
                id: 133,
            },
        ]
    }

    #[test]
    fn test_filter_empty_query_keeps_all() {
        assert_eq!(filter_by_query(&entries(), "   ").len(), 3);
    }

    #[test]
    fn test_filter_is_case_insensitive_and_trimmed() {
        let hits = filter_by_query(&entries(), "  CHU ");
        let names: Vec<_> = hits.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["pikachu", "raichu"]);
    }
}
