//! Catalog data model and upstream wire shapes.
//!
//! The domain types (`CatalogItem`, `CatalogDetail`, `ListPage`) are what the
//! rest of the crate works with. The `Wire*` types mirror the upstream JSON
//! exactly and are converted at the client boundary.

use serde::{Deserialize, Serialize};

/// One entry in the browsable list.
///
/// Identity is `name`. Serializes as `{name, url}`, which is also the
/// persisted shape of the last list snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    #[serde(rename = "url")]
    pub reference_url: String,
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, reference_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference_url: reference_url.into(),
        }
    }

    /// Numeric id taken from the trailing segment of the reference URL.
    pub fn id(&self) -> Option<u32> {
        id_from_url(&self.reference_url)
    }
}

/// Parse the trailing numeric path segment of a reference URL.
///
/// `https://pokeapi.co/api/v2/pokemon/25/` yields `Some(25)`. Empty segments
/// (trailing slashes) are skipped; a non-numeric last segment yields `None`.
pub fn id_from_url(url: &str) -> Option<u32> {
    url.split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .and_then(|segment| segment.parse().ok())
}

/// Full record for a single item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDetail {
    pub id: u32,
    pub name: String,
    /// Type names in upstream slot order.
    pub types: Vec<String>,
    /// Base stats in upstream order.
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub value: i64,
}

/// Cursor for the next unfiltered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageCursor {
    pub offset: usize,
}

/// One fetched page of items.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListPage {
    pub items: Vec<CatalogItem>,
    /// Present when upstream reports a further page.
    pub next_cursor: Option<PageCursor>,
    pub exhausted: bool,
}

// Upstream wire shapes.

#[derive(Debug, Deserialize)]
pub(crate) struct WireListResponse {
    pub next: Option<String>,
    #[serde(default)]
    pub results: Vec<CatalogItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireNamedRef {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTypeSlot {
    #[serde(rename = "type")]
    pub kind: WireNamedRef,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireStat {
    pub stat: WireNamedRef,
    pub base_stat: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireDetail {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub types: Vec<WireTypeSlot>,
    #[serde(default)]
    pub stats: Vec<WireStat>,
}

impl From<WireDetail> for CatalogDetail {
    fn from(wire: WireDetail) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            types: wire.types.into_iter().map(|slot| slot.kind.name).collect(),
            stats: wire
                .stats
                .into_iter()
                .map(|s| Stat {
                    name: s.stat.name,
                    value: s.base_stat,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTypeList {
    #[serde(default)]
    pub results: Vec<WireNamedRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTypeMember {
    pub pokemon: CatalogItem,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTypeMembership {
    #[serde(default)]
    pub pokemon: Vec<WireTypeMember>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_url_trailing_slash() {
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/25/"), Some(25));
    }

    #[test]
    fn test_id_from_url_without_trailing_slash() {
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/151"), Some(151));
    }

    #[test]
    fn test_id_from_url_non_numeric() {
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/pikachu/"), None);
        assert_eq!(id_from_url(""), None);
    }

    #[test]
    fn test_item_serializes_as_name_url() {
        let item = CatalogItem::new("pikachu", "https://pokeapi.co/api/v2/pokemon/25/");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["name"], "pikachu");
        assert_eq!(json["url"], "https://pokeapi.co/api/v2/pokemon/25/");
    }

    #[test]
    fn test_wire_detail_flattens_types_and_stats() {
        let raw = r#"{
            "id": 6,
            "name": "charizard",
            "sprites": {},
            "types": [{"slot": 1, "type": {"name": "fire"}}, {"slot": 2, "type": {"name": "flying"}}],
            "stats": [{"stat": {"name": "hp"}, "base_stat": 78}, {"stat": {"name": "speed"}, "base_stat": 100}]
        }"#;
        let wire: WireDetail = serde_json::from_str(raw).unwrap();
        let detail = CatalogDetail::from(wire);

        assert_eq!(detail.id, 6);
        assert_eq!(detail.types, vec!["fire", "flying"]);
        assert_eq!(detail.stats.len(), 2);
        assert_eq!(detail.stats[1].name, "speed");
        assert_eq!(detail.stats[1].value, 100);
    }
}
