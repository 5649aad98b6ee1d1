use std::fmt;

/// Logical cache entries. One stored payload per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Last successfully loaded list, as a JSON array of `{name, url}`.
    LastList,
    /// Favorited names, as a JSON array of strings.
    Favorites,
}

impl CacheKey {
    /// Stable on-disk key. Once published, do not rename.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastList => "last_pokemon_list",
            Self::Favorites => "favorites",
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
