//! Typed request parameters, one struct per upstream operation.

use std::fmt;

/// Parameters for one unfiltered list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPageRequest {
    pub limit: usize,
    pub offset: usize,
}

impl ListPageRequest {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }
}

/// Reference to a single item, by name or by numeric id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    Name(String),
    Id(u32),
}

/// Canonical form of a typed name: upstream names are lowercase.
pub fn normalize_name(input: &str) -> String {
    input.trim().to_lowercase()
}

impl ItemRef {
    /// Interpret free-form input: all-digit strings become ids.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<u32>() {
            Ok(id) => ItemRef::Id(id),
            Err(_) => ItemRef::Name(normalize_name(trimmed)),
        }
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemRef::Name(name) => write!(f, "{}", name),
            ItemRef::Id(id) => write!(f, "{}", id),
        }
    }
}

impl From<&str> for ItemRef {
    fn from(name: &str) -> Self {
        ItemRef::Name(name.to_string())
    }
}

impl From<u32> for ItemRef {
    fn from(id: u32) -> Self {
        ItemRef::Id(id)
    }
}

/// Parameters for a type membership lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMembershipRequest {
    pub type_name: String,
}

impl TypeMembershipRequest {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}
