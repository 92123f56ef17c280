use crate::catalog::{Catalog, Resource};

/// A normalized search query: trimmed and lowercased.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    needle: String,
}

impl Query {
    pub fn new(raw: &str) -> Self {
        Self {
            needle: raw.trim().to_lowercase(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.needle
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, resource: &Resource) -> bool {
        if self.is_empty() {
            return true;
        }
        resource.name.to_lowercase().contains(&self.needle)
            || resource.description.to_lowercase().contains(&self.needle)
            || resource
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&self.needle))
    }
}

pub fn filter<'a>(resources: &'a [Resource], query: &Query) -> Vec<&'a Resource> {
    resources.iter().filter(|r| query.matches(r)).collect()
}

/// Matching resources per category, in catalog order. Categories with no
/// match are kept with an empty list.
pub fn search<'a>(catalog: &'a Catalog, query: &Query) -> Vec<(&'a str, Vec<&'a Resource>)> {
    catalog
        .categories()
        .iter()
        .map(|c| (c.key.as_str(), filter(&c.resources, query)))
        .collect()
}
