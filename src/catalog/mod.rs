pub mod validation;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const DEFAULT_ICON_FALLBACK: &str = "fa-link";

fn default_icon_fallback() -> String {
    DEFAULT_ICON_FALLBACK.to_string()
}

/// One linkable entry of the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default = "default_icon_fallback")]
    pub icon_fallback: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub key: String,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid category key '{key}'")]
    InvalidCategoryKey { key: String },

    #[error("resource in category '{category}' has an empty id")]
    EmptyResourceId { category: String },

    #[error("category key '{key}' is a reserved page element id")]
    ReservedCategoryKey { key: String },

    #[error("duplicate category '{key}'")]
    DuplicateCategory { key: String },

    #[error("duplicate resource id '{id}' (categories '{first}' and '{second}')")]
    DuplicateResourceId {
        id: String,
        first: String,
        second: String,
    },

    #[error("invalid icon fallback '{value}' for resource '{id}'")]
    InvalidIconFallback { id: String, value: String },

    #[error("failed to read catalog: {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Categorized resources, in file order.
///
/// A `Catalog` is validated on construction: every resource id resolves to
/// exactly one resource, so toolkit lookups never have to pick a winner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Result<Self, CatalogError> {
        validation::validate(&categories)?;
        Ok(Self { categories })
    }

    pub fn from_entries<I, K>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (K, Vec<Resource>)>,
        K: Into<String>,
    {
        let categories = entries
            .into_iter()
            .map(|(key, resources)| Category {
                key: key.into(),
                resources,
            })
            .collect();
        Self::new(categories)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.key == key)
    }

    pub fn find(&self, id: &str) -> Option<&Resource> {
        self.categories
            .iter()
            .flat_map(|c| c.resources.iter())
            .find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.resources.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in self.categories.iter() {
            map.serialize_entry(&category.key, &category.resources)?;
        }
        map.end()
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = Catalog;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a mapping of category name to a list of resources")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Catalog, A::Error> {
        let mut categories = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, resources)) = access.next_entry::<String, Vec<Resource>>()? {
            categories.push(Category { key, resources });
        }
        Catalog::new(categories).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CatalogVisitor)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogFormat {
    Yaml,
    Json,
}

impl CatalogFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

pub fn parse_catalog(contents: &str, format: CatalogFormat) -> Result<Catalog, String> {
    match format {
        CatalogFormat::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
        CatalogFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
    }
}

pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let catalog = parse_catalog(&contents, CatalogFormat::from_path(path)).map_err(|message| {
        CatalogError::Parse {
            path: path.to_path_buf(),
            message,
        }
    })?;
    tracing::debug!(
        path = %path.display(),
        categories = catalog.categories().len(),
        resources = catalog.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

#[cfg(test)]
pub(crate) fn resource(id: &str, name: &str, tags: &[&str]) -> Resource {
    Resource {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        url: format!("https://example.com/{id}"),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        icon: None,
        icon_fallback: DEFAULT_ICON_FALLBACK.to_string(),
    }
}
