use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use super::{CatalogError, Category};
use crate::page::RESERVED_IDS;

fn category_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("valid regex"))
}

fn icon_class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9-]+( [a-z0-9-]+)*$").expect("valid regex"))
}

pub fn is_valid_category_key(key: &str) -> bool {
    category_key_re().is_match(key)
}

pub fn is_valid_icon_fallback(value: &str) -> bool {
    icon_class_re().is_match(value)
}

pub(super) fn validate(categories: &[Category]) -> Result<(), CatalogError> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    let mut seen_keys: HashSet<&str> = HashSet::new();

    for category in categories {
        if !is_valid_category_key(&category.key) {
            return Err(CatalogError::InvalidCategoryKey {
                key: category.key.clone(),
            });
        }
        if RESERVED_IDS.contains(&category.key.as_str()) {
            return Err(CatalogError::ReservedCategoryKey {
                key: category.key.clone(),
            });
        }
        if !seen_keys.insert(category.key.as_str()) {
            return Err(CatalogError::DuplicateCategory {
                key: category.key.clone(),
            });
        }
        for resource in category.resources.iter() {
            if resource.id.trim().is_empty() {
                return Err(CatalogError::EmptyResourceId {
                    category: category.key.clone(),
                });
            }
            if let Some(first) = owners.insert(resource.id.as_str(), category.key.as_str()) {
                return Err(CatalogError::DuplicateResourceId {
                    id: resource.id.clone(),
                    first: first.to_string(),
                    second: category.key.clone(),
                });
            }
            if !is_valid_icon_fallback(&resource.icon_fallback) {
                return Err(CatalogError::InvalidIconFallback {
                    id: resource.id.clone(),
                    value: resource.icon_fallback.clone(),
                });
            }
        }
    }
    Ok(())
}
