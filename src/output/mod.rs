use colored::Colorize;
use serde::Serialize;

use crate::catalog::{Catalog, Resource};
use crate::render;
use crate::search::{self, Query};
use crate::toolkit::Toolkit;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutputRecord {
    pub category: String,
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub tags: Vec<String>,
    pub in_toolkit: bool,
}

impl OutputRecord {
    fn new(category: &str, resource: &Resource, toolkit: &Toolkit) -> Self {
        Self {
            category: category.to_string(),
            id: resource.id.clone(),
            name: resource.name.clone(),
            description: resource.description.clone(),
            url: resource.url.clone(),
            tags: resource.tags.clone(),
            in_toolkit: toolkit.contains(&resource.id),
        }
    }
}

/// Matching resources as flat records, in catalog order.
pub fn build_records(catalog: &Catalog, toolkit: &Toolkit, query: &Query) -> Vec<OutputRecord> {
    search::search(catalog, query)
        .into_iter()
        .flat_map(|(category, found)| {
            found
                .into_iter()
                .map(move |r| OutputRecord::new(category, r, toolkit))
        })
        .collect()
}

/// Toolkit entries that still resolve, in toolkit order.
pub fn build_toolkit_records(catalog: &Catalog, toolkit: &Toolkit) -> Vec<OutputRecord> {
    let mut out = Vec::new();
    for resource in render::resolve_toolkit(catalog, toolkit) {
        let category = catalog
            .categories()
            .iter()
            .find(|c| c.resources.iter().any(|r| r.id == resource.id))
            .map(|c| c.key.as_str())
            .unwrap_or_default();
        out.push(OutputRecord::new(category, resource, toolkit));
    }
    out
}

pub fn render_text(records: &[OutputRecord]) -> Vec<u8> {
    let mut out = String::new();
    let mut current: Option<&str> = None;
    for r in records {
        if current != Some(r.category.as_str()) {
            if current.is_some() {
                out.push('\n');
            }
            out.push_str(&format!("{}\n", r.category.bold().cyan()));
            current = Some(r.category.as_str());
        }
        let star = if r.in_toolkit {
            "★".yellow().to_string()
        } else {
            "☆".dimmed().to_string()
        };
        out.push_str(&format!(
            "  {star} {} {} {}\n",
            r.name.bold(),
            format!("[{}]", r.id).dimmed(),
            r.url.blue()
        ));
        if !r.description.is_empty() {
            out.push_str(&format!("      {}\n", r.description));
        }
    }
    out.into_bytes()
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, String> {
    let mut out = serde_json::to_vec_pretty(value)
        .map_err(|e| format!("failed to encode JSON output: {e}"))?;
    out.push(b'\n');
    Ok(out)
}
