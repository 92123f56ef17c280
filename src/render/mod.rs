pub mod document;

use itertools::Itertools;

use crate::catalog::{Catalog, Resource};
use crate::page::{Page, PageBindings};
use crate::search::{self, Query};
use crate::toolkit::Toolkit;

pub const EMPTY_TOOLKIT_HTML: &str = r#"
<div class="toolkit-empty">
    <i class="fas fa-box-open fa-2x"></i>
    <p>Your toolkit is empty</p>
</div>
"#;

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// The image icon, or the fallback glyph when there is none. A broken image
/// swaps itself for the glyph in the browser.
pub fn resource_icon(resource: &Resource) -> String {
    let fallback = escape_html(&resource.icon_fallback);
    match resource.icon.as_deref() {
        Some(icon) => format!(
            r#"<img src="{src}" alt="{alt} icon" onerror="this.onerror=null;this.parentElement.innerHTML='&lt;i class=&quot;fas {fallback}&quot;&gt;&lt;/i&gt;';" class="resource-img">"#,
            src = escape_html(icon),
            alt = escape_html(&resource.name),
        ),
        None => format!(r#"<i class="fas {fallback}"></i>"#),
    }
}

pub fn resource_card(resource: &Resource, toolkit: &Toolkit) -> String {
    let in_toolkit = toolkit.contains(&resource.id);
    let (title, star) = if in_toolkit {
        ("Remove from Toolkit", "fas fa-star text-yellow-400")
    } else {
        ("Add to Toolkit", "far fa-star")
    };
    let id = escape_html(&resource.id);
    format!(
        r#"
<div class="resource-item">
    <div class="resource-info">
        <a href="{url}" target="_blank" rel="noopener noreferrer" class="resource-details">
            <div class="resource-icon" id="icon-{id}">{icon}</div>
            <div>
                <span class="resource-name">{name}</span>
                <span class="resource-description">{description}</span>
            </div>
        </a>
    </div>
    <button type="button" class="action-button" data-toolkit-toggle="{id}" title="{title}">
        <i class="{star}"></i>
    </button>
</div>
"#,
        url = escape_html(&resource.url),
        icon = resource_icon(resource),
        name = escape_html(&resource.name),
        description = escape_html(&resource.description),
    )
}

pub fn resource_cards<'a, I>(resources: I, toolkit: &Toolkit) -> String
where
    I: IntoIterator<Item = &'a Resource>,
{
    resources
        .into_iter()
        .map(|r| resource_card(r, toolkit))
        .join("")
}

/// Repaints every bound category container with its full resource list.
pub fn render_all(page: &mut Page, bindings: &PageBindings, catalog: &Catalog, toolkit: &Toolkit) {
    render_filtered(page, bindings, catalog, toolkit, &Query::default());
}

/// Repaints every bound category container with the resources matching
/// `query`. Categories without a container are skipped.
pub fn render_filtered(
    page: &mut Page,
    bindings: &PageBindings,
    catalog: &Catalog,
    toolkit: &Toolkit,
    query: &Query,
) {
    for category in catalog.categories() {
        let Some(container) = bindings.container(&category.key) else {
            tracing::debug!(category = %category.key, "no container, skipping category");
            continue;
        };
        let html = resource_cards(search::filter(&category.resources, query), toolkit);
        page.set_inner_html(container, html);
    }
}

/// Resolves toolkit ids against the catalog in toolkit order. Ids that no
/// longer resolve are dropped.
pub fn resolve_toolkit<'a>(catalog: &'a Catalog, toolkit: &Toolkit) -> Vec<&'a Resource> {
    toolkit
        .ids()
        .iter()
        .filter_map(|id| {
            let found = catalog.find(id);
            if found.is_none() {
                tracing::debug!(id = %id, "toolkit id not in catalog, omitted");
            }
            found
        })
        .collect()
}

pub fn toolkit_html(catalog: &Catalog, toolkit: &Toolkit) -> String {
    let resources = resolve_toolkit(catalog, toolkit);
    if resources.is_empty() {
        return EMPTY_TOOLKIT_HTML.to_string();
    }
    resource_cards(resources, toolkit)
}

pub fn render_toolkit(page: &mut Page, bindings: &PageBindings, catalog: &Catalog, toolkit: &Toolkit) {
    let Some(items) = bindings.toolkit_items.as_ref() else {
        return;
    };
    page.set_inner_html(items, toolkit_html(catalog, toolkit));
}
