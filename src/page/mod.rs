pub mod bindings;

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

pub use bindings::{NewsletterBindings, PageBindings, SidebarBindings};

pub const SEARCH_INPUT: &str = "searchInput";
pub const TOOLKIT_BUTTON: &str = "toolkitBtn";
pub const TOOLKIT_SIDEBAR: &str = "toolkitSidebar";
pub const TOOLKIT_CLOSE: &str = "closeToolkit";
pub const TOOLKIT_ITEMS: &str = "toolkitItems";
pub const SCROLL_TO_TOP: &str = "scrollToTop";
pub const NEWSLETTER_FORM: &str = "newsletterForm";
pub const NEWSLETTER_EMAIL: &str = "newsletterEmail";
pub const CATEGORY_GRID: &str = "categoryGrid";

/// Fixed page ids. A category container may not take one of these.
pub const RESERVED_IDS: [&str; 9] = [
    SEARCH_INPUT,
    TOOLKIT_BUTTON,
    TOOLKIT_SIDEBAR,
    TOOLKIT_CLOSE,
    TOOLKIT_ITEMS,
    SCROLL_TO_TOP,
    NEWSLETTER_FORM,
    NEWSLETTER_EMAIL,
    CATEGORY_GRID,
];

pub const OPEN_CLASS: &str = "open";
pub const VISIBLE_CLASS: &str = "visible";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    pub parent: Option<ElementId>,
    pub classes: BTreeSet<String>,
    pub inner_html: String,
    pub value: String,
}

/// Named elements of the page, with their parent links.
#[derive(Clone, Debug, Default)]
pub struct Page {
    elements: HashMap<ElementId, Element>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard page layout for `catalog`: header controls, one
    /// container per category, the toolkit sidebar and the footer widgets.
    pub fn scaffold(catalog: &Catalog) -> Self {
        let mut page = Self::new();
        page.insert(SEARCH_INPUT, None);
        page.insert(TOOLKIT_BUTTON, None);
        page.insert(CATEGORY_GRID, None);
        for category in catalog.categories() {
            page.insert(category.key.as_str(), Some(CATEGORY_GRID));
        }
        page.insert(TOOLKIT_SIDEBAR, None);
        page.insert(TOOLKIT_CLOSE, Some(TOOLKIT_SIDEBAR));
        page.insert(TOOLKIT_ITEMS, Some(TOOLKIT_SIDEBAR));
        page.insert(SCROLL_TO_TOP, None);
        page.insert(NEWSLETTER_FORM, None);
        page.insert(NEWSLETTER_EMAIL, Some(NEWSLETTER_FORM));
        page
    }

    pub fn insert(&mut self, id: impl Into<ElementId>, parent: Option<&str>) -> &mut Element {
        let slot = self.elements.entry(id.into()).or_default();
        *slot = Element {
            parent: parent.map(ElementId::from),
            ..Element::default()
        };
        slot
    }

    pub fn remove(&mut self, id: &str) -> Option<Element> {
        self.elements.remove(&ElementId::from(id))
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn lookup(&self, id: &str) -> Option<ElementId> {
        let id = ElementId::from(id);
        self.elements.contains_key(&id).then_some(id)
    }

    pub fn inner_html(&self, id: &ElementId) -> &str {
        self.get(id).map(|e| e.inner_html.as_str()).unwrap_or_default()
    }

    pub fn set_inner_html(&mut self, id: &ElementId, html: String) {
        if let Some(element) = self.get_mut(id) {
            element.inner_html = html;
        }
    }

    pub fn value(&self, id: &ElementId) -> &str {
        self.get(id).map(|e| e.value.as_str()).unwrap_or_default()
    }

    pub fn set_value(&mut self, id: &ElementId, value: &str) {
        if let Some(element) = self.get_mut(id) {
            element.value = value.to_string();
        }
    }

    pub fn has_class(&self, id: &ElementId, class: &str) -> bool {
        self.get(id).is_some_and(|e| e.classes.contains(class))
    }

    pub fn add_class(&mut self, id: &ElementId, class: &str) {
        if let Some(element) = self.get_mut(id) {
            element.classes.insert(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: &ElementId, class: &str) {
        if let Some(element) = self.get_mut(id) {
            element.classes.remove(class);
        }
    }

    /// True when `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: &ElementId, node: &ElementId) -> bool {
        let mut current = Some(node);
        let mut hops = 0;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            hops += 1;
            if hops > self.elements.len() {
                return false;
            }
            current = self.get(id).and_then(|e| e.parent.as_ref());
        }
        false
    }

    pub fn elements(&self) -> impl Iterator<Item = (&ElementId, &Element)> {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::resource;

    fn catalog() -> Catalog {
        Catalog::from_entries([("design", vec![resource("a", "Figma", &[])])]).unwrap()
    }

    #[test]
    fn scaffold_has_contract_ids() {
        let page = Page::scaffold(&catalog());
        for id in [
            SEARCH_INPUT,
            TOOLKIT_BUTTON,
            TOOLKIT_SIDEBAR,
            TOOLKIT_CLOSE,
            TOOLKIT_ITEMS,
            SCROLL_TO_TOP,
            NEWSLETTER_FORM,
            NEWSLETTER_EMAIL,
            "design",
        ] {
            assert!(page.lookup(id).is_some(), "missing {id}");
        }
    }

    #[test]
    fn contains_walks_parents() {
        let page = Page::scaffold(&catalog());
        let sidebar = ElementId::from(TOOLKIT_SIDEBAR);
        assert!(page.contains(&sidebar, &ElementId::from(TOOLKIT_ITEMS)));
        assert!(page.contains(&sidebar, &sidebar));
        assert!(!page.contains(&sidebar, &ElementId::from("design")));
        assert!(!page.contains(&sidebar, &ElementId::from("nowhere")));
    }

    #[test]
    fn contains_stops_on_parent_cycle() {
        let mut page = Page::new();
        page.insert("a", Some("b"));
        page.insert("b", Some("a"));
        assert!(!page.contains(&ElementId::from("c"), &ElementId::from("a")));
    }

    #[test]
    fn class_and_value_helpers_ignore_missing_elements() {
        let mut page = Page::new();
        let ghost = ElementId::from("ghost");
        page.add_class(&ghost, OPEN_CLASS);
        page.set_value(&ghost, "x");
        assert!(!page.has_class(&ghost, OPEN_CLASS));
        assert_eq!(page.value(&ghost), "");
    }
}
