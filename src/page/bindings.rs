use crate::catalog::Catalog;

use super::{
    ElementId, Page, NEWSLETTER_EMAIL, NEWSLETTER_FORM, SCROLL_TO_TOP, SEARCH_INPUT,
    TOOLKIT_BUTTON, TOOLKIT_CLOSE, TOOLKIT_ITEMS, TOOLKIT_SIDEBAR,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarBindings {
    pub button: ElementId,
    pub panel: ElementId,
    pub close: ElementId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewsletterBindings {
    pub form: ElementId,
    pub email: Option<ElementId>,
}

/// Element handles resolved once at startup.
///
/// Every binding is optional: a missing element switches off the feature that
/// needs it and nothing else.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageBindings {
    pub search_input: Option<ElementId>,
    pub sidebar: Option<SidebarBindings>,
    pub toolkit_items: Option<ElementId>,
    pub categories: Vec<(String, Option<ElementId>)>,
    pub scroll_to_top: Option<ElementId>,
    pub newsletter: Option<NewsletterBindings>,
}

impl PageBindings {
    pub fn acquire(page: &Page, catalog: &Catalog) -> Self {
        let lookup = |id: &str| {
            let found = page.lookup(id);
            if found.is_none() {
                tracing::debug!(element = id, "element not present, feature disabled");
            }
            found
        };

        let search_input = lookup(SEARCH_INPUT);
        let sidebar = match (
            lookup(TOOLKIT_BUTTON),
            lookup(TOOLKIT_SIDEBAR),
            lookup(TOOLKIT_CLOSE),
        ) {
            (Some(button), Some(panel), Some(close)) => Some(SidebarBindings {
                button,
                panel,
                close,
            }),
            _ => None,
        };
        let toolkit_items = lookup(TOOLKIT_ITEMS);
        let categories = catalog
            .categories()
            .iter()
            .map(|c| (c.key.clone(), lookup(&c.key)))
            .collect();
        let scroll_to_top = lookup(SCROLL_TO_TOP);
        let newsletter = lookup(NEWSLETTER_FORM).map(|form| NewsletterBindings {
            form,
            email: lookup(NEWSLETTER_EMAIL),
        });

        Self {
            search_input,
            sidebar,
            toolkit_items,
            categories,
            scroll_to_top,
            newsletter,
        }
    }

    pub fn container(&self, category: &str) -> Option<&ElementId> {
        self.categories
            .iter()
            .find(|(key, _)| key == category)
            .and_then(|(_, id)| id.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::resource;

    fn catalog() -> Catalog {
        Catalog::from_entries([
            ("design", vec![resource("a", "Figma", &[])]),
            ("dev", vec![resource("b", "Cargo", &[])]),
        ])
        .unwrap()
    }

    #[test]
    fn scaffold_binds_everything() {
        let catalog = catalog();
        let bindings = PageBindings::acquire(&Page::scaffold(&catalog), &catalog);
        assert!(bindings.search_input.is_some());
        assert!(bindings.sidebar.is_some());
        assert!(bindings.toolkit_items.is_some());
        assert!(bindings.scroll_to_top.is_some());
        assert_eq!(
            bindings.newsletter.as_ref().and_then(|n| n.email.clone()),
            Some(ElementId::from(NEWSLETTER_EMAIL))
        );
        assert_eq!(bindings.container("dev"), Some(&ElementId::from("dev")));
    }

    #[test]
    fn missing_close_control_disables_sidebar_only() {
        let catalog = catalog();
        let mut page = Page::scaffold(&catalog);
        page.remove(TOOLKIT_CLOSE);
        page.remove("dev");
        let bindings = PageBindings::acquire(&page, &catalog);
        assert!(bindings.sidebar.is_none());
        assert!(bindings.toolkit_items.is_some());
        assert!(bindings.container("design").is_some());
        assert!(bindings.container("dev").is_none());
    }
}
