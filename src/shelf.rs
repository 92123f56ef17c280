use crate::catalog::Catalog;
use crate::page::{ElementId, Page, PageBindings, OPEN_CLASS};
use crate::render;
use crate::search::Query;
use crate::toolkit::{KeyValueStorage, Membership, Toolkit, ToolkitError, ToolkitStore};

pub const DEFAULT_SCROLL_THRESHOLD: f64 = 300.0;
pub const DEFAULT_NEWSLETTER_NOTICE: &str = "Thank you for subscribing! We'll keep you updated.";

#[derive(Clone, Debug, PartialEq)]
pub struct ShelfSettings {
    pub scroll_threshold: f64,
    pub newsletter_notice: String,
}

impl Default for ShelfSettings {
    fn default() -> Self {
        Self {
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            newsletter_notice: DEFAULT_NEWSLETTER_NOTICE.to_string(),
        }
    }
}

/// Application root: the catalog, the toolkit store, the page and the little
/// UI state there is (sidebar visibility and the active query).
#[derive(Debug)]
pub struct Shelf<S> {
    catalog: Catalog,
    store: ToolkitStore<S>,
    page: Page,
    bindings: PageBindings,
    settings: ShelfSettings,
    query: Query,
}

impl<S: KeyValueStorage> Shelf<S> {
    pub fn new(catalog: Catalog, store: ToolkitStore<S>, page: Page, settings: ShelfSettings) -> Self {
        let bindings = PageBindings::acquire(&page, &catalog);
        Self {
            catalog,
            store,
            page,
            bindings,
            settings,
            query: Query::default(),
        }
    }

    /// Paints every category, then the toolkit sidebar.
    pub fn initialize(&mut self) {
        render::render_all(
            &mut self.page,
            &self.bindings,
            &self.catalog,
            self.store.toolkit(),
        );
        self.render_toolkit();
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn toolkit(&self) -> &Toolkit {
        self.store.toolkit()
    }

    pub fn store(&self) -> &ToolkitStore<S> {
        &self.store
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub(crate) fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn bindings(&self) -> &PageBindings {
        &self.bindings
    }

    pub fn settings(&self) -> &ShelfSettings {
        &self.settings
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn into_store(self) -> ToolkitStore<S> {
        self.store
    }

    /// Filters every category by `raw`. A blank query restores the full grid.
    pub fn search(&mut self, raw: &str) {
        self.query = Query::new(raw);
        self.render_grid();
    }

    pub fn render_grid(&mut self) {
        render::render_filtered(
            &mut self.page,
            &self.bindings,
            &self.catalog,
            self.store.toolkit(),
            &self.query,
        );
    }

    pub fn render_toolkit(&mut self) {
        render::render_toolkit(
            &mut self.page,
            &self.bindings,
            &self.catalog,
            self.store.toolkit(),
        );
    }

    /// Toggles `id` in the toolkit, persists it and repaints grid and sidebar.
    pub fn toggle(&mut self, id: &str) -> Result<Membership, ToolkitError> {
        if self.catalog.find(id).is_none() {
            tracing::debug!(id, "toggling an id that is not in the catalog");
        }
        let membership = self.store.toggle(id)?;
        self.render_grid();
        self.render_toolkit();
        Ok(membership)
    }

    pub fn is_sidebar_open(&self) -> bool {
        self.bindings
            .sidebar
            .as_ref()
            .is_some_and(|s| self.page.has_class(&s.panel, OPEN_CLASS))
    }

    pub fn open_sidebar(&mut self) {
        let Some(panel) = self.sidebar_panel() else {
            return;
        };
        self.page.add_class(&panel, OPEN_CLASS);
        self.render_toolkit();
    }

    pub fn close_sidebar(&mut self) {
        if let Some(panel) = self.sidebar_panel() {
            self.page.remove_class(&panel, OPEN_CLASS);
        }
    }

    fn sidebar_panel(&self) -> Option<ElementId> {
        self.bindings.sidebar.as_ref().map(|s| s.panel.clone())
    }
}
