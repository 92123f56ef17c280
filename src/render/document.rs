use crate::catalog::Catalog;
use crate::page::{
    ElementId, Page, PageBindings, NEWSLETTER_EMAIL, OPEN_CLASS, SCROLL_TO_TOP, SEARCH_INPUT,
    TOOLKIT_BUTTON, TOOLKIT_CLOSE, TOOLKIT_ITEMS, TOOLKIT_SIDEBAR, VISIBLE_CLASS,
};

use super::escape_html;

pub const DEFAULT_TITLE: &str = "Toolshelf";

/// "dev-tools" -> "Dev Tools"
pub fn category_heading(key: &str) -> String {
    key.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn class_attr(page: &Page, id: &str, base: &str, toggles: &[&str]) -> String {
    let id = ElementId::from(id);
    let mut classes = vec![base.to_string()];
    for class in toggles {
        if page.has_class(&id, class) {
            classes.push(class.to_string());
        }
    }
    classes.join(" ")
}

fn category_sections(page: &Page, bindings: &PageBindings, catalog: &Catalog) -> String {
    let mut out = String::new();
    for category in catalog.categories() {
        let Some(container) = bindings.container(&category.key) else {
            continue;
        };
        out.push_str(&format!(
            r#"
      <section class="category" aria-labelledby="heading-{key}">
        <h2 id="heading-{key}" class="category-title">{heading}</h2>
        <div id="{key}" class="category-content">{cards}</div>
      </section>"#,
            key = escape_html(&category.key),
            heading = escape_html(&category_heading(&category.key)),
            cards = page.inner_html(container),
        ));
    }
    out
}

/// A self-contained snapshot of the page: the shell markup with the current
/// content, classes and field values of every contract element.
pub fn render_document(page: &Page, catalog: &Catalog, title: &str) -> String {
    let bindings = PageBindings::acquire(page, catalog);
    let title = escape_html(title);
    let search_value = escape_html(page.value(&ElementId::from(SEARCH_INPUT)));
    let email_value = escape_html(page.value(&ElementId::from(NEWSLETTER_EMAIL)));
    let sidebar_class = class_attr(page, TOOLKIT_SIDEBAR, "toolkit-sidebar", &[OPEN_CLASS]);
    let scroll_class = class_attr(page, SCROLL_TO_TOP, "scroll-to-top", &[VISIBLE_CLASS]);
    let sections = category_sections(page, &bindings, catalog);
    let toolkit_items = page.inner_html(&ElementId::from(TOOLKIT_ITEMS));

    format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>{title}</title>
  <script src="https://cdn.tailwindcss.com"></script>
  <link href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css" rel="stylesheet"/>
  <style>
    .toolkit-sidebar {{ position: fixed; top: 0; right: -380px; width: 360px; height: 100%; transition: right 0.3s; overflow-y: auto; }}
    .toolkit-sidebar.open {{ right: 0; }}
    .scroll-to-top {{ position: fixed; bottom: 2rem; right: 2rem; opacity: 0; pointer-events: none; transition: opacity 0.2s; }}
    .scroll-to-top.visible {{ opacity: 1; pointer-events: auto; }}
    .resource-item {{ display: flex; align-items: center; justify-content: space-between; gap: 0.75rem; }}
    .resource-img {{ width: 24px; height: 24px; }}
  </style>
</head>
<body class="bg-slate-50 text-slate-900 min-h-screen">
  <header class="flex items-center justify-between border-b border-slate-200 bg-white px-8 py-4 sticky top-0 z-40">
    <h1 class="text-xl font-bold">{title}</h1>
    <div class="flex items-center gap-3">
      <input id="{search_id}" type="search" value="{search_value}" placeholder="Search resources..." class="rounded-xl border border-slate-200 px-4 py-2 text-sm"/>
      <button id="{toolkit_btn_id}" type="button" class="rounded-xl bg-slate-900 px-4 py-2 text-sm text-white">
        <i class="fas fa-toolbox"></i> My Toolkit
      </button>
    </div>
  </header>

  <main id="categoryGrid" class="max-w-[1200px] mx-auto px-8 py-10 grid gap-8">{sections}
  </main>

  <aside id="{sidebar_id}" class="{sidebar_class} bg-white border-l border-slate-200 shadow-xl z-50 p-6">
    <div class="flex items-center justify-between mb-4">
      <h2 class="text-lg font-bold">My Toolkit</h2>
      <button id="{close_id}" type="button" title="Close"><i class="fas fa-times"></i></button>
    </div>
    <div id="{items_id}">{toolkit_items}</div>
  </aside>

  <footer class="border-t border-slate-200 bg-white px-8 py-8">
    <form id="newsletterForm" class="newsletter-form flex gap-3 max-w-md">
      <input id="{email_id}" type="email" value="{email_value}" placeholder="you@example.com" required class="flex-1 rounded-xl border border-slate-200 px-4 py-2 text-sm"/>
      <button type="submit" class="rounded-xl bg-slate-900 px-4 py-2 text-sm text-white">Subscribe</button>
    </form>
  </footer>

  <button id="{scroll_id}" type="button" class="{scroll_class}" title="Back to top"><i class="fas fa-arrow-up"></i></button>
</body>
</html>
"####,
        search_id = SEARCH_INPUT,
        toolkit_btn_id = TOOLKIT_BUTTON,
        sidebar_id = TOOLKIT_SIDEBAR,
        close_id = TOOLKIT_CLOSE,
        items_id = TOOLKIT_ITEMS,
        email_id = NEWSLETTER_EMAIL,
        scroll_id = SCROLL_TO_TOP,
    )
}
