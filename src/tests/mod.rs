use std::path::Path;

use clap::Parser;

use crate::app::{build_run_config, run_command};
use crate::catalog::{parse_catalog, Catalog, CatalogFormat};
use crate::cli::args::CliArgs;
use crate::config::ConfigFile;
use crate::events::{Effect, Event, ToggleOrigin};
use crate::page::{ElementId, Page, OPEN_CLASS, TOOLKIT_ITEMS, TOOLKIT_SIDEBAR};
use crate::shelf::{Shelf, ShelfSettings};
use crate::toolkit::{
    CorruptStatePolicy, FileStorage, KeyValueStorage, MemoryStorage, ToolkitStore,
    DEFAULT_STORAGE_KEY,
};

const CATALOG_YAML: &str = r#"
design:
  - id: a
    name: Figma
    description: Collaborative interface design
    url: https://figma.com
    tags: [ui]
  - id: b
    name: Sketch
    description: Vector design toolkit
    url: https://sketch.com
    tags: [mac]
dev:
  - id: c
    name: Cargo
    url: https://doc.rust-lang.org/cargo
    tags: [rust]
"#;

fn catalog() -> Catalog {
    parse_catalog(CATALOG_YAML, CatalogFormat::Yaml).unwrap()
}

fn shelf_over<S: KeyValueStorage>(storage: S) -> Shelf<S> {
    let catalog = catalog();
    let store = ToolkitStore::load(storage, DEFAULT_STORAGE_KEY, CorruptStatePolicy::Discard).unwrap();
    let page = Page::scaffold(&catalog);
    let mut shelf = Shelf::new(catalog, store, page, ShelfSettings::default());
    shelf.initialize();
    shelf
}

fn html(shelf: &Shelf<impl KeyValueStorage>, id: &str) -> String {
    shelf.page().inner_html(&ElementId::from(id)).to_string()
}

#[test]
fn searching_for_mac_leaves_only_sketch() {
    let mut shelf = shelf_over(MemoryStorage::new());
    shelf
        .dispatch(&Event::SearchInput {
            value: "mac".to_string(),
        })
        .unwrap();
    let design = html(&shelf, "design");
    assert!(design.contains("Sketch"));
    assert!(!design.contains("Figma"));
    assert!(html(&shelf, "dev").trim().is_empty());
}

#[test]
fn toggled_resource_survives_reload() {
    let mut shelf = shelf_over(MemoryStorage::new());
    shelf
        .dispatch(&Event::ToggleResource {
            id: "a".to_string(),
            origin: ToggleOrigin::Grid,
        })
        .unwrap();
    let storage = shelf.into_store().into_storage();
    assert_eq!(
        storage.get_item(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
        Some(r#"["a"]"#)
    );

    let reloaded = shelf_over(storage);
    assert_eq!(reloaded.toolkit().ids(), ["a".to_string()]);
    assert!(html(&reloaded, TOOLKIT_ITEMS).contains("Figma"));
}

#[test]
fn file_storage_round_trip_keeps_toggle_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.json");

    let mut shelf = shelf_over(FileStorage::open(&path).unwrap());
    shelf.toggle("c").unwrap();
    shelf.toggle("a").unwrap();
    drop(shelf);

    let shelf = shelf_over(FileStorage::open(&path).unwrap());
    assert_eq!(shelf.toolkit().ids(), ["c".to_string(), "a".to_string()]);
}

#[test]
fn dangling_ids_are_kept_but_not_rendered() {
    let storage = MemoryStorage::from_items([(DEFAULT_STORAGE_KEY, r#"["gone","b"]"#)]);
    let shelf = shelf_over(storage);
    assert_eq!(shelf.toolkit().len(), 2);
    let items = html(&shelf, TOOLKIT_ITEMS);
    assert!(items.contains("Sketch"));
    assert!(!items.contains("gone"));
}

#[test]
fn corrupt_state_starts_empty_by_default() {
    let storage = MemoryStorage::from_items([(DEFAULT_STORAGE_KEY, "{not json")]);
    let shelf = shelf_over(storage);
    assert!(shelf.toolkit().is_empty());
    assert!(html(&shelf, TOOLKIT_ITEMS).contains("Your toolkit is empty"));
}

#[test]
fn rendering_twice_is_stable() {
    let mut shelf = shelf_over(MemoryStorage::new());
    let first = (html(&shelf, "design"), html(&shelf, "dev"));
    shelf.render_grid();
    shelf.render_toolkit();
    assert_eq!(first, (html(&shelf, "design"), html(&shelf, "dev")));
}

#[test]
fn session_drives_sidebar_scroll_and_newsletter() {
    let mut shelf = shelf_over(MemoryStorage::new());
    let sidebar = ElementId::from(TOOLKIT_SIDEBAR);

    shelf
        .dispatch(&Event::Click {
            target: ElementId::from("toolkitBtn"),
        })
        .unwrap();
    assert!(shelf.page().has_class(&sidebar, OPEN_CLASS));

    shelf
        .dispatch(&Event::ToggleResource {
            id: "c".to_string(),
            origin: ToggleOrigin::Sidebar,
        })
        .unwrap();
    assert!(shelf.page().has_class(&sidebar, OPEN_CLASS));

    shelf
        .dispatch(&Event::Click {
            target: ElementId::from("design"),
        })
        .unwrap();
    assert!(!shelf.page().has_class(&sidebar, OPEN_CLASS));

    let effect = shelf
        .dispatch(&Event::Click {
            target: ElementId::from("scrollToTop"),
        })
        .unwrap();
    assert_eq!(effect, Effect::ScrollToTop { smooth: true });

    shelf
        .page_mut()
        .set_value(&ElementId::from("newsletterEmail"), "me@example.com");
    let effect = shelf.dispatch(&Event::NewsletterSubmit).unwrap();
    assert!(matches!(effect, Effect::Notice { .. }));
    assert_eq!(shelf.page().value(&ElementId::from("newsletterEmail")), "");
}

#[test]
fn fixed_page_id_as_category_key_is_refused() {
    let raw = "toolkitItems:\n  - id: zed\n    name: Zed\n    url: https://zed.dev\n";
    let err = parse_catalog(raw, CatalogFormat::Yaml).unwrap_err();
    assert!(err.contains("reserved page element id"));
}

fn run_in(dir: &Path, argv: &[&str]) {
    let catalog = dir.join("catalog.yml");
    let storage = dir.join("storage.json");
    let mut full = vec![
        "toolshelf".to_string(),
        "--catalog".to_string(),
        catalog.display().to_string(),
        "--storage".to_string(),
        storage.display().to_string(),
    ];
    full.extend(argv.iter().map(|a| a.to_string()));
    let args = CliArgs::parse_from(full);
    let run = build_run_config(&args, ConfigFile::default()).unwrap();
    run_command(&run, &args.command).unwrap();
}

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("catalog.yml"), CATALOG_YAML).unwrap();
    dir
}

fn stored_toolkit(dir: &Path) -> Option<String> {
    FileStorage::open(dir.join("storage.json"))
        .unwrap()
        .get_item(DEFAULT_STORAGE_KEY)
        .unwrap()
}

#[test]
fn render_command_filters_html_snapshot() {
    let dir = workspace();
    let out = dir.path().join("site").join("index.html");
    run_in(dir.path(), &["render", "-q", "mac", "-o", &out.display().to_string()]);
    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Sketch"));
    assert!(!html.contains("Figma"));
}

#[test]
fn render_command_infers_json_from_output_path() {
    let dir = workspace();
    let out = dir.path().join("records.json");
    run_in(dir.path(), &["render", "-o", &out.display().to_string()]);
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(3));
}

#[test]
fn toolkit_toggle_command_persists_to_storage_file() {
    let dir = workspace();
    run_in(dir.path(), &["toolkit", "toggle", "a"]);
    assert_eq!(stored_toolkit(dir.path()).as_deref(), Some(r#"["a"]"#));
    run_in(dir.path(), &["toolkit", "toggle", "c"]);
    run_in(dir.path(), &["toolkit", "toggle", "a"]);
    assert_eq!(stored_toolkit(dir.path()).as_deref(), Some(r#"["c"]"#));
    run_in(dir.path(), &["toolkit", "list"]);
}

#[test]
fn ephemeral_replay_leaves_storage_file_untouched() {
    let dir = workspace();
    run_in(dir.path(), &["toolkit", "toggle", "a"]);
    let storage = dir.path().join("storage.json");
    let before = std::fs::read(&storage).unwrap();

    let script = dir.path().join("session.yml");
    std::fs::write(&script, "- event: toggle_resource\n  id: b\n- event: toggle_resource\n  id: a\n").unwrap();
    let out = dir.path().join("after.html");
    run_in(
        dir.path(),
        &["replay", &script.display().to_string(), "--ephemeral", "-o", &out.display().to_string()],
    );

    assert_eq!(std::fs::read(&storage).unwrap(), before);
    let html = std::fs::read_to_string(&out).unwrap();
    assert_eq!(html.matches("text-yellow-400").count(), 2);
}

#[test]
fn replay_without_ephemeral_writes_back() {
    let dir = workspace();
    let script = dir.path().join("session.json");
    std::fs::write(&script, r#"[{"event":"toggle_resource","id":"b"}]"#).unwrap();
    run_in(dir.path(), &["replay", &script.display().to_string()]);
    assert_eq!(stored_toolkit(dir.path()).as_deref(), Some(r#"["b"]"#));
}
