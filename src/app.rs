use std::path::PathBuf;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::catalog::{self, Catalog};
use crate::cli::args::{CliArgs, Command, RenderArgs, ReplayArgs, SearchArgs, ToolkitCommand};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::events::{self, Effect};
use crate::output::{self, OutputFormat};
use crate::page::Page;
use crate::render::document::{self, DEFAULT_TITLE};
use crate::search::Query;
use crate::shelf::{Shelf, ShelfSettings, DEFAULT_NEWSLETTER_NOTICE, DEFAULT_SCROLL_THRESHOLD};
use crate::toolkit::{
    CorruptStatePolicy, FileStorage, KeyValueStorage, Membership, MemoryStorage, ToolkitStore,
    DEFAULT_STORAGE_KEY,
};

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("toolshelf={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RunConfig {
    catalog_path: PathBuf,
    storage_path: PathBuf,
    storage_key: String,
    corrupt_policy: CorruptStatePolicy,
    settings: ShelfSettings,
    title: String,
    output_format: Option<OutputFormat>,
    no_color: bool,
    verbose: u8,
}

pub(crate) fn build_run_config(args: &CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(args)?;
    let global = &args.global;

    let no_color = global.no_color || cfg.no_color.unwrap_or(false);

    let catalog_path = match global.catalog.clone().or(cfg.catalog) {
        Some(raw) => config::expand_tilde(&raw),
        None => config::default_catalog_path()
            .ok_or_else(|| "no catalog given and no home directory to look in".to_string())?,
    };
    let storage_path = match global.storage.clone().or(cfg.storage) {
        Some(raw) => config::expand_tilde(&raw),
        None => config::default_storage_path()
            .ok_or_else(|| "no storage given and no home directory to look in".to_string())?,
    };
    let storage_key = global
        .storage_key
        .clone()
        .or(cfg.storage_key)
        .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
    if storage_key.trim().is_empty() {
        return Err("invalid storage_key, expected a non-empty key".to_string());
    }

    let corrupt_policy = if global.strict_storage {
        CorruptStatePolicy::Reject
    } else {
        match cfg.corrupt_storage.as_deref() {
            Some(raw) => CorruptStatePolicy::parse(raw).ok_or_else(|| {
                format!("invalid corrupt_storage '{raw}', expected discard or reject")
            })?,
            None => CorruptStatePolicy::default(),
        }
    };

    let scroll_threshold = cfg.scroll_threshold.unwrap_or(DEFAULT_SCROLL_THRESHOLD);
    if !scroll_threshold.is_finite() || scroll_threshold < 0.0 {
        return Err(format!(
            "invalid scroll_threshold {scroll_threshold}, expected a non-negative number"
        ));
    }
    let settings = ShelfSettings {
        scroll_threshold,
        newsletter_notice: cfg
            .newsletter_notice
            .unwrap_or_else(|| DEFAULT_NEWSLETTER_NOTICE.to_string()),
    };

    let command_title = match &args.command {
        Command::Render(r) => r.title.clone(),
        Command::Replay(r) => r.title.clone(),
        _ => None,
    };
    let title = command_title
        .or(cfg.title)
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let command_format = match &args.command {
        Command::Render(r) => r.output_format.as_deref(),
        Command::Search(s) => s.output_format.as_deref(),
        _ => None,
    };
    let output_format = match command_format.map(str::to_string).or(cfg.output_format) {
        Some(raw) => Some(
            OutputFormat::parse(&raw).ok_or_else(|| format!("invalid output_format '{raw}'"))?,
        ),
        None => None,
    };

    Ok(RunConfig {
        catalog_path,
        storage_path,
        storage_key,
        corrupt_policy,
        settings,
        title,
        output_format,
        no_color,
        verbose: global.verbose,
    })
}

fn load_catalog(run: &RunConfig) -> Result<Catalog, String> {
    catalog::load_catalog(&run.catalog_path).map_err(|e| e.to_string())
}

fn open_store(run: &RunConfig) -> Result<ToolkitStore<FileStorage>, String> {
    let storage = FileStorage::open(&run.storage_path).map_err(|e| e.to_string())?;
    ToolkitStore::load(storage, run.storage_key.clone(), run.corrupt_policy)
        .map_err(|e| e.to_string())
}

fn build_shelf<S: KeyValueStorage>(
    run: &RunConfig,
    catalog: Catalog,
    store: ToolkitStore<S>,
) -> Shelf<S> {
    let page = Page::scaffold(&catalog);
    let mut shelf = Shelf::new(catalog, store, page, run.settings.clone());
    shelf.initialize();
    shelf
}

fn write_output(path: Option<&str>, bytes: &[u8]) -> Result<(), String> {
    match path {
        Some(path) => {
            let path = config::expand_tilde(path);
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        format!("failed to create output directory '{}': {e}", parent.display())
                    })?;
                }
            }
            std::fs::write(&path, bytes)
                .map_err(|e| format!("failed to write output file '{}': {e}", path.display()))
        }
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(bytes)
                .and_then(|_| stdout.flush())
                .map_err(|e| format!("failed to write to stdout: {e}"))
        }
    }
}

fn run_render(run: &RunConfig, args: &RenderArgs) -> Result<(), String> {
    let catalog = load_catalog(run)?;
    let store = open_store(run)?;
    let format = run
        .output_format
        .or_else(|| args.output.as_deref().and_then(output::infer_format_from_path))
        .unwrap_or(OutputFormat::Html);

    let query = Query::new(args.query.as_deref().unwrap_or_default());
    let rendered = match format {
        OutputFormat::Html => {
            let mut shelf = build_shelf(run, catalog, store);
            if !query.is_empty() {
                shelf.search(query.as_str());
            }
            document::render_document(shelf.page(), shelf.catalog(), &run.title).into_bytes()
        }
        OutputFormat::Json => {
            output::render_json(&output::build_records(&catalog, store.toolkit(), &query))?
        }
        OutputFormat::Text => {
            output::render_text(&output::build_records(&catalog, store.toolkit(), &query))
        }
    };
    write_output(args.output.as_deref(), &rendered)?;
    if let Some(path) = args.output.as_deref() {
        format_kv_line("Rendered", path);
    }
    Ok(())
}

fn run_search(run: &RunConfig, args: &SearchArgs) -> Result<(), String> {
    let catalog = load_catalog(run)?;
    let store = open_store(run)?;
    let records = output::build_records(&catalog, store.toolkit(), &Query::new(&args.query));
    let rendered = match run.output_format.unwrap_or(OutputFormat::Text) {
        OutputFormat::Json => output::render_json(&records)?,
        _ => {
            if records.is_empty() {
                eprintln!("{}", format!("no resources match '{}'", args.query.trim()).yellow());
                return Ok(());
            }
            output::render_text(&records)
        }
    };
    write_output(None, &rendered)
}

fn run_toolkit(run: &RunConfig, command: &ToolkitCommand) -> Result<(), String> {
    let catalog = load_catalog(run)?;
    let mut store = open_store(run)?;
    match command {
        ToolkitCommand::List => {
            let records = output::build_toolkit_records(&catalog, store.toolkit());
            let dangling = store.toolkit().len() - records.len();
            if records.is_empty() {
                println!("Your toolkit is empty");
            } else {
                print!("{}", String::from_utf8_lossy(&output::render_text(&records)));
            }
            if dangling > 0 {
                eprintln!(
                    "{}",
                    format!("{dangling} toolkit id(s) not found in the catalog").dimmed()
                );
            }
        }
        ToolkitCommand::Toggle { id } => {
            let name = catalog.find(id).map(|r| r.name.clone());
            if name.is_none() {
                eprintln!(
                    "{}",
                    format!("warning: '{id}' is not in the catalog").yellow()
                );
            }
            let label = name.unwrap_or_else(|| id.clone());
            match store.toggle(id).map_err(|e| e.to_string())? {
                Membership::Added => println!("{} {}", "added".green().bold(), label),
                Membership::Removed => println!("{} {}", "removed".red().bold(), label),
            }
        }
    }
    Ok(())
}

fn print_effect(index: usize, effect: &Effect) {
    match effect {
        Effect::None => {}
        Effect::ScrollToTop { smooth } => {
            let how = if *smooth { "smooth" } else { "instant" };
            println!("{} scroll to top ({how})", format!("#{index}").dimmed());
        }
        Effect::Notice { message } => {
            println!("{} {}", format!("#{index}").dimmed(), message.green());
        }
    }
}

fn run_replay(run: &RunConfig, args: &ReplayArgs) -> Result<(), String> {
    let catalog = load_catalog(run)?;
    let script = events::replay::load_script(&config::expand_tilde(&args.script))
        .map_err(|e| e.to_string())?;

    let file = FileStorage::open(&run.storage_path).map_err(|e| e.to_string())?;
    let storage: Box<dyn KeyValueStorage> = if args.ephemeral {
        Box::new(MemoryStorage::from_items(file.items().clone()))
    } else {
        Box::new(file)
    };
    let store = ToolkitStore::load(storage, run.storage_key.clone(), run.corrupt_policy)
        .map_err(|e| e.to_string())?;
    let mut shelf = build_shelf(run, catalog, store);

    let steps = events::replay::replay(&mut shelf, script).map_err(|e| e.to_string())?;
    for step in steps.iter() {
        print_effect(step.index, &step.effect);
    }
    format_kv_line("Events", &steps.len().to_string());
    format_kv_line("Sidebar", if shelf.is_sidebar_open() { "open" } else { "closed" });
    format_kv_line("Toolkit", &shelf.toolkit().ids().join(", "));
    if let Some(path) = args.output.as_deref() {
        let html = document::render_document(shelf.page(), shelf.catalog(), &run.title);
        write_output(Some(path), html.as_bytes())?;
        format_kv_line("Rendered", path);
    }
    Ok(())
}

fn run_init(config_path: Option<PathBuf>) -> Result<(), String> {
    let path = config_path
        .or_else(config::default_config_path)
        .ok_or_else(|| "no home directory to place the config in".to_string())?;
    if config::ensure_default_config_file(&path)? {
        format_kv_line("Created", &path.display().to_string());
    } else {
        format_kv_line("Exists", &path.display().to_string());
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                print!("{e}");
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_logging(args.global.verbose);

    let user_config_path = args.global.config.clone().map(|p| config::expand_tilde(&p));
    if let Command::Init = args.command {
        return run_init(user_config_path);
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(&args, cfg)?;
    if run.no_color {
        colored::control::set_override(false);
    }
    tracing::debug!(
        catalog = %run.catalog_path.display(),
        storage = %run.storage_path.display(),
        key = %run.storage_key,
        policy = run.corrupt_policy.label(),
        verbose = run.verbose,
        "configuration resolved"
    );

    run_command(&run, &args.command)
}

pub(crate) fn run_command(run: &RunConfig, command: &Command) -> Result<(), String> {
    match command {
        Command::Render(render) => run_render(run, render),
        Command::Search(search) => run_search(run, search),
        Command::Toolkit(command) => run_toolkit(run, command),
        Command::Replay(replay) => run_replay(run, replay),
        Command::Init => Ok(()),
    }
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    fn parse(argv: &[&str]) -> CliArgs {
        CliArgs::parse_from(argv)
    }

    #[test]
    fn flags_override_config_file() {
        let args = parse(&["toolshelf", "--catalog", "/tmp/c.yml", "--storage-key", "k", "search", "x"]);
        let cfg = ConfigFile {
            catalog: Some("/etc/catalog.yml".to_string()),
            storage_key: Some("fromfile".to_string()),
            storage: Some("/tmp/storage.json".to_string()),
            ..ConfigFile::default()
        };
        let run = build_run_config(&args, cfg).unwrap();
        assert_eq!(run.catalog_path, PathBuf::from("/tmp/c.yml"));
        assert_eq!(run.storage_key, "k");
        assert_eq!(run.storage_path, PathBuf::from("/tmp/storage.json"));
    }

    #[test]
    fn defaults_apply_without_config() {
        let args = parse(&["toolshelf", "--catalog", "c.yml", "--storage", "s.json", "render"]);
        let run = build_run_config(&args, ConfigFile::default()).unwrap();
        assert_eq!(run.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(run.corrupt_policy, CorruptStatePolicy::Discard);
        assert_eq!(run.settings, ShelfSettings::default());
        assert_eq!(run.title, DEFAULT_TITLE);
        assert_eq!(run.output_format, None);
    }

    #[test]
    fn strict_flag_beats_config_policy() {
        let args = parse(&["toolshelf", "-c", "c.yml", "-s", "s.json", "--strict-storage", "toolkit", "list"]);
        let cfg = ConfigFile {
            corrupt_storage: Some("discard".to_string()),
            ..ConfigFile::default()
        };
        let run = build_run_config(&args, cfg).unwrap();
        assert_eq!(run.corrupt_policy, CorruptStatePolicy::Reject);
    }

    #[test]
    fn config_policy_and_settings_are_read() {
        let args = parse(&["toolshelf", "-c", "c.yml", "-s", "s.json", "toolkit", "list"]);
        let cfg = ConfigFile {
            corrupt_storage: Some("reject".to_string()),
            scroll_threshold: Some(120.0),
            newsletter_notice: Some("Thanks!".to_string()),
            ..ConfigFile::default()
        };
        let run = build_run_config(&args, cfg).unwrap();
        assert_eq!(run.corrupt_policy, CorruptStatePolicy::Reject);
        assert_eq!(run.settings.scroll_threshold, 120.0);
        assert_eq!(run.settings.newsletter_notice, "Thanks!");
    }

    #[test]
    fn invalid_config_values_are_rejected() {
        let args = parse(&["toolshelf", "-c", "c.yml", "-s", "s.json", "toolkit", "list"]);
        let bad_policy = ConfigFile {
            corrupt_storage: Some("maybe".to_string()),
            ..ConfigFile::default()
        };
        assert!(build_run_config(&args, bad_policy).is_err());
        let bad_threshold = ConfigFile {
            scroll_threshold: Some(-1.0),
            ..ConfigFile::default()
        };
        assert!(build_run_config(&args, bad_threshold).is_err());
    }

    #[test]
    fn render_title_and_format_come_from_subcommand() {
        let args = parse(&[
            "toolshelf", "-c", "c.yml", "-s", "s.json", "render", "--title", "Mine", "-A", "json",
        ]);
        let cfg = ConfigFile {
            title: Some("Theirs".to_string()),
            output_format: Some("text".to_string()),
            ..ConfigFile::default()
        };
        let run = build_run_config(&args, cfg).unwrap();
        assert_eq!(run.title, "Mine");
        assert_eq!(run.output_format, Some(OutputFormat::Json));
    }
}
