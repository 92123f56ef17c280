use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "toolshelf",
    version,
    about = "categorized resource catalog with a personal toolkit",
    long_about = "Toolshelf renders a catalog of categorized resources, searches it, and keeps a personal toolkit of bookmarked resources in a local key-value store.\n\nExamples:\n  toolshelf --catalog ./catalog.yml render -o index.html\n  toolshelf search figma\n  toolshelf toolkit toggle figma\n  toolshelf replay ./session.yml --ephemeral\n\nTip: Run `toolshelf init` once and set `catalog:` in ~/.toolshelf/config.yml to keep invocations short."
)]
pub struct CliArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence."
    )]
    pub verbose: u8,

    #[arg(
        short = 'n',
        long = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.toolshelf/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 'c',
        long = "catalog",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Catalog file (YAML or JSON)."
    )]
    pub catalog: Option<String>,

    #[arg(
        short = 's',
        long = "storage",
        value_name = "FILE",
        global = true,
        help_heading = "Toolkit",
        help = "Key-value storage file holding the toolkit."
    )]
    pub storage: Option<String>,

    #[arg(
        long = "storage-key",
        value_name = "KEY",
        global = true,
        help_heading = "Toolkit",
        help = "Storage key of the toolkit entry (default: myToolkit)."
    )]
    pub storage_key: Option<String>,

    #[arg(
        long = "strict-storage",
        global = true,
        help_heading = "Toolkit",
        help = "Fail instead of discarding a corrupt stored toolkit."
    )]
    pub strict_storage: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render a page snapshot of the catalog and toolkit.
    Render(RenderArgs),

    /// Search the catalog by name, description or tag.
    Search(SearchArgs),

    /// Inspect or change the toolkit.
    #[command(subcommand)]
    Toolkit(ToolkitCommand),

    /// Apply a scripted list of page events.
    Replay(ReplayArgs),

    /// Write the default config file if it does not exist.
    Init,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    #[arg(
        short = 'q',
        long = "query",
        value_name = "QUERY",
        help = "Only render resources matching this query."
    )]
    pub query: Option<String>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Write to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "output-format",
        value_name = "FORMAT",
        help = "Output format (html, json, text). Inferred from --output when omitted."
    )]
    pub output_format: Option<String>,

    #[arg(long = "title", value_name = "TITLE", help = "Page title.")]
    pub title: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[arg(value_name = "QUERY", help = "Case-insensitive substring to look for.")]
    pub query: String,

    #[arg(
        short = 'A',
        long = "output-format",
        value_name = "FORMAT",
        help = "Output format (text, json)."
    )]
    pub output_format: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ToolkitCommand {
    /// List toolkit entries in the order they were added.
    List,

    /// Add a resource to the toolkit, or remove it if already there.
    Toggle {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    #[arg(value_name = "FILE", help = "YAML or JSON list of events.")]
    pub script: String,

    #[arg(
        long = "ephemeral",
        help = "Work on an in-memory copy of the storage; nothing is written back."
    )]
    pub ephemeral: bool,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Write the resulting page as HTML."
    )]
    pub output: Option<String>,

    #[arg(long = "title", value_name = "TITLE", help = "Page title.")]
    pub title: Option<String>,
}
