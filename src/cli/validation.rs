use crate::cli::args::{CliArgs, Command};
use crate::output::OutputFormat;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(key) = args.global.storage_key.as_deref() {
        if key.trim().is_empty() {
            return Err("invalid --storage-key, expected a non-empty key".to_string());
        }
    }
    match &args.command {
        Command::Render(render) => {
            if let Some(raw) = render.output_format.as_deref() {
                OutputFormat::parse(raw)
                    .ok_or_else(|| format!("invalid --output-format '{raw}'"))?;
            }
        }
        Command::Search(search) => {
            if let Some(raw) = search.output_format.as_deref() {
                match OutputFormat::parse(raw) {
                    Some(OutputFormat::Text | OutputFormat::Json) => {}
                    _ => return Err(format!("invalid --output-format '{raw}', expected text or json")),
                }
            }
        }
        Command::Toolkit(_) | Command::Replay(_) | Command::Init => {}
    }
    Ok(())
}
