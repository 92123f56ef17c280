use colored::Colorize;

fn main() {
    if let Err(e) = toolshelf::app::run_cli() {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
