use crate::context::{AppContext, VerbosityLevel};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;

pub use libsweep::config::{ColorChoice, OutputFormat};

/// Trait for output formatting that can be TTY-aware or plain text
pub trait OutputFormatter: Send + Sync {
    /// Print a success message
    fn success(&self, message: &str);

    /// Print an error message
    fn error(&self, message: &str);

    /// Print a warning message
    fn warning(&self, message: &str);

    /// Create a spinner for indeterminate progress
    fn spinner(&self, message: &str) -> ProgressBar;

    /// Finish a progress operation with a message
    fn finish_progress(&self, pb: ProgressBar, message: &str);
}

/// TTY-aware formatter with colors and progress indicators
pub struct TtyFormatter;

impl OutputFormatter for TtyFormatter {
    fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message);
    }

    fn warning(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow().bold(), message);
    }

    fn spinner(&self, message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    fn finish_progress(&self, pb: ProgressBar, message: &str) {
        pb.finish_and_clear();
        if !message.is_empty() {
            eprintln!("{} {}", "✓".green(), message);
        }
    }
}

/// Plain text formatter for non-TTY output (piped, scripted)
pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn success(&self, message: &str) {
        println!("✓ {}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    fn warning(&self, message: &str) {
        eprintln!("⚠ {}", message);
    }

    fn spinner(&self, _message: &str) -> ProgressBar {
        ProgressBar::hidden()
    }

    fn finish_progress(&self, pb: ProgressBar, _message: &str) {
        pb.finish_and_clear();
    }
}

/// Whether colored, animated output applies for `choice`
///
/// `Auto` colors only when stderr is a terminal and `NO_COLOR` is unset.
pub fn should_color(choice: ColorChoice) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::env::var_os("NO_COLOR").is_none() && io::stderr().is_terminal(),
    }
}

/// Create the appropriate formatter for a color choice
pub fn create_formatter(choice: ColorChoice) -> Box<dyn OutputFormatter> {
    if should_color(choice) {
        Box::new(TtyFormatter)
    } else {
        Box::new(PlainFormatter)
    }
}

pub fn success(ctx: &AppContext, message: &str) {
    create_formatter(ctx.config.output.color).success(message);
}

pub fn error(ctx: &AppContext, message: &str) {
    create_formatter(ctx.config.output.color).error(message);
}

pub fn warning(ctx: &AppContext, message: &str) {
    create_formatter(ctx.config.output.color).warning(message);
}

/// Print to stderr when the context is at least as verbose as `level`
pub fn print(ctx: &AppContext, level: VerbosityLevel, message: &str) {
    if ctx.verbosity >= level {
        eprintln!("{}", message);
    }
}

/// Trait for types that can be formatted for CLI output
pub trait Formattable: Serialize {
    /// Format the type for pretty (human-readable) output
    fn format_pretty(&self) -> String;
}

/// Format a single item for output
pub fn format_output<T: Formattable>(item: &T, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Pretty => Ok(item.format_pretty()),
        OutputFormat::Json => serde_json::to_string_pretty(item)
            .map_err(|e| format!("Failed to serialize to JSON: {}", e)),
        OutputFormat::Yaml => {
            serde_yaml::to_string(item).map_err(|e| format!("Failed to serialize to YAML: {}", e))
        }
    }
}

/// Format a slice of items for output, one pretty item per line
pub fn format_output_vec<T: Formattable>(
    items: &[T],
    format: OutputFormat,
) -> Result<String, String> {
    match format {
        OutputFormat::Pretty => {
            let output: Vec<String> = items.iter().map(|item| item.format_pretty()).collect();
            Ok(output.join("\n"))
        }
        OutputFormat::Json => serde_json::to_string_pretty(items)
            .map_err(|e| format!("Failed to serialize to JSON: {}", e)),
        OutputFormat::Yaml => {
            serde_yaml::to_string(items).map_err(|e| format!("Failed to serialize to YAML: {}", e))
        }
    }
}

/// Ask a yes/no question until the answer is `y` or `n`
///
/// End of input counts as "no".
pub fn confirm<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> io::Result<bool> {
    let mut line = String::new();
    loop {
        write!(output, "{} (y/n): ", prompt)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(false);
        }

        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please answer y or n.")?,
        }
    }
}
