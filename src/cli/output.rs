//! Colored terminal output for pipeline commands.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Manages user-facing terminal output with consistent coloring.
///
/// All output goes to stdout; step logs from subprocesses go through the
/// `log` facade instead.
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Creates a new output manager.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Prints a section header.
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.colored(title, Color::Cyan, true)
    }

    /// Prints a success message.
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.colored(&format!("✓ {}", message), Color::Green, false)
    }

    /// Prints a warning message.
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.colored(&format!("! {}", message), Color::Yellow, false)
    }

    /// Prints an error message.
    pub fn error(&self, message: &str) -> std::io::Result<()> {
        self.colored(&format!("✗ {}", message), Color::Red, true)
    }

    /// Prints a verbose message if in verbose mode.
    pub fn verbose(&self, message: &str) -> std::io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }
        let mut stdout = StandardStream::stdout(ColorChoice::Auto);
        writeln!(stdout, "  {}", message)
    }

    /// Prints indented text.
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stdout = StandardStream::stdout(ColorChoice::Auto);
        writeln!(stdout, "  {}", message)
    }

    fn colored(&self, message: &str, color: Color, bold: bool) -> std::io::Result<()> {
        let mut stdout = StandardStream::stdout(ColorChoice::Auto);
        stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold))?;
        writeln!(stdout, "{}", message)?;
        stdout.reset()
    }
}
