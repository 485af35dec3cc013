// isocss/src/ui/output_format.rs
//! Formatting of the user-facing messages written to stderr.
//!
//! Every printer takes the destination writer and whether that writer
//! supports colour, so callers decide once (usually with `is_terminal`).

use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::path::Path;

/// Writes an informational line.
pub fn print_info_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{}", msg.cyan())
    } else {
        writeln!(writer, "{}", msg)
    }
}

pub fn print_warn_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{} {}", "Warning:".yellow().bold(), msg.yellow())
    } else {
        writeln!(writer, "Warning: {}", msg)
    }
}

pub fn print_error_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{} {}", "Error:".red().bold(), msg.red())
    } else {
        writeln!(writer, "Error: {}", msg)
    }
}

pub fn print_success_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{}", msg.green())
    } else {
        writeln!(writer, "{}", msg)
    }
}

/// Formats the progress line announced before a file is written.
pub fn isolate_line(input: &Path, output: &Path) -> String {
    format!("Isolate CSS: {} -> {}", input.display(), output.display())
}

/// Formats the end-of-run summary.
pub fn summary_line(isolated: usize, skipped: usize, failed: usize) -> String {
    format!(
        "Isolated {} file(s), skipped {}, failed {}.",
        isolated, skipped, failed
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_has_no_escape_codes() {
        let mut buf = Vec::new();
        print_error_message(&mut buf, "boom", false).unwrap();
        print_info_message(&mut buf, "hello", false).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Error: boom\nhello\n");
    }

    #[test]
    fn coloured_output_keeps_the_text() {
        let mut buf = Vec::new();
        print_warn_message(&mut buf, "careful", true).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains('\u{1b}'));
        assert!(text.contains("careful"));
    }

    #[test]
    fn progress_and_summary_lines() {
        assert_eq!(
            isolate_line(Path::new("src/a.css"), Path::new("src/a.iso.css")),
            "Isolate CSS: src/a.css -> src/a.iso.css"
        );
        assert_eq!(summary_line(2, 1, 0), "Isolated 2 file(s), skipped 1, failed 0.");
    }
}
