//! Terminal output.
//!
//! Tag names that scripts consume go to stdout. Everything else goes to stderr.

use crate::store::StoreCommand;
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Show the previous and the new version tag
pub fn display_tag_change(previous: &str, next: &str) {
    eprintln!("{}", style("Tag Change:").bold());
    eprintln!("  From: {}", style(previous).red());
    eprintln!("  To:   {}", style(next).green());
}

/// Print a git command that a dry run skipped
pub fn display_planned_command(command: &StoreCommand) {
    eprintln!("{} {}", style("[dry-run]").cyan(), command);
}

/// Print a tag name for scripts
pub fn print_tag(tag: &str) {
    println!("{}", tag);
}
