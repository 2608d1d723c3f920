//! Output helper functions for consistent styled messages.

use super::colors::SemanticStyle;

pub fn print_allowed(msg: &str) {
    println!("{} {}", "✓".allowed(), msg);
}

pub fn print_denied(msg: &str) {
    println!("{} {}", "✗".denied(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".denied(), msg);
}

pub fn print_warn(msg: &str) {
    println!("{} {}", "⚠".warning(), msg);
}

/// Prints a hint/suggestion with an arrow.
pub fn print_hint(msg: &str) {
    println!("{} {}", "→".muted(), msg.muted());
}

/// Prints a labeled key-value pair with proper indentation.
pub fn print_labeled(key: &str, value: &str) {
    println!("  {}: {}", key.muted(), value);
}

pub fn print_section(title: &str) {
    println!();
    println!("{}", title.header());
}
