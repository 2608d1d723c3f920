//! Semantic color palette for decisions and diagnostics.

use owo_colors::{OwoColorize, Style};

/// Granted decisions (green bold).
pub fn allowed_style() -> Style {
    Style::new().green().bold()
}

/// Denied decisions and errors (red bold).
pub fn denied_style() -> Style {
    Style::new().red().bold()
}

pub fn warning_style() -> Style {
    Style::new().yellow()
}

pub fn muted_style() -> Style {
    Style::new().dimmed()
}

pub fn header_style() -> Style {
    Style::new().bold()
}

/// Patterns, codes, and paths (blue).
pub fn code_style() -> Style {
    Style::new().blue()
}

/// Applies a semantic style unless colors are disabled.
pub trait SemanticStyle {
    fn paint(&self, style: Style) -> String;

    fn allowed(&self) -> String {
        self.paint(allowed_style())
    }

    fn denied(&self) -> String {
        self.paint(denied_style())
    }

    fn warning(&self) -> String {
        self.paint(warning_style())
    }

    fn muted(&self) -> String {
        self.paint(muted_style())
    }

    fn header(&self) -> String {
        self.paint(header_style())
    }

    fn code(&self) -> String {
        self.paint(code_style())
    }
}

impl<T: std::fmt::Display> SemanticStyle for T {
    fn paint(&self, style: Style) -> String {
        if super::no_color() {
            self.to_string()
        } else {
            self.style(style).to_string()
        }
    }
}
