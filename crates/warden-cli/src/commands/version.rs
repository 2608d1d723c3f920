//! Version command implementation.

use crate::style::colors::SemanticStyle;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() {
    println!("{} {}", "warden".header(), format!("v{VERSION}").muted());
    println!();
    println!("ABAC policy evaluation with a legacy RBAC fallback.");
    println!();
    println!("Build info:");
    println!("  Target: {}", std::env::consts::ARCH);
    println!("  OS:     {}", std::env::consts::OS);
}
