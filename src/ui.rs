//! Terminal output.
//!
//! Diagnostics (errors, warnings) go to stderr; results go to stdout so they
//! can be piped.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::planner::ReleasePlan;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display a created release: the tag name, then its message indented.
pub fn display_release_plan(plan: &ReleasePlan) {
    display_success(&format!("Created tag {}", style(plan.tag_name()).green().bold()));
    for line in &plan.message_lines {
        println!("  {}", line);
    }
}

/// Display the tag a deploy checkout now tracks.
pub fn display_deployed(tag: &str) {
    display_success(&format!("Checked out {} (detached)", style(tag).green().bold()));
}
