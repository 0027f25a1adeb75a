//! Terminal output helpers.

use console::style;

use crate::formatter::BranchConstraint;
use crate::version::Version;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with a green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with a yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display the scope derived for a branch: the branch itself, the version
/// line it pins, and the glob pattern tags on it should match.
pub fn display_branch_scope(branch: &str, constraint: &BranchConstraint, pattern: &str) {
    println!("\n{}", style("Branch scope").bold());
    println!("  Branch:  {}", style(branch).cyan());
    println!("  Scope:   {}", constraint);
    println!("  Pattern: {}", style(pattern).green());
}

/// Display the tags accepted for the current scope, lowest version first,
/// with a one-line note about how many fell outside it.
pub fn display_scoped_tags(accepted: &[(String, Version)], rejected: usize) {
    if accepted.is_empty() {
        println!("{}", style("No tags match the branch scope").bold());
    } else {
        println!("{}", style("Tags in scope:").bold());
        for (name, version) in accepted {
            println!("  {}  ({})", style(name).green(), version);
        }
    }

    if rejected > 0 {
        println!("  {} tag(s) outside the scope", rejected);
    }
}
