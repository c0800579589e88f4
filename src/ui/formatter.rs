//! Pure formatting functions for UI output.
//!
//! All display logic lives here, separate from user interaction.

use console::style;

use crate::ui::VersionChoice;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{}", style(format!("Error: {}", message)).red());
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{}", style(format!("✓ {}", message)).green());
}

/// Format and print a warning in yellow.
pub fn display_warning(message: &str) {
    println!("{}", style(message).yellow());
}

/// Show the version currently recorded in the app manifest.
pub fn display_current_version(version: &str) {
    println!("{}", style(format!("Current version: {}", version)).blue());
}

/// Display the numbered version choices.
pub fn display_version_choices(choices: &[VersionChoice]) {
    println!("\n{}", style("Select version increment:").bold());
    for (i, choice) in choices.iter().enumerate() {
        println!("  {}. {}", i + 1, choice.title());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryWarning;

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_display_warning() {
        // Visual verification test - output is printed to stdout
        display_warning(&BoundaryWarning::VersionUnchanged.to_string());
    }

    #[test]
    fn test_display_success() {
        display_success("test success");
        display_current_version("1.0.0");
    }
}
