//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - `scripted` - Pre-programmed operator for tests
//! - This module - The [Operator] seam and the interactive console operator

use std::cell::RefCell;
use std::io::{self, BufRead, StdinLock, Write};

use crate::error::{ExpoVersionError, Result};
use crate::version::{self, ReleaseType};

pub mod formatter;
pub mod scripted;

pub use formatter::{
    display_current_version, display_error, display_success, display_version_choices,
    display_warning,
};
pub use scripted::ScriptedOperator;

/// Everything the workflow shows to, or asks of, the person running it.
pub trait Operator {
    fn show_current_version(&self, version: &str);
    fn show_success(&self, message: &str);
    fn show_warning(&self, message: &str);
    fn show_error(&self, message: &str);

    /// Yes/no question; anything but an explicit yes declines.
    fn confirm_continue(&self, message: &str) -> Result<bool>;

    /// Let the user pick the next version, starting from `current_version`.
    ///
    /// The returned string is either the current version, one of its
    /// increments, or a custom entry that passed semver validation.
    fn prompt_for_version(&self, current_version: &str) -> Result<String>;
}

/// One entry of the version selection menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionChoice {
    KeepCurrent(String),
    Increment {
        release: ReleaseType,
        version: String,
    },
    Custom,
}

impl VersionChoice {
    pub fn title(&self) -> String {
        match self {
            VersionChoice::KeepCurrent(version) => format!("keep current ({})", version),
            VersionChoice::Increment { release, version } => format!("{} ({})", release, version),
            VersionChoice::Custom => "custom".to_string(),
        }
    }
}

/// Builds the selection menu: keep current, patch, minor, major, custom.
///
/// Fails if `current_version` cannot be incremented.
pub fn version_choices(current_version: &str) -> Result<Vec<VersionChoice>> {
    let mut choices = vec![VersionChoice::KeepCurrent(current_version.to_string())];
    for release in ReleaseType::ALL {
        choices.push(VersionChoice::Increment {
            release,
            version: version::increment(current_version, release)?,
        });
    }
    choices.push(VersionChoice::Custom);
    Ok(choices)
}

/// Parses a 1-based menu selection. Empty input selects the first entry.
pub fn parse_selection(input: &str, choice_count: usize) -> Option<usize> {
    let input = input.trim();
    let index = if input.is_empty() {
        1
    } else {
        input.parse::<usize>().ok()?
    };

    (index > 0 && index <= choice_count).then(|| index - 1)
}

/// Interactive operator on the terminal.
///
/// Reads answers line by line from `input` (stdin by default).
pub struct ConsoleOperator<R> {
    input: RefCell<R>,
}

impl ConsoleOperator<StdinLock<'static>> {
    pub fn stdin() -> Self {
        ConsoleOperator::with_input(io::stdin().lock())
    }
}

impl<R: BufRead> ConsoleOperator<R> {
    pub fn with_input(input: R) -> Self {
        ConsoleOperator {
            input: RefCell::new(input),
        }
    }

    fn ask(&self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        let read = self.input.borrow_mut().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into());
        }
        Ok(line.trim().to_string())
    }

    fn prompt_for_custom_version(&self) -> Result<String> {
        loop {
            let entered = self.ask("Enter custom version: ")?;
            if version::validate(&entered) {
                return Ok(entered);
            }
            display_error("Invalid semver format");
        }
    }
}

impl<R: BufRead> Operator for ConsoleOperator<R> {
    fn show_current_version(&self, version: &str) {
        display_current_version(version);
    }

    fn show_success(&self, message: &str) {
        display_success(message);
    }

    fn show_warning(&self, message: &str) {
        display_warning(message);
    }

    fn show_error(&self, message: &str) {
        display_error(message);
    }

    fn confirm_continue(&self, message: &str) -> Result<bool> {
        let response = match self.ask(&format!("\n{} (y/N): ", message)) {
            Ok(response) => response.to_lowercase(),
            Err(ExpoVersionError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Ok(false)
            }
            Err(e) => return Err(e),
        };
        Ok(response == "y" || response == "yes")
    }

    fn prompt_for_version(&self, current_version: &str) -> Result<String> {
        let choices = version_choices(current_version)?;
        display_version_choices(&choices);

        let selected = loop {
            let input = self.ask(&format!("\nSelect (1-{}) [default: 1]: ", choices.len()))?;
            match parse_selection(&input, choices.len()) {
                Some(index) => break &choices[index],
                None => display_error("Invalid selection"),
            }
        };

        match selected {
            VersionChoice::KeepCurrent(version) => Ok(version.clone()),
            VersionChoice::Increment { version, .. } => Ok(version.clone()),
            VersionChoice::Custom => self.prompt_for_custom_version(),
        }
    }
}
