use std::cell::{Cell, RefCell};

use crate::error::Result;
use crate::ui::Operator;

/// Operator with canned answers that records every message it is shown.
///
/// Messages are stored as `"<Channel>: <text>"`, e.g. `"Warning: ..."`.
pub struct ScriptedOperator {
    version_answer: String,
    confirm_answer: bool,
    messages: RefCell<Vec<String>>,
    prompts: Cell<usize>,
    confirmations: Cell<usize>,
}

impl ScriptedOperator {
    pub fn new() -> Self {
        ScriptedOperator {
            version_answer: String::new(),
            confirm_answer: true,
            messages: RefCell::new(Vec::new()),
            prompts: Cell::new(0),
            confirmations: Cell::new(0),
        }
    }

    /// Version returned from the interactive prompt
    pub fn answering_version(mut self, version: impl Into<String>) -> Self {
        self.version_answer = version.into();
        self
    }

    /// Answer to every confirmation question
    pub fn confirming(mut self, answer: bool) -> Self {
        self.confirm_answer = answer;
        self
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn has_message(&self, needle: &str) -> bool {
        self.messages.borrow().iter().any(|m| m.contains(needle))
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.get()
    }

    pub fn confirmation_count(&self) -> usize {
        self.confirmations.get()
    }

    fn push(&self, channel: &str, message: &str) {
        self.messages
            .borrow_mut()
            .push(format!("{}: {}", channel, message));
    }
}

impl Default for ScriptedOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl Operator for ScriptedOperator {
    fn show_current_version(&self, version: &str) {
        self.push("Current version", version);
    }

    fn show_success(&self, message: &str) {
        self.push("Success", message);
    }

    fn show_warning(&self, message: &str) {
        self.push("Warning", message);
    }

    fn show_error(&self, message: &str) {
        self.push("Error", message);
    }

    fn confirm_continue(&self, message: &str) -> Result<bool> {
        self.confirmations.set(self.confirmations.get() + 1);
        self.push("Confirm", message);
        Ok(self.confirm_answer)
    }

    fn prompt_for_version(&self, _current_version: &str) -> Result<String> {
        self.prompts.set(self.prompts.get() + 1);
        Ok(self.version_answer.clone())
    }
}
