//! UI state owned by the query controller: input field, submit control,
//! spinner, welcome panel, result panel, and error banner.

use crate::render::ResultView;

/// Coarse client state derived from panel visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    ShowingResult,
    ShowingError,
}

#[derive(Debug, Clone)]
pub struct UiState {
    input: String,
    input_focused: bool,
    submit_enabled: bool,
    loading_visible: bool,
    welcome_visible: bool,
    result: Option<ResultView>,
    result_visible: bool,
    error: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            input: String::new(),
            input_focused: true,
            submit_enabled: true,
            loading_visible: false,
            welcome_visible: true,
            result: None,
            result_visible: false,
            error: None,
        }
    }
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.loading_visible {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::ShowingError
        } else if self.result_visible {
            Phase::ShowingResult
        } else {
            Phase::Idle
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn is_input_focused(&self) -> bool {
        self.input_focused
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn is_loading(&self) -> bool {
        self.loading_visible
    }

    pub fn is_welcome_visible(&self) -> bool {
        self.welcome_visible
    }

    /// The result panel, only while it is shown.
    pub fn result(&self) -> Option<&ResultView> {
        self.result.as_ref().filter(|_| self.result_visible)
    }

    /// The error banner text, only while it is shown.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn clear_input(&mut self) {
        self.input.clear();
    }

    pub(crate) fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Hide welcome and result, clear the banner, show the spinner, lock submit.
    pub(crate) fn enter_loading(&mut self) {
        self.welcome_visible = false;
        self.result_visible = false;
        self.error = None;
        self.loading_visible = true;
        self.submit_enabled = false;
        self.input_focused = false;
    }

    pub(crate) fn show_result(&mut self, view: ResultView) {
        self.result = Some(view);
        self.result_visible = true;
    }

    pub(crate) fn show_welcome(&mut self) {
        self.welcome_visible = true;
    }

    /// Hide the spinner, unlock submit, refocus the input.
    pub(crate) fn leave_loading(&mut self) {
        self.loading_visible = false;
        self.submit_enabled = true;
        self.input_focused = true;
    }
}
