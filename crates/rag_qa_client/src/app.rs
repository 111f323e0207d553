//! Query controller: input capture, submission, rendering into [`UiState`],
//! and the startup health check.
//!
//! A submission is split into [`QueryApp::begin_submit`] and
//! [`QueryApp::finish_submit`] around the single network await. The
//! [`PendingQuery`] token returned by the first is consumed by the second, which
//! restores the spinner, submit control and focus on every outcome.

use crate::client::{Client, ClientError, HealthStatus};
use crate::messages::QueryResponse;
use crate::render::render_result;
use crate::ui::UiState;

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a question.";

/// The server side of the controller. Implemented by [`Client`]; tests script it.
#[allow(async_fn_in_trait)]
pub trait QueryBackend {
    async fn query(&self, query: &str) -> Result<QueryResponse, ClientError>;
    async fn health(&self) -> HealthStatus;
}

impl QueryBackend for Client {
    async fn query(&self, query: &str) -> Result<QueryResponse, ClientError> {
        Client::query(self, query).await
    }

    async fn health(&self) -> HealthStatus {
        Client::health(self).await
    }
}

/// Strip surrounding whitespace, counting a byte-order mark as whitespace.
fn trim_input(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Key pressed while the input field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

/// A query that has left the input field and is awaiting the server.
#[derive(Debug)]
#[must_use = "pass to QueryApp::finish_submit to leave the loading state"]
pub struct PendingQuery {
    query: String,
}

impl PendingQuery {
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Result of [`QueryApp::begin_submit`].
#[derive(Debug)]
pub enum Submission {
    /// Submit control disabled; nothing happened.
    Ignored,
    /// Empty input; validation error shown, no request.
    Rejected,
    Pending(PendingQuery),
}

/// Result of a full submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored,
    Rejected,
    Answered,
    Failed(ClientError),
}

impl SubmitOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SubmitOutcome::Rejected | SubmitOutcome::Failed(_))
    }
}

pub struct QueryApp<B> {
    ui: UiState,
    backend: B,
}

impl<B: QueryBackend> QueryApp<B> {
    pub fn new(ui: UiState, backend: B) -> Self {
        Self { ui, backend }
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Replace the pending input text (typing into the field).
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.ui.set_input(text);
    }

    pub async fn click_submit(&mut self) -> SubmitOutcome {
        self.submit().await
    }

    /// Enter commits the input, but only while the submit control is enabled.
    pub async fn press_key(&mut self, key: Key) -> SubmitOutcome {
        match key {
            Key::Enter if self.ui.is_submit_enabled() => self.submit().await,
            _ => SubmitOutcome::Ignored,
        }
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let pending = match self.begin_submit() {
            Submission::Pending(pending) => pending,
            Submission::Ignored => return SubmitOutcome::Ignored,
            Submission::Rejected => return SubmitOutcome::Rejected,
        };
        let result = self.backend.query(pending.query()).await;
        self.finish_submit(pending, result)
    }

    /// Validate the input and, if it holds a question, clear it and enter loading.
    pub fn begin_submit(&mut self) -> Submission {
        if !self.ui.is_submit_enabled() {
            return Submission::Ignored;
        }
        let query = trim_input(self.ui.input()).to_string();
        if query.is_empty() {
            self.ui.show_error(EMPTY_QUERY_MESSAGE);
            return Submission::Rejected;
        }

        self.ui.clear_input();
        self.ui.enter_loading();
        Submission::Pending(PendingQuery { query })
    }

    /// Render the answer or the failure, then leave loading.
    pub fn finish_submit(
        &mut self,
        pending: PendingQuery,
        result: Result<QueryResponse, ClientError>,
    ) -> SubmitOutcome {
        let outcome = match result {
            Ok(response) => {
                self.ui.show_result(render_result(&response));
                SubmitOutcome::Answered
            }
            Err(err) => {
                tracing::error!(query = %pending.query, error = %err, "query failed");
                self.ui.show_error(err.user_message());
                self.ui.show_welcome();
                SubmitOutcome::Failed(err)
            }
        };
        self.ui.leave_loading();
        outcome
    }

    /// Probe the server once and raise the banner if it is not healthy.
    pub async fn check_health(&mut self) -> HealthStatus {
        let status = self.backend.health().await;
        self.apply_health(&status);
        status
    }

    /// Apply a health result obtained elsewhere (e.g. from a spawned task).
    pub fn apply_health(&mut self, status: &HealthStatus) {
        if let Some(banner) = status.banner() {
            self.ui.show_error(banner);
        }
    }
}
