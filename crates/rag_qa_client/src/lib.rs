//! Question-answering client library: HTTP client, answer rendering, and the
//! query controller with its UI state. Used by the `rag-qa` binary.

pub mod app;
pub mod client;
pub mod config;
pub mod messages;
pub mod render;
pub mod ui;

pub use app::{Key, PendingQuery, QueryApp, QueryBackend, SubmitOutcome, Submission};
pub use client::{Client, ClientError, HealthStatus};
pub use config::{default_config_path, ClientSection, Config, ConfigError, ServerSection};
pub use messages::{ContextChunk, QueryResponse};
pub use render::{escape_html, render_result, ResultView};
pub use ui::{Phase, UiState};
