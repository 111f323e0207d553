//! rag-qa: terminal front end for the question-answering server.
//! Probes `/api/health` in the background, then submits each question (from the
//! command line, or one per stdin line) and prints the answer with its sources
//! and retrieved context.

use clap::Parser;
use rag_qa_client::config::{self, Config, ConfigError, CONFIG_ENV_VAR};
use rag_qa_client::{Client, HealthStatus, QueryApp, SubmitOutcome, Submission, UiState};
use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const WELCOME: &str = "Ask a question about your documents, then press Enter.";

#[derive(Debug, Parser)]
#[command(name = "rag-qa", version, about = "Ask questions of a RAG server")]
struct Cli {
    /// Config file (defaults to ~/.rag-qa/config.yaml).
    #[arg(long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Server base URL, overriding the config file.
    #[arg(long)]
    url: Option<String>,

    /// Query timeout in seconds; 0 waits indefinitely.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Print the result panel as an HTML fragment.
    #[arg(long)]
    html: bool,

    /// Ask a single question instead of reading questions from stdin.
    question: Option<String>,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rag_qa_client=warn,rag_qa=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
    // An explicit path must exist; the default one is optional.
    if let Some(path) = &cli.config {
        return config::load(path);
    }
    match config::default_config_path() {
        Some(path) => config::load_or_default(&path),
        None => Ok(Config::default()),
    }
}

/// Where questions come from.
enum Questions {
    Once(Option<String>),
    Stdin(Lines<BufReader<Stdin>>),
}

impl Questions {
    async fn next(&mut self) -> Option<String> {
        match self {
            Questions::Once(question) => question.take(),
            Questions::Stdin(lines) => match lines.next_line().await {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read stdin");
                    None
                }
            },
        }
    }
}

fn report_health(app: &mut QueryApp<Client>, status: &HealthStatus) {
    app.apply_health(status);
    if let Some(banner) = status.banner() {
        eprintln!("Error: {}", banner);
    }
}

/// Type `question` into the input and commit it, printing progress and the result.
async fn ask(app: &mut QueryApp<Client>, question: String, html: bool) -> SubmitOutcome {
    app.set_input(question);
    let pending = match app.begin_submit() {
        Submission::Pending(pending) => pending,
        Submission::Rejected => {
            if let Some(message) = app.ui().error() {
                eprintln!("Error: {}", message);
            }
            return SubmitOutcome::Rejected;
        }
        Submission::Ignored => return SubmitOutcome::Ignored,
    };

    eprintln!("Thinking...");
    let result = app.backend().query(pending.query()).await;
    let outcome = app.finish_submit(pending, result);

    let ui = app.ui();
    if let Some(view) = ui.result() {
        let rendered = if html { view.to_html() } else { view.to_text() };
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let _ = writeln!(out, "{}", rendered);
        let _ = out.flush();
    } else if let Some(message) = ui.error() {
        eprintln!("Error: {}", message);
        if ui.is_welcome_visible() {
            eprintln!("{}", WELCOME);
        }
    }
    outcome
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let cfg = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: failed to load config: {}", e);
            process::exit(1);
        }
    };

    let base_url = cli.url.clone().unwrap_or_else(|| cfg.base_url());
    let timeout = match cli.timeout {
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(secs)),
        None => cfg.request_timeout(),
    };
    let client = match Client::new(&base_url, timeout) {
        Ok(c) => c.with_health_timeout(cfg.health_timeout()),
        Err(e) => {
            eprintln!("Error: failed to create HTTP client: {}", e);
            process::exit(1);
        }
    };
    tracing::debug!(base_url = %client.base_url(), ?timeout, "client ready");

    let mut health_task = tokio::spawn({
        let client = client.clone();
        async move { client.health().await }
    });
    let mut health_pending = true;

    let mut questions = match cli.question.clone() {
        Some(question) => Questions::Once(Some(question)),
        None => {
            eprintln!("{}", WELCOME);
            Questions::Stdin(BufReader::new(tokio::io::stdin()).lines())
        }
    };

    let mut app = QueryApp::new(UiState::new(), client);
    let mut failed = false;

    loop {
        tokio::select! {
            joined = &mut health_task, if health_pending => {
                health_pending = false;
                let status = joined
                    .unwrap_or_else(|e| HealthStatus::Unreachable(e.to_string()));
                report_health(&mut app, &status);
            }
            question = questions.next() => {
                let Some(question) = question else { break };
                let outcome = ask(&mut app, question, cli.html).await;
                failed |= outcome.is_failure();
            }
        }
    }

    if health_pending {
        let status = health_task
            .await
            .unwrap_or_else(|e| HealthStatus::Unreachable(e.to_string()));
        report_health(&mut app, &status);
    }

    if failed {
        process::exit(1);
    }
}
