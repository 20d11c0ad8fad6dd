//! Rank-filtered diagnostics on top of `tracing`.
//!
//! Every rank may report; only rank 0 emits, so a message issued by all
//! ranks appears once. Events go through the `tracing` macros and are
//! formatted by whatever subscriber the binary installs with [`init`].

use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Severity of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Progress information
    Message,
    /// Suspicious but recoverable condition
    Warning,
    /// Fatal condition, reported before the run stops
    Error,
}

/// Diagnostic sink of one rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reporter {
    rank: usize,
}

impl Reporter {
    /// Reporter for `rank`.
    pub fn new(rank: usize) -> Self {
        Self { rank }
    }

    /// Whether this rank emits diagnostics.
    #[inline]
    pub fn is_emitting(&self) -> bool {
        self.rank == 0
    }

    /// Emit `text` at the given severity if this is rank 0.
    pub fn report(&self, severity: Severity, text: &str) {
        if !self.is_emitting() {
            return;
        }
        match severity {
            Severity::Message => tracing::info!("{}", text),
            Severity::Warning => tracing::warn!("{}", text),
            Severity::Error => tracing::error!("{}", text),
        }
    }

    /// Informational message.
    pub fn message(&self, text: &str) {
        self.report(Severity::Message, text);
    }

    /// Warning.
    pub fn warning(&self, text: &str) {
        self.report(Severity::Warning, text);
    }

    /// Error.
    pub fn error(&self, text: &str) {
        self.report(Severity::Error, text);
    }
}

/// Parse a level name, falling back to `INFO`.
pub fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install the global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `default_level` when set. Returns an
/// error if a global subscriber is already installed.
pub fn init(default_level: Level) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}
