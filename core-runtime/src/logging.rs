//! # Logging & Tracing Infrastructure
//!
//! Structured logging for the Playo server on top of `tracing`.
//!
//! ## Overview
//!
//! [`init_logging`] installs one global subscriber made of three layers:
//!
//! 1. an [`EnvFilter`] (workspace crates at the configured level, HTTP and
//!    database dependencies at `warn`, request traces at `info`)
//! 2. a formatter writing pretty, compact or JSON lines to stdout
//! 3. an optional forwarder mirroring every surviving event to a
//!    [`LoggerSink`], with credential fields masked
//!
//! ## Environment
//!
//! `LOG_FORMAT` (`pretty` | `json` | `compact`), `LOG_LEVEL` and `LOG_FILTER`
//! are applied by [`LoggingConfig::with_env_overrides`].
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::logging::{init_logging, LoggingConfig};
//!
//! let config = LoggingConfig::default().with_env_overrides(|k| std::env::var(k).ok())?;
//! init_logging(config)?;
//! tracing::info!("Server started");
//! ```

use crate::error::{Error, Result};

use bridge_traits::time::{LogEntry, LogLevel, LoggerSink};

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::str::FromStr;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{
    filter::EnvFilter,
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
    Layer,
};

/// Workspace crates that follow the configured level in the default filter.
const WORKSPACE_TARGETS: &[&str] = &[
    "playo",
    "core_runtime",
    "core_library",
    "core_service",
    "core_playback",
    "core_client",
    "provider_cloudinary",
    "bridge_desktop",
];

/// Fixed directives for third-party crates in the default filter.
const DEPENDENCY_DIRECTIVES: &[&str] = &[
    "h2=warn",
    "hyper=warn",
    "reqwest=warn",
    "sqlx=warn",
    "tower_http=info",
];

const REDACTED: &str = "[REDACTED]";

/// Field names whose values never reach a sink in clear text.
const SENSITIVE_FIELDS: &[&str] = &[
    "token",
    "password",
    "secret",
    "api_key",
    "anon_key",
    "signature",
    "authorization",
    "bearer",
];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line human-readable output
    Pretty,
    /// One JSON object per event
    Json,
    /// Single-line human-readable output
    Compact,
}

impl Default for LogFormat {
    /// Pretty in debug builds, JSON in release builds.
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(Error::Config(format!(
                "Unknown log format '{}' (use pretty, json or compact)",
                other
            ))),
        }
    }
}

/// Parse a level name such as `info` or `WARN`.
pub fn parse_log_level(s: &str) -> Result<LogLevel> {
    let level = match s.trim().to_ascii_lowercase().as_str() {
        "trace" => LogLevel::Trace,
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        "warn" | "warning" => LogLevel::Warn,
        "error" => LogLevel::Error,
        other => return Err(Error::Config(format!("Unknown log level '{}'", other))),
    };
    Ok(level)
}

fn directive_level(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

/// Logging configuration
#[derive(Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Level applied to workspace crates by the default filter
    pub level: LogLevel,
    /// Mask sensitive fields forwarded to the logger sink
    pub redact_pii: bool,
    /// Full filter override, e.g. `core_service=debug,sqlx=info`
    pub filter: Option<String>,
    pub logger_sink: Option<Arc<dyn LoggerSink>>,
    /// Record span activity (pretty) or the span list (JSON)
    pub enable_spans: bool,
    pub display_target: bool,
}

impl fmt::Debug for LoggingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingConfig")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("redact_pii", &self.redact_pii)
            .field("filter", &self.filter)
            .field("logger_sink", &self.logger_sink.is_some())
            .field("enable_spans", &self.enable_spans)
            .field("display_target", &self.display_target)
            .finish()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            redact_pii: true,
            filter: None,
            logger_sink: None,
            enable_spans: false,
            display_target: true,
        }
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_pii_redaction(mut self, redact: bool) -> Self {
        self.redact_pii = redact;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Mirror events to a host sink.
    pub fn with_logger_sink(mut self, sink: Arc<dyn LoggerSink>) -> Self {
        self.logger_sink = Some(sink);
        self
    }

    pub fn with_spans(mut self, enable: bool) -> Self {
        self.enable_spans = enable;
        self
    }

    pub fn with_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }

    /// Apply `LOG_FORMAT`, `LOG_LEVEL` and `LOG_FILTER` from a variable lookup.
    ///
    /// Unset variables keep the current values.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(format) = lookup("LOG_FORMAT") {
            self.format = format.parse()?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.level = parse_log_level(&level)?;
        }
        if let Some(filter) = lookup("LOG_FILTER").filter(|f| !f.trim().is_empty()) {
            self.filter = Some(filter);
        }
        Ok(self)
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        let directives = match &self.filter {
            Some(custom) => custom.clone(),
            None => {
                let level = directive_level(self.level);
                WORKSPACE_TARGETS
                    .iter()
                    .map(|target| format!("{}={}", target, level))
                    .chain(DEPENDENCY_DIRECTIVES.iter().map(|d| d.to_string()))
                    .collect::<Vec<_>>()
                    .join(",")
            }
        };

        EnvFilter::try_new(directives)
            .map_err(|e| Error::Config(format!("Invalid log filter: {}", e)))
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails when the filter does not parse or a global subscriber is already
/// installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = config.env_filter()?;

    let formatter = match config.format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(config.display_target)
            .with_span_events(if config.enable_spans {
                FmtSpan::ACTIVE
            } else {
                FmtSpan::NONE
            })
            .with_writer(io::stdout)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(config.enable_spans)
            .with_span_list(config.enable_spans)
            .with_target(config.display_target)
            .with_writer(io::stdout)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(config.display_target)
            .with_writer(io::stdout)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(formatter)
        .with(LoggerSinkLayer {
            sink: config.logger_sink,
            redact: config.redact_pii,
        })
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}

/// Forwards events to a [`LoggerSink`].
struct LoggerSinkLayer {
    sink: Option<Arc<dyn LoggerSink>>,
    redact: bool,
}

impl LoggerSinkLayer {
    fn entry_for(&self, event: &Event<'_>, level: LogLevel) -> LogEntry {
        let metadata = event.metadata();
        let mut fields = FieldCollector::default();
        event.record(&mut fields);

        let message = fields
            .message
            .unwrap_or_else(|| metadata.name().to_string());
        fields
            .values
            .into_iter()
            .fold(LogEntry::new(level, metadata.target(), message), |entry, (key, value)| {
                let value = if self.redact {
                    redact_if_sensitive(&key, &value)
                } else {
                    value
                };
                entry.with_field(key, value)
            })
    }
}

impl<S> Layer<S> for LoggerSinkLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let Some(sink) = &self.sink else {
            return;
        };

        let level = log_level(*event.metadata().level());
        if level < sink.min_level() {
            return;
        }

        let mut entry = self.entry_for(event, level);
        if let Some(span) = ctx.lookup_current() {
            entry = entry.with_span_id(span.name());
        }

        let sink = Arc::clone(sink);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(err) = sink.log(entry).await {
                        eprintln!("LoggerSink error: {}", err);
                    }
                });
            }
            Err(_) => {
                if let Err(err) = futures::executor::block_on(sink.log(entry)) {
                    eprintln!("LoggerSink error: {}", err);
                }
            }
        }
    }
}

/// Collects event fields as strings. `message` is kept apart.
#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    values: HashMap<String, String>,
}

impl FieldCollector {
    fn insert(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            name => {
                self.values.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, format!("{:?}", value));
    }
}

fn log_level(level: tracing::Level) -> LogLevel {
    match level {
        tracing::Level::TRACE => LogLevel::Trace,
        tracing::Level::DEBUG => LogLevel::Debug,
        tracing::Level::INFO => LogLevel::Info,
        tracing::Level::WARN => LogLevel::Warn,
        tracing::Level::ERROR => LogLevel::Error,
    }
}

/// Mask a field value when its name marks a credential or the value looks
/// like an e-mail address.
///
/// URLs pass through even when they contain `@`.
pub fn redact_if_sensitive(field_name: &str, value: &str) -> String {
    let name = field_name.to_ascii_lowercase();
    if SENSITIVE_FIELDS.iter().any(|s| name.contains(s)) {
        return REDACTED.to_string();
    }

    let looks_like_email = value.contains('.') && !value.contains("://");
    match value.find('@') {
        Some(at) if looks_like_email => {
            let initial = value[..at].chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", initial, REDACTED)
        }
        _ => value.to_string(),
    }
}

/// Basename of a client-supplied path, for either separator style.
///
/// ```ignore
/// assert_eq!(strip_path("C:\\Users\\me\\Music\\song.mp3"), "song.mp3");
/// ```
pub fn strip_path(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
