//! Subscriber setup and the process-wide base fields.
//!
//! Loggers only emit `tracing` events. [`setup_logging`] installs the
//! subscriber that filters and prints them, and seeds the standard logger
//! with the configured base fields so every context without a bound logger
//! still reports them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::binding::set_standard_logger;
use crate::error::{CtxLogError, CtxLogResult};
use crate::logger::{Fields, Logger};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// How events are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One line per event (default).
    #[default]
    Compact,
    /// Multi-line, indented output.
    Pretty,
    /// One JSON object per event. The accumulated fields arrive as a string.
    Json,
    /// One line per event with every span and field spelled out.
    Full,
}

/// Where rendered events are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard output.
    Stdout,
    /// Standard error (default).
    #[default]
    Stderr,
}

/// Logging setup, typically deserialized from the host application's
/// configuration file.
///
/// ```rust
/// use ctxlog::{LogConfig, LogFormat};
///
/// let config: LogConfig = serde_json::from_str(
///     r#"{"filter": "debug", "format": "json", "fields": {"service": "billing"}}"#,
/// ).unwrap();
///
/// assert_eq!(config.format, LogFormat::Json);
/// assert!(config.base_logger().fields().contains_key("service"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Base filter in `EnvFilter` syntax, e.g. `info` or `warn,ctxlog=debug`.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Extra filter directives appended after `filter`.
    #[serde(default)]
    pub directives: Vec<String>,
    /// Event rendering.
    #[serde(default)]
    pub format: LogFormat,
    /// Output stream.
    #[serde(default)]
    pub output: LogOutput,
    /// Fields carried by the standard logger, and therefore by every
    /// context that has no logger of its own.
    #[serde(default)]
    pub fields: Fields,
    /// Prefix events with a timestamp.
    #[serde(default = "enabled")]
    pub timestamps: bool,
    /// Colored output. Never applied to JSON.
    #[serde(default = "enabled")]
    pub ansi: bool,
}

fn default_filter() -> String {
    "info".to_string()
}

fn enabled() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new(default_filter())
    }
}

impl LogConfig {
    /// Config with the given base filter and defaults for everything else.
    #[must_use]
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            directives: Vec::new(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            fields: Fields::new(),
            timestamps: true,
            ansi: true,
        }
    }

    /// Set the event rendering.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the output stream.
    #[must_use]
    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Append a filter directive.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Add a base field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key, value);
        self
    }

    /// Add base fields; later keys win.
    #[must_use]
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields.merge(fields);
        self
    }

    /// No timestamps, no colors. Useful for tests and captured output.
    #[must_use]
    pub fn plain(mut self) -> Self {
        self.timestamps = false;
        self.ansi = false;
        self
    }

    /// The logger [`setup_logging`] installs as the standard logger.
    #[must_use]
    pub fn base_logger(&self) -> Logger {
        Logger::from(self.fields.clone())
    }

    fn env_filter(&self) -> CtxLogResult<EnvFilter> {
        let spec = std::iter::once(self.filter.as_str())
            .chain(self.directives.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(",");

        EnvFilter::try_new(spec).map_err(|e| CtxLogError::Config(e.to_string()))
    }

    fn fmt_layer<W>(&self, writer: W) -> BoxedLayer
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(self.ansi && self.format != LogFormat::Json);

        match (self.format, self.timestamps) {
            (LogFormat::Compact, true) => layer.compact().boxed(),
            (LogFormat::Compact, false) => layer.compact().without_time().boxed(),
            (LogFormat::Pretty, true) => layer.pretty().boxed(),
            (LogFormat::Pretty, false) => layer.pretty().without_time().boxed(),
            (LogFormat::Json, true) => layer.json().boxed(),
            (LogFormat::Json, false) => layer.json().without_time().boxed(),
            (LogFormat::Full, true) => layer.boxed(),
            (LogFormat::Full, false) => layer.without_time().boxed(),
        }
    }
}

/// Install the global subscriber and seed the standard logger.
///
/// The filter is validated first. The standard logger is only seeded when
/// `config.fields` is non-empty; otherwise it keeps its lazy empty default.
///
/// # Errors
///
/// - [`CtxLogError::Config`] if the filter or a directive does not parse.
/// - [`CtxLogError::StandardLoggerAlreadySet`] if base fields are configured
///   but the standard logger was already installed or read.
/// - [`CtxLogError::Init`] if a global subscriber is already set.
pub fn setup_logging(config: &LogConfig) -> CtxLogResult<()> {
    let filter = config.env_filter()?;

    if !config.fields.is_empty() {
        set_standard_logger(config.base_logger())?;
    }

    let layer = match config.output {
        LogOutput::Stdout => config.fmt_layer(std::io::stdout),
        LogOutput::Stderr => config.fmt_layer(std::io::stderr),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|e| CtxLogError::Init(e.to_string()))
}

/// [`setup_logging`] with [`LogConfig::default`]: `info`, compact, stderr.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn setup_default_logging() -> CtxLogResult<()> {
    setup_logging(&LogConfig::default())
}
