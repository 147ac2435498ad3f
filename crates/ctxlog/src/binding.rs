//! Binding loggers to contexts.
//!
//! A logger is stored in a [`Context`] under a private key, so no other code
//! sharing the context can overwrite or read it by accident. Fields added
//! through [`with_field`] and [`with_fields`] accumulate down the context
//! chain without affecting sibling or ancestor contexts.

use serde_json::Value;
use std::sync::OnceLock;

use crate::context::{Context, Key};
use crate::error::{CtxLogError, CtxLogResult};
use crate::logger::{FieldLogger, Fields, Logger};

static LOGGER_KEY: Key = Key::new("ctxlog::logger");

static STANDARD_LOGGER: OnceLock<Logger> = OnceLock::new();

/// The process-wide standard logger.
///
/// Initialised to a logger with no fields on first use unless
/// [`set_standard_logger`] ran before.
#[must_use]
pub fn standard_logger() -> Logger {
    STANDARD_LOGGER.get_or_init(Logger::new).clone()
}

/// Install the process-wide standard logger.
///
/// Intended to run once at startup, before any context lookups.
///
/// # Errors
///
/// Returns [`CtxLogError::StandardLoggerAlreadySet`] if the standard logger
/// was already installed or has already been read.
pub fn set_standard_logger(logger: Logger) -> CtxLogResult<()> {
    STANDARD_LOGGER
        .set(logger)
        .map_err(|_| CtxLogError::StandardLoggerAlreadySet)
}

/// Context logger operations with a configurable fallback.
///
/// The free functions in this module use [`LoggerBinding::standard`]; embed a
/// binding with an explicit fallback where the process-wide logger is not
/// wanted, such as in tests.
#[derive(Debug, Clone, Default)]
pub struct LoggerBinding {
    fallback: Option<Logger>,
}

impl LoggerBinding {
    /// A binding that falls back to [`standard_logger`].
    #[must_use]
    pub const fn standard() -> Self {
        Self { fallback: None }
    }

    /// A binding that falls back to `fallback`.
    #[must_use]
    pub fn new(fallback: Logger) -> Self {
        Self {
            fallback: Some(fallback),
        }
    }

    /// The logger returned when a context has none bound.
    #[must_use]
    pub fn fallback(&self) -> Logger {
        self.fallback.clone().unwrap_or_else(standard_logger)
    }

    /// Get the logger bound to `ctx`, or the fallback.
    #[must_use]
    pub fn get(&self, ctx: &Context) -> Logger {
        match ctx.value::<Logger>(&LOGGER_KEY) {
            Some(logger) => logger.clone(),
            None => self.fallback(),
        }
    }

    /// Derive a context with a copy of `logger` bound.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn with_logger<L: FieldLogger + ?Sized>(&self, ctx: &Context, logger: &L) -> Context {
        // Store a fresh copy so the caller's handle cannot change what is bound.
        let copy = logger.with_fields(Fields::new());
        ctx.with_value(&LOGGER_KEY, copy)
    }

    /// Derive a context whose logger carries one more field.
    #[must_use]
    pub fn with_field(
        &self,
        ctx: &Context,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Context {
        self.with_logger(ctx, &self.get(ctx).with_field(key, value))
    }

    /// Derive a context whose logger carries `fields` in addition.
    #[must_use]
    pub fn with_fields(&self, ctx: &Context, fields: Fields) -> Context {
        self.with_logger(ctx, &self.get(ctx).with_fields(fields))
    }
}

/// Get the logger bound to `ctx`, or the standard logger if none is.
///
/// ```rust
/// use ctxlog::Context;
///
/// fn handle(ctx: &Context, id: u32) {
///     ctxlog::get(ctx).with_field("id", id).info("handling");
/// }
///
/// handle(&ctxlog::with_field(&Context::background(), "component", "api"), 7);
/// ```
#[must_use]
pub fn get(ctx: &Context) -> Logger {
    LoggerBinding::standard().get(ctx)
}

/// Alias of [`get`].
#[must_use]
pub fn logger(ctx: &Context) -> Logger {
    get(ctx)
}

/// Derive a context with a copy of `logger` bound.
#[must_use]
pub fn with_logger<L: FieldLogger + ?Sized>(ctx: &Context, logger: &L) -> Context {
    LoggerBinding::standard().with_logger(ctx, logger)
}

/// Derive a context whose logger carries one more field.
#[must_use]
pub fn with_field(ctx: &Context, key: impl Into<String>, value: impl Into<Value>) -> Context {
    LoggerBinding::standard().with_field(ctx, key, value)
}

/// Derive a context whose logger carries `fields` in addition.
#[must_use]
pub fn with_fields(ctx: &Context, fields: Fields) -> Context {
    LoggerBinding::standard().with_fields(ctx, fields)
}
