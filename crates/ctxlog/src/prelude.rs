//! Prelude module - commonly used types for convenient import.
//!
//! Use `use ctxlog::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust,no_run
//! use ctxlog::prelude::*;
//!
//! # fn main() -> CtxLogResult<()> {
//! setup_logging(&LogConfig::new("debug").with_format(LogFormat::Compact))?;
//!
//! let ctx = ctxlog::with_field(&Context::background(), "component", "worker");
//! ctxlog::get(&ctx).info("started");
//! # Ok(())
//! # }
//! ```

// Errors
pub use crate::{CtxLogError, CtxLogResult};

// Context
pub use crate::{Context, Key};

// Loggers
pub use crate::{FieldLogger, Fields, Logger, LoggerBinding};

// Logging configuration
pub use crate::{LogConfig, LogFormat, LogOutput, setup_default_logging, setup_logging};
