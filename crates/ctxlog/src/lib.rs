//! ctxlog - Context-scoped structured loggers.
//!
//! This crate provides:
//! - An immutable, hierarchical [`Context`] keyed by collision-proof [`Key`]s
//! - A [`Logger`] handle that accumulates structured [`Fields`]
//! - Helpers that bind a logger to a context so nested calls can pick it up
//!   without threading it through every signature
//! - Subscriber setup for the `tracing` ecosystem
//!
//! # Example
//!
//! ```rust
//! use ctxlog::{Context, Fields};
//!
//! fn handle(ctx: &Context) {
//!     let ctx = ctxlog::with_field(ctx, "step", "handle");
//!     store(&ctx);
//! }
//!
//! fn store(ctx: &Context) {
//!     ctxlog::get(ctx).info("storing");
//! }
//!
//! let ctx = ctxlog::with_fields(
//!     &Context::background(),
//!     Fields::new().with("request_id", "r-17").with("user", 42),
//! );
//! handle(&ctx);
//!
//! // The caller's context is untouched by what `handle` added.
//! assert!(!ctxlog::get(&ctx).fields().contains_key("step"));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod binding;
mod context;
mod error;
mod logger;
mod logging;

pub use binding::{
    LoggerBinding, get, logger, set_standard_logger, standard_logger, with_field, with_fields,
    with_logger,
};
pub use context::{Context, Key};
pub use error::{CtxLogError, CtxLogResult};
pub use logger::{FieldLogger, Fields, Logger};
pub use logging::{LogConfig, LogFormat, LogOutput, setup_default_logging, setup_logging};
