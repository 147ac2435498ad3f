//! Installing the process-wide standard logger.
//!
//! Kept in its own test binary: the standard logger can only be set once
//! per process.

use ctxlog::{Context, CtxLogError, Logger};
use serde_json::json;

#[test]
fn standard_logger_is_installed_once() {
    let installed = Logger::new().with_field("service", "ctxlog-tests");
    ctxlog::set_standard_logger(installed.clone()).unwrap();

    let ctx = Context::background();
    assert_eq!(ctxlog::get(&ctx), installed);
    assert_eq!(ctxlog::logger(&ctx), installed);

    let derived = ctxlog::get(&ctxlog::with_field(&ctx, "step", 1));
    assert_eq!(derived.fields().get("service"), Some(&json!("ctxlog-tests")));
    assert_eq!(derived.fields().get("step"), Some(&json!(1)));

    let again = ctxlog::set_standard_logger(Logger::new());
    assert!(matches!(again, Err(CtxLogError::StandardLoggerAlreadySet)));
    assert_eq!(ctxlog::standard_logger(), installed);
}
