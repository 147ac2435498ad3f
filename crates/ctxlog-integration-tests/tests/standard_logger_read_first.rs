//! Reading the standard logger before installing one.
//!
//! Kept in its own test binary: the first read fixes the standard logger
//! for the rest of the process.

use ctxlog::{Context, CtxLogError, Logger};

#[test]
fn install_after_first_read_is_rejected() {
    let ctx = Context::background();
    let before = ctxlog::get(&ctx);
    assert!(before.fields().is_empty());

    let late = Logger::new().with_field("late", true);
    let result = ctxlog::set_standard_logger(late);
    assert!(matches!(result, Err(CtxLogError::StandardLoggerAlreadySet)));

    assert!(!ctxlog::get(&ctx).fields().contains_key("late"));
    assert!(!ctxlog::standard_logger().fields().contains_key("late"));
    assert_eq!(ctxlog::get(&ctx), before);
}
