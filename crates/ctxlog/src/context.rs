//! Immutable hierarchical context for carrying call-scoped values.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A collision-proof context key.
///
/// Keys are compared by identity, not by name: two keys with the same name
/// are still distinct. Declare keys as `static` items so every use refers to
/// the same address.
///
/// ```rust
/// use ctxlog::{Context, Key};
///
/// static REQUEST_ID: Key = Key::new("request_id");
///
/// let ctx = Context::background().with_value(&REQUEST_ID, 42_u64);
/// assert_eq!(ctx.value::<u64>(&REQUEST_ID), Some(&42));
/// ```
#[derive(Debug)]
pub struct Key {
    name: &'static str,
}

impl Key {
    /// Create a new key. The name is only used for debug output.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Human-readable name of the key.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn is(&self, other: &Key) -> bool {
        std::ptr::eq(self, other)
    }
}

struct Entry {
    key: &'static Key,
    value: Arc<dyn Any + Send + Sync>,
    parent: Context,
}

/// An immutable chain of key/value bindings.
///
/// Deriving a child never touches the parent, so a context can be cloned and
/// shared freely across threads and tasks. Lookups walk from the newest
/// binding towards the root and stop at the first matching key, so a child
/// binding shadows any ancestor binding of the same key.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Entry>>,
}

impl Context {
    /// The empty root context.
    #[must_use]
    pub const fn background() -> Self {
        Self { head: None }
    }

    /// Derive a child context with `value` bound at `key`.
    #[must_use]
    pub fn with_value<T>(&self, key: &'static Key, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            head: Some(Arc::new(Entry {
                key,
                value: Arc::new(value),
                parent: self.clone(),
            })),
        }
    }

    /// Look up the value bound at `key`.
    ///
    /// Returns `None` when the key is unbound, or when the nearest binding
    /// holds a value of a different type.
    #[must_use]
    pub fn value<T: Any>(&self, key: &'static Key) -> Option<&T> {
        self.lookup(key)?.downcast_ref::<T>()
    }

    /// Whether any binding for `key` is visible from this context.
    #[must_use]
    pub fn contains(&self, key: &'static Key) -> bool {
        self.lookup(key).is_some()
    }

    /// Number of bindings in the chain, shadowed ones included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.entries().count()
    }

    /// Whether this is an empty root context.
    #[must_use]
    pub fn is_background(&self) -> bool {
        self.head.is_none()
    }

    fn lookup(&self, key: &Key) -> Option<&(dyn Any + Send + Sync)> {
        self.entries()
            .find(|entry| entry.key.is(key))
            .map(|entry| entry.value.as_ref())
    }

    fn entries(&self) -> impl Iterator<Item = &Entry> {
        std::iter::successors(self.head.as_deref(), |entry| entry.parent.head.as_deref())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.entries().map(|entry| entry.key.name).collect();
        f.debug_struct("Context").field("keys", &keys).finish()
    }
}

impl Drop for Context {
    // Unlink iteratively so long chains do not recurse on drop.
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(entry) = next {
            match Arc::try_unwrap(entry) {
                Ok(mut entry) => next = entry.parent.head.take(),
                Err(_) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static A: Key = Key::new("a");
    static B: Key = Key::new("b");
    static A_AGAIN: Key = Key::new("a");

    #[test]
    fn test_background_is_empty() {
        let ctx = Context::background();
        assert!(ctx.is_background());
        assert_eq!(ctx.depth(), 0);
        assert!(ctx.value::<i32>(&A).is_none());
    }

    #[test]
    fn test_child_sees_ancestors() {
        let root = Context::background().with_value(&A, 1_i32);
        let child = root.with_value(&B, "two");

        assert_eq!(child.value::<i32>(&A), Some(&1));
        assert_eq!(child.value::<&str>(&B), Some(&"two"));
        assert_eq!(child.depth(), 2);
    }

    #[test]
    fn test_parent_unaffected_by_child() {
        let root = Context::background().with_value(&A, 1_i32);
        let _child = root.with_value(&B, 2_i32);

        assert!(!root.contains(&B));
        assert_eq!(root.depth(), 1);
    }

    #[test]
    fn test_nearest_binding_shadows() {
        let ctx = Context::background()
            .with_value(&A, 1_i32)
            .with_value(&A, 2_i32);

        assert_eq!(ctx.value::<i32>(&A), Some(&2));
    }

    #[test]
    fn test_keys_compare_by_identity() {
        let ctx = Context::background().with_value(&A, 1_i32);

        assert_eq!(A.name(), A_AGAIN.name());
        assert!(ctx.contains(&A));
        assert!(!ctx.contains(&A_AGAIN));
    }

    #[test]
    fn test_type_mismatch_is_absent() {
        let ctx = Context::background().with_value(&A, "not a number");

        assert!(ctx.contains(&A));
        assert!(ctx.value::<i32>(&A).is_none());
    }

    #[test]
    fn test_mismatch_does_not_fall_through_to_ancestor() {
        let ctx = Context::background()
            .with_value(&A, 1_i32)
            .with_value(&A, "shadow");

        assert!(ctx.value::<i32>(&A).is_none());
    }

    #[test]
    fn test_debug_lists_keys_newest_first() {
        let ctx = Context::background()
            .with_value(&A, 1_i32)
            .with_value(&B, 2_i32);

        assert_eq!(format!("{ctx:?}"), r#"Context { keys: ["b", "a"] }"#);
    }

    #[test]
    fn test_long_chain_drops() {
        let mut ctx = Context::background();
        for i in 0..200_000_u32 {
            ctx = ctx.with_value(&A, i);
        }
        assert_eq!(ctx.value::<u32>(&A), Some(&199_999));
        drop(ctx);
    }

    #[test]
    fn test_shared_chain_survives_drop_of_child() {
        let root = Context::background().with_value(&A, 1_i32);
        let child = root.with_value(&B, 2_i32);
        drop(child);

        assert_eq!(root.value::<i32>(&A), Some(&1));
    }

    #[test]
    fn test_context_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context>();
    }
}
