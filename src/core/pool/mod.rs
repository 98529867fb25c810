//=========================================================================
// Object Pooling
//=========================================================================
//
// Bounded caches of reusable instances.
//
// Architecture:
//   ObjectPool<T, P>
//     ├─ pooled: VecDeque<T>       (idle entries, FIFO)
//     ├─ count_active: usize       (checked-out entries)
//     └─ policy: P: PoolPolicy<T>  (create + lifecycle hooks)
//
// Policies:
//   CallbackPolicy<T>   closures supplied through PoolBuilder
//   TemplatePolicy<T>   copies of a template NativeObject
//
// Flow:
//   get()     → pop idle or create → on_taken → active += 1
//   release() → push idle + on_returned, or on_destroyed on overflow
//
//=========================================================================

//=== Module Declarations =================================================

mod native_pool;
mod object_pool;

//=== Public API ==========================================================

pub use native_pool::{NativeObject, NativeObjectPool, NativePoolBuilder, TemplatePolicy};
pub use object_pool::{ObjectPool, PoolBuilder, PoolConfig};

//=== Pool Policy =========================================================

/// Strategy deciding how a pool creates and handles its entries.
///
/// Only `create()` is required. The hooks default to doing nothing, and
/// `on_destroyed` simply drops the entry.
///
/// ```rust
/// # use tickwork::prelude::*;
/// struct Buffers;
///
/// impl PoolPolicy<Vec<u8>> for Buffers {
///     fn create(&mut self) -> Vec<u8> {
///         Vec::with_capacity(1024)
///     }
///
///     fn on_returned(&mut self, buffer: &mut Vec<u8>) {
///         buffer.clear();
///     }
/// }
///
/// let mut pool: ObjectPool<Vec<u8>, Buffers> =
///     ObjectPool::with_policy(Buffers, PoolConfig::default());
/// let buffer = pool.get();
/// assert_eq!(pool.count_active(), 1);
/// pool.release(buffer).unwrap();
/// ```
pub trait PoolPolicy<T> {
    /// Creates a brand new entry when the idle queue is empty.
    fn create(&mut self) -> T;

    /// Called when an entry is handed out by `get()`.
    fn on_taken(&mut self, _element: &mut T) {}

    /// Called when an entry is accepted back into the idle queue.
    fn on_returned(&mut self, _element: &mut T) {}

    /// Called when an entry leaves the pool for good (overflow or `clear()`).
    fn on_destroyed(&mut self, element: T) {
        drop(element);
    }
}

//=== Pool Hooks ==========================================================

/// Boxed per-entry callback.
pub type Hook<T> = Box<dyn FnMut(&mut T)>;

/// Optional take/return/destroy callbacks shared by the built-in policies.
pub struct PoolHooks<T> {
    on_take: Option<Hook<T>>,
    on_return: Option<Hook<T>>,
    on_destroy: Option<Hook<T>>,
}

impl<T> PoolHooks<T> {
    /// Creates an empty set of hooks.
    pub fn new() -> Self {
        Self {
            on_take: None,
            on_return: None,
            on_destroy: None,
        }
    }

    pub(crate) fn set_on_take(&mut self, hook: Hook<T>) {
        self.on_take = Some(hook);
    }

    pub(crate) fn set_on_return(&mut self, hook: Hook<T>) {
        self.on_return = Some(hook);
    }

    pub(crate) fn set_on_destroy(&mut self, hook: Hook<T>) {
        self.on_destroy = Some(hook);
    }

    pub(crate) fn taken(&mut self, element: &mut T) {
        if let Some(hook) = self.on_take.as_mut() {
            hook(element);
        }
    }

    pub(crate) fn returned(&mut self, element: &mut T) {
        if let Some(hook) = self.on_return.as_mut() {
            hook(element);
        }
    }

    pub(crate) fn destroyed(&mut self, element: &mut T) {
        if let Some(hook) = self.on_destroy.as_mut() {
            hook(element);
        }
    }
}

impl<T> Default for PoolHooks<T> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Callback Policy =====================================================

/// Policy built from a creation closure and optional hooks.
///
/// This is the policy behind [`ObjectPool::builder`].
pub struct CallbackPolicy<T> {
    create: Box<dyn FnMut() -> T>,
    hooks: PoolHooks<T>,
}

impl<T> CallbackPolicy<T> {
    /// Creates a policy with the given creation function and hooks.
    pub fn new(create: Box<dyn FnMut() -> T>, hooks: PoolHooks<T>) -> Self {
        Self { create, hooks }
    }
}

impl<T> PoolPolicy<T> for CallbackPolicy<T> {
    fn create(&mut self) -> T {
        (self.create)()
    }

    fn on_taken(&mut self, element: &mut T) {
        self.hooks.taken(element);
    }

    fn on_returned(&mut self, element: &mut T) {
        self.hooks.returned(element);
    }

    fn on_destroyed(&mut self, mut element: T) {
        self.hooks.destroyed(&mut element);
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn empty_hooks_do_nothing() {
        let mut hooks: PoolHooks<u32> = PoolHooks::default();
        let mut value = 7;
        hooks.taken(&mut value);
        hooks.returned(&mut value);
        hooks.destroyed(&mut value);
        assert_eq!(value, 7);
    }

    #[test]
    fn callback_policy_forwards_to_hooks() {
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut hooks: PoolHooks<u32> = PoolHooks::new();
        let l = Rc::clone(&log);
        hooks.set_on_take(Box::new(move |v: &mut u32| l.borrow_mut().push(("take", *v))));
        let l = Rc::clone(&log);
        hooks.set_on_return(Box::new(move |v: &mut u32| l.borrow_mut().push(("return", *v))));
        let l = Rc::clone(&log);
        hooks.set_on_destroy(Box::new(move |v: &mut u32| l.borrow_mut().push(("destroy", *v))));

        let mut policy = CallbackPolicy::new(Box::new(|| 3), hooks);
        let mut value = policy.create();
        policy.on_taken(&mut value);
        policy.on_returned(&mut value);
        policy.on_destroyed(value);

        assert_eq!(
            *log.borrow(),
            vec![("take", 3), ("return", 3), ("destroy", 3)]
        );
    }
}
