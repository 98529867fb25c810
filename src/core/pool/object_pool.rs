//=========================================================================
// Object Pool
//=========================================================================
//
// FIFO-backed pool of reusable entries with an optional size bound.
//
// Invariant:
//   count_all() == count_active() + count_pooled()
//
// Entries released while the idle queue is full are destroyed through
// the policy instead of being retained.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{CallbackPolicy, PoolHooks, PoolPolicy};
use crate::core::error::PoolError;

//=== Pool Config =========================================================

/// Construction options shared by every pool flavour.
///
/// # Default Values
///
/// - **collection_check**: `false`
/// - **max_size**: `None` (unbounded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolConfig {
    /// Reject releases of entries that are already idle.
    ///
    /// The check scans the idle queue, so it only runs in builds with
    /// debug assertions.
    pub collection_check: bool,

    /// Maximum number of idle entries kept by the pool.
    ///
    /// `None` keeps every released entry.
    pub max_size: Option<usize>,
}

impl PoolConfig {
    fn has_room(&self, pooled: usize) -> bool {
        self.max_size.map_or(true, |max| pooled < max)
    }
}

//=== Object Pool =========================================================

/// Pool of reusable `T` entries driven by a [`PoolPolicy`].
///
/// # Examples
///
/// ```rust
/// # use tickwork::prelude::*;
/// let mut pool = ObjectPool::builder(|| String::with_capacity(64))
///     .on_return(|s: &mut String| s.clear())
///     .with_max_size(4)
///     .build();
///
/// let mut line = pool.get();
/// line.push_str("hello");
/// pool.release(line).unwrap();
///
/// assert_eq!(pool.count_pooled(), 1);
/// assert!(pool.get().is_empty());
/// ```
pub struct ObjectPool<T, P: PoolPolicy<T> = CallbackPolicy<T>> {
    pooled: VecDeque<T>,
    count_active: usize,
    config: PoolConfig,
    policy: P,
}

impl<T: 'static> ObjectPool<T> {
    //--- Construction -----------------------------------------------------

    /// Creates an unbounded pool without hooks.
    pub fn new<F>(create: F) -> Self
    where
        F: FnMut() -> T + 'static,
    {
        Self::builder(create).build()
    }

    /// Starts a [`PoolBuilder`] around the given creation function.
    pub fn builder<F>(create: F) -> PoolBuilder<T>
    where
        F: FnMut() -> T + 'static,
    {
        PoolBuilder::new(create)
    }
}

impl<T, P: PoolPolicy<T>> ObjectPool<T, P> {
    /// Creates a pool from an explicit policy and configuration.
    pub fn with_policy(policy: P, config: PoolConfig) -> Self {
        Self::with_policy_and_capacity(policy, config, 0)
    }

    pub(crate) fn with_policy_and_capacity(policy: P, config: PoolConfig, capacity: usize) -> Self {
        Self {
            pooled: VecDeque::with_capacity(capacity),
            count_active: 0,
            config,
            policy,
        }
    }

    //--- Pool Operations --------------------------------------------------

    /// Takes an entry from the pool, creating one if the pool is empty.
    pub fn get(&mut self) -> T {
        let mut element = match self.pooled.pop_front() {
            Some(element) => element,
            None => self.policy.create(),
        };

        self.policy.on_taken(&mut element);
        self.count_active += 1;
        element
    }

    /// Pre-warms the pool with `count` idle entries.
    ///
    /// No hooks run and the active count is unchanged.
    pub fn fill_pool(&mut self, count: usize) {
        self.pooled.reserve(count);
        for _ in 0..count {
            let element = self.policy.create();
            self.pooled.push_back(element);
        }

        debug!("Filled pool with {} entries ({} idle)", count, self.pooled.len());
    }

    /// Destroys every idle entry.
    ///
    /// Entries that are currently checked out are not affected and still
    /// count as active.
    pub fn clear(&mut self) {
        for element in self.pooled.drain(..) {
            self.policy.on_destroyed(element);
        }
    }

    //--- Query API --------------------------------------------------------

    /// Number of entries handed out and not yet released.
    pub fn count_active(&self) -> usize {
        self.count_active
    }

    /// Number of idle entries available for `get()`.
    pub fn count_pooled(&self) -> usize {
        self.pooled.len()
    }

    /// Total number of active and idle entries.
    pub fn count_all(&self) -> usize {
        self.count_active + self.pooled.len()
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }
}

impl<T: PartialEq, P: PoolPolicy<T>> ObjectPool<T, P> {
    //--- Release ----------------------------------------------------------

    /// Returns an entry to the pool.
    ///
    /// The entry is kept when the idle queue has room, otherwise it is
    /// destroyed through the policy. The active count drops either way.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::AlreadyPooled`] when collection checks are on,
    /// debug assertions are enabled and the entry is already idle. Nothing
    /// is modified in that case.
    pub fn release(&mut self, element: T) -> Result<(), PoolError> {
        if self.config.collection_check && cfg!(debug_assertions) && self.pooled.contains(&element) {
            return Err(PoolError::AlreadyPooled);
        }

        if self.config.has_room(self.pooled.len()) {
            self.pooled.push_back(element);
            if let Some(last) = self.pooled.back_mut() {
                self.policy.on_returned(last);
            }
        } else {
            debug!("Pool is full ({} idle), destroying released entry", self.pooled.len());
            self.policy.on_destroyed(element);
        }

        if self.count_active == 0 {
            warn!("Released an entry into a pool with no active entries");
        }
        self.count_active = self.count_active.saturating_sub(1);

        Ok(())
    }
}

//=== Pool Builder ========================================================

/// Fluent builder for closure-driven pools.
///
/// # Default Values
///
/// - **collection check**: off
/// - **max size**: unbounded
/// - **initial capacity**: 0
pub struct PoolBuilder<T> {
    create: Box<dyn FnMut() -> T>,
    hooks: PoolHooks<T>,
    config: PoolConfig,
    capacity: usize,
}

impl<T: 'static> PoolBuilder<T> {
    /// Creates a builder around the given creation function.
    pub fn new<F>(create: F) -> Self
    where
        F: FnMut() -> T + 'static,
    {
        Self {
            create: Box::new(create),
            hooks: PoolHooks::new(),
            config: PoolConfig::default(),
            capacity: 0,
        }
    }

    /// Called when an entry is taken from the pool.
    pub fn on_take<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut T) + 'static,
    {
        self.hooks.set_on_take(Box::new(hook));
        self
    }

    /// Called when an entry is returned to the pool.
    ///
    /// Use it to clean up or disable the entry.
    pub fn on_return<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut T) + 'static,
    {
        self.hooks.set_on_return(Box::new(hook));
        self
    }

    /// Called when an entry is dropped by the pool (overflow or `clear()`).
    pub fn on_destroy<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut T) + 'static,
    {
        self.hooks.set_on_destroy(Box::new(hook));
        self
    }

    /// Enables or disables the duplicate-release check.
    pub fn with_collection_check(mut self, enabled: bool) -> Self {
        self.config.collection_check = enabled;
        self
    }

    /// Bounds the number of idle entries.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.config.max_size = Some(max_size);
        self
    }

    /// Preallocates room for `capacity` idle entries.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builds the pool.
    pub fn build(self) -> ObjectPool<T> {
        let policy = CallbackPolicy::new(self.create, self.hooks);
        ObjectPool::with_policy_and_capacity(policy, self.config, self.capacity)
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use proptest::prelude::*;

    //--- Test Helpers -----------------------------------------------------

    // Pool of increasing ids so every created entry is distinct.
    fn counting_pool() -> (PoolBuilder<u32>, Rc<Cell<u32>>) {
        let created = Rc::new(Cell::new(0));
        let c = Rc::clone(&created);
        let builder = ObjectPool::builder(move || {
            c.set(c.get() + 1);
            c.get()
        });
        (builder, created)
    }

    //--- Get / Release ----------------------------------------------------

    #[test]
    fn get_creates_when_empty() {
        let (builder, created) = counting_pool();
        let mut pool = builder.build();

        assert_eq!(pool.get(), 1);
        assert_eq!(pool.get(), 2);
        assert_eq!(created.get(), 2);
        assert_eq!(pool.count_active(), 2);
        assert_eq!(pool.count_pooled(), 0);
    }

    #[test]
    fn released_entries_are_reused_in_fifo_order() {
        let (builder, created) = counting_pool();
        let mut pool = builder.build();

        let a = pool.get();
        let b = pool.get();
        pool.release(a).unwrap();
        pool.release(b).unwrap();

        assert_eq!(pool.get(), a);
        assert_eq!(pool.get(), b);
        assert_eq!(created.get(), 2);
    }

    #[test]
    fn hooks_run_on_take_and_return() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (take_log, return_log) = (Rc::clone(&log), Rc::clone(&log));

        let (builder, _) = counting_pool();
        let mut pool = builder
            .on_take(move |v| take_log.borrow_mut().push(format!("take {}", v)))
            .on_return(move |v| return_log.borrow_mut().push(format!("return {}", v)))
            .build();

        let entry = pool.get();
        pool.release(entry).unwrap();

        assert_eq!(*log.borrow(), vec!["take 1", "return 1"]);
    }

    #[test]
    fn overflow_destroys_exactly_one_entry() {
        let destroyed = Rc::new(Cell::new(0));
        let d = Rc::clone(&destroyed);

        let (builder, _) = counting_pool();
        let mut pool = builder
            .with_max_size(3)
            .on_destroy(move |_| d.set(d.get() + 1))
            .build();

        let entries: Vec<u32> = (0..4).map(|_| pool.get()).collect();
        for entry in entries {
            pool.release(entry).unwrap();
        }

        assert_eq!(destroyed.get(), 1);
        assert_eq!(pool.count_pooled(), 3);
        assert_eq!(pool.count_active(), 0);
    }

    #[test]
    fn zero_max_size_never_retains() {
        let (builder, _) = counting_pool();
        let mut pool = builder.with_max_size(0).build();

        let entry = pool.get();
        pool.release(entry).unwrap();
        assert_eq!(pool.count_pooled(), 0);
        assert_eq!(pool.count_all(), 0);
    }

    #[test]
    fn release_without_active_entries_saturates() {
        let (builder, _) = counting_pool();
        let mut pool = builder.build();

        pool.release(42).unwrap();
        assert_eq!(pool.count_active(), 0);
        assert_eq!(pool.count_pooled(), 1);
    }

    //--- Collection Check -------------------------------------------------

    #[test]
    #[cfg(debug_assertions)]
    fn duplicate_release_is_rejected_with_collection_check() {
        let (builder, _) = counting_pool();
        let mut pool = builder.with_collection_check(true).build();

        let entry = pool.get();
        let _other = pool.get();
        pool.release(entry).unwrap();

        assert_eq!(pool.release(entry), Err(PoolError::AlreadyPooled));
        assert_eq!(pool.count_pooled(), 1);
        assert_eq!(pool.count_active(), 1);
    }

    #[test]
    fn duplicate_release_is_accepted_without_collection_check() {
        let (builder, _) = counting_pool();
        let mut pool = builder.build();

        let entry = pool.get();
        pool.release(entry).unwrap();
        assert!(pool.release(entry).is_ok());
        assert_eq!(pool.count_pooled(), 2);
    }

    //--- Fill / Clear -----------------------------------------------------

    #[test]
    fn fill_pool_prewarms_without_hooks() {
        let taken = Rc::new(Cell::new(0));
        let t = Rc::clone(&taken);

        let (builder, created) = counting_pool();
        let mut pool = builder.on_take(move |_| t.set(t.get() + 1)).build();
        pool.fill_pool(5);

        assert_eq!(created.get(), 5);
        assert_eq!(taken.get(), 0);
        assert_eq!(pool.count_pooled(), 5);
        assert_eq!(pool.count_active(), 0);

        pool.get();
        assert_eq!(created.get(), 5);
        assert_eq!(taken.get(), 1);
    }

    #[test]
    fn clear_destroys_idle_and_keeps_active() {
        let destroyed = Rc::new(RefCell::new(Vec::new()));
        let d = Rc::clone(&destroyed);

        let (builder, _) = counting_pool();
        let mut pool = builder.on_destroy(move |v| d.borrow_mut().push(*v)).build();
        pool.fill_pool(2);
        let checked_out = pool.get();

        pool.clear();

        assert_eq!(*destroyed.borrow(), vec![2]);
        assert_eq!(pool.count_pooled(), 0);
        assert_eq!(pool.count_active(), 1);

        pool.release(checked_out).unwrap();
        assert_eq!(pool.count_active(), 0);
        assert_eq!(pool.count_pooled(), 1);
    }

    //--- Custom Policy ----------------------------------------------------

    struct Buffers {
        created: usize,
    }

    impl PoolPolicy<Vec<u8>> for Buffers {
        fn create(&mut self) -> Vec<u8> {
            self.created += 1;
            Vec::with_capacity(16)
        }

        fn on_returned(&mut self, buffer: &mut Vec<u8>) {
            buffer.clear();
        }
    }

    #[test]
    fn custom_policy_drives_pool() {
        let mut pool: ObjectPool<Vec<u8>, Buffers> =
            ObjectPool::with_policy(Buffers { created: 0 }, PoolConfig::default());

        let mut buffer = pool.get();
        buffer.extend_from_slice(b"abc");
        pool.release(buffer).unwrap();

        assert!(pool.get().is_empty());
        assert_eq!(pool.policy().created, 1);
    }

    //--- Properties -------------------------------------------------------

    proptest! {
        #[test]
        fn get_then_release_returns_to_zero_active(n in 0usize..64) {
            let (builder, created) = counting_pool();
            let mut pool = builder.build();

            let entries: Vec<u32> = (0..n).map(|_| pool.get()).collect();
            prop_assert_eq!(pool.count_active(), n);
            for entry in entries {
                pool.release(entry).unwrap();
            }

            prop_assert_eq!(pool.count_active(), 0);
            prop_assert_eq!(pool.count_all(), created.get() as usize);
        }

        #[test]
        fn pooled_never_exceeds_max_size(max in 0usize..16, n in 0usize..32) {
            let destroyed = Rc::new(Cell::new(0usize));
            let d = Rc::clone(&destroyed);

            let (builder, _) = counting_pool();
            let mut pool = builder
                .with_max_size(max)
                .on_destroy(move |_| d.set(d.get() + 1))
                .build();

            let entries: Vec<u32> = (0..n).map(|_| pool.get()).collect();
            for entry in entries {
                pool.release(entry).unwrap();
            }

            prop_assert_eq!(pool.count_pooled(), n.min(max));
            prop_assert_eq!(destroyed.get(), n.saturating_sub(max));
            prop_assert_eq!(pool.count_all(), pool.count_active() + pool.count_pooled());
        }
    }
}
