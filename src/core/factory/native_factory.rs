//=========================================================================
// Native Factory
//=========================================================================
//
// Factory for engine objects backed by one NativeObjectPool per key.
//
// Registration errors (dead template, duplicate key) are logged and the
// entry skipped when building from a template list. Lookup misses are
// logged and produce `None`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, error};

//=== Internal Dependencies ===============================================

use super::{Factory, Keyed};
use crate::core::error::FactoryError;
use crate::core::pool::{NativeObject, NativeObjectPool};

//=== Native Factory ======================================================

/// Pooled factory keyed by each template's [`Keyed::key`].
///
/// # Examples
///
/// ```rust
/// # use tickwork::prelude::*;
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Enemy { Goblin, Orc }
/// impl FactoryKey for Enemy {}
///
/// #[derive(PartialEq)]
/// struct Body { kind: Enemy, active: bool }
///
/// impl Keyed for Body {
///     type Key = Enemy;
///     fn key(&self) -> Enemy { self.kind }
/// }
///
/// impl NativeObject for Body {
///     fn instantiate(&self) -> Self { Body { kind: self.kind, active: false } }
///     fn set_active(&mut self, active: bool) { self.active = active; }
/// }
///
/// let mut factory = NativeFactory::new(
///     vec![Body { kind: Enemy::Goblin, active: false }],
///     0,
/// );
///
/// let goblin = factory.create(Enemy::Goblin);
/// assert!(goblin.is_some());
/// assert!(factory.create(Enemy::Orc).is_none());
/// factory.dispose(goblin);
/// ```
pub struct NativeFactory<T: NativeObject + Keyed> {
    pools: HashMap<T::Key, NativeObjectPool<T>>,
}

impl<T> NativeFactory<T>
where
    T: NativeObject + Keyed + PartialEq + 'static,
{
    //--- Construction -----------------------------------------------------

    /// Creates a factory with one pool per template.
    ///
    /// Each pool is pre-warmed with `initial_fill` idle entries. Invalid
    /// or duplicate templates are logged and skipped.
    pub fn new<I>(templates: I, initial_fill: usize) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut factory = Self::empty();
        for template in templates {
            if let Err(err) = factory.register_template(template, initial_fill) {
                error!("Skipping template: {}", err);
            }
        }
        factory
    }

    /// Creates a factory with no registered templates.
    pub fn empty() -> Self {
        Self {
            pools: HashMap::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a template with its own pool of `initial_fill` entries.
    ///
    /// # Errors
    ///
    /// - [`FactoryError::InvalidTemplate`] if the template is not alive
    /// - [`FactoryError::DuplicateKey`] if its key already has a pool
    pub fn register_template(
        &mut self,
        template: T,
        initial_fill: usize,
    ) -> Result<(), FactoryError<T::Key>> {
        if !template.is_alive() {
            return Err(FactoryError::InvalidTemplate);
        }

        let key = template.key();
        if self.pools.contains_key(&key) {
            return Err(FactoryError::DuplicateKey(key));
        }

        let mut pool = NativeObjectPool::from_template(template);
        pool.fill_pool(initial_fill);
        self.pools.insert(key, pool);

        debug!("Cached template {:?} ({} pre-warmed)", key, initial_fill);
        Ok(())
    }

    /// Registers an already configured pool under its template's key.
    pub fn register_pool(&mut self, pool: NativeObjectPool<T>) -> Result<(), FactoryError<T::Key>> {
        let key = pool.template().key();
        if self.pools.contains_key(&key) {
            return Err(FactoryError::DuplicateKey(key));
        }

        self.pools.insert(key, pool);
        Ok(())
    }

    //--- Query API --------------------------------------------------------

    /// Returns true if a pool is registered for `key`.
    pub fn contains(&self, key: T::Key) -> bool {
        self.pools.contains_key(&key)
    }

    /// Pool backing `key`, if registered.
    pub fn pool(&self, key: T::Key) -> Option<&NativeObjectPool<T>> {
        self.pools.get(&key)
    }

    /// Number of registered pools.
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

impl<T> Factory<T> for NativeFactory<T>
where
    T: NativeObject + Keyed + PartialEq + 'static,
{
    type Key = T::Key;

    fn create(&mut self, key: T::Key) -> Option<T> {
        match self.pools.get_mut(&key) {
            Some(pool) => Some(pool.get()),
            None => {
                error!("Cannot create instance for key - {:?}", key);
                None
            }
        }
    }

    fn dispose(&mut self, target: Option<T>) {
        let Some(target) = target else {
            return;
        };

        if !target.is_alive() {
            debug!("Ignoring disposal of a dead instance");
            return;
        }

        let key = target.key();
        match self.pools.get_mut(&key) {
            Some(pool) => {
                if let Err(err) = pool.release(target) {
                    error!("Cannot dispose instance of {:?}: {}", key, err);
                }
            }
            None => {
                error!("No pool registered for {:?}, destroying instance", key);
                target.destroy();
            }
        }
    }
}

//=== Tests ===============================================================
