//=========================================================================
// Factories
//=========================================================================
//
// Key-dispatched creation and disposal of pooled objects.
//
// Architecture:
//   NativeFactory<T>
//     └─ pools: HashMap<T::Key, NativeObjectPool<T>>
//
// Each registered template owns one pool. Requests are routed by the
// template's key (an explicit tag, typically a game-specific enum).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Module Declarations =================================================

mod native_factory;

//=== Public API ==========================================================

pub use native_factory::NativeFactory;

//=== Key Traits ==========================================================

/// Identifier used to route factory requests.
///
/// Typically implemented by game-specific enums.
pub trait FactoryKey: Clone + Copy + Eq + Hash + Debug + 'static {}

/// Objects that know which factory pool they belong to.
pub trait Keyed {
    type Key: FactoryKey;

    /// Key of the pool this object is created by and returned to.
    fn key(&self) -> Self::Key;
}

/// Marker types standing for a single factory key.
///
/// Lets callers request an instance by type instead of by value:
///
/// ```rust
/// # use tickwork::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Enemy { Goblin }
/// # impl FactoryKey for Enemy {}
/// struct Goblin;
///
/// impl Tagged for Goblin {
///     type Key = Enemy;
///     const KEY: Enemy = Enemy::Goblin;
/// }
/// ```
pub trait Tagged {
    type Key: FactoryKey;
    const KEY: Self::Key;
}

//=== Factory Trait =======================================================

/// Creates and disposes instances of `T` by key.
pub trait Factory<T> {
    type Key: FactoryKey;

    /// Returns an instance for `key`, or `None` if nothing is registered for it.
    fn create(&mut self, key: Self::Key) -> Option<T>;

    /// Returns an instance for the key carried by `R`.
    fn create_tagged<R>(&mut self) -> Option<T>
    where
        R: Tagged<Key = Self::Key>,
    {
        self.create(R::KEY)
    }

    /// Gives an instance back to the factory. `None` is ignored.
    fn dispose(&mut self, target: Option<T>);
}
