//=========================================================================
// Error Types
//=========================================================================
//
// Failure values returned by the pool, factory and state subsystems.
//
// Two kinds of failure exist:
//   - operational: duplicate registration, lookup misses. These are
//     logged where they happen and returned so callers can react.
//   - invariant violations: releasing an entry that is already idle.
//     The call is aborted and nothing is mutated.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;

use thiserror::Error;

//=== Pool Errors =========================================================

/// Errors raised by [`crate::core::pool::ObjectPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The released entry is already held by the idle queue.
    ///
    /// Only reported when collection checks are enabled and the crate is
    /// built with debug assertions.
    #[error("entry cannot be returned to the pool as it already exists in the pool")]
    AlreadyPooled,
}

//=== Factory Errors ======================================================

/// Errors raised while registering templates in a factory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactoryError<K: Debug> {
    /// The template is no longer alive and cannot be instantiated.
    #[error("given template is invalid")]
    InvalidTemplate,

    /// A pool for this key has already been registered.
    #[error("template with key {0:?} is already cached")]
    DuplicateKey(K),
}

//=== State Errors ========================================================

/// Errors raised by [`crate::core::state::StateMachine`] registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError<K: Debug> {
    /// A state with the same key is already registered.
    #[error("state {0:?} is already registered")]
    AlreadyRegistered(K),
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestKey {
        Walk,
    }

    #[test]
    fn messages_name_the_key() {
        let err = StateError::AlreadyRegistered(TestKey::Walk);
        assert_eq!(err.to_string(), "state Walk is already registered");

        let err = FactoryError::DuplicateKey(TestKey::Walk);
        assert_eq!(err.to_string(), "template with key Walk is already cached");
    }

    #[test]
    fn pool_error_is_copy_and_eq() {
        let e1 = PoolError::AlreadyPooled;
        let e2 = e1;
        assert_eq!(e1, e2);
    }
}
