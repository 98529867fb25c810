//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use tickwork::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Errors
pub use crate::core::error::{FactoryError, PoolError, StateError};

// Pools
pub use crate::core::pool::{
    NativeObject, NativeObjectPool, ObjectPool, PoolConfig, PoolPolicy,
};

// Factories
pub use crate::core::factory::{Factory, FactoryKey, Keyed, NativeFactory, Tagged};

// States
pub use crate::core::state::{
    Destination, Destinations, NestedMachine, Progress, State, StateChanged, StateKey,
    StateMachine,
};

// Lifecycle
pub use crate::core::lifecycle::{Initializable, Lifecycle, LifecycleEvent};

// Utilities
pub use crate::util::{FlatVec3Ext, Stopwatches};
