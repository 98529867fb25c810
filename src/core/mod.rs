//=========================================================================
// Core Systems
//
// Tick-driven building blocks for gameplay code.
//
// Responsibilities:
// - Reuse expensive objects through bounded pools (`pool`)
// - Route creation and disposal of pooled objects by key (`factory`)
// - Drive per-tick behaviour through state machines (`state`)
// - Guard manager setup and teardown (`lifecycle`)
//
// Notes:
// Everything here is single-threaded and synchronous. The host's frame
// loop owns the objects and calls `tick()` once per update; nothing
// blocks, yields or spawns threads.
//
//=========================================================================

//=== Public Modules ======================================================

pub mod error;
pub mod factory;
pub mod lifecycle;
pub mod pool;
pub mod state;

//=== Public Exports ======================================================

pub use error::{FactoryError, PoolError, StateError};
