//=========================================================================
// Tickwork — Library Root
//
// Gameplay utilities for tick-driven engines.
//
// Responsibilities:
// - Object pools with bounded capacity and lifecycle hooks
// - Key-dispatched factories backed by template pools
// - Hierarchical state machines with prioritized transitions
// - Small helpers (stopwatches, ground-plane vector math)
//
// Typical usage:
// ```no_run
// use tickwork::prelude::*;
//
// let mut bullets = ObjectPool::builder(|| Vec::<u8>::with_capacity(64))
//     .with_max_size(32)
//     .build();
// let bullet = bullets.get();
// bullets.release(bullet).unwrap();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the pool, factory and state subsystems.
// `util` holds standalone helpers with no dependency on `core`.
//
pub mod core;
pub mod util;

pub mod prelude;
