//=========================================================================
// State System
//=========================================================================
//
// Tick-driven finite state machines with prioritized transitions.
//
// Architecture:
//   StateMachine<K>
//     ├─ states: IndexMap<K, Box<dyn State<K>>>   (registration order)
//     ├─ current: Option<K>
//     ├─ ongoing: Option<Box<dyn State<K>>>       (always ticked)
//     └─ subscribers: Vec<Sender<StateChanged<K>>>
//
// Flow (per tick):
//   ongoing.tick() → try progress from ongoing
//     └─ no transition → current.tick() → try progress from current
//
// A NestedMachine wraps a whole machine as a single state of a parent
// machine, giving hierarchical state machines.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Module Declarations =================================================

mod destination;
mod nested;
mod state_machine;

//=== Public API ==========================================================

pub use destination::{Destination, Destinations};
pub use nested::NestedMachine;
pub use state_machine::{Progress, StateChanged, StateMachine};

//=== State Key Trait =====================================================

/// Marker trait for state identifiers.
///
/// State keys uniquely identify states inside a StateMachine.
/// Typically implemented by game-specific enums.
pub trait StateKey: Clone + Copy + Eq + Hash + Debug + 'static {}

//=== State Trait =========================================================

/// Behaviour of a single state.
///
/// A state reports its key, owns its destination list and overrides the
/// hooks it cares about. Every hook has a default:
///
/// - `begin_state` / `close_state` / `tick`: do nothing
/// - `wants_to_begin` / `wants_to_close`: always ready
///
/// # Minimal Implementation
///
/// ```rust
/// # use tickwork::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Hero { Idle, Walk }
/// # impl StateKey for Hero {}
/// struct Idle {
///     destinations: Destinations<Hero>,
/// }
///
/// impl State<Hero> for Idle {
///     fn key(&self) -> Hero {
///         Hero::Idle
///     }
///
///     fn destinations(&self) -> &Destinations<Hero> {
///         &self.destinations
///     }
///
///     fn destinations_mut(&mut self) -> &mut Destinations<Hero> {
///         &mut self.destinations
///     }
/// }
/// ```
pub trait State<K: StateKey> {
    /// Identity of the state, also its key inside a machine.
    fn key(&self) -> K;

    /// Candidate successors, highest priority first.
    fn destinations(&self) -> &Destinations<K>;

    fn destinations_mut(&mut self) -> &mut Destinations<K>;

    /// Called once each time the state becomes current.
    fn begin_state(&mut self) {}

    /// Called once each time the state stops being current.
    fn close_state(&mut self) {}

    /// Called every machine tick while the state is current (or ongoing).
    fn tick(&mut self) {}

    /// Whether the state is ready to be activated.
    fn wants_to_begin(&self) -> bool {
        true
    }

    /// Whether the state finished its work and may be left.
    fn wants_to_close(&self) -> bool {
        true
    }

    /// Whether this state stands for `key`.
    fn represents(&self, key: K) -> bool {
        self.key() == key
    }

    //--- Destination Helpers ----------------------------------------------

    /// Appends a destination with the highest priority.
    ///
    /// `Destination::None` makes the machine reset when reached.
    fn append_destination(&mut self, destination: Destination<K>) {
        self.destinations_mut().append(destination);
    }

    /// Removes the first occurrence of `destination`.
    fn remove_destination(&mut self, destination: Destination<K>) -> bool {
        self.destinations_mut().remove(destination)
    }

    /// Removes every destination.
    fn clear_destinations(&mut self) {
        self.destinations_mut().clear();
    }
}
