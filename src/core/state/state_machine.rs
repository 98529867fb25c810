//=========================================================================
// State Machine
//=========================================================================
//
// Drives one current state plus an optional always-ticked ongoing state.
//
// States are stored in an IndexMap by key so registration order is kept
// for start-state selection. Transitions are evaluated from the
// destination lists of the ongoing state first, then the current state.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use indexmap::IndexMap;
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{Destination, State, StateKey};
use crate::core::error::StateError;

//=== State Changed =======================================================

/// Notification sent to subscribers after every state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChanged<K: StateKey> {
    /// State that was current before the change, if any.
    pub previous: Option<K>,

    /// State that is current now.
    pub current: K,
}

//=== Progress ============================================================

/// Outcome of evaluating a state's destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress<K: StateKey> {
    /// The source is not ready to close or no destination was eligible.
    Stayed,

    /// The machine changed to this state.
    Changed(K),

    /// A `Destination::None` was reached and the machine was reset.
    Reset,
}

impl<K: StateKey> Progress<K> {
    /// Returns true if the machine changed in any way.
    pub fn is_transition(&self) -> bool {
        !matches!(self, Progress::Stayed)
    }
}

//=== State Machine =======================================================

/// Finite state machine over states keyed by `K`.
///
/// # Examples
///
/// ```rust
/// # use tickwork::prelude::*;
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Hero { Idle, Walk }
/// impl StateKey for Hero {}
///
/// struct Simple {
///     key: Hero,
///     destinations: Destinations<Hero>,
/// }
///
/// impl State<Hero> for Simple {
///     fn key(&self) -> Hero { self.key }
///     fn destinations(&self) -> &Destinations<Hero> { &self.destinations }
///     fn destinations_mut(&mut self) -> &mut Destinations<Hero> { &mut self.destinations }
/// }
///
/// let mut machine = StateMachine::new()
///     .with_state(Simple { key: Hero::Idle, destinations: Destinations::prioritized([Hero::Walk]) })
///     .with_state(Simple { key: Hero::Walk, destinations: Destinations::new() });
///
/// machine.start();
/// assert_eq!(machine.current_key(), Some(Hero::Idle));
///
/// machine.tick();
/// assert_eq!(machine.current_key(), Some(Hero::Walk));
/// ```
pub struct StateMachine<K: StateKey> {
    states: IndexMap<K, Box<dyn State<K>>>,
    current: Option<K>,
    ongoing: Option<Box<dyn State<K>>>,
    start_state: Option<K>,
    subscribers: Vec<Sender<StateChanged<K>>>,
}

impl<K: StateKey> StateMachine<K> {
    //--- Construction -----------------------------------------------------

    /// Creates an idle machine without states.
    pub fn new() -> Self {
        Self {
            states: IndexMap::new(),
            current: None,
            ongoing: None,
            start_state: None,
            subscribers: Vec::new(),
        }
    }

    /// Creates a machine from an ordered list of states.
    ///
    /// Duplicate keys are logged and skipped.
    pub fn with_states<I>(states: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn State<K>>>,
    {
        let mut machine = Self::new();
        for state in states {
            let _ = machine.append_boxed_state(state);
        }
        machine
    }

    /// Registers a state, builder style. Duplicates are logged and skipped.
    pub fn with_state<S>(mut self, state: S) -> Self
    where
        S: State<K> + 'static,
    {
        let _ = self.append_state(state);
        self
    }

    /// Declares the state `start()` should begin with.
    pub fn with_start_state(mut self, key: K) -> Self {
        self.start_state = Some(key);
        self
    }

    /// Installs the always-ticked ongoing state, builder style.
    pub fn with_ongoing_state<S>(mut self, state: S) -> Self
    where
        S: State<K> + 'static,
    {
        self.set_ongoing_state(Some(Box::new(state)));
        self
    }

    //--- Registration -----------------------------------------------------

    /// Registers a state under its key.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyRegistered`] (and logs a warning) if the
    /// key is taken. The machine is left unchanged.
    pub fn append_state<S>(&mut self, state: S) -> Result<(), StateError<K>>
    where
        S: State<K> + 'static,
    {
        self.append_boxed_state(Box::new(state))
    }

    /// Registers an already boxed state under its key.
    pub fn append_boxed_state(&mut self, state: Box<dyn State<K>>) -> Result<(), StateError<K>> {
        let key = state.key();
        if self.states.contains_key(&key) {
            warn!("State {:?} is already registered", key);
            return Err(StateError::AlreadyRegistered(key));
        }

        debug!("Registered state {:?}", key);
        self.states.insert(key, state);
        Ok(())
    }

    /// Registers a state and immediately changes to it.
    pub fn append_state_as_current<S>(&mut self, state: S) -> Result<(), StateError<K>>
    where
        S: State<K> + 'static,
    {
        let key = state.key();
        self.append_state(state)?;
        self.change_state(key);
        Ok(())
    }

    /// Unregisters a state and hands it back.
    ///
    /// Removing the current state resets the machine first, so the state
    /// receives its `close_state` call.
    pub fn remove_state(&mut self, key: K) -> Option<Box<dyn State<K>>> {
        if !self.states.contains_key(&key) {
            return None;
        }

        if self.current == Some(key) {
            self.reset();
        }

        debug!("Removed state {:?}", key);
        self.states.shift_remove(&key)
    }

    /// Replaces the ongoing state, returning the previous one.
    ///
    /// The new state receives `begin_state`, the old one `close_state`.
    pub fn set_ongoing_state(
        &mut self,
        state: Option<Box<dyn State<K>>>,
    ) -> Option<Box<dyn State<K>>> {
        let mut previous = std::mem::replace(&mut self.ongoing, state);
        if let Some(old) = previous.as_mut() {
            old.close_state();
        }
        if let Some(new) = self.ongoing.as_mut() {
            debug!("Ongoing state set to {:?}", new.key());
            new.begin_state();
        }
        previous
    }

    /// Removes the ongoing state.
    pub fn take_ongoing_state(&mut self) -> Option<Box<dyn State<K>>> {
        self.set_ongoing_state(None)
    }

    //--- Notifications ----------------------------------------------------

    /// Subscribes to state changes.
    ///
    /// Every successful `change_state` sends one [`StateChanged`] to each
    /// live receiver. Dropped receivers are pruned on the next change.
    pub fn subscribe(&mut self) -> Receiver<StateChanged<K>> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    //--- Lifecycle --------------------------------------------------------

    /// Begins the initial state.
    ///
    /// Uses the declared start state when it is registered, otherwise the
    /// first registered state that wants to begin. Returns true if a state
    /// was started.
    pub fn start(&mut self) -> bool {
        if self.states.is_empty() {
            warn!("Cannot start state machine without states");
            return false;
        }

        let declared = self.start_state.filter(|key| {
            let registered = self.states.contains_key(key);
            if !registered {
                warn!("Declared start state {:?} is not registered", key);
            }
            registered
        });

        let initial = declared.or_else(|| {
            self.states
                .iter()
                .find(|(_, state)| state.wants_to_begin())
                .map(|(key, _)| *key)
        });

        match initial {
            Some(key) => {
                debug!("Starting state machine with {:?}", key);
                self.change_state(key)
            }
            None => {
                warn!("No registered state wants to begin");
                false
            }
        }
    }

    /// Closes the current state and leaves the machine idle.
    ///
    /// The ongoing state and registered states are untouched.
    pub fn reset(&mut self) {
        if let Some(key) = self.current.take() {
            debug!("Resetting state machine (closing {:?})", key);
            if let Some(state) = self.states.get_mut(&key) {
                state.close_state();
            }
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Advances the machine by one tick.
    ///
    /// The ongoing state is ticked and evaluated first. If it caused a
    /// transition, the current state is not ticked this cycle.
    pub fn tick(&mut self) {
        if let Some(mut ongoing) = self.ongoing.take() {
            ongoing.tick();
            let progress = self.progress_from(&*ongoing);
            self.ongoing = Some(ongoing);

            if self.apply(progress).is_transition() {
                return;
            }
        }

        let Some(key) = self.current else {
            return;
        };

        if let Some(state) = self.states.get_mut(&key) {
            state.tick();
        }

        self.try_progress_from_state(key);
    }

    /// Evaluates the destinations of the registered state `key`.
    ///
    /// Nothing happens unless the state wants to close. Destinations are
    /// walked highest priority first:
    ///
    /// - `Destination::None` resets the machine and stops
    /// - the current state is skipped
    /// - a registered state that wants to begin is changed to and stops
    /// - a registered state that is not ready is skipped
    /// - an unregistered key is logged and skipped
    pub fn try_progress_from_state(&mut self, key: K) -> Progress<K> {
        let progress = match self.states.get(&key) {
            Some(state) => self.progress_from(&**state),
            None => Progress::Stayed,
        };
        self.apply(progress)
    }

    /// Changes to the state registered under `key`.
    ///
    /// Closes the current state, begins the new one and notifies
    /// subscribers, in that order. Returns false if `key` is unknown.
    pub fn change_state(&mut self, key: K) -> bool {
        if !self.states.contains_key(&key) {
            return false;
        }

        let previous = self.current;
        if let Some(current) = previous {
            if let Some(state) = self.states.get_mut(&current) {
                state.close_state();
            }
        }

        self.current = Some(key);
        if let Some(state) = self.states.get_mut(&key) {
            state.begin_state();
        }

        debug!("State changed {:?} -> {:?}", previous, key);
        self.notify(StateChanged {
            previous,
            current: key,
        });
        true
    }

    //--- Query API --------------------------------------------------------

    /// Key of the current state.
    pub fn current_key(&self) -> Option<K> {
        self.current
    }

    pub fn current_state(&self) -> Option<&dyn State<K>> {
        self.current.and_then(|key| self.state(key))
    }

    pub fn current_state_mut(&mut self) -> Option<&mut (dyn State<K> + 'static)> {
        let key = self.current?;
        self.state_mut(key)
    }

    pub fn state(&self, key: K) -> Option<&dyn State<K>> {
        self.states.get(&key).map(|state| &**state)
    }

    pub fn state_mut(&mut self, key: K) -> Option<&mut (dyn State<K> + 'static)> {
        self.states.get_mut(&key).map(|state| &mut **state)
    }

    pub fn ongoing_state(&self) -> Option<&dyn State<K>> {
        self.ongoing.as_deref()
    }

    pub fn ongoing_state_mut(&mut self) -> Option<&mut (dyn State<K> + 'static)> {
        self.ongoing.as_deref_mut()
    }

    /// Declared start state, if any.
    pub fn start_state(&self) -> Option<K> {
        self.start_state
    }

    pub fn contains_state(&self, key: K) -> bool {
        self.states.contains_key(&key)
    }

    /// Returns true if `key` is the current state.
    pub fn is_state_active(&self, key: K) -> bool {
        self.current == Some(key)
    }

    /// Returns true if any state is registered.
    pub fn has_states(&self) -> bool {
        !self.states.is_empty()
    }

    /// Returns true if a state is currently active.
    pub fn is_working(&self) -> bool {
        self.current.is_some()
    }

    /// Registered states in registration order.
    pub fn states(&self) -> impl Iterator<Item = &(dyn State<K> + 'static)> {
        self.states.values().map(|state| &**state)
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.states.keys().copied()
    }

    //--- Internal Helpers -------------------------------------------------

    fn progress_from(&self, source: &dyn State<K>) -> Progress<K> {
        if !source.wants_to_close() {
            return Progress::Stayed;
        }

        for destination in source.destinations().iter() {
            let key = match *destination {
                Destination::None => return Progress::Reset,
                Destination::State(key) => key,
            };

            if self.current == Some(key) {
                continue;
            }

            match self.states.get(&key) {
                Some(candidate) if candidate.wants_to_begin() => return Progress::Changed(key),
                Some(_) => {}
                None => warn!("Cannot find state {:?} (destination of {:?})", key, source.key()),
            }
        }

        Progress::Stayed
    }

    fn apply(&mut self, progress: Progress<K>) -> Progress<K> {
        match progress {
            Progress::Stayed => {}
            Progress::Changed(key) => {
                self.change_state(key);
            }
            Progress::Reset => self.reset(),
        }
        progress
    }

    fn notify(&mut self, event: StateChanged<K>) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

impl<K: StateKey> Default for StateMachine<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Tests ===============================================================
