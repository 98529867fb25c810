//=========================================================================
// Nested Machine
//=========================================================================
//
// A whole StateMachine acting as one state of a parent machine.
//
// Lifecycle mapping:
//   begin_state → inner.start()
//   tick        → inner.tick()
//   close_state → inner.reset()
//
// By default the nested machine is ready to close once its inner machine
// has gone idle, which inner states trigger with a `Destination::None`.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{Destinations, State, StateKey, StateMachine};

//=== Nested Machine ======================================================

/// Parent-machine state wrapping an inner [`StateMachine`].
pub struct NestedMachine<P: StateKey, K: StateKey> {
    key: P,
    destinations: Destinations<P>,
    machine: StateMachine<K>,
    close_when_idle: bool,
}

impl<P: StateKey, K: StateKey> NestedMachine<P, K> {
    /// Wraps `machine` as the parent state `key`.
    pub fn new(key: P, machine: StateMachine<K>) -> Self {
        Self {
            key,
            destinations: Destinations::new(),
            machine,
            close_when_idle: true,
        }
    }

    /// Sets the parent-level destinations, highest priority first.
    pub fn with_destinations(mut self, destinations: Destinations<P>) -> Self {
        self.destinations = destinations;
        self
    }

    /// Lets the parent leave this state at any time instead of waiting
    /// for the inner machine to finish.
    pub fn closable_while_running(mut self) -> Self {
        self.close_when_idle = false;
        self
    }

    pub fn machine(&self) -> &StateMachine<K> {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut StateMachine<K> {
        &mut self.machine
    }
}

impl<P: StateKey, K: StateKey> State<P> for NestedMachine<P, K> {
    fn key(&self) -> P {
        self.key
    }

    fn destinations(&self) -> &Destinations<P> {
        &self.destinations
    }

    fn destinations_mut(&mut self) -> &mut Destinations<P> {
        &mut self.destinations
    }

    fn begin_state(&mut self) {
        self.machine.start();
    }

    fn close_state(&mut self) {
        self.machine.reset();
    }

    fn tick(&mut self) {
        self.machine.tick();
    }

    fn wants_to_begin(&self) -> bool {
        self.machine.has_states()
    }

    fn wants_to_close(&self) -> bool {
        !self.close_when_idle || !self.machine.is_working()
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Destination;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum Game {
        Menu,
        Combat,
    }

    impl StateKey for Game {}

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum Turn {
        Player,
        Enemy,
    }

    impl StateKey for Turn {}

    struct Plain<K: StateKey> {
        key: K,
        destinations: Destinations<K>,
        done: Rc<Cell<bool>>,
    }

    impl<K: StateKey> Plain<K> {
        fn new(key: K, destinations: Destinations<K>) -> Self {
            Plain {
                key,
                destinations,
                done: Rc::new(Cell::new(true)),
            }
        }
    }

    impl<K: StateKey> State<K> for Plain<K> {
        fn key(&self) -> K {
            self.key
        }

        fn destinations(&self) -> &Destinations<K> {
            &self.destinations
        }

        fn destinations_mut(&mut self) -> &mut Destinations<K> {
            &mut self.destinations
        }

        fn wants_to_close(&self) -> bool {
            self.done.get()
        }
    }

    fn combat(enemy_done: &Rc<Cell<bool>>) -> NestedMachine<Game, Turn> {
        let mut enemy = Plain::new(Turn::Enemy, Destinations::prioritized([Destination::None]));
        enemy.done = Rc::clone(enemy_done);

        let turns = StateMachine::new()
            .with_state(Plain::new(Turn::Player, Destinations::prioritized([Turn::Enemy])))
            .with_state(enemy);

        NestedMachine::new(Game::Combat, turns)
            .with_destinations(Destinations::prioritized([Game::Menu]))
    }

    #[test]
    fn parent_waits_for_inner_machine_to_finish() {
        let enemy_done = Rc::new(Cell::new(false));
        let mut game = StateMachine::new()
            .with_state(combat(&enemy_done))
            .with_state(Plain::new(Game::Menu, Destinations::new()));

        game.start();
        assert_eq!(game.current_key(), Some(Game::Combat));

        // Player -> Enemy inside the nested machine
        game.tick();
        assert_eq!(game.current_key(), Some(Game::Combat));

        // Enemy turn finishes and resets the inner machine
        enemy_done.set(true);
        game.tick();
        assert_eq!(game.current_key(), Some(Game::Menu));
    }

    #[test]
    fn begin_and_close_drive_inner_machine() {
        let enemy_done = Rc::new(Cell::new(false));
        let mut nested = combat(&enemy_done);

        nested.begin_state();
        assert_eq!(nested.machine().current_key(), Some(Turn::Player));
        assert!(!nested.wants_to_close());

        nested.close_state();
        assert!(!nested.machine().is_working());
        assert!(nested.wants_to_close());
    }

    #[test]
    fn closable_while_running_ignores_inner_state() {
        let enemy_done = Rc::new(Cell::new(false));
        let mut nested = combat(&enemy_done).closable_while_running();

        nested.begin_state();
        assert!(nested.wants_to_close());
    }

    #[test]
    fn empty_inner_machine_does_not_want_to_begin() {
        let nested: NestedMachine<Game, Turn> = NestedMachine::new(Game::Combat, StateMachine::new());
        assert!(!nested.wants_to_begin());
    }
}
