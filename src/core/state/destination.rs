//=========================================================================
// Destinations
//=========================================================================
//
// Ordered candidate successors of a state.
//
// Appending inserts at the front: the most recently appended destination
// has the highest priority. `Destination::None` stands for "no state"
// and resets the owning machine when evaluated.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::StateKey;

//=== Destination =========================================================

/// A candidate next state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination<K: StateKey> {
    /// The "none" state. Evaluating it resets the machine.
    None,

    /// Transition to the state registered under this key.
    State(K),
}

impl<K: StateKey> Destination<K> {
    /// Key of the target state, `None` for the reset destination.
    pub fn key(&self) -> Option<K> {
        match self {
            Destination::None => None,
            Destination::State(key) => Some(*key),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Destination::None)
    }
}

impl<K: StateKey> From<K> for Destination<K> {
    fn from(key: K) -> Self {
        Destination::State(key)
    }
}

impl<K: StateKey> From<Option<K>> for Destination<K> {
    fn from(key: Option<K>) -> Self {
        key.map_or(Destination::None, Destination::State)
    }
}

//=== Destinations ========================================================

/// Priority-ordered list of destinations, highest priority first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations<K: StateKey> {
    list: Vec<Destination<K>>,
}

impl<K: StateKey> Destinations<K> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self { list: Vec::new() }
    }

    /// Creates a list already in priority order (first = highest).
    ///
    /// ```rust
    /// # use tickwork::prelude::*;
    /// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// # enum Move { Walk, Run }
    /// # impl StateKey for Move {}
    /// let a = Destinations::prioritized([Move::Run, Move::Walk]);
    ///
    /// let mut b = Destinations::new();
    /// b.append(Move::Walk);
    /// b.append(Move::Run);
    ///
    /// assert_eq!(a, b);
    /// ```
    pub fn prioritized<I, D>(destinations: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Destination<K>>,
    {
        Self {
            list: destinations.into_iter().map(Into::into).collect(),
        }
    }

    /// Appends a destination with the highest priority.
    pub fn append(&mut self, destination: impl Into<Destination<K>>) {
        self.list.insert(0, destination.into());
    }

    /// Removes the first occurrence of `destination`.
    ///
    /// Returns true if it was present.
    pub fn remove(&mut self, destination: impl Into<Destination<K>>) -> bool {
        let destination = destination.into();
        match self.list.iter().position(|d| *d == destination) {
            Some(pos) => {
                self.list.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Removes every destination.
    pub fn clear(&mut self) {
        self.list.clear();
    }

    pub fn contains(&self, destination: impl Into<Destination<K>>) -> bool {
        self.list.contains(&destination.into())
    }

    /// Iterates destinations from highest to lowest priority.
    pub fn iter(&self) -> impl Iterator<Item = &Destination<K>> {
        self.list.iter()
    }

    pub fn as_slice(&self) -> &[Destination<K>] {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl<K: StateKey> Default for Destinations<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Tests ===============================================================
