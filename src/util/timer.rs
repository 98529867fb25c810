//=========================================================================
// Stopwatches
//=========================================================================
//
// Labelled stopwatches for ad-hoc profiling of tick code.
//
// Usage:
//   watches.start("pathfinding");
//   ...
//   watches.stop();   // logs "pathfinding: 1.2ms" at debug level
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::{debug, warn};

//=== Stopwatch ===========================================================

#[derive(Debug, Clone, Copy)]
struct Stopwatch {
    started: Instant,
    elapsed: Option<Duration>,
}

//=== Stopwatches =========================================================

/// Collection of stopwatches addressed by label.
#[derive(Debug, Default)]
pub struct Stopwatches {
    watches: HashMap<String, Stopwatch>,
    last_label: Option<String>,
}

impl Stopwatches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) the stopwatch for `label`.
    pub fn start(&mut self, label: &str) {
        let watch = Stopwatch {
            started: Instant::now(),
            elapsed: None,
        };
        self.watches.insert(label.to_owned(), watch);
        self.last_label = Some(label.to_owned());
    }

    /// Stops the most recently started stopwatch.
    pub fn stop(&mut self) -> Option<Duration> {
        match self.last_label.clone() {
            Some(label) => self.stop_label(&label),
            None => {
                warn!("No stopwatch has been started");
                None
            }
        }
    }

    /// Stops the stopwatch for `label` and logs its elapsed time.
    ///
    /// Returns `None` (and logs a warning) for an unknown label.
    pub fn stop_label(&mut self, label: &str) -> Option<Duration> {
        let Some(watch) = self.watches.get_mut(label) else {
            warn!("Cannot find stopwatch associated to the label: {}", label);
            return None;
        };

        let elapsed = watch.started.elapsed();
        watch.elapsed = Some(elapsed);
        debug!("{}: {:?}", label, elapsed);
        Some(elapsed)
    }

    /// Last measured duration for `label`, if it has been stopped.
    pub fn elapsed(&self, label: &str) -> Option<Duration> {
        self.watches.get(label).and_then(|watch| watch.elapsed)
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_without_start_returns_none() {
        let mut watches = Stopwatches::new();
        assert!(watches.stop().is_none());
        assert!(watches.stop_label("missing").is_none());
    }

    #[test]
    fn stop_uses_last_started_label() {
        let mut watches = Stopwatches::new();
        watches.start("physics");
        watches.start("ai");

        assert!(watches.stop().is_some());
        assert!(watches.elapsed("ai").is_some());
        assert!(watches.elapsed("physics").is_none());
    }

    #[test]
    fn restart_clears_previous_measurement() {
        let mut watches = Stopwatches::new();
        watches.start("frame");
        watches.stop();
        assert!(watches.elapsed("frame").is_some());

        watches.start("frame");
        assert!(watches.elapsed("frame").is_none());
    }
}
