//! ## flodvakt-core::state
//! **The single scenario every connected viewer shares**
//!
//! There is deliberately one cell per process, not one per connection: a
//! command from any viewer changes what every viewer sees. Handles are cheap
//! clones of the same atomic.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::scenario::Scenario;

#[derive(Clone, Debug, Default)]
pub struct SharedScenario {
    cell: Arc<AtomicU8>,
}

impl SharedScenario {
    pub fn new(initial: Scenario) -> Self {
        Self {
            cell: Arc::new(AtomicU8::new(initial as u8)),
        }
    }

    /// Current scenario. A reader racing a writer sees either value, never a mix.
    pub fn current(&self) -> Scenario {
        let raw = self.cell.load(Ordering::Acquire);
        match Scenario::from_index(raw) {
            Some(scenario) => scenario,
            // Only `set` writes the cell, and it only stores valid discriminants.
            None => unreachable!("scenario cell holds invalid discriminant {raw}"),
        }
    }

    /// Replaces the scenario (last write wins) and returns the one it replaced.
    pub fn set(&self, scenario: Scenario) -> Scenario {
        let previous = self.cell.swap(scenario as u8, Ordering::AcqRel);
        Scenario::from_index(previous).unwrap_or_default()
    }
}
