use std::sync::Mutex;

use crate::crossing::directions::Direction;

/// A lifecycle or detector event, recorded in order of occurrence.
///
/// The log line wording is not a compatibility surface; this event set
/// (and its id/direction association) is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossingEvent {
    /// A BAT arrived and joined its direction's queue.
    Arrived { bat: u64, origin: Direction },
    /// A BAT started its exclusive crossing.
    Crossing { bat: u64, origin: Direction },
    /// A BAT left the crossing and gave back its gate slot.
    Departed { bat: u64, origin: Direction },
    /// The detector broke a circular wait by releasing one direction.
    DeadlockBroken { released: Direction },
}

/// In-memory record of everything that happened at the crossing, in the
/// order it happened. Drivers and tests read it back after the run.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<CrossingEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: CrossingEvent) {
        self.events.lock().expect("event log poisoned").push(event);
    }

    /// Copy of the log so far.
    pub fn snapshot(&self) -> Vec<CrossingEvent> {
        self.events.lock().expect("event log poisoned").clone()
    }
}
