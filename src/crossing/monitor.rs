use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard};

use crate::crossing::directions::Direction;

/// State protected by the monitor mutex.
#[derive(Debug, Default)]
pub struct MonitorState {
    /// Last id handed out; ids start at 1.
    next_id: u64,
    /// One forced-release marker per direction. Set by the deadlock
    /// detector, consumed by the head vehicle it wakes: the marker lets
    /// that one vehicle bypass a right-of-way predicate that would
    /// otherwise still hold.
    force_go: [bool; 4],
}

impl MonitorState {
    pub fn forced(&self, direction: Direction) -> bool {
        self.force_go[direction.index()]
    }

    pub fn clear_forced(&mut self, direction: Direction) {
        self.force_go[direction.index()] = false;
    }
}

/// Process-wide crossing state: the global mutex that serializes id
/// assignment, the right-of-way check and the crossing itself, plus one
/// priority condvar per direction for head vehicles waiting on their
/// right neighbor.
#[derive(Debug, Default)]
pub struct Monitor {
    state: Mutex<MonitorState>,
    priority: [Condvar; 4],
    /// True while exactly one BAT occupies the crossing. Written only while
    /// the monitor mutex is held; read lock-free by the deadlock detector.
    crossing_hint: AtomicBool,
    /// Set once, the first time the detector breaks a circular wait.
    deadlock_broken: AtomicBool,
}

impl Monitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, MonitorState> {
        self.state.lock().expect("monitor mutex poisoned")
    }

    /// Hands out the next vehicle id: unique and strictly increasing.
    /// Assignment order under concurrent arrivals is whatever order the
    /// mutex grants, not arrival order.
    pub fn next_id(&self) -> u64 {
        let mut state = self.lock();
        state.next_id += 1;
        state.next_id
    }

    /// Suspends a head vehicle on its direction's priority condvar. The
    /// monitor mutex is released while suspended and re-held on return.
    pub fn wait_priority<'a>(
        &'a self,
        direction: Direction,
        state: MutexGuard<'a, MonitorState>,
    ) -> MutexGuard<'a, MonitorState> {
        self.priority[direction.index()]
            .wait(state)
            .expect("monitor mutex poisoned")
    }

    /// Wakes the head vehicle (if any) waiting on `direction`'s priority
    /// condvar. Taking the monitor mutex first closes the window between a
    /// waiter's predicate check and its suspension, so the wakeup cannot be
    /// lost.
    pub fn signal_priority(&self, direction: Direction) {
        let _state = self.lock();
        self.priority[direction.index()].notify_one();
    }

    /// Forces `direction`'s head vehicle past its right-of-way wait. Used
    /// by the deadlock detector; the marker stays set until a head vehicle
    /// of that direction consumes it.
    pub fn force_release(&self, direction: Direction) {
        let mut state = self.lock();
        state.force_go[direction.index()] = true;
        self.priority[direction.index()].notify_one();
    }

    /// Flips the occupancy flag. Callers must hold the monitor mutex.
    pub fn set_crossing(&self, crossing: bool) {
        self.crossing_hint.store(crossing, Ordering::SeqCst);
    }

    pub fn is_crossing(&self) -> bool {
        self.crossing_hint.load(Ordering::SeqCst)
    }

    pub fn mark_deadlock_broken(&self) {
        self.deadlock_broken.store(true, Ordering::SeqCst);
    }

    pub fn deadlock_was_broken(&self) -> bool {
        self.deadlock_broken.load(Ordering::SeqCst)
    }
}
