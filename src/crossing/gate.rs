use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard};

/// Admission state of one approach, protected by the gate mutex.
#[derive(Debug, Default)]
pub struct GateQueue {
    /// BATs arrived but not yet departed in this direction.
    waiting: u32,
    /// Next admission ticket to hand out on arrival.
    next_ticket: u64,
    /// Ticket currently allowed at the head of the queue. Advances by one
    /// on every departure, so admission is strict arrival order.
    now_serving: u64,
}

impl GateQueue {
    pub fn waiting(&self) -> u32 {
        self.waiting
    }
}

/// Per-direction queuing state: a waiting counter plus the condvar that
/// vehicles queued behind the head suspend on.
///
/// The priority (right-of-way) condvars live on the
/// [`Monitor`](crate::crossing::monitor::Monitor) because they suspend on
/// the monitor mutex, not on this gate's mutex.
#[derive(Debug, Default)]
pub struct Gate {
    queue: Mutex<GateQueue>,
    admission: Condvar,
    /// Mirror of `GateQueue::waiting`, written only while the gate mutex is
    /// held. The deadlock detector reads it without locking: it must never
    /// take a gate mutex, since a deadlocked head vehicle still holds its
    /// gate mutex while suspended on the monitor's priority condvar.
    waiting_hint: AtomicU32,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, GateQueue> {
        self.queue.lock().expect("gate mutex poisoned")
    }

    /// Registers an arrival and hands out its admission ticket.
    pub fn check_in(&self, queue: &mut GateQueue) -> u64 {
        queue.waiting += 1;
        self.waiting_hint.store(queue.waiting, Ordering::SeqCst);
        let ticket = queue.next_ticket;
        queue.next_ticket += 1;
        ticket
    }

    /// Suspends the caller until its ticket reaches the head of the queue.
    /// The gate mutex is released while suspended and re-held on return.
    pub fn wait_for_head<'a>(
        &'a self,
        mut queue: MutexGuard<'a, GateQueue>,
        ticket: u64,
    ) -> MutexGuard<'a, GateQueue> {
        while queue.now_serving != ticket {
            queue = self.admission.wait(queue).expect("gate mutex poisoned");
        }
        queue
    }

    /// Registers a departure: gives the counter back, advances the head of
    /// the queue and wakes whoever holds the next ticket.
    pub fn check_out(&self, queue: &mut GateQueue) {
        debug_assert!(queue.waiting > 0, "gate check_out without check_in");
        queue.waiting -= 1;
        self.waiting_hint.store(queue.waiting, Ordering::SeqCst);
        queue.now_serving += 1;
        self.admission.notify_all();
    }

    /// Lock-free view of the waiting counter, for the deadlock detector and
    /// for the right-of-way predicate. Best effort: it can lag a concurrent
    /// check_in/check_out by a moment, which the callers tolerate.
    pub fn waiting_hint(&self) -> u32 {
        self.waiting_hint.load(Ordering::SeqCst)
    }
}
