use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::warn;

use crate::crossing::crossroad::Crossroad;
use crate::crossing::directions::Direction;
use crate::crossing::events::CrossingEvent;

/// The direction the detector releases when it finds a circular wait.
/// Fixed and arbitrary; which direction goes first does not matter, only
/// that exactly one head gets past its right-of-way wait.
const RELEASED_DIRECTION: Direction = Direction::North;

/// One deadlock check. Reads are lock-free and best effort: a stale
/// counter can only miss a deadlock (caught on the next tick) or force a
/// release one vehicle early (which just grants right of way early).
///
/// Circular wait: every approach occupied and nobody crossing, so each
/// head is yielding to its right neighbor and none can move.
pub fn check_for_deadlock(crossroad: &Crossroad) -> bool {
    let counts = crossroad.waiting_counts();
    let deadlocked = counts.iter().all(|&count| count > 0) && !crossroad.is_crossing();
    if deadlocked {
        warn!(
            "DEADLOCK: BAT jam detected, signalling {} to go",
            RELEASED_DIRECTION
        );
        crossroad.monitor().mark_deadlock_broken();
        crossroad.events().record(CrossingEvent::DeadlockBroken {
            released: RELEASED_DIRECTION,
        });
        crossroad.monitor().force_release(RELEASED_DIRECTION);
    }
    deadlocked
}

/// Handle to the background detector thread. Stopping joins the thread;
/// dropping the handle stops it as well, so a run can never leak the
/// detector past its driver.
#[derive(Debug)]
pub struct DetectorHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl DetectorHandle {
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            thread.join().expect("deadlock detector panicked");
        }
    }
}

impl Drop for DetectorHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Spawns the perpetual detector: check, sleep one period, repeat, until
/// the handle asks it to stop. The tick loop is the retry mechanism; a
/// forced release that moves nobody leaves the predicate true for the
/// next tick.
pub fn spawn_detector(crossroad: Arc<Crossroad>, period: Duration) -> DetectorHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let thread = {
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            while !stop.load(Ordering::SeqCst) {
                check_for_deadlock(&crossroad);
                thread::sleep(period);
            }
        })
    };
    DetectorHandle {
        stop,
        thread: Some(thread),
    }
}
