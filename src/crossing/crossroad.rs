use std::thread;
use std::time::Duration;

use log::info;

use crate::crossing::directions::{Direction, DIRECTIONS};
use crate::crossing::events::{CrossingEvent, EventLog};
use crate::crossing::gate::Gate;
use crate::crossing::monitor::Monitor;
use crate::crossing::vehicles::Bat;

/// Timing knobs for one simulation run. The defaults mirror the reference
/// crossing: one second to cross, one second between deadlock checks.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    /// How long a BAT occupies the crossing.
    pub cross_time: Duration,
    /// How often the deadlock detector looks at the gates.
    pub detector_period: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cross_time: Duration::from_secs(1),
            detector_period: Duration::from_secs(1),
        }
    }
}

/// The shared crossing context: one gate per approach, the global monitor
/// and the event log. Constructed once per run and shared by reference
/// (an `Arc` in the driver) into every BAT thread and the detector.
#[derive(Debug)]
pub struct Crossroad {
    gates: [Gate; 4],
    monitor: Monitor,
    events: EventLog,
    cross_time: Duration,
}

impl Crossroad {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            gates: Default::default(),
            monitor: Monitor::new(),
            events: EventLog::new(),
            cross_time: config.cross_time,
        }
    }

    pub fn gate(&self, direction: Direction) -> &Gate {
        &self.gates[direction.index()]
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Lock-free view of all four waiting counters, in direction order.
    pub fn waiting_counts(&self) -> [u32; 4] {
        let mut counts = [0; 4];
        for direction in DIRECTIONS {
            counts[direction.index()] = self.gate(direction).waiting_hint();
        }
        counts
    }

    pub fn is_crossing(&self) -> bool {
        self.monitor.is_crossing()
    }

    /// Arrival: join the origin gate's queue, wait to become head of queue,
    /// then wait for right of way.
    ///
    /// Lock order is gate-then-monitor, and the monitor mutex is released
    /// before the gate mutex on the way out. The gate mutex stays held
    /// across the whole admission (including the priority wait), which is
    /// why the detector must never touch gate mutexes.
    pub fn arrive(&self, bat: &Bat) {
        let gate = self.gate(bat.origin);
        let mut queue = gate.lock();
        let ticket = gate.check_in(&mut queue);

        info!("BAT {} from {} arrives at crossing", bat.id, bat.origin);
        self.events.record(CrossingEvent::Arrived {
            bat: bat.id,
            origin: bat.origin,
        });

        let queue = gate.wait_for_head(queue, ticket);

        // Head of queue: yield while the approach on our right is occupied.
        // A forced-release marker from the detector overrides the predicate
        // for exactly one admission.
        let right = bat.origin.right_neighbor();
        let mut state = self.monitor.lock();
        while self.gate(right).waiting_hint() > 0 && !state.forced(bat.origin) {
            state = self.monitor.wait_priority(bat.origin, state);
        }
        state.clear_forced(bat.origin);
        drop(state);
        drop(queue);
    }

    /// Exclusive crossing: the monitor mutex is held for the full crossing
    /// duration, which is what keeps every other BAT out.
    pub fn cross(&self, bat: &Bat) {
        let state = self.monitor.lock();
        self.monitor.set_crossing(true);

        info!("BAT {} from {} crossing", bat.id, bat.origin);
        self.events.record(CrossingEvent::Crossing {
            bat: bat.id,
            origin: bat.origin,
        });

        thread::sleep(self.cross_time);
        self.monitor.set_crossing(false);
        drop(state);
    }

    /// Departure: give back the gate slot, wake the left neighbor's head
    /// (our gate may have been the one it was yielding to) and advance our
    /// own queue.
    pub fn leave(&self, bat: &Bat) {
        let gate = self.gate(bat.origin);
        let mut queue = gate.lock();

        info!("BAT {} from {} leaving crossing", bat.id, bat.origin);
        // Record before check_out: once the counter publishes as empty, the
        // left neighbor's head may be admitted, and its crossing must not
        // appear in the log ahead of this departure.
        self.events.record(CrossingEvent::Departed {
            bat: bat.id,
            origin: bat.origin,
        });
        gate.check_out(&mut queue);

        self.monitor.signal_priority(bat.origin.left_neighbor());
        drop(queue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::time::Instant;

    fn fast_config() -> SimulationConfig {
        SimulationConfig {
            cross_time: Duration::from_millis(50),
            detector_period: Duration::from_millis(10),
        }
    }

    #[test]
    fn crossing_is_mutually_exclusive() {
        let crossroad = Arc::new(Crossroad::new(&fast_config()));
        let contenders = 4;
        let barrier = Arc::new(Barrier::new(contenders + 1));

        let mut handles = Vec::new();
        for id in 0..contenders {
            let crossroad = Arc::clone(&crossroad);
            let barrier = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                let bat = Bat::new(id as u64 + 1, Direction::North);
                barrier.wait();
                crossroad.cross(&bat);
            }));
        }

        barrier.wait();
        let started = Instant::now();
        for handle in handles {
            handle.join().expect("crossing thread panicked");
        }

        // Four 50 ms crossings strictly serialized take about 200 ms; the
        // margin covers the first crossing starting before the clock does.
        assert!(started.elapsed() >= Duration::from_millis(180));
        assert!(!crossroad.is_crossing());
    }

    #[test]
    fn lone_bat_is_admitted_without_waiting() {
        let crossroad = Crossroad::new(&fast_config());
        let bat = Bat::new(1, Direction::South);
        bat.run(&crossroad);

        assert_eq!(crossroad.waiting_counts(), [0, 0, 0, 0]);
        assert_eq!(
            crossroad.events().snapshot(),
            vec![
                CrossingEvent::Arrived {
                    bat: 1,
                    origin: Direction::South
                },
                CrossingEvent::Crossing {
                    bat: 1,
                    origin: Direction::South
                },
                CrossingEvent::Departed {
                    bat: 1,
                    origin: Direction::South
                },
            ]
        );
    }

    #[test]
    fn head_yields_until_right_neighbor_empties() {
        // East's right neighbor is North. Keep North occupied long enough
        // for East to arrive, and check East only crosses after North left.
        let config = SimulationConfig {
            cross_time: Duration::from_millis(150),
            detector_period: Duration::from_secs(60),
        };
        let crossroad = Arc::new(Crossroad::new(&config));

        let north = {
            let crossroad = Arc::clone(&crossroad);
            thread::spawn(move || Bat::new(1, Direction::North).run(&crossroad))
        };
        // Wait until North actually occupies the crossing.
        while !crossroad.is_crossing() {
            thread::sleep(Duration::from_millis(1));
        }

        let east = {
            let crossroad = Arc::clone(&crossroad);
            thread::spawn(move || Bat::new(2, Direction::East).run(&crossroad))
        };

        north.join().expect("north thread panicked");
        east.join().expect("east thread panicked");

        let events = crossroad.events().snapshot();
        let north_departed = events
            .iter()
            .position(|e| matches!(e, CrossingEvent::Departed { bat: 1, .. }))
            .expect("north never departed");
        let east_crossing = events
            .iter()
            .position(|e| matches!(e, CrossingEvent::Crossing { bat: 2, .. }))
            .expect("east never crossed");
        assert!(
            north_departed < east_crossing,
            "east crossed before its right neighbor emptied: {events:?}"
        );
    }

    #[test]
    fn same_direction_queue_is_served_in_arrival_order() {
        let crossroad = Arc::new(Crossroad::new(&fast_config()));

        let mut handles = Vec::new();
        for id in 1..=3u64 {
            let worker = Arc::clone(&crossroad);
            handles.push(thread::spawn(move || {
                Bat::new(id, Direction::West).run(&worker)
            }));
            // Stagger arrivals so check-in order matches id order.
            loop {
                let arrived = crossroad
                    .events()
                    .snapshot()
                    .iter()
                    .filter(|e| matches!(e, CrossingEvent::Arrived { .. }))
                    .count();
                if arrived as u64 >= id {
                    break;
                }
                thread::sleep(Duration::from_millis(1));
            }
        }
        for handle in handles {
            handle.join().expect("west thread panicked");
        }

        let crossing_order: Vec<u64> = crossroad
            .events()
            .snapshot()
            .iter()
            .filter_map(|e| match e {
                CrossingEvent::Crossing { bat, .. } => Some(*bat),
                _ => None,
            })
            .collect();
        assert_eq!(crossing_order, vec![1, 2, 3]);
        assert_eq!(crossroad.waiting_counts(), [0, 0, 0, 0]);
    }
}
