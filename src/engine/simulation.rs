use std::sync::Arc;
use std::thread;

use log::info;

use crate::crossing::crossroad::{Crossroad, SimulationConfig};
use crate::crossing::deadlock::spawn_detector;
use crate::crossing::directions::{Direction, UnknownDirection};
use crate::crossing::events::CrossingEvent;
use crate::crossing::vehicles::Bat;

/// What a finished run looked like, for the driver and for tests.
#[derive(Debug)]
pub struct SimulationReport {
    /// Number of BATs simulated (length of the input string).
    pub vehicles: usize,
    /// Whether the detector had to break a circular wait.
    pub deadlock_broken: bool,
    /// Every event at the crossing, in order of occurrence.
    pub events: Vec<CrossingEvent>,
}

/// Runs one full simulation: one thread per input symbol plus the
/// detector, joined once every BAT has left.
///
/// Each symbol of `input` is a direction (`n`, `e`, `s`, `w`); the whole
/// string is validated before any thread is spawned.
pub fn run_simulation(
    input: &str,
    config: SimulationConfig,
) -> Result<SimulationReport, UnknownDirection> {
    let origins = input
        .chars()
        .map(Direction::from_symbol)
        .collect::<Result<Vec<_>, _>>()?;

    let crossroad = Arc::new(Crossroad::new(&config));
    let detector = spawn_detector(Arc::clone(&crossroad), config.detector_period);

    let handles: Vec<_> = origins
        .into_iter()
        .map(|origin| {
            let crossroad = Arc::clone(&crossroad);
            thread::spawn(move || {
                let bat = Bat::new(crossroad.monitor().next_id(), origin);
                bat.run(&crossroad);
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("BAT thread panicked");
    }
    info!("All BATs left, no more BATs.");
    detector.stop();

    Ok(SimulationReport {
        vehicles: input.len(),
        deadlock_broken: crossroad.monitor().deadlock_was_broken(),
        events: crossroad.events().snapshot(),
    })
}
