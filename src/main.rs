use std::io;
use std::process;

use env_logger::Env;

use bat_crossing::crossing::crossroad::SimulationConfig;
use bat_crossing::engine::simulation::run_simulation;

fn main() {
    // Progress lines are the whole point of the program, so log at info
    // unless RUST_LOG says otherwise.
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut line = String::new();
    if let Err(err) = io::stdin().read_line(&mut line) {
        eprintln!("failed to read input: {err}");
        process::exit(1);
    }
    // First whitespace-delimited token, one direction symbol per BAT.
    let bats = line.split_whitespace().next().unwrap_or("");

    match run_simulation(bats, SimulationConfig::default()) {
        Ok(report) => {
            if report.deadlock_broken {
                println!("Simulated {} BATs (one BAT jam broken).", report.vehicles);
            } else {
                println!("Simulated {} BATs.", report.vehicles);
            }
        }
        Err(err) => {
            eprintln!("invalid input: {err}");
            process::exit(1);
        }
    }
}
