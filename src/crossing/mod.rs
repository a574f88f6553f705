// crossing/mod.rs
pub mod crossroad;
pub mod deadlock;
pub mod directions;
pub mod events;
pub mod gate;
pub mod monitor;
pub mod vehicles;
