// engine/mod.rs
pub mod simulation;
