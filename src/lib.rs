pub mod crossing;
pub mod engine;
